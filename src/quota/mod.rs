// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Daily usage quotas
//!
//! Fixed-window counters per identity, consulted before any search is made.
//! Reaching the limit is reported as `allowed: false`, never as an error.

pub mod config;
pub mod ledger;

pub use config::{
    LimitKind, QuotaConfig, QuotaWindow, RateLimitConfig, UnknownWindow, ANONYMOUS_DAILY_RATE,
    AUTHENTICATED_DAILY_RATE, DAY_MS,
};
pub use ledger::{QuotaDecision, QuotaLedger};
