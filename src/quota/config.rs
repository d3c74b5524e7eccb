// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Quota window definitions
//!
//! Exactly two fixed windows exist, one per identity class. They are built
//! once at startup and never change afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{parse_env, ConfigError};

/// Length of a daily window in milliseconds
pub const DAY_MS: u64 = 86_400_000;

/// Daily admissions for anonymous identities
pub const ANONYMOUS_DAILY_RATE: u32 = 10;

/// Daily admissions for authenticated identities
pub const AUTHENTICATED_DAILY_RATE: u32 = 100;

/// Counting scheme of a rate limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LimitKind {
    /// Count resets at fixed boundaries (multiples of the period since the epoch)
    FixedWindow,
}

/// One rate limit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitConfig {
    pub kind: LimitKind,
    /// Maximum admissions per window
    pub rate: u32,
    /// Window length in milliseconds
    pub period_ms: u64,
}

impl RateLimitConfig {
    pub const fn fixed_window(rate: u32, period_ms: u64) -> Self {
        Self {
            kind: LimitKind::FixedWindow,
            rate,
            period_ms,
        }
    }
}

/// Named quota windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuotaWindow {
    AnonymousDaily,
    AuthenticatedDaily,
}

impl QuotaWindow {
    pub const ALL: [QuotaWindow; 2] = [Self::AnonymousDaily, Self::AuthenticatedDaily];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnonymousDaily => "anonymous-daily",
            Self::AuthenticatedDaily => "authenticated-daily",
        }
    }
}

impl fmt::Display for QuotaWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Window name that is not one of [`QuotaWindow::ALL`]
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown quota window: {0}")]
pub struct UnknownWindow(pub String);

impl FromStr for QuotaWindow {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anonymous-daily" | "anonymousDaily" => Ok(Self::AnonymousDaily),
            "authenticated-daily" | "authenticatedDaily" => Ok(Self::AuthenticatedDaily),
            other => Err(UnknownWindow(other.to_string())),
        }
    }
}

/// The two daily quota windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaConfig {
    pub anonymous_daily: RateLimitConfig,
    pub authenticated_daily: RateLimitConfig,
}

impl QuotaConfig {
    /// Build the windows with explicit daily rates
    pub const fn daily(anonymous_rate: u32, authenticated_rate: u32) -> Self {
        Self {
            anonymous_daily: RateLimitConfig::fixed_window(anonymous_rate, DAY_MS),
            authenticated_daily: RateLimitConfig::fixed_window(authenticated_rate, DAY_MS),
        }
    }

    /// Load rates from environment variables, falling back to the constants
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::daily(
            parse_env("QUOTA_ANONYMOUS_DAILY")?.unwrap_or(ANONYMOUS_DAILY_RATE),
            parse_env("QUOTA_AUTHENTICATED_DAILY")?.unwrap_or(AUTHENTICATED_DAILY_RATE),
        ))
    }

    pub fn window(&self, window: QuotaWindow) -> &RateLimitConfig {
        match window {
            QuotaWindow::AnonymousDaily => &self.anonymous_daily,
            QuotaWindow::AuthenticatedDaily => &self.authenticated_daily,
        }
    }

    /// Collect every problem with the configured windows
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for window in QuotaWindow::ALL {
            let limit = self.window(window);
            if limit.rate == 0 {
                problems.push(format!("{} rate must be greater than 0", window));
            }
            if limit.period_ms == 0 {
                problems.push(format!("{} period must be greater than 0", window));
            }
        }
        problems
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self::daily(ANONYMOUS_DAILY_RATE, AUTHENTICATED_DAILY_RATE)
    }
}
