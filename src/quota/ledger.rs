// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed-window quota counters
//!
//! One counter per (identity, window). The counter remembers which window
//! epoch it belongs to and starts over when a new epoch begins. The first
//! call that sees a new epoch for a window drops that window's stale
//! counters, so identities that never return do not accumulate.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use super::config::{QuotaConfig, QuotaWindow, RateLimitConfig};

/// Result of a quota check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaDecision {
    pub allowed: bool,
    /// Admissions left in the current window
    pub remaining: u32,
    /// When the current window ends (ms since the Unix epoch)
    pub resets_at_ms: u64,
}

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    epoch: u64,
    count: u32,
}

/// Counters of one quota window
#[derive(Debug, Default)]
struct WindowCounters {
    /// Newest epoch for which stale counters were dropped
    swept_epoch: u64,
    by_identity: HashMap<String, WindowCounter>,
}

impl WindowCounters {
    /// Drop counters older than `epoch`, at most once per epoch
    fn sweep(&mut self, window: QuotaWindow, epoch: u64) -> usize {
        if epoch <= self.swept_epoch {
            return 0;
        }
        self.swept_epoch = epoch;

        let before = self.by_identity.len();
        self.by_identity.retain(|_, counter| counter.epoch >= epoch);
        let removed = before - self.by_identity.len();
        if removed > 0 {
            debug!("Dropped {} expired quota counters in {}", removed, window);
        }
        removed
    }
}

/// In-memory quota ledger
///
/// The admission check and the increment share one lock, so concurrent
/// callers can never be admitted past the window's rate.
pub struct QuotaLedger {
    config: QuotaConfig,
    windows: Mutex<HashMap<QuotaWindow, WindowCounters>>,
}

impl QuotaLedger {
    pub fn new(config: QuotaConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Try to admit one action for `identity_key` in `window`
    pub fn consume(&self, identity_key: &str, window: QuotaWindow) -> QuotaDecision {
        self.consume_at(identity_key, window, now_ms())
    }

    /// [`consume`](Self::consume) against an explicit clock
    pub fn consume_at(&self, identity_key: &str, window: QuotaWindow, now_ms: u64) -> QuotaDecision {
        let limit = *self.config.window(window);
        let epoch = now_ms / limit.period_ms.max(1);

        let mut windows = self.lock();
        let counters = windows.entry(window).or_default();
        counters.sweep(window, epoch);

        // Returning identities are looked up without allocating a key
        if let Some(counter) = counters.by_identity.get_mut(identity_key) {
            return admit(counter, &limit, epoch, identity_key, window);
        }
        let counter = counters
            .by_identity
            .entry(identity_key.to_string())
            .or_insert(WindowCounter { epoch, count: 0 });
        admit(counter, &limit, epoch, identity_key, window)
    }

    /// Admissions left for `identity_key` without consuming any
    pub fn peek_at(&self, identity_key: &str, window: QuotaWindow, now_ms: u64) -> u32 {
        let limit = self.config.window(window);
        let epoch = now_ms / limit.period_ms.max(1);
        let windows = self.lock();

        match windows
            .get(&window)
            .and_then(|counters| counters.by_identity.get(identity_key))
        {
            Some(counter) if counter.epoch >= epoch => limit.rate.saturating_sub(counter.count),
            _ => limit.rate,
        }
    }

    /// Drop counters whose window has ended, returning how many were removed
    pub fn purge_expired_at(&self, now_ms: u64) -> usize {
        let mut windows = self.lock();
        windows
            .iter_mut()
            .map(|(window, counters)| {
                let period = self.config.window(*window).period_ms.max(1);
                counters.sweep(*window, now_ms / period)
            })
            .sum()
    }

    /// Number of live counters
    pub fn tracked(&self) -> usize {
        self.lock()
            .values()
            .map(|counters| counters.by_identity.len())
            .sum()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QuotaWindow, WindowCounters>> {
        // Counters are updated in a single assignment, so a poisoned map is still consistent
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn admit(
    counter: &mut WindowCounter,
    limit: &RateLimitConfig,
    epoch: u64,
    identity_key: &str,
    window: QuotaWindow,
) -> QuotaDecision {
    // Only move forward; a clock that steps back keeps the newer window
    if counter.epoch < epoch {
        *counter = WindowCounter { epoch, count: 0 };
    }
    let resets_at_ms = (counter.epoch + 1).saturating_mul(limit.period_ms.max(1));

    if counter.count < limit.rate {
        counter.count += 1;
        let remaining = limit.rate - counter.count;
        debug!(
            "Quota admitted {} in {}: {} remaining",
            identity_key, window, remaining
        );
        QuotaDecision {
            allowed: true,
            remaining,
            resets_at_ms,
        }
    } else {
        info!("Quota reached for {} in {}", identity_key, window);
        QuotaDecision {
            allowed: false,
            remaining: 0,
            resets_at_ms,
        }
    }
}

fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
