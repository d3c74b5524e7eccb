// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search provider trait definition

use async_trait::async_trait;

use super::types::{SearchError, SearchOptions, SearchResult};

/// Trait for implementing search providers
///
/// Providers translate [`SearchOptions`] into their own request shape. The
/// options are borrowed immutably; `SearchOptions::default()` must be accepted.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a web search
    ///
    /// # Arguments
    /// * `query` - The search query string
    /// * `options` - Per-call options
    ///
    /// # Returns
    /// Results in provider order, or an error. An empty vector is a success.
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, SearchError>;

    /// Get the provider name for logging
    fn name(&self) -> &'static str;

    /// Get provider priority (lower = preferred)
    ///
    /// Default priority is 100. Providers with lower priority
    /// are tried first during fallback.
    fn priority(&self) -> u8 {
        100
    }
}
