// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for web search functionality

use std::env;

use crate::config::{parse_env, ConfigError};

/// Tavily search endpoint
pub const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Configuration for web search functionality
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Tavily API key. Checked when the registry first builds its provider.
    pub tavily_api_key: Option<String>,
    /// Search endpoint URL
    pub endpoint: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Largest `max_results` the provider accepts
    pub max_results_cap: usize,
    /// Largest `chunks_per_source` the provider accepts
    pub max_chunks_per_source: u32,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            tavily_api_key: env::var("TAVILY_API_KEY").ok(),
            endpoint: env::var("SEARCH_ENDPOINT").unwrap_or(defaults.endpoint),
            request_timeout_ms: parse_env("SEARCH_REQUEST_TIMEOUT_MS")?
                .unwrap_or(defaults.request_timeout_ms),
            max_results_cap: parse_env("SEARCH_MAX_RESULTS_CAP")?
                .unwrap_or(defaults.max_results_cap),
            max_chunks_per_source: parse_env("SEARCH_MAX_CHUNKS_PER_SOURCE")?
                .unwrap_or(defaults.max_chunks_per_source),
        })
    }

    /// Collect every problem with this configuration
    ///
    /// A missing API key is not reported here; it surfaces as
    /// `SearchError::ConfigurationMissing` on first use of the registry.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.endpoint.trim().is_empty() {
            problems.push("search endpoint must not be empty".to_string());
        }
        if self.request_timeout_ms == 0 {
            problems.push("search request timeout must be greater than 0".to_string());
        }
        if self.max_results_cap == 0 {
            problems.push("search max results cap must be greater than 0".to_string());
        }
        if self.max_chunks_per_source == 0 {
            problems.push("search max chunks per source must be greater than 0".to_string());
        }
        problems
    }

    /// The configured API key, trimmed; `None` when unset or blank
    pub fn api_key(&self) -> Option<&str> {
        self.tavily_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tavily_api_key: None,
            endpoint: TAVILY_API_URL.to_string(),
            request_timeout_ms: 10000,
            max_results_cap: 20,
            max_chunks_per_source: 3,
        }
    }
}
