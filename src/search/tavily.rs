// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tavily Search API provider
//!
//! Implements web search using the Tavily Search API. The request shape is
//! derived from the caller's scraping intent: scraping switches on content,
//! the advanced depth and the denser chunking together, never one at a time.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::config::SearchConfig;
use super::provider::SearchProvider;
use super::types::{SearchError, SearchOptions, SearchResult};

const PROVIDER_NAME: &str = "tavily";

/// Chunks per source requested when scraping, before the provider cap
pub const SCRAPE_CHUNKS_PER_SOURCE: u32 = 5;

/// Chunks per source sent when no content is requested
pub const BASELINE_CHUNKS_PER_SOURCE: u32 = 3;

/// Search depth understood by Tavily
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    Advanced,
}

/// Upper bounds advertised by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderLimits {
    pub max_results: usize,
    pub max_chunks_per_source: u32,
}

impl From<&SearchConfig> for ProviderLimits {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_results: config.max_results_cap,
            max_chunks_per_source: config.max_chunks_per_source,
        }
    }
}

/// JSON body of a Tavily search request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TavilySearchRequest {
    pub query: String,
    pub max_results: usize,
    pub include_content: bool,
    pub search_depth: SearchDepth,
    pub chunks_per_source: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_published_date: Option<String>,
}

/// Build the request body for `query`
///
/// `max_results` is clamped into `1..=limits.max_results`. Empty domain lists
/// are omitted, not sent as `[]`.
pub fn build_request(
    query: &str,
    options: &SearchOptions,
    limits: ProviderLimits,
) -> TavilySearchRequest {
    let (include_content, search_depth, chunks_per_source) = if options.scrape_content {
        (
            true,
            SearchDepth::Advanced,
            SCRAPE_CHUNKS_PER_SOURCE.min(limits.max_chunks_per_source),
        )
    } else {
        (false, SearchDepth::Basic, BASELINE_CHUNKS_PER_SOURCE)
    };

    TavilySearchRequest {
        query: query.to_string(),
        max_results: options.max_results.min(limits.max_results).max(1),
        include_content,
        search_depth,
        chunks_per_source,
        topic: options.category.map(|c| c.as_str()),
        include_domains: non_empty(&options.include_domains),
        exclude_domains: non_empty(&options.exclude_domains),
        start_published_date: options.start_published_date.clone(),
        end_published_date: options.end_published_date.clone(),
    }
}

fn non_empty(domains: &[String]) -> Option<Vec<String>> {
    if domains.is_empty() {
        None
    } else {
        Some(domains.to_vec())
    }
}

/// Tavily Search API provider
pub struct TavilySearchProvider {
    api_key: String,
    endpoint: String,
    limits: ProviderLimits,
    timeout_ms: u64,
    client: Client,
}

impl TavilySearchProvider {
    /// Create a new Tavily provider
    ///
    /// # Arguments
    /// * `api_key` - Tavily API key
    /// * `config` - Endpoint, timeout and provider limits
    pub fn new(api_key: String, config: &SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| SearchError::ProviderRequestFailed {
                provider: PROVIDER_NAME.to_string(),
                status: None,
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            api_key,
            endpoint: config.endpoint.clone(),
            limits: ProviderLimits::from(config),
            timeout_ms: config.request_timeout_ms,
            client,
        })
    }

    /// Limits applied to every request from this provider
    pub fn limits(&self) -> ProviderLimits {
        self.limits
    }

    fn failure(status: Option<u16>, message: String) -> SearchError {
        SearchError::ProviderRequestFailed {
            provider: PROVIDER_NAME.to_string(),
            status,
            message,
        }
    }
}

#[async_trait]
impl SearchProvider for TavilySearchProvider {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, SearchError> {
        options.validate()?;

        let body = build_request(query, options, self.limits);
        debug!(
            "Tavily request: depth={:?} chunks={} max_results={}",
            body.search_depth, body.chunks_per_source, body.max_results
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Self::failure(None, format!("timed out after {}ms", self.timeout_ms))
                } else {
                    Self::failure(None, e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Tavily returned {}: {}", status, message);
            return Err(Self::failure(Some(status.as_u16()), message));
        }

        let data: TavilyResponse = response.json().await.map_err(|e| {
            Self::failure(Some(status.as_u16()), format!("JSON parse error: {}", e))
        })?;

        let scraped = options.scrape_content;
        let results: Vec<SearchResult> = data
            .results
            .into_iter()
            .map(|r| SearchResult {
                url: r.url,
                title: r.title,
                description: r.description,
                content: r.content.filter(|_| scraped),
                markdown: r.markdown.filter(|_| scraped),
            })
            .collect();

        info!(
            "Tavily search complete: {} results in {}ms",
            results.len(),
            start.elapsed().as_millis()
        );
        Ok(results)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn priority(&self) -> u8 {
        10
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    title: String,
    description: String,
    content: Option<String>,
    markdown: Option<String>,
}
