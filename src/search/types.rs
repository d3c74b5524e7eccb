// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for web search functionality

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of results requested when the caller does not say
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Content-type tag a search can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    General,
    News,
    Finance,
}

impl SearchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::News => "news",
            Self::Finance => "finance",
        }
    }
}

impl std::str::FromStr for SearchCategory {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" => Ok(Self::General),
            "news" => Ok(Self::News),
            "finance" => Ok(Self::Finance),
            other => Err(SearchError::InvalidOptions {
                reason: format!("unknown category '{}'", other),
            }),
        }
    }
}

/// Per-call search options
///
/// `SearchOptions::default()` stands for "no options supplied".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// Requested number of results, clamped by the provider
    pub max_results: usize,
    /// Whether page content should be scraped and chunked
    pub scrape_content: bool,
    /// Host patterns results must come from
    pub include_domains: Vec<String>,
    /// Host patterns results must not come from
    pub exclude_domains: Vec<String>,
    /// Earliest publication date (`YYYY-MM-DD`)
    pub start_published_date: Option<String>,
    /// Latest publication date (`YYYY-MM-DD`)
    pub end_published_date: Option<String>,
    pub category: Option<SearchCategory>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            scrape_content: false,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
            start_published_date: None,
            end_published_date: None,
            category: None,
        }
    }
}

impl SearchOptions {
    /// Options requesting scraped page content
    pub fn scraping() -> Self {
        Self {
            scrape_content: true,
            ..Self::default()
        }
    }

    /// Check that the date range is well formed
    ///
    /// Dates are passed to the provider verbatim, so they are only parsed here
    /// to reject values the provider would misread.
    pub fn validate(&self) -> Result<(), SearchError> {
        let start = parse_date("start_published_date", self.start_published_date.as_deref())?;
        let end = parse_date("end_published_date", self.end_published_date.as_deref())?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(SearchError::InvalidOptions {
                    reason: format!("published date range is inverted: {} > {}", start, end),
                });
            }
        }
        Ok(())
    }
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, SearchError> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| SearchError::InvalidOptions {
                reason: format!("{} '{}' is not an ISO date: {}", field, raw, e),
            }),
    }
}

/// A single search result from a web search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    /// Snippet/description of the search result
    pub description: String,
    /// Extracted page content, only when scraping was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Page content as markdown, only when scraping was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

/// Errors that can occur during search operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// A required configuration value is absent
    #[error("Missing configuration: {field}")]
    ConfigurationMissing {
        /// Name of the missing setting
        field: String,
    },

    /// The provider call failed (status, body, network or timeout)
    #[error("{provider} request failed{}: {message}", status_suffix(.status))]
    ProviderRequestFailed {
        /// Provider that was called
        provider: String,
        /// HTTP status code, when a response was received
        status: Option<u16>,
        /// Human-readable failure description
        message: String,
    },

    /// Search options could not be sent as given
    #[error("Invalid search options: {reason}")]
    InvalidOptions { reason: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {}", code),
        None => String::new(),
    }
}
