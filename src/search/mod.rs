// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search module
//!
//! Provides web search for retrieval-augmented generation:
//! - A provider contract shared by every search backend
//! - The Tavily provider, whose request shape follows the scraping intent
//! - A registry that builds providers once and falls back in priority order
//!
//! Results are never cached and failed provider calls are never retried.

pub mod config;
pub mod provider;
pub mod resolver;
pub mod tavily;
pub mod types;

// Re-export commonly used types
pub use config::SearchConfig;
pub use provider::SearchProvider;
pub use resolver::{ProviderList, ProviderRegistry};
pub use tavily::{build_request, ProviderLimits, SearchDepth, TavilySearchProvider};
pub use types::{SearchCategory, SearchError, SearchOptions, SearchResult};
