// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider registry
//!
//! Owns the search providers for the life of the application. Providers are
//! built on first use, exactly once, and the outcome (including a missing
//! credential) is shared by every caller.

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::config::SearchConfig;
use super::provider::SearchProvider;
use super::tavily::TavilySearchProvider;
use super::types::{SearchError, SearchOptions, SearchResult};

/// Providers in fallback order
pub type ProviderList = Vec<Arc<dyn SearchProvider>>;

type ProviderFactory =
    Box<dyn Fn(&SearchConfig) -> Result<ProviderList, SearchError> + Send + Sync>;

/// Build the providers enabled by `config`
///
/// Fails with `ConfigurationMissing` when no Tavily API key is set.
pub fn default_providers(config: &SearchConfig) -> Result<ProviderList, SearchError> {
    let api_key = config
        .api_key()
        .ok_or_else(|| SearchError::ConfigurationMissing {
            field: "TAVILY_API_KEY".to_string(),
        })?;

    let provider: Arc<dyn SearchProvider> =
        Arc::new(TavilySearchProvider::new(api_key.to_string(), config)?);
    debug!("Tavily search provider enabled");
    Ok(vec![provider])
}

/// Caller-owned registry of search providers
///
/// Construct once at startup and share it (usually behind an `Arc`).
pub struct ProviderRegistry {
    config: SearchConfig,
    factory: ProviderFactory,
    providers: OnceCell<Result<ProviderList, SearchError>>,
}

impl ProviderRegistry {
    /// Create a registry that builds the default providers on first use
    pub fn new(config: SearchConfig) -> Self {
        Self::with_factory(config, default_providers)
    }

    /// Create a registry with a custom provider factory
    ///
    /// The factory runs at most once per registry.
    pub fn with_factory<F>(config: SearchConfig, factory: F) -> Self
    where
        F: Fn(&SearchConfig) -> Result<ProviderList, SearchError> + Send + Sync + 'static,
    {
        Self {
            config,
            factory: Box::new(factory),
            providers: OnceCell::new(),
        }
    }

    async fn providers(&self) -> Result<&[Arc<dyn SearchProvider>], SearchError> {
        let resolved = self
            .providers
            .get_or_init(|| async {
                let built = (self.factory)(&self.config).and_then(|mut list| {
                    if list.is_empty() {
                        return Err(SearchError::ConfigurationMissing {
                            field: "search providers".to_string(),
                        });
                    }
                    list.sort_by_key(|p| p.priority());
                    Ok(list)
                });

                match &built {
                    Ok(list) => info!(
                        "Search providers ready: {:?}",
                        list.iter().map(|p| p.name()).collect::<Vec<_>>()
                    ),
                    Err(e) => warn!("Search providers unavailable: {}", e),
                }
                built
            })
            .await;

        match resolved {
            Ok(list) => Ok(list.as_slice()),
            Err(e) => Err(e.clone()),
        }
    }

    /// The preferred provider
    pub async fn adapter(&self) -> Result<Arc<dyn SearchProvider>, SearchError> {
        let providers = self.providers().await?;
        providers
            .first()
            .cloned()
            .ok_or_else(|| SearchError::ConfigurationMissing {
                field: "search providers".to_string(),
            })
    }

    /// Names of the resolved providers, in fallback order
    pub async fn provider_names(&self) -> Result<Vec<&'static str>, SearchError> {
        Ok(self.providers().await?.iter().map(|p| p.name()).collect())
    }

    /// Search with ordered fallback
    ///
    /// Providers are tried by priority. The first success is returned, even
    /// when it holds no results; if every provider fails the last error is
    /// returned. Failed calls are not retried.
    pub async fn search_with_fallback(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let providers = self.providers().await?;
        let mut last_error = None;

        for provider in providers {
            debug!("Trying search provider: {}", provider.name());

            match provider.search(query, options).await {
                Ok(results) => return Ok(results),
                Err(e) => {
                    warn!("Search provider {} failed: {}", provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SearchError::ConfigurationMissing {
            field: "search providers".to_string(),
        }))
    }
}
