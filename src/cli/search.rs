// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::config::RagCoreConfig;
use crate::search::{ProviderRegistry, SearchCategory, SearchOptions};

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Request scraped page content
    #[arg(long)]
    pub scrape: bool,

    /// Number of results (clamped by the provider)
    #[arg(long, default_value_t = crate::search::types::DEFAULT_MAX_RESULTS)]
    pub max_results: usize,

    /// Only return results from this domain (repeatable)
    #[arg(long = "include-domain")]
    pub include_domains: Vec<String>,

    /// Never return results from this domain (repeatable)
    #[arg(long = "exclude-domain")]
    pub exclude_domains: Vec<String>,

    /// Content category (general/news/finance)
    #[arg(long)]
    pub category: Option<String>,

    /// Earliest publication date (YYYY-MM-DD)
    #[arg(long = "from")]
    pub start_published_date: Option<String>,

    /// Latest publication date (YYYY-MM-DD)
    #[arg(long = "to")]
    pub end_published_date: Option<String>,
}

impl SearchArgs {
    pub fn options(&self) -> Result<SearchOptions> {
        let category = self
            .category
            .as_deref()
            .map(str::parse::<SearchCategory>)
            .transpose()?;

        let options = SearchOptions {
            max_results: self.max_results,
            scrape_content: self.scrape,
            include_domains: self.include_domains.clone(),
            exclude_domains: self.exclude_domains.clone(),
            start_published_date: self.start_published_date.clone(),
            end_published_date: self.end_published_date.clone(),
            category,
        };
        options.validate()?;
        Ok(options)
    }
}

/// Run one search through the registry and print the results
pub async fn run_search(args: SearchArgs, config: &RagCoreConfig) -> Result<()> {
    let options = args.options()?;
    let registry = ProviderRegistry::new(config.search.clone());

    let results = registry.search_with_fallback(&args.query, &options).await?;
    info!("{} results for '{}'", results.len(), args.query);

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
