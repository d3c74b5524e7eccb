// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod context;
pub mod search;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::RagCoreConfig;
use crate::quota::QuotaWindow;

/// Fabstir RAG core CLI
#[derive(Parser, Debug)]
#[command(name = "fabstir-rag")]
#[command(version = "0.1.0")]
#[command(about = "Web search and retrieval context tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a web search and print the results as JSON
    Search(search::SearchArgs),

    /// Encode a retrieval context file into header values
    EncodeContext(context::EncodeContextArgs),

    /// Show the configured quota windows
    Quota,
}

/// Log filter from `RUST_LOG` style directives, `info` when unset or unparsable
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let config = RagCoreConfig::load()?;

    match cli.command {
        Commands::Search(args) => search::run_search(args, &config).await,
        Commands::EncodeContext(args) => context::encode_context(args),
        Commands::Quota => {
            for window in QuotaWindow::ALL {
                let limit = config.quota.window(window);
                println!(
                    "{}: {} per {}ms ({:?})",
                    window, limit.rate, limit.period_ms, limit.kind
                );
            }
            Ok(())
        }
    }
}
