// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process configuration
//!
//! Loaded once at startup and validated eagerly. Every problem is reported
//! together through [`ConfigError::Invalid`].

use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::quota::QuotaConfig;
use crate::search::SearchConfig;

/// Configuration errors raised at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is set but does not parse
    #[error("{name}={value} is not a valid number")]
    InvalidNumber { name: String, value: String },

    /// One or more settings are out of range
    #[error("Invalid configuration: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },
}

/// Read and parse an optional environment variable
pub(crate) fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(None),
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                name: name.to_string(),
                value,
            }),
    }
}

/// Everything this crate reads from its environment
#[derive(Debug, Clone, Default)]
pub struct RagCoreConfig {
    pub search: SearchConfig,
    pub quota: QuotaConfig,
}

impl RagCoreConfig {
    /// Load from the environment (and a `.env` file when present)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Ok(Self {
            search: SearchConfig::from_env()?,
            quota: QuotaConfig::from_env()?,
        })
    }

    /// Load and validate in one step
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = self.search.problems();
        problems.extend(self.quota.problems());

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { problems })
        }
    }
}
