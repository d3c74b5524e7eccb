// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod quota;
pub mod rag;
pub mod search;

// Re-export main types
pub use config::{ConfigError, RagCoreConfig};
pub use quota::{QuotaConfig, QuotaDecision, QuotaLedger, QuotaWindow};
pub use rag::{
    decode_rag_images_header, decode_related_images_header, encode_rag_images_for_header,
    encode_related_images_for_header, ContextEncodingError, HeaderEncoding, ImageDescriptor,
    RagContextResponse,
};
pub use search::{
    ProviderRegistry, SearchConfig, SearchError, SearchOptions, SearchProvider, SearchResult,
};
