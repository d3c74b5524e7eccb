// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Header-safe encoding of retrieval context payloads
//!
//! Payloads are serialized to canonical JSON and base64 encoded. When the
//! encoded form would not fit the caller's budget the result is
//! [`HeaderEncoding::TooLarge`]; nothing is ever truncated.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::errors::ContextEncodingError;
use super::types::{ImageDescriptor, RagContextResponse};

const RAG_IMAGES: &str = "rag images";
const RELATED_IMAGES: &str = "related images";

/// Outcome of encoding a payload against a size budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderEncoding {
    /// The full payload, encoded
    Encoded(String),
    /// The encoded payload would exceed `max_chars`
    TooLarge { encoded_len: usize, max_chars: usize },
}

impl HeaderEncoding {
    pub fn is_too_large(&self) -> bool {
        matches!(self, Self::TooLarge { .. })
    }

    /// The encoded string, or `None` when too large
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Encoded(value) => Some(value),
            Self::TooLarge { .. } => None,
        }
    }
}

fn encode_payload<T: Serialize + ?Sized>(
    payload: &'static str,
    value: &T,
    max_chars: usize,
) -> Result<HeaderEncoding, ContextEncodingError> {
    let json = serde_json::to_vec(value)
        .map_err(|source| ContextEncodingError::Serialize { payload, source })?;

    // base64 length is known up front; oversized payloads are never encoded
    let encoded_len = base64::encoded_len(json.len(), true).unwrap_or(usize::MAX);
    if encoded_len > max_chars {
        debug!(
            "{} payload too large for header: {} > {} chars",
            payload, encoded_len, max_chars
        );
        return Ok(HeaderEncoding::TooLarge {
            encoded_len,
            max_chars,
        });
    }

    Ok(HeaderEncoding::Encoded(BASE64.encode(json)))
}

fn decode_payload<T: DeserializeOwned>(
    payload: &'static str,
    encoded: &str,
) -> Result<T, ContextEncodingError> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|source| ContextEncodingError::InvalidBase64 { payload, source })?;
    serde_json::from_slice(&bytes)
        .map_err(|source| ContextEncodingError::InvalidJson { payload, source })
}

/// Encode `ctx.image_map` within `max_chars`
pub fn encode_rag_images_for_header(
    ctx: &RagContextResponse,
    max_chars: usize,
) -> Result<HeaderEncoding, ContextEncodingError> {
    encode_payload(RAG_IMAGES, &ctx.image_map, max_chars)
}

/// Encode `ctx.images` within `max_chars`
pub fn encode_related_images_for_header(
    ctx: &RagContextResponse,
    max_chars: usize,
) -> Result<HeaderEncoding, ContextEncodingError> {
    encode_payload(RELATED_IMAGES, &ctx.images, max_chars)
}

/// Decode a value produced by [`encode_rag_images_for_header`]
pub fn decode_rag_images_header(
    encoded: &str,
) -> Result<BTreeMap<String, ImageDescriptor>, ContextEncodingError> {
    decode_payload(RAG_IMAGES, encoded)
}

/// Decode a value produced by [`encode_related_images_for_header`]
pub fn decode_related_images_header(
    encoded: &str,
) -> Result<Vec<ImageDescriptor>, ContextEncodingError> {
    decode_payload(RELATED_IMAGES, encoded)
}
