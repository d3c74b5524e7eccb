// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for context header encoding
//!
//! A payload that is too large for its header is not an error; it is reported
//! as `HeaderEncoding::TooLarge`. These errors cover serialization failures
//! and malformed headers on the receiving side.

use thiserror::Error;

/// Errors that can occur while encoding or decoding context headers
#[derive(Error, Debug)]
pub enum ContextEncodingError {
    /// Payload could not be serialized to JSON
    #[error("Failed to serialize {payload}: {source}")]
    Serialize {
        payload: &'static str,
        source: serde_json::Error,
    },

    /// Header value is not valid base64
    #[error("Invalid base64 in {payload} header: {source}")]
    InvalidBase64 {
        payload: &'static str,
        source: base64::DecodeError,
    },

    /// Decoded bytes are not the expected JSON shape
    #[error("Invalid JSON in {payload} header: {source}")]
    InvalidJson {
        payload: &'static str,
        source: serde_json::Error,
    },

    /// Header value contains non-visible ASCII
    #[error("Header {name} is not visible ASCII")]
    InvalidHeaderValue { name: &'static str },
}
