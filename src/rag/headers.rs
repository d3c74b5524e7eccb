// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Carry encoded context payloads on HTTP headers

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use tracing::warn;

use super::encoding::{
    decode_rag_images_header, decode_related_images_header, encode_rag_images_for_header,
    encode_related_images_for_header, HeaderEncoding,
};
use super::errors::ContextEncodingError;
use super::types::{ImageDescriptor, RagContextResponse};

/// Header carrying the placeholder-to-image map
pub const RAG_IMAGES_HEADER: &str = "x-rag-images";
/// Header carrying the related images list
pub const RELATED_IMAGES_HEADER: &str = "x-related-images";

/// What happened to one header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderOutcome {
    Written,
    /// Left out because the payload exceeded the budget
    Omitted,
}

/// Per-header result of [`insert_rag_headers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RagHeaderReport {
    pub rag_images: HeaderOutcome,
    pub related_images: HeaderOutcome,
}

fn insert_encoded(
    headers: &mut HeaderMap,
    name: &'static str,
    encoding: HeaderEncoding,
) -> Result<HeaderOutcome, ContextEncodingError> {
    match encoding {
        HeaderEncoding::Encoded(value) => {
            let value = HeaderValue::from_str(&value)
                .map_err(|_| ContextEncodingError::InvalidHeaderValue { name })?;
            headers.insert(HeaderName::from_static(name), value);
            Ok(HeaderOutcome::Written)
        }
        HeaderEncoding::TooLarge {
            encoded_len,
            max_chars,
        } => {
            warn!(
                "Omitting {} header: {} chars exceeds budget of {}",
                name, encoded_len, max_chars
            );
            // A stale value from an earlier insert must not survive
            headers.remove(name);
            Ok(HeaderOutcome::Omitted)
        }
    }
}

/// Encode both image payloads of `ctx` and insert those that fit
///
/// Each header is budgeted separately with `max_chars`.
pub fn insert_rag_headers(
    headers: &mut HeaderMap,
    ctx: &RagContextResponse,
    max_chars: usize,
) -> Result<RagHeaderReport, ContextEncodingError> {
    let rag_images = insert_encoded(
        headers,
        RAG_IMAGES_HEADER,
        encode_rag_images_for_header(ctx, max_chars)?,
    )?;
    let related_images = insert_encoded(
        headers,
        RELATED_IMAGES_HEADER,
        encode_related_images_for_header(ctx, max_chars)?,
    )?;

    Ok(RagHeaderReport {
        rag_images,
        related_images,
    })
}

fn header_str<'a>(
    headers: &'a HeaderMap,
    name: &'static str,
) -> Result<Option<&'a str>, ContextEncodingError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| ContextEncodingError::InvalidHeaderValue { name }),
    }
}

/// Read the image map header, `None` when absent
pub fn read_rag_images(
    headers: &HeaderMap,
) -> Result<Option<BTreeMap<String, ImageDescriptor>>, ContextEncodingError> {
    header_str(headers, RAG_IMAGES_HEADER)?
        .map(decode_rag_images_header)
        .transpose()
}

/// Read the related images header, `None` when absent
pub fn read_related_images(
    headers: &HeaderMap,
) -> Result<Option<Vec<ImageDescriptor>>, ContextEncodingError> {
    header_str(headers, RELATED_IMAGES_HEADER)?
        .map(decode_related_images_header)
        .transpose()
}
