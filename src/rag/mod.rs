// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval context packaging
//!
//! Encodes the image parts of a [`RagContextResponse`] into size-bounded,
//! header-safe strings and decodes them on the receiving side.

pub mod encoding;
pub mod errors;
pub mod headers;
pub mod types;

pub use encoding::{
    decode_rag_images_header, decode_related_images_header, encode_rag_images_for_header,
    encode_related_images_for_header, HeaderEncoding,
};
pub use errors::ContextEncodingError;
pub use headers::{
    insert_rag_headers, read_rag_images, read_related_images, HeaderOutcome, RagHeaderReport,
    RAG_IMAGES_HEADER, RELATED_IMAGES_HEADER,
};
pub use types::{placeholder_token, Citation, ImageDescriptor, RagContextResponse};
