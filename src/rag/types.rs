// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval context types shared with the generation pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of inline image placeholders, as in `[img:<id>]`
pub const PLACEHOLDER_PREFIX: &str = "[img:";

/// Build the inline placeholder token for an image id
pub fn placeholder_token(image_id: &str) -> String {
    format!("{}{}]", PLACEHOLDER_PREFIX, image_id)
}

/// An image referenced by retrieved context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    pub image_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A source cited by the assembled context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Retrieval context handed from the retrieval step to generation
///
/// Every placeholder token inside `context` is expected to have an entry in
/// `image_map`. Producers own that contract; the header encoders do not check it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagContextResponse {
    /// Assembled context text
    pub context: String,
    pub citations: Vec<Citation>,
    /// Related images, in display order
    pub images: Vec<ImageDescriptor>,
    /// Placeholder token to image, sorted by token
    pub image_map: BTreeMap<String, ImageDescriptor>,
    pub query_id: String,
    pub total_chunks: usize,
}

impl RagContextResponse {
    /// Register an image under its placeholder token and return the token
    pub fn insert_image(&mut self, image: ImageDescriptor) -> String {
        let token = placeholder_token(&image.image_id);
        self.image_map.insert(token.clone(), image);
        token
    }

    /// Placeholder tokens found in `context` with no `image_map` entry
    pub fn unresolved_placeholders(&self) -> Vec<String> {
        let mut missing = Vec::new();
        let mut rest = self.context.as_str();

        while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
            let candidate = &rest[start..];
            match candidate.find(']') {
                Some(end) => {
                    let token = &candidate[..=end];
                    if !self.image_map.contains_key(token) && !missing.iter().any(|t| t == token) {
                        missing.push(token.to_string());
                    }
                    rest = &candidate[end + 1..];
                }
                None => break,
            }
        }
        missing
    }
}
