// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::warn;

use crate::rag::{
    encode_rag_images_for_header, encode_related_images_for_header, HeaderEncoding,
    RagContextResponse, RAG_IMAGES_HEADER, RELATED_IMAGES_HEADER,
};

/// Arguments for the encode-context command
#[derive(Args, Debug)]
pub struct EncodeContextArgs {
    /// JSON file holding a RAG context response
    pub file: PathBuf,

    /// Budget per header, in characters
    #[arg(long, default_value_t = 8192)]
    pub max_chars: usize,
}

fn print_header(name: &str, encoding: &HeaderEncoding) {
    match encoding {
        HeaderEncoding::Encoded(value) => println!("{}: {}", name, value),
        HeaderEncoding::TooLarge {
            encoded_len,
            max_chars,
        } => {
            warn!("{} needs {} chars, budget is {}", name, encoded_len, max_chars);
            println!("{}: <too large>", name);
        }
    }
}

/// Encode the image payloads of a context file and print both header values
pub fn encode_context(args: EncodeContextArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let ctx: RagContextResponse = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    let unresolved = ctx.unresolved_placeholders();
    if !unresolved.is_empty() {
        warn!("Context references unknown images: {:?}", unresolved);
    }

    print_header(
        RAG_IMAGES_HEADER,
        &encode_rag_images_for_header(&ctx, args.max_chars)?,
    );
    print_header(
        RELATED_IMAGES_HEADER,
        &encode_related_images_for_header(&ctx, args.max_chars)?,
    );
    Ok(())
}
