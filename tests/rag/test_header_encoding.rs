// Size-bounded header encoding of RAG image payloads

use fabstir_rag_core::rag::{
    decode_rag_images_header, decode_related_images_header, encode_rag_images_for_header,
    encode_related_images_for_header, placeholder_token, Citation, HeaderEncoding, ImageDescriptor,
    RagContextResponse,
};

fn descriptor(id: &str, url: &str, caption: Option<&str>) -> ImageDescriptor {
    ImageDescriptor {
        image_id: id.to_string(),
        url: url.to_string(),
        caption: caption.map(str::to_string),
    }
}

fn context_with(images: Vec<ImageDescriptor>) -> RagContextResponse {
    let mut ctx = RagContextResponse {
        query_id: "query-1".to_string(),
        total_chunks: images.len(),
        citations: vec![Citation {
            url: "https://example.com/source".to_string(),
            title: "Source".to_string(),
            snippet: None,
        }],
        ..RagContextResponse::default()
    };
    for image in images {
        let token = ctx.insert_image(image.clone());
        ctx.context.push_str(&format!("Figure {} ", token));
        ctx.images.push(image);
    }
    ctx
}

#[test]
fn test_ten_thousand_char_url_is_too_large() {
    let url = format!("https://images.example.com/{}", "u".repeat(10_000));
    let ctx = context_with(vec![descriptor("huge", &url, None)]);

    let encoded = encode_rag_images_for_header(&ctx, 1000).unwrap();
    assert!(encoded.is_too_large());
    assert_eq!(encoded.into_option(), None);

    let related = encode_related_images_for_header(&ctx, 1000).unwrap();
    assert!(matches!(related, HeaderEncoding::TooLarge { max_chars: 1000, .. }));
}

#[test]
fn test_short_url_fits_large_budget() {
    let ctx = context_with(vec![descriptor(
        "chart",
        "https://images.example.com/chart.png",
        Some("Revenue by quarter"),
    )]);

    let map = encode_rag_images_for_header(&ctx, 10_000)
        .unwrap()
        .into_option()
        .unwrap();
    let list = encode_related_images_for_header(&ctx, 10_000)
        .unwrap()
        .into_option()
        .unwrap();
    assert!(!map.is_empty());
    assert!(!list.is_empty());
}

#[test]
fn test_empty_context_never_too_large_when_budget_fits() {
    let ctx = RagContextResponse::default();
    for budget in [4, 16, 10_000] {
        let map = encode_rag_images_for_header(&ctx, budget).unwrap();
        assert!(decode_rag_images_header(&map.into_option().unwrap())
            .unwrap()
            .is_empty());

        let list = encode_related_images_for_header(&ctx, budget).unwrap();
        assert!(decode_related_images_header(&list.into_option().unwrap())
            .unwrap()
            .is_empty());
    }
    // Even the empty container has a size
    assert!(encode_rag_images_for_header(&ctx, 3).unwrap().is_too_large());
}

#[test]
fn test_round_trip_or_too_large_for_every_budget() {
    let ctx = context_with(vec![
        descriptor("a", "https://images.example.com/a.png", None),
        descriptor("b", "https://images.example.com/b.webp", Some("Second")),
        descriptor("c", "https://images.example.com/ç.png", Some("Ünïcode caption")),
    ]);

    let full_len = encode_rag_images_for_header(&ctx, usize::MAX)
        .unwrap()
        .into_option()
        .unwrap()
        .len();

    for budget in (0..=full_len + 8).step_by(7) {
        match encode_rag_images_for_header(&ctx, budget).unwrap() {
            HeaderEncoding::Encoded(value) => {
                assert!(value.len() <= budget);
                assert_eq!(decode_rag_images_header(&value).unwrap(), ctx.image_map);
            }
            HeaderEncoding::TooLarge { encoded_len, .. } => {
                assert_eq!(encoded_len, full_len);
                assert!(encoded_len > budget);
            }
        }
    }
}

#[test]
fn test_related_images_keep_order() {
    let ctx = context_with(vec![
        descriptor("z", "https://images.example.com/z.png", None),
        descriptor("a", "https://images.example.com/a.png", None),
    ]);

    let encoded = encode_related_images_for_header(&ctx, 4096)
        .unwrap()
        .into_option()
        .unwrap();
    let decoded = decode_related_images_header(&encoded).unwrap();
    let ids: Vec<&str> = decoded.iter().map(|i| i.image_id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a"]);
}

#[test]
fn test_image_map_encoding_is_deterministic() {
    let first = context_with(vec![
        descriptor("b", "https://images.example.com/b.png", None),
        descriptor("a", "https://images.example.com/a.png", None),
    ]);
    let second = context_with(vec![
        descriptor("a", "https://images.example.com/a.png", None),
        descriptor("b", "https://images.example.com/b.png", None),
    ]);

    assert_eq!(
        encode_rag_images_for_header(&first, 4096).unwrap(),
        encode_rag_images_for_header(&second, 4096).unwrap()
    );
}

#[test]
fn test_placeholders_resolve_after_decode() {
    let ctx = context_with(vec![descriptor("fig", "https://images.example.com/fig.png", None)]);
    assert!(ctx.unresolved_placeholders().is_empty());

    let encoded = encode_rag_images_for_header(&ctx, 4096)
        .unwrap()
        .into_option()
        .unwrap();
    let map = decode_rag_images_header(&encoded).unwrap();
    assert_eq!(map[&placeholder_token("fig")].url, "https://images.example.com/fig.png");
}
