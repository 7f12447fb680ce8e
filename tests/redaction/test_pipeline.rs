// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end detection and application through `RedactionPipeline`

use super::support::*;
use scribe_redactor::pii::{PiiClassifier, PiiEntityType};
use scribe_redactor::config::RedactionConfig;
use scribe_redactor::redaction::{
    BlurRegion, RedactionError, RedactionPipeline, Redactor, TransportError,
};
use scribe_redactor::vision::ocr::{ExtractionError, LocalExtractionProvider};
use scribe_redactor::vision::image_utils::DEFAULT_MAX_IMAGE_SIZE;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_email_maps_to_single_region() {
    let provider = Arc::new(FixedProvider::new(
        "Contact me at jane@example.com",
        contact_tokens(),
    ));
    let pipeline = pipeline_with(provider.clone(), MemorySource::default());

    let result = pipeline
        .detect("step-1", &screenshot_png(300, 60))
        .await
        .unwrap();

    assert_eq!(result.step_id, "step-1");
    assert_eq!(result.entities.len(), 1);
    let entity = &result.entities[0];
    assert_eq!(entity.entity_type, PiiEntityType::EmailAddress);
    assert_eq!((entity.start, entity.end), (14, 30));
    assert_eq!(entity.value, "jane@example.com");

    assert_eq!(result.blurred_regions.len(), 1);
    assert_eq!(
        result.blurred_regions[0],
        BlurRegion::new(125, 12, 140, 18, "EMAIL_ADDRESS")
    );
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_entities_satisfy_offset_invariant() {
    let text = "Mail jane@example.com, call (555) 123-4567, SSN 123-45-6789, host 10.1.2.3";
    let provider = Arc::new(FixedProvider::new(text, vec![]));
    let pipeline = pipeline_with(provider, MemorySource::default());

    let result = pipeline.detect("step-2", b"ignored").await.unwrap();

    assert!(result.entities.len() >= 4);
    for entity in &result.entities {
        assert!(entity.start < entity.end && entity.end <= text.len());
        assert_eq!(&text[entity.start..entity.end], entity.value);
    }
    let starts: Vec<usize> = result.entities.iter().map(|e| e.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);

    // No layout: every entity still gets a region
    assert_eq!(result.blurred_regions.len(), result.entities.len());
    assert!(result
        .blurred_regions
        .iter()
        .all(|r| (r.x, r.y, r.width, r.height) == (0, 0, 100, 30)));
}

#[tokio::test]
async fn test_corrupt_image_degrades_to_empty_result() {
    let engine = Arc::new(ScriptedEngine {
        text: "jane@example.com".to_string(),
        tokens: vec![token("jane@example.com", 0, 0, 120, 20)],
    });
    let provider = Arc::new(LocalExtractionProvider::new(engine, DEFAULT_MAX_IMAGE_SIZE));
    let pipeline = pipeline_with(provider, MemorySource::default());

    let result = pipeline
        .detect("step-3", b"\x89PNG\r\n\x1a\ntruncated")
        .await
        .unwrap();

    assert_eq!(result.text, "");
    assert_eq!(result.confidence, 0.0);
    assert!(result.entities.is_empty());
    assert!(result.blurred_regions.is_empty());

    let original = screenshot_png(40, 30);
    let output = pipeline
        .apply(&original, &result.blurred_regions)
        .await
        .unwrap();
    assert_eq!(decode(&output), decode(&original));
}

#[tokio::test]
async fn test_block_separated_text_maps_to_the_right_word() {
    let words = [
        "Dashboard", "Inbox", "Drafts", "Sent", "Archive", "Spam", "Trash", "Labels",
        "Contacts", "Calendar", "Tasks", "Notes", "Reports", "Billing", "Team", "Projects",
        "Files", "Search", "Help", "Profile",
    ];
    let mut tokens: Vec<_> = words
        .iter()
        .enumerate()
        .map(|(i, word)| token(word, 10, i as u32 * 20, 90, 16))
        .collect();
    tokens.push(token("jane@example.com", 10, 400, 140, 16));
    tokens.push(token("Logout", 10, 420, 60, 16));

    // Plain-text pass separates blocks with blank lines
    let text = tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
        + "\n";
    let engine = Arc::new(ScriptedEngine { text, tokens });
    let provider = Arc::new(LocalExtractionProvider::new(engine, DEFAULT_MAX_IMAGE_SIZE));
    let pipeline = pipeline_with(provider, MemorySource::default());

    let result = pipeline
        .detect("step-blocks", &screenshot_png(200, 440))
        .await
        .unwrap();

    assert_eq!(result.entities.len(), 1);
    let entity = &result.entities[0];
    assert_eq!(&result.text[entity.start..entity.end], "jane@example.com");
    assert_eq!(
        result.blurred_regions,
        vec![BlurRegion::new(10, 400, 140, 16, "EMAIL_ADDRESS")]
    );
}

#[tokio::test]
async fn test_oversized_image_fails_detect_but_not_apply() {
    let config = RedactionConfig {
        max_image_bytes: 64,
        ..RedactionConfig::default()
    };
    let pipeline = RedactionPipeline::from_config(&config).unwrap();
    let original = screenshot_png(50, 50);
    assert!(original.len() > config.max_image_bytes);

    let err = pipeline.detect("step-large", &original).await.unwrap_err();
    assert!(matches!(
        err,
        RedactionError::Extraction(ExtractionError::ImageTooLarge { max: 64, .. })
    ));

    let regions = vec![BlurRegion::new(0, 0, 10, 10, "PERSON")];
    let output = pipeline.apply(&original, &regions).await.unwrap();
    assert_eq!(decode(&output).dimensions(), (50, 50));
}

#[tokio::test]
async fn test_apply_rejects_undecodable_bytes() {
    let pipeline = pipeline_with(
        Arc::new(FixedProvider::new("", vec![])),
        MemorySource::default(),
    );

    let err = pipeline.apply(b"not an image", &[]).await.unwrap_err();
    assert!(matches!(err, RedactionError::ImageDecode(_)));
}

#[tokio::test]
async fn test_apply_accepts_caller_edited_regions() {
    let pipeline = pipeline_with(
        Arc::new(FixedProvider::new("", vec![])),
        MemorySource::default(),
    );
    let original = screenshot_png(50, 50);
    let regions = vec![
        BlurRegion::new(-20, -20, 40, 40, "manual"),
        BlurRegion::new(500, 500, 10, 10, "manual"),
    ];

    let output = pipeline.apply(&original, &regions).await.unwrap();
    let before = decode(&original);
    let after = decode(&output);
    assert_eq!(after.dimensions(), (50, 50));
    // Negative origin clamps to (0, 0) keeping the 40x40 size
    let changed = (0..40).any(|x| (0..40).any(|y| after.get_pixel(x, y) != before.get_pixel(x, y)));
    assert!(changed);
    for x in 0..50 {
        for y in 40..50 {
            assert_eq!(after.get_pixel(x, y), before.get_pixel(x, y));
        }
    }
}

#[tokio::test]
async fn test_uri_variants_use_image_source() {
    let image = screenshot_png(300, 60);
    let mut source = MemorySource::default();
    source
        .images
        .insert("https://cdn.example.com/step-4.png".to_string(), image.clone());

    let pipeline = pipeline_with(
        Arc::new(FixedProvider::new(
            "Contact me at jane@example.com",
            contact_tokens(),
        )),
        source,
    );

    let result = pipeline
        .detect_uri("step-4", "https://cdn.example.com/step-4.png")
        .await
        .unwrap();
    let redacted = pipeline
        .apply_uri("https://cdn.example.com/step-4.png", &result.blurred_regions)
        .await
        .unwrap();
    assert_eq!(decode(&redacted).dimensions(), (300, 60));

    let err = pipeline
        .detect_uri("step-5", "https://cdn.example.com/missing.png")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RedactionError::Transport(TransportError::HttpStatus(404, _))
    ));
}

#[tokio::test]
async fn test_classifier_failure_is_surfaced() {
    use async_trait::async_trait;
    use scribe_redactor::pii::{AnalyzerResult, ClassificationError, PiiBackend};

    struct UnreachableBackend;

    #[async_trait]
    impl PiiBackend for UnreachableBackend {
        async fn analyze(
            &self,
            _text: &str,
            _language: &str,
            _entity_types: &[PiiEntityType],
        ) -> Result<Vec<AnalyzerResult>, ClassificationError> {
            Err(ClassificationError::BackendFailed {
                status: 503,
                message: "analyzer down".to_string(),
            })
        }

        async fn anonymize(
            &self,
            _text: &str,
            _results: &[AnalyzerResult],
        ) -> Result<String, ClassificationError> {
            unreachable!()
        }

        fn name(&self) -> &'static str {
            "unreachable"
        }
    }

    let pipeline = RedactionPipeline::new(
        Arc::new(FixedProvider::new("jane@example.com", vec![])),
        Arc::new(PiiClassifier::new(Arc::new(UnreachableBackend), "en")),
        Arc::new(MemorySource::default()),
        Redactor::default(),
    );

    let err = pipeline.detect("step-6", b"img").await.unwrap_err();
    assert!(matches!(
        err,
        RedactionError::Classification(ClassificationError::BackendFailed { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_anonymize_text() {
    let pipeline = pipeline_with(
        Arc::new(FixedProvider::new("", vec![])),
        MemorySource::default(),
    );
    let anonymized = pipeline
        .anonymize("Reach jane@example.com or 123-45-6789")
        .await
        .unwrap();
    assert_eq!(anonymized, "Reach <EMAIL_ADDRESS> or <SSN>");
}
