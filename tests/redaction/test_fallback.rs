// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Hosted extraction failures are served by the local engine

use super::support::*;
use async_trait::async_trait;
use scribe_redactor::pii::PiiEntityType;
use scribe_redactor::vision::image_utils::DEFAULT_MAX_IMAGE_SIZE;
use scribe_redactor::vision::ocr::{
    ExtractionError, HostedExtractionProvider, HostedVisionClient, LocalExtractionProvider,
    TextAnnotation, TextExtractionProvider,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct FailingHostedClient {
    calls: AtomicUsize,
}

#[async_trait]
impl HostedVisionClient for FailingHostedClient {
    async fn detect_text(&self, _image_bytes: &[u8]) -> Result<Vec<TextAnnotation>, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ExtractionError::HostedApi {
            status: 429,
            message: "quota exceeded".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "failing-hosted"
    }
}

fn local_provider() -> LocalExtractionProvider {
    let engine = Arc::new(ScriptedEngine {
        text: "Contact me at jane@example.com\n".to_string(),
        tokens: contact_tokens(),
    });
    LocalExtractionProvider::new(engine, DEFAULT_MAX_IMAGE_SIZE)
}

#[tokio::test]
async fn test_hosted_error_falls_back_to_local() {
    let client = Arc::new(FailingHostedClient {
        calls: AtomicUsize::new(0),
    });
    let provider = HostedExtractionProvider::new(
        client.clone(),
        local_provider(),
        Duration::from_secs(5),
    );

    let extracted = provider.extract(&screenshot_png(300, 60)).await.unwrap();
    assert_eq!(extracted.text, "Contact me at jane@example.com");
    assert_eq!(extracted.backend, "scripted");
    assert_eq!(extracted.tokens.len(), 4);

    // Hosted mode is retried on the next request
    provider.extract(&screenshot_png(300, 60)).await.unwrap();
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_pipeline_detects_through_fallback() {
    let provider = Arc::new(HostedExtractionProvider::new(
        Arc::new(FailingHostedClient {
            calls: AtomicUsize::new(0),
        }),
        local_provider(),
        Duration::from_secs(5),
    ));
    let pipeline = pipeline_with(provider, MemorySource::default());

    let result = pipeline
        .detect("step-1", &screenshot_png(300, 60))
        .await
        .unwrap();

    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].entity_type, PiiEntityType::EmailAddress);
    assert_eq!(result.blurred_regions[0].region_type, "EMAIL_ADDRESS");
    assert_eq!(result.blurred_regions[0].x, 125);
}
