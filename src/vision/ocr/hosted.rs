// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted text extraction with per-request fallback to the local engine

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::google::{HostedVisionClient, TextAnnotation};
use super::local::LocalExtractionProvider;
use super::model::{mean_positive_confidence, ExtractedText, TokenBox};
use super::provider::{ExtractionError, TextExtractionProvider};
use crate::vision::image_utils::image_dimensions;

/// Confidence reported when the hosted engine returns text but no word scores
pub const DEFAULT_HOSTED_CONFIDENCE: f32 = 0.9;

/// Extraction provider backed by a hosted vision service
///
/// Any hosted failure (transport, API error, timeout) is logged and the same
/// request is served by the local provider instead. Hosted mode stays active
/// for subsequent requests.
pub struct HostedExtractionProvider {
    client: Arc<dyn HostedVisionClient>,
    fallback: LocalExtractionProvider,
    timeout: Duration,
}

impl HostedExtractionProvider {
    pub fn new(
        client: Arc<dyn HostedVisionClient>,
        fallback: LocalExtractionProvider,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            fallback,
            timeout,
        }
    }

    async fn detect(&self, image_bytes: &[u8]) -> Result<Vec<TextAnnotation>, ExtractionError> {
        tokio::time::timeout(self.timeout, self.client.detect_text(image_bytes))
            .await
            .map_err(|_| ExtractionError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })?
    }

    fn normalize(
        &self,
        annotations: Vec<TextAnnotation>,
        image_bytes: &[u8],
        start: Instant,
    ) -> ExtractedText {
        let mut annotations = annotations.into_iter();
        let Some(full_text) = annotations.next() else {
            return ExtractedText::empty(self.client.name());
        };
        let words: Vec<TextAnnotation> = annotations.collect();

        let confidence = mean_positive_confidence(words.iter().map(|w| w.confidence))
            .unwrap_or(DEFAULT_HOSTED_CONFIDENCE);

        let dimensions = image_dimensions(image_bytes).ok();
        let tokens: Vec<TokenBox> = words
            .into_iter()
            .filter_map(|word| {
                let bbox = word.bounding_box?;
                let bbox = match dimensions {
                    Some((width, height)) => bbox.clamp_to(width, height),
                    None => bbox,
                };
                Some(TokenBox {
                    text: word.text,
                    bounding_box: bbox,
                    confidence: word.confidence.clamp(0.0, 1.0),
                })
            })
            .collect();

        ExtractedText {
            text: full_text.text,
            confidence,
            tokens,
            backend: self.client.name().to_string(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[async_trait]
impl TextExtractionProvider for HostedExtractionProvider {
    async fn extract(&self, image_bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let start = Instant::now();
        debug!("Trying hosted extraction backend: {}", self.client.name());

        match self.detect(image_bytes).await {
            Ok(annotations) => {
                let extracted = self.normalize(annotations, image_bytes, start);
                info!(
                    "Hosted OCR complete: {} tokens, {:.2} confidence, {}ms (backend: {})",
                    extracted.tokens.len(),
                    extracted.confidence,
                    extracted.processing_time_ms,
                    extracted.backend
                );
                Ok(extracted)
            }
            Err(hosted_err) => {
                warn!(
                    "Hosted extraction via {} failed, falling back to {}: {}",
                    self.client.name(),
                    self.fallback.name(),
                    hosted_err
                );
                self.fallback.extract(image_bytes).await.map_err(|local_err| {
                    ExtractionError::AllBackendsFailed(format!(
                        "{}: {}; {}: {}",
                        self.client.name(),
                        hosted_err,
                        self.fallback.name(),
                        local_err
                    ))
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        self.client.name()
    }
}
