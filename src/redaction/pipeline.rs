// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection and application phases of screenshot redaction
//!
//! `detect` is side-effect free and may be re-run at will; `apply` is the only
//! step that produces new image bytes, and accepts regions that never came
//! from detection (e.g. edited by a reviewer).

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::errors::RedactionError;
use super::mapper::map_entities_to_regions;
use super::redactor::Redactor;
use super::source::{AnyImageSource, ImageSource};
use super::types::{BlurRegion, RedactionResult};
use crate::config::RedactionConfig;
use crate::pii::PiiClassifier;
use crate::vision::ocr::{build_extraction_provider, TextExtractionProvider};

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff"];

/// Name under which the redacted rendition of `uri` is conventionally stored
///
/// The image extension of the last path segment is replaced by
/// `_redacted.png`; query and fragment are kept.
pub fn redacted_uri(uri: &str) -> String {
    let split = uri.find(['?', '#']).unwrap_or(uri.len());
    let (path, suffix) = uri.split_at(split);

    let segment_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    let stem_end = match path[segment_start..].rfind('.') {
        Some(dot) => {
            let extension = path[segment_start + dot + 1..].to_ascii_lowercase();
            if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
                segment_start + dot
            } else {
                path.len()
            }
        }
        None => path.len(),
    };

    format!("{}_redacted.png{}", &path[..stem_end], suffix)
}

/// Screenshot redaction pipeline
///
/// Holds read-only handles to its backends; one instance serves any number
/// of concurrent requests.
pub struct RedactionPipeline {
    extractor: Arc<dyn TextExtractionProvider>,
    classifier: Arc<PiiClassifier>,
    source: Arc<dyn ImageSource>,
    redactor: Redactor,
}

impl RedactionPipeline {
    pub fn new(
        extractor: Arc<dyn TextExtractionProvider>,
        classifier: Arc<PiiClassifier>,
        source: Arc<dyn ImageSource>,
        redactor: Redactor,
    ) -> Self {
        Self {
            extractor,
            classifier,
            source,
            redactor,
        }
    }

    /// Build the pipeline with the backends selected by configuration
    pub fn from_config(config: &RedactionConfig) -> Result<Self, RedactionError> {
        let extractor = build_extraction_provider(config);
        let classifier = PiiClassifier::from_config(config)?;
        let source = AnyImageSource::new(config.fetch_timeout())?;
        let redactor = Redactor::new(config.blur_sigma);

        Ok(Self::new(
            extractor,
            Arc::new(classifier),
            Arc::new(source),
            redactor,
        ))
    }

    /// Extract text, classify PII and map it to blur regions
    ///
    /// Unreadable images yield an empty result rather than an error. Images
    /// over the size limit, exhaustion of every extraction backend and
    /// classifier failures are errors.
    pub async fn detect(
        &self,
        step_id: &str,
        image_bytes: &[u8],
    ) -> Result<RedactionResult, RedactionError> {
        let start = Instant::now();

        let extracted = self.extractor.extract(image_bytes).await?;
        debug!(
            "Step {}: extracted {} chars via {} (confidence {:.2})",
            step_id,
            extracted.text.len(),
            extracted.backend,
            extracted.confidence
        );

        let entities = self.classifier.classify(&extracted.text).await?;
        if !entities.is_empty() && !extracted.has_layout() {
            debug!(
                "Step {}: {} returned no layout, regions use the placeholder",
                step_id, extracted.backend
            );
        }
        let blurred_regions = map_entities_to_regions(&extracted.text, &entities, &extracted.tokens);

        info!(
            "Step {}: {} PII entities, {} regions in {}ms",
            step_id,
            entities.len(),
            blurred_regions.len(),
            start.elapsed().as_millis()
        );

        Ok(RedactionResult {
            step_id: step_id.to_string(),
            text: extracted.text,
            confidence: extracted.confidence,
            entities,
            blurred_regions,
        })
    }

    /// Blur `regions` on the image and return PNG bytes
    ///
    /// The blur runs on the blocking thread pool.
    pub async fn apply(
        &self,
        image_bytes: &[u8],
        regions: &[BlurRegion],
    ) -> Result<Vec<u8>, RedactionError> {
        self.redactor
            .redact_blocking(image_bytes.to_vec(), regions.to_vec())
            .await
    }

    /// [`detect`](Self::detect) on an image fetched from `uri`
    pub async fn detect_uri(&self, step_id: &str, uri: &str) -> Result<RedactionResult, RedactionError> {
        let image_bytes = self.source.fetch(uri).await?;
        self.detect(step_id, &image_bytes).await
    }

    /// [`apply`](Self::apply) on an image fetched from `uri`
    pub async fn apply_uri(&self, uri: &str, regions: &[BlurRegion]) -> Result<Vec<u8>, RedactionError> {
        let image_bytes = self.source.fetch(uri).await?;
        self.redactor
            .redact_blocking(image_bytes, regions.to_vec())
            .await
    }

    /// Text-only redaction with type-tagged placeholders
    pub async fn anonymize(&self, text: &str) -> Result<String, RedactionError> {
        Ok(self.classifier.anonymize(text).await?)
    }
}
