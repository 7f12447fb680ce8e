// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction from screenshots
//!
//! Components:
//! - `model` - Normalized extraction result (`ExtractedText`, `TokenBox`)
//! - `provider` - `TextExtractionProvider` capability trait
//! - `tesseract` - Local Tesseract engine
//! - `local` - Provider over the local engine
//! - `google` - Google Cloud Vision client
//! - `hosted` - Hosted provider with per-request local fallback

pub mod google;
pub mod hosted;
pub mod local;
pub mod model;
pub mod provider;
pub mod tesseract;

use std::sync::Arc;
use tracing::{info, warn};

pub use google::{GoogleVisionClient, HostedVisionClient, TextAnnotation};
pub use hosted::HostedExtractionProvider;
pub use local::LocalExtractionProvider;
pub use model::{BoundingBox, ExtractedText, TokenBox};
pub use provider::{ExtractionError, TextExtractionProvider};
pub use tesseract::{LocalOcrEngine, TesseractEngine};

use crate::config::RedactionConfig;

/// Select the extraction backend for this process
///
/// The hosted backend is used when an API key is configured and its client
/// can be built; otherwise the local engine serves every request.
pub fn build_extraction_provider(config: &RedactionConfig) -> Arc<dyn TextExtractionProvider> {
    let engine = Arc::new(TesseractEngine::new(
        &config.ocr.tesseract_cmd,
        &config.ocr.language,
        config.ocr_timeout(),
    ));
    let local = LocalExtractionProvider::new(engine, config.max_image_bytes);

    if let Some(ref api_key) = config.ocr.google_vision_api_key {
        match GoogleVisionClient::new(
            &config.ocr.google_vision_endpoint,
            api_key,
            config.ocr_timeout(),
        ) {
            Ok(client) => {
                info!("Text extraction backend: google-vision (fallback: tesseract)");
                return Arc::new(HostedExtractionProvider::new(
                    Arc::new(client),
                    local,
                    config.ocr_timeout(),
                ));
            }
            Err(e) => {
                warn!("Google Vision client unavailable, using local OCR: {}", e);
            }
        }
    }

    info!("Text extraction backend: tesseract");
    Arc::new(local)
}
