// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction through a local OCR engine

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::model::{mean_positive_confidence, ExtractedText, TokenBox};
use super::provider::{ExtractionError, TextExtractionProvider};
use super::tesseract::LocalOcrEngine;
use crate::vision::image_utils::{decode_image_bytes, format_to_extension, ImageError};

/// Extraction provider running a [`LocalOcrEngine`] in-process
///
/// The overall confidence is the mean of the per-token confidences that are
/// above zero, or 0.0 when no token was confidently recognized.
pub struct LocalExtractionProvider {
    engine: Arc<dyn LocalOcrEngine>,
    max_image_size: usize,
}

impl LocalExtractionProvider {
    pub fn new(engine: Arc<dyn LocalOcrEngine>, max_image_size: usize) -> Self {
        Self {
            engine,
            max_image_size,
        }
    }
}

#[async_trait]
impl TextExtractionProvider for LocalExtractionProvider {
    async fn extract(&self, image_bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let start = Instant::now();

        let (image, info) = match decode_image_bytes(image_bytes, self.max_image_size) {
            Ok(decoded) => decoded,
            Err(ImageError::TooLarge(size, max)) => {
                warn!("Image of {} bytes exceeds the {} byte limit", size, max);
                return Err(ExtractionError::ImageTooLarge { size, max });
            }
            Err(e) => {
                warn!("Unreadable image, returning empty extraction: {}", e);
                return Ok(ExtractedText::empty(self.engine.name()));
            }
        };

        debug!(
            "Decoded {} image: {}x{}, {} bytes",
            format_to_extension(info.format),
            info.width,
            info.height,
            info.size_bytes
        );

        let text = self.engine.recognize_text(&image).await?;
        let tokens: Vec<TokenBox> = self
            .engine
            .recognize_text_with_layout(&image)
            .await?
            .into_iter()
            .map(|mut token| {
                token.bounding_box = token.bounding_box.clamp_to(info.width, info.height);
                token
            })
            .collect();

        let confidence =
            mean_positive_confidence(tokens.iter().map(|t| t.confidence)).unwrap_or(0.0);
        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Local OCR complete: {} tokens, {:.2} confidence, {}ms",
            tokens.len(),
            confidence,
            processing_time_ms
        );

        Ok(ExtractedText {
            text: text.trim().to_string(),
            confidence,
            tokens,
            backend: self.engine.name().to_string(),
            processing_time_ms,
        })
    }

    fn name(&self) -> &'static str {
        self.engine.name()
    }
}
