// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Fake backends and image helpers shared by the redaction tests

#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use scribe_redactor::pii::{PatternBackend, PiiClassifier};
use scribe_redactor::redaction::{ImageSource, RedactionPipeline, Redactor, TransportError};
use scribe_redactor::vision::encode_png;
use scribe_redactor::vision::ocr::{
    BoundingBox, ExtractedText, ExtractionError, LocalOcrEngine, TextExtractionProvider, TokenBox,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Non-uniform RGBA screenshot so blurs are observable
pub fn screenshot_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let v = ((x * 29 + y * 53) % 256) as u8;
        Rgba([v, v.wrapping_mul(3), 255 - v, 255])
    });
    encode_png(&DynamicImage::ImageRgba8(img)).unwrap()
}

pub fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes).unwrap().to_rgba8()
}

pub fn token(text: &str, x: u32, y: u32, width: u32, height: u32) -> TokenBox {
    TokenBox {
        text: text.to_string(),
        bounding_box: BoundingBox::new(x, y, width, height),
        confidence: 0.92,
    }
}

/// Tokens of "Contact me at jane@example.com" laid out on one line
pub fn contact_tokens() -> Vec<TokenBox> {
    vec![
        token("Contact", 10, 10, 60, 20),
        token("me", 75, 10, 20, 20),
        token("at", 100, 10, 20, 20),
        token("jane@example.com", 125, 12, 140, 18),
    ]
}

/// Provider returning a fixed extraction and counting calls
pub struct FixedProvider {
    pub extracted: ExtractedText,
    pub calls: AtomicUsize,
}

impl FixedProvider {
    pub fn new(text: &str, tokens: Vec<TokenBox>) -> Self {
        Self {
            extracted: ExtractedText {
                text: text.to_string(),
                confidence: 0.92,
                tokens,
                backend: "fixed".to_string(),
                processing_time_ms: 1,
            },
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextExtractionProvider for FixedProvider {
    async fn extract(&self, _image_bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.extracted.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Local engine that always reads the same line
pub struct ScriptedEngine {
    pub text: String,
    pub tokens: Vec<TokenBox>,
}

#[async_trait]
impl LocalOcrEngine for ScriptedEngine {
    async fn recognize_text(&self, _image: &DynamicImage) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }

    async fn recognize_text_with_layout(
        &self,
        _image: &DynamicImage,
    ) -> Result<Vec<TokenBox>, ExtractionError> {
        Ok(self.tokens.clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// In-memory image source keyed by URI
#[derive(Default)]
pub struct MemorySource {
    pub images: HashMap<String, Vec<u8>>,
}

#[async_trait]
impl ImageSource for MemorySource {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, TransportError> {
        self.images
            .get(uri)
            .cloned()
            .ok_or_else(|| TransportError::HttpStatus(404, uri.to_string()))
    }
}

pub fn pattern_classifier() -> Arc<PiiClassifier> {
    Arc::new(PiiClassifier::new(Arc::new(PatternBackend::new()), "en"))
}

pub fn pipeline_with(
    provider: Arc<dyn TextExtractionProvider>,
    source: MemorySource,
) -> RedactionPipeline {
    RedactionPipeline::new(
        provider,
        pattern_classifier(),
        Arc::new(source),
        Redactor::new(4.0),
    )
}
