// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Normalized extraction result shared by every OCR backend

use serde::{Deserialize, Serialize};

/// Bounding box in source-image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Minimal rectangle enclosing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        BoundingBox {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Restrict the box to a `width` x `height` image
    pub fn clamp_to(&self, width: u32, height: u32) -> BoundingBox {
        let x = self.x.min(width);
        let y = self.y.min(height);
        BoundingBox {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }
}

/// A recognized token with its position on the source image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBox {
    /// Token text as recognized
    pub text: String,
    /// Position in source-image pixels
    pub bounding_box: BoundingBox,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}

/// Result of text extraction for one image
///
/// Produced once per image by a [`TextExtractionProvider`](super::TextExtractionProvider)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedText {
    /// Full recognized text
    pub text: String,
    /// Aggregate confidence (0.0-1.0)
    pub confidence: f32,
    /// Tokens in backend reading order; empty when the backend gave no layout
    pub tokens: Vec<TokenBox>,
    /// Backend that produced the result
    pub backend: String,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl ExtractedText {
    /// The degraded result for unreadable images
    pub fn empty(backend: &str) -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            tokens: Vec::new(),
            backend: backend.to_string(),
            processing_time_ms: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn has_layout(&self) -> bool {
        !self.tokens.is_empty()
    }
}

/// Arithmetic mean of the strictly positive confidences, or `None` if there are none
pub fn mean_positive_confidence<I>(confidences: I) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
{
    let (sum, count) = confidences
        .into_iter()
        .filter(|c| *c > 0.0)
        .fold((0.0f32, 0usize), |(sum, count), c| (sum + c, count + 1));

    if count == 0 {
        None
    } else {
        Some((sum / count as f32).clamp(0.0, 1.0))
    }
}
