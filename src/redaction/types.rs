// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Redaction data model

use serde::{Deserialize, Serialize};

use crate::pii::PiiEntity;
use crate::vision::ocr::BoundingBox;

/// Rectangle to obscure, in source-image pixels
///
/// Coordinates are signed because callers may submit edited regions that
/// extend past the image; the redactor clamps them before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurRegion {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    /// Entity type that produced the region
    #[serde(rename = "type")]
    pub region_type: String,
}

impl BlurRegion {
    pub fn new(x: i64, y: i64, width: i64, height: i64, region_type: &str) -> Self {
        Self {
            x,
            y,
            width,
            height,
            region_type: region_type.to_string(),
        }
    }

    pub fn from_bounding_box(bbox: &BoundingBox, region_type: &str) -> Self {
        Self::new(
            bbox.x as i64,
            bbox.y as i64,
            bbox.width as i64,
            bbox.height as i64,
            region_type,
        )
    }
}

/// Output of the detection phase for one screenshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionResult {
    pub step_id: String,
    /// Extracted text the entities refer to
    pub text: String,
    /// Extraction confidence (0.0-1.0)
    pub confidence: f32,
    pub entities: Vec<PiiEntity>,
    pub blurred_regions: Vec<BlurRegion>,
}

impl RedactionResult {
    pub fn has_pii(&self) -> bool {
        !self.entities.is_empty()
    }
}
