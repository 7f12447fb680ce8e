// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Local OCR engine backed by the Tesseract command-line tool
//!
//! Two passes are run per image, mirroring the engine's own API:
//! - plain recognition (`tesseract <img> stdout`) for the full text
//! - layout recognition (`tesseract <img> stdout tsv`) for word boxes and confidences

use async_trait::async_trait;
use image::DynamicImage;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::model::{BoundingBox, TokenBox};
use super::provider::ExtractionError;
use crate::vision::image_utils::encode_png;

/// TSV row level for individual words
const TSV_WORD_LEVEL: u32 = 5;

/// Number of columns in Tesseract TSV output
const TSV_COLUMNS: usize = 12;

/// Contract of a local recognition engine
#[async_trait]
pub trait LocalOcrEngine: Send + Sync {
    /// Recognize the full text of an image
    async fn recognize_text(&self, image: &DynamicImage) -> Result<String, ExtractionError>;

    /// Recognize word tokens with pixel boxes and confidences, in reading order
    async fn recognize_text_with_layout(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<TokenBox>, ExtractionError>;

    /// Get the engine name for logging
    fn name(&self) -> &'static str;
}

/// Tesseract CLI wrapper
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: String,
    language: String,
    timeout: Duration,
}

impl TesseractEngine {
    /// Create a new engine
    ///
    /// # Arguments
    /// * `command` - Path or name of the `tesseract` binary
    /// * `language` - Tesseract language code (e.g. "eng")
    /// * `timeout` - Upper bound for a single recognition pass
    pub fn new(command: &str, language: &str, timeout: Duration) -> Self {
        Self {
            command: command.to_string(),
            language: language.to_string(),
            timeout,
        }
    }

    async fn run(&self, image: &DynamicImage, config: Option<&str>) -> Result<String, ExtractionError> {
        let png = encode_png(image).map_err(|e| ExtractionError::LocalEngine(e.to_string()))?;

        let input = tempfile::Builder::new()
            .prefix("scribe-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ExtractionError::LocalEngine(format!("temp file: {}", e)))?;
        tokio::fs::write(input.path(), &png)
            .await
            .map_err(|e| ExtractionError::LocalEngine(format!("temp file: {}", e)))?;

        let mut command = Command::new(&self.command);
        command
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(config) = config {
            command.arg(config);
        }

        debug!(
            "Running {} on {}x{} image (config: {:?})",
            self.command,
            image.width(),
            image.height(),
            config
        );

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ExtractionError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })?
            .map_err(|e| {
                ExtractionError::LocalEngine(format!("failed to run {}: {}", self.command, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::LocalEngine(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl LocalOcrEngine for TesseractEngine {
    async fn recognize_text(&self, image: &DynamicImage) -> Result<String, ExtractionError> {
        self.run(image, None).await
    }

    async fn recognize_text_with_layout(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<TokenBox>, ExtractionError> {
        let tsv = self.run(image, Some("tsv")).await?;
        Ok(parse_tsv(&tsv))
    }

    fn name(&self) -> &'static str {
        "tesseract"
    }
}

/// Parse Tesseract TSV output into word tokens
///
/// Only word rows with non-blank text are kept. Tesseract reports confidence
/// on a 0-100 scale with -1 for rows it did not score; it is rescaled to
/// 0.0-1.0 and negative values become 0.0.
pub fn parse_tsv(tsv: &str) -> Vec<TokenBox> {
    tsv.lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
            if cols.len() < TSV_COLUMNS {
                return None;
            }

            let level: u32 = cols[0].trim().parse().ok()?;
            if level != TSV_WORD_LEVEL {
                return None;
            }

            let text = cols[11].trim();
            if text.is_empty() {
                return None;
            }

            let left: i64 = cols[6].trim().parse().ok()?;
            let top: i64 = cols[7].trim().parse().ok()?;
            let width: i64 = cols[8].trim().parse().ok()?;
            let height: i64 = cols[9].trim().parse().ok()?;
            let conf: f32 = cols[10].trim().parse().ok()?;

            Some(TokenBox {
                text: text.to_string(),
                bounding_box: BoundingBox::new(
                    left.max(0) as u32,
                    top.max(0) as u32,
                    width.max(0) as u32,
                    height.max(0) as u32,
                ),
                confidence: (conf / 100.0).clamp(0.0, 1.0),
            })
        })
        .collect()
}
