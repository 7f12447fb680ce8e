// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction provider trait definition

use async_trait::async_trait;
use thiserror::Error;

use super::model::ExtractedText;

/// Errors raised by text extraction backends
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The local OCR engine could not run
    #[error("Local OCR engine failed: {0}")]
    LocalEngine(String),

    /// The hosted vision service rejected or failed the request
    #[error("Hosted vision API error: {status} - {message}")]
    HostedApi { status: u16, message: String },

    /// Network failure talking to a hosted backend
    #[error("Transport error: {0}")]
    Transport(String),

    /// A backend call exceeded its time budget
    #[error("Extraction timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The image exceeds the configured size limit and was not read
    #[error("Image too large for extraction: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    /// Every configured backend failed for this request
    #[error("All extraction backends failed: {0}")]
    AllBackendsFailed(String),
}

/// Capability interface for turning image bytes into text
///
/// Both the local and the hosted backends implement this trait and populate
/// the same normalized [`ExtractedText`]. Unreadable images yield
/// [`ExtractedText::empty`] rather than an error; images over the size
/// limit are an error, never an empty result.
#[async_trait]
pub trait TextExtractionProvider: Send + Sync {
    /// Extract text, per-token positions and confidence from an image
    async fn extract(&self, image_bytes: &[u8]) -> Result<ExtractedText, ExtractionError>;

    /// Get the provider name for logging
    fn name(&self) -> &'static str;
}
