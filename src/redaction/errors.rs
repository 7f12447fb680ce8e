// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy surfaced by the redaction pipeline

use thiserror::Error;

use crate::pii::ClassificationError;
use crate::vision::ocr::ExtractionError;
use crate::vision::ImageError;

/// Image retrieval failure
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Request timed out
    #[error("Timeout fetching: {0}")]
    Timeout(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(String),

    /// HTTP non-success status
    #[error("HTTP {0} for: {1}")]
    HttpStatus(u16, String),

    /// Local file could not be read
    #[error("Failed to read {0}: {1}")]
    Io(String, String),

    /// No source handles the URI
    #[error("Unsupported image URI: {0}")]
    UnsupportedUri(String),
}

/// Errors returned by [`RedactionPipeline`](super::RedactionPipeline)
#[derive(Debug, Error)]
pub enum RedactionError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Every extraction backend failed
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    /// Bytes given to the redactor are not a usable image
    #[error("Image decode error: {0}")]
    ImageDecode(#[from] ImageError),

    /// The blur task did not run to completion
    #[error("Blur task failed: {0}")]
    Task(String),
}
