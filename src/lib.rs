// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod llm;
pub mod pii;
pub mod redaction;
pub mod version;
pub mod vision;

// Re-export main types
pub use config::RedactionConfig;
pub use pii::{PiiClassifier, PiiEntity, PiiEntityType};
pub use redaction::{BlurRegion, RedactionError, RedactionPipeline, RedactionResult, Redactor};
pub use vision::ocr::{ExtractedText, TextExtractionProvider, TokenBox};
