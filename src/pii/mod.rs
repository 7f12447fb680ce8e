// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PII classification of extracted text
//!
//! Provides:
//! - A fixed entity taxonomy (`PiiEntityType`)
//! - Pluggable analysis backends (Presidio over HTTP, built-in patterns)
//! - `PiiClassifier`, which validates and orders backend output

pub mod backend;
pub mod classifier;
pub mod patterns;
pub mod presidio;
pub mod types;

pub use backend::{replace_with_placeholders, PiiBackend};
pub use classifier::PiiClassifier;
pub use patterns::PatternBackend;
pub use presidio::PresidioBackend;
pub use types::{AnalyzerResult, ClassificationError, PiiEntity, PiiEntityType};
