// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Screenshot redaction
//!
//! Components:
//! - `types` - `BlurRegion` and `RedactionResult`
//! - `mapper` - PII text spans to pixel regions
//! - `redactor` - Region blur and PNG re-encoding
//! - `source` - Fetch-by-URI image sources
//! - `pipeline` - Detection and application phases

pub mod errors;
pub mod mapper;
pub mod pipeline;
pub mod redactor;
pub mod source;
pub mod types;

pub use errors::{RedactionError, TransportError};
pub use mapper::{map_entities_to_regions, PLACEHOLDER_REGION};
pub use pipeline::{redacted_uri, RedactionPipeline};
pub use redactor::{clamp_region, Redactor};
pub use source::{AnyImageSource, FileImageSource, HttpImageSource, ImageSource};
pub use types::{BlurRegion, RedactionResult};
