// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for screenshot redaction
//!
//! This module provides:
//! - Image decoding/encoding shared by every stage
//! - Text extraction via a local Tesseract engine or Google Cloud Vision

pub mod image_utils;
pub mod ocr;

pub use image_utils::{decode_image_bytes, detect_format, encode_png, ImageError, ImageInfo};
