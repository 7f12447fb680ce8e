// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Scribe redaction service

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-screenshot-redaction-2025-11-04";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Major version number
pub const VERSION_MAJOR: u32 = 1;

/// Minor version number
pub const VERSION_MINOR: u32 = 0;

/// Patch version number
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2025-11-04";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "tesseract-ocr",
    "google-vision-ocr",
    "hosted-ocr-fallback",
    "presidio-pii",
    "pattern-pii",
    "region-mapping",
    "gaussian-region-blur",
    "png-output",
    "text-anonymization",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Scribe Redactor {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info as JSON
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
