// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the redaction service
//!
//! Everything is read once at startup; backends built from it are never
//! reconfigured while the process runs.

use std::env;
use std::time::Duration;

use crate::vision::image_utils::DEFAULT_MAX_IMAGE_SIZE;
use crate::vision::ocr::google::GOOGLE_VISION_ENDPOINT;

/// Default Gaussian sigma for region blur
pub const DEFAULT_BLUR_SIGMA: f32 = 10.0;

/// Which PII classification backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiiBackendKind {
    /// presidio-analyzer / presidio-anonymizer over HTTP
    Presidio,
    /// Built-in regex recognizers
    Patterns,
}

impl PiiBackendKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "presidio" => Some(Self::Presidio),
            "patterns" | "regex" => Some(Self::Patterns),
            _ => None,
        }
    }
}

/// OCR backend configuration
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Google Vision API key; when set the hosted backend is used
    pub google_vision_api_key: Option<String>,
    /// Google Vision annotate endpoint
    pub google_vision_endpoint: String,
    /// Tesseract binary
    pub tesseract_cmd: String,
    /// Tesseract language code
    pub language: String,
    /// Timeout for a single extraction call in milliseconds
    pub timeout_ms: u64,
}

/// PII classifier configuration
#[derive(Debug, Clone)]
pub struct PiiConfig {
    pub backend: PiiBackendKind,
    /// presidio-analyzer base URL
    pub analyzer_url: Option<String>,
    /// presidio-anonymizer base URL
    pub anonymizer_url: Option<String>,
    /// Analysis language
    pub language: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub ocr: OcrConfig,
    pub pii: PiiConfig,
    /// Gaussian sigma applied to each redacted region
    pub blur_sigma: f32,
    /// Timeout for fetching images by URI in milliseconds
    pub fetch_timeout_ms: u64,
    /// Largest accepted image in bytes
    pub max_image_bytes: usize,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl RedactionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let analyzer_url = env_non_empty("PRESIDIO_ANALYZER_URL");
        // Presidio when an analyzer is reachable, otherwise the built-in patterns
        let backend = env::var("PII_BACKEND")
            .ok()
            .and_then(|v| PiiBackendKind::parse(&v))
            .unwrap_or(if analyzer_url.is_some() {
                PiiBackendKind::Presidio
            } else {
                PiiBackendKind::Patterns
            });

        Self {
            ocr: OcrConfig {
                google_vision_api_key: env_non_empty("GOOGLE_VISION_API_KEY"),
                google_vision_endpoint: env::var("GOOGLE_VISION_ENDPOINT")
                    .unwrap_or_else(|_| GOOGLE_VISION_ENDPOINT.to_string()),
                tesseract_cmd: env::var("TESSERACT_CMD")
                    .unwrap_or_else(|_| "tesseract".to_string()),
                language: env::var("OCR_LANGUAGE").unwrap_or_else(|_| "eng".to_string()),
                timeout_ms: env_parse("OCR_TIMEOUT_MS", 30_000),
            },
            pii: PiiConfig {
                backend,
                analyzer_url,
                anonymizer_url: env_non_empty("PRESIDIO_ANONYMIZER_URL"),
                language: env::var("PII_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
                timeout_ms: env_parse("PII_TIMEOUT_MS", 10_000),
            },
            blur_sigma: env_parse("BLUR_SIGMA", DEFAULT_BLUR_SIGMA),
            fetch_timeout_ms: env_parse("FETCH_TIMEOUT_MS", 30_000),
            max_image_bytes: env_parse("MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_SIZE),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.validate_redactor()?;
        if self.ocr.timeout_ms == 0 {
            return Err("OCR timeout must be greater than 0".to_string());
        }
        if self.pii.timeout_ms == 0 {
            return Err("PII timeout must be greater than 0".to_string());
        }
        if self.max_image_bytes == 0 {
            return Err("Max image size must be greater than 0".to_string());
        }
        if self.pii.backend == PiiBackendKind::Presidio && self.pii.analyzer_url.is_none() {
            return Err("PII_BACKEND=presidio requires PRESIDIO_ANALYZER_URL".to_string());
        }
        Ok(())
    }

    /// Validate only the settings used to fetch and blur images
    pub fn validate_redactor(&self) -> Result<(), String> {
        if self.fetch_timeout_ms == 0 {
            return Err("Fetch timeout must be greater than 0".to_string());
        }
        if !(self.blur_sigma.is_finite() && self.blur_sigma > 0.0) {
            return Err(format!("Blur sigma must be positive, got {}", self.blur_sigma));
        }
        Ok(())
    }

    /// Check if the hosted OCR backend is configured
    pub fn has_hosted_ocr(&self) -> bool {
        self.ocr.google_vision_api_key.is_some()
    }

    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_millis(self.ocr.timeout_ms)
    }

    pub fn pii_timeout(&self) -> Duration {
        Duration::from_millis(self.pii.timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig {
                google_vision_api_key: None,
                google_vision_endpoint: GOOGLE_VISION_ENDPOINT.to_string(),
                tesseract_cmd: "tesseract".to_string(),
                language: "eng".to_string(),
                timeout_ms: 30_000,
            },
            pii: PiiConfig {
                backend: PiiBackendKind::Patterns,
                analyzer_url: None,
                anonymizer_url: None,
                language: "en".to_string(),
                timeout_ms: 10_000,
            },
            blur_sigma: DEFAULT_BLUR_SIGMA,
            fetch_timeout_ms: 30_000,
            max_image_bytes: DEFAULT_MAX_IMAGE_SIZE,
        }
    }
}
