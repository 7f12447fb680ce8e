// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Presidio analyzer/anonymizer HTTP backend
//!
//! Presidio reports offsets in Unicode code points; they are converted to
//! byte offsets on the way in and back to code points for anonymization.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::backend::PiiBackend;
use super::types::{AnalyzerResult, ClassificationError, PiiEntityType};

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    language: &'a str,
    entities: Vec<&'static str>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecognizerResult {
    entity_type: String,
    start: usize,
    end: usize,
    score: f32,
}

#[derive(Serialize)]
struct AnonymizeRequest<'a> {
    text: &'a str,
    analyzer_results: Vec<RecognizerResult>,
}

#[derive(Debug, Deserialize)]
struct AnonymizeResponse {
    text: String,
}

/// Label Presidio uses for a taxonomy entry
fn presidio_label(entity_type: PiiEntityType) -> &'static str {
    match entity_type {
        PiiEntityType::Ssn => "US_SSN",
        other => other.as_str(),
    }
}

/// Byte offset of the `char_index`-th character, `None` past the end
fn char_to_byte(text: &str, char_index: usize) -> Option<usize> {
    if char_index == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .nth(char_index)
}

/// Number of characters before byte offset `byte_index`
fn byte_to_char(text: &str, byte_index: usize) -> usize {
    text[..byte_index.min(text.len())].chars().count()
}

/// Client for presidio-analyzer and (optionally) presidio-anonymizer
pub struct PresidioBackend {
    client: Client,
    analyzer_url: String,
    anonymizer_url: Option<String>,
}

impl PresidioBackend {
    /// Create a new Presidio backend
    ///
    /// # Arguments
    /// * `analyzer_url` - Base URL of presidio-analyzer
    /// * `anonymizer_url` - Base URL of presidio-anonymizer, if deployed
    /// * `timeout` - Per-request timeout
    pub fn new(
        analyzer_url: &str,
        anonymizer_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ClassificationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassificationError::Transport(e.to_string()))?;

        let analyzer_url = analyzer_url.trim_end_matches('/').to_string();
        let anonymizer_url = anonymizer_url.map(|u| u.trim_end_matches('/').to_string());
        info!(
            "Presidio backend configured: analyzer={}, anonymizer={:?}",
            analyzer_url, anonymizer_url
        );

        Ok(Self {
            client,
            analyzer_url,
            anonymizer_url,
        })
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        url: String,
        body: &T,
    ) -> Result<reqwest::Response, ClassificationError> {
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClassificationError::Transport(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClassificationError::BackendFailed {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl PiiBackend for PresidioBackend {
    async fn analyze(
        &self,
        text: &str,
        language: &str,
        entity_types: &[PiiEntityType],
    ) -> Result<Vec<AnalyzerResult>, ClassificationError> {
        let request = AnalyzeRequest {
            text,
            language,
            entities: entity_types.iter().map(|t| presidio_label(*t)).collect(),
        };

        let response = self
            .post(format!("{}/analyze", self.analyzer_url), &request)
            .await?;
        let raw: Vec<RecognizerResult> = response
            .json()
            .await
            .map_err(|e| ClassificationError::InvalidResponse(e.to_string()))?;

        debug!("Presidio returned {} results", raw.len());

        Ok(raw
            .into_iter()
            .filter_map(|r| {
                match (char_to_byte(text, r.start), char_to_byte(text, r.end)) {
                    (Some(start), Some(end)) => Some(AnalyzerResult {
                        entity_type: r.entity_type,
                        start,
                        end,
                        score: r.score,
                    }),
                    _ => {
                        warn!(
                            "Dropping {} span {}..{} outside text",
                            r.entity_type, r.start, r.end
                        );
                        None
                    }
                }
            })
            .collect())
    }

    async fn anonymize(
        &self,
        text: &str,
        results: &[AnalyzerResult],
    ) -> Result<String, ClassificationError> {
        let anonymizer_url = self.anonymizer_url.as_ref().ok_or_else(|| {
            ClassificationError::NotConfigured("presidio anonymizer URL".to_string())
        })?;

        let request = AnonymizeRequest {
            text,
            analyzer_results: results
                .iter()
                .map(|r| RecognizerResult {
                    entity_type: r.entity_type.clone(),
                    start: byte_to_char(text, r.start),
                    end: byte_to_char(text, r.end),
                    score: r.score,
                })
                .collect(),
        };

        let response = self
            .post(format!("{}/anonymize", anonymizer_url), &request)
            .await?;
        let body: AnonymizeResponse = response
            .json()
            .await
            .map_err(|e| ClassificationError::InvalidResponse(e.to_string()))?;

        Ok(body.text)
    }

    fn name(&self) -> &'static str {
        "presidio"
    }
}
