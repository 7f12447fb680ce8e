// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PII classifier front over a pluggable backend

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::backend::PiiBackend;
use super::patterns::PatternBackend;
use super::presidio::PresidioBackend;
use super::types::{AnalyzerResult, ClassificationError, PiiEntity, PiiEntityType};
use crate::config::{PiiBackendKind, RedactionConfig};

/// Classifies text into typed PII spans using the fixed taxonomy
///
/// Results are ordered by `start`. Overlapping spans of different types are
/// all kept, and backend scores are passed through untouched.
pub struct PiiClassifier {
    backend: Arc<dyn PiiBackend>,
    language: String,
}

impl PiiClassifier {
    pub fn new(backend: Arc<dyn PiiBackend>, language: &str) -> Self {
        Self {
            backend,
            language: language.to_string(),
        }
    }

    /// Build the classifier selected by configuration
    pub fn from_config(config: &RedactionConfig) -> Result<Self, ClassificationError> {
        let backend: Arc<dyn PiiBackend> = match config.pii.backend {
            PiiBackendKind::Presidio => {
                let analyzer_url = config.pii.analyzer_url.as_deref().ok_or_else(|| {
                    ClassificationError::NotConfigured("PRESIDIO_ANALYZER_URL".to_string())
                })?;
                Arc::new(PresidioBackend::new(
                    analyzer_url,
                    config.pii.anonymizer_url.as_deref(),
                    config.pii_timeout(),
                )?)
            }
            PiiBackendKind::Patterns => Arc::new(PatternBackend::new()),
        };

        info!("PII classification backend: {}", backend.name());
        Ok(Self::new(backend, &config.pii.language))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Find PII entities in `text`
    pub async fn classify(&self, text: &str) -> Result<Vec<PiiEntity>, ClassificationError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let results = self.analyze_valid(text).await?;
        let mut entities: Vec<PiiEntity> = results
            .into_iter()
            .filter_map(|r| {
                let entity_type = PiiEntityType::from_label(&r.entity_type)?;
                Some(PiiEntity {
                    entity_type,
                    value: text[r.start..r.end].to_string(),
                    confidence: r.score,
                    start: r.start,
                    end: r.end,
                })
            })
            .collect();
        entities.sort_by_key(|e| e.start);

        debug!(
            "Classified {} entities via {}",
            entities.len(),
            self.backend.name()
        );
        Ok(entities)
    }

    /// Replace detected PII in `text` with type-tagged placeholders
    pub async fn anonymize(&self, text: &str) -> Result<String, ClassificationError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let results = self.analyze_valid(text).await?;
        self.backend.anonymize(text, &results).await
    }

    /// Backend results restricted to the taxonomy and to valid spans of `text`
    async fn analyze_valid(&self, text: &str) -> Result<Vec<AnalyzerResult>, ClassificationError> {
        let results = self
            .backend
            .analyze(text, &self.language, &PiiEntityType::ALL)
            .await?;

        Ok(results
            .into_iter()
            .filter(|r| {
                if PiiEntityType::from_label(&r.entity_type).is_none() {
                    debug!("Ignoring entity type outside taxonomy: {}", r.entity_type);
                    return false;
                }
                let valid = r.start < r.end
                    && r.end <= text.len()
                    && text.is_char_boundary(r.start)
                    && text.is_char_boundary(r.end);
                if !valid {
                    warn!(
                        "Dropping {} span {}..{} invalid for text of {} bytes",
                        r.entity_type,
                        r.start,
                        r.end,
                        text.len()
                    );
                }
                valid
            })
            .collect())
    }
}
