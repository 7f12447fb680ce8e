// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PII backend trait definition

use async_trait::async_trait;

use super::types::{AnalyzerResult, ClassificationError, PiiEntityType};

/// Trait for PII analysis engines
///
/// Implementations may recognize labels outside the fixed taxonomy; the
/// [`PiiClassifier`](super::PiiClassifier) filters those out.
#[async_trait]
pub trait PiiBackend: Send + Sync {
    /// Find PII spans in `text`
    ///
    /// # Arguments
    /// * `text` - Text to analyze
    /// * `language` - Language code (e.g. "en")
    /// * `entity_types` - Types to look for
    async fn analyze(
        &self,
        text: &str,
        language: &str,
        entity_types: &[PiiEntityType],
    ) -> Result<Vec<AnalyzerResult>, ClassificationError>;

    /// Replace the given spans with type-tagged placeholders
    async fn anonymize(
        &self,
        text: &str,
        results: &[AnalyzerResult],
    ) -> Result<String, ClassificationError>;

    /// Get the backend name for logging
    fn name(&self) -> &'static str;
}

/// Replace each span with `<ENTITY_TYPE>`
///
/// Spans must be valid byte ranges on char boundaries. Overlapping spans are
/// resolved by keeping the earliest-starting (longest on ties) one.
pub fn replace_with_placeholders(text: &str, results: &[AnalyzerResult]) -> String {
    let mut spans: Vec<&AnalyzerResult> = results
        .iter()
        .filter(|r| r.start < r.end && r.end <= text.len())
        .filter(|r| text.is_char_boundary(r.start) && text.is_char_boundary(r.end))
        .collect();
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if span.start < cursor {
            continue;
        }
        out.push_str(&text[cursor..span.start]);
        out.push('<');
        out.push_str(&span.entity_type);
        out.push('>');
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}
