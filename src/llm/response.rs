// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Normalization of generative model responses into plain text

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelResponseError {
    #[error("Could not extract text from model response")]
    NoText,
}

/// Join the `text` fields of a `parts` array, `None` when there are none
fn join_parts(parts: Option<&Value>) -> Option<String> {
    let texts: Vec<&str> = parts?
        .as_array()?
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if texts.is_empty() {
        return None;
    }
    Some(texts.join(" ").trim().to_string())
}

/// Extract the generated text from a raw model response
///
/// Tried in order:
/// 1. top-level `text`
/// 2. `parts[].text`, space-joined
/// 3. `candidates[0].content.parts[].text`, space-joined
pub fn decode_model_response(raw: &Value) -> Result<String, ModelResponseError> {
    if let Some(text) = raw.get("text").and_then(Value::as_str) {
        return Ok(text.to_string());
    }

    if let Some(text) = join_parts(raw.get("parts")) {
        return Ok(text);
    }

    let candidate_parts = raw
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"));
    join_parts(candidate_parts).ok_or(ModelResponseError::NoText)
}
