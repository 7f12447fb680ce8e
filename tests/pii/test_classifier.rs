// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Classifier behavior over the built-in pattern backend

use scribe_redactor::config::{PiiBackendKind, RedactionConfig};
use scribe_redactor::pii::{ClassificationError, PatternBackend, PiiClassifier, PiiEntityType};
use std::sync::Arc;

fn classifier() -> PiiClassifier {
    PiiClassifier::new(Arc::new(PatternBackend::new()), "en")
}

#[tokio::test]
async fn test_offsets_are_bytes_in_multibyte_text() {
    let text = "Zoë Müller — zoë.m@example.de, Tel. +1 (555) 010-9999";
    let entities = classifier().classify(text).await.unwrap();

    assert!(!entities.is_empty());
    for entity in &entities {
        assert!(entity.end <= text.len());
        assert_eq!(&text[entity.start..entity.end], entity.value);
    }
    assert!(entities
        .iter()
        .any(|e| e.entity_type == PiiEntityType::PhoneNumber));
}

#[tokio::test]
async fn test_no_pii_in_ui_text() {
    let entities = classifier()
        .classify("Click Save to continue\nSettings > Profile")
        .await
        .unwrap();
    assert!(entities.is_empty());
}

#[tokio::test]
async fn test_serialized_entities_use_taxonomy_names() {
    let entities = classifier()
        .classify("SSN 123-45-6789 card 4111-1111-1111-1111")
        .await
        .unwrap();
    let json = serde_json::to_value(&entities).unwrap();
    let types: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"SSN"));
    assert!(types.contains(&"CREDIT_CARD"));
}

#[test]
fn test_presidio_requires_analyzer_url() {
    let mut config = RedactionConfig::default();
    config.pii.backend = PiiBackendKind::Presidio;
    assert!(config.validate().is_err());
    assert!(matches!(
        PiiClassifier::from_config(&config),
        Err(ClassificationError::NotConfigured(_))
    ));

    config.pii.analyzer_url = Some("http://localhost:5002".to_string());
    let classifier = PiiClassifier::from_config(&config).unwrap();
    assert_eq!(classifier.backend_name(), "presidio");
}
