// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for PII classification

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The fixed PII taxonomy
///
/// Names follow the analyzer's entity labels; `US_SSN` is accepted as an
/// alias of `SSN` when parsing backend output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiEntityType {
    EmailAddress,
    PhoneNumber,
    CreditCard,
    Ssn,
    IpAddress,
    Person,
    Location,
    DateTime,
}

impl PiiEntityType {
    /// Every supported entity type
    pub const ALL: [PiiEntityType; 8] = [
        PiiEntityType::EmailAddress,
        PiiEntityType::PhoneNumber,
        PiiEntityType::CreditCard,
        PiiEntityType::Ssn,
        PiiEntityType::IpAddress,
        PiiEntityType::Person,
        PiiEntityType::Location,
        PiiEntityType::DateTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PiiEntityType::EmailAddress => "EMAIL_ADDRESS",
            PiiEntityType::PhoneNumber => "PHONE_NUMBER",
            PiiEntityType::CreditCard => "CREDIT_CARD",
            PiiEntityType::Ssn => "SSN",
            PiiEntityType::IpAddress => "IP_ADDRESS",
            PiiEntityType::Person => "PERSON",
            PiiEntityType::Location => "LOCATION",
            PiiEntityType::DateTime => "DATE_TIME",
        }
    }

    /// Parse a backend label; labels outside the taxonomy return `None`
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "EMAIL_ADDRESS" | "EMAIL" => Some(PiiEntityType::EmailAddress),
            "PHONE_NUMBER" | "PHONE" => Some(PiiEntityType::PhoneNumber),
            "CREDIT_CARD" => Some(PiiEntityType::CreditCard),
            "SSN" | "US_SSN" => Some(PiiEntityType::Ssn),
            "IP_ADDRESS" => Some(PiiEntityType::IpAddress),
            "PERSON" => Some(PiiEntityType::Person),
            "LOCATION" => Some(PiiEntityType::Location),
            "DATE_TIME" => Some(PiiEntityType::DateTime),
            _ => None,
        }
    }
}

impl fmt::Display for PiiEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A PII span found in extracted text
///
/// `start` and `end` are byte offsets into the analyzed text with
/// `start < end <= text.len()`, and `value == text[start..end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiEntity {
    #[serde(rename = "type")]
    pub entity_type: PiiEntityType,
    pub value: String,
    pub confidence: f32,
    pub start: usize,
    pub end: usize,
}

/// Raw result as returned by a classification backend
///
/// Offsets are byte offsets; backends speaking another offset unit convert
/// before returning. The label may lie outside the taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerResult {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

impl AnalyzerResult {
    pub fn new(entity_type: &str, start: usize, end: usize, score: f32) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            start,
            end,
            score,
        }
    }
}

/// Errors that can occur during classification
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// No backend (or no backend URL) configured for the operation
    #[error("No PII backend configured: {0}")]
    NotConfigured(String),

    /// The backend answered with an error status
    #[error("PII backend error: {status} - {message}")]
    BackendFailed { status: u16, message: String },

    /// The backend could not be reached
    #[error("PII backend unreachable: {0}")]
    Transport(String),

    /// The backend answered with something unparseable
    #[error("Invalid PII backend response: {0}")]
    InvalidResponse(String),
}
