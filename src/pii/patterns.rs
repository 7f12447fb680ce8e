// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Built-in regex recognizers for structured PII
//!
//! Covers the pattern-shaped part of the taxonomy (emails, phone numbers,
//! SSNs, credit cards, IP addresses). Names, locations and dates need a
//! statistical analyzer and are never reported by this backend.

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use super::backend::{replace_with_placeholders, PiiBackend};
use super::types::{AnalyzerResult, ClassificationError, PiiEntityType};

const EMAIL_SCORE: f32 = 1.0;
const PHONE_SCORE: f32 = 0.75;
const SSN_SCORE: f32 = 0.85;
const CREDIT_CARD_SCORE: f32 = 1.0;
const IP_SCORE: f32 = 0.95;

/// Offline PII backend using compiled regex patterns
pub struct PatternBackend {
    email: Regex,
    phone: Regex,
    ssn: Regex,
    credit_card: Regex,
    ipv4: Regex,
    ipv6: Regex,
}

impl PatternBackend {
    pub fn new() -> Self {
        Self {
            email: Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b")
                .expect("email pattern is valid"),
            phone: Regex::new(r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b")
                .expect("phone pattern is valid"),
            ssn: Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern is valid"),
            credit_card: Regex::new(r"\b(?:\d{4}[-\s]?){3}\d{4}\b|\b\d{4}[-\s]?\d{6}[-\s]?\d{5}\b")
                .expect("credit card pattern is valid"),
            ipv4: Regex::new(
                r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
            )
            .expect("ipv4 pattern is valid"),
            ipv6: Regex::new(r"\b(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}\b")
                .expect("ipv6 pattern is valid"),
        }
    }

    fn find(
        regex: &Regex,
        text: &str,
        entity_type: PiiEntityType,
        score: f32,
        accept: impl Fn(&str) -> bool,
    ) -> Vec<AnalyzerResult> {
        regex
            .find_iter(text)
            .filter(|m| accept(m.as_str()))
            .map(|m| AnalyzerResult::new(entity_type.as_str(), m.start(), m.end(), score))
            .collect()
    }
}

impl Default for PatternBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PiiBackend for PatternBackend {
    async fn analyze(
        &self,
        text: &str,
        _language: &str,
        entity_types: &[PiiEntityType],
    ) -> Result<Vec<AnalyzerResult>, ClassificationError> {
        let mut results = Vec::new();

        for entity_type in entity_types {
            match entity_type {
                PiiEntityType::EmailAddress => {
                    results.extend(Self::find(&self.email, text, *entity_type, EMAIL_SCORE, |_| true))
                }
                PiiEntityType::PhoneNumber => {
                    results.extend(Self::find(&self.phone, text, *entity_type, PHONE_SCORE, |_| true))
                }
                PiiEntityType::Ssn => {
                    results.extend(Self::find(&self.ssn, text, *entity_type, SSN_SCORE, |_| true))
                }
                PiiEntityType::CreditCard => results.extend(Self::find(
                    &self.credit_card,
                    text,
                    *entity_type,
                    CREDIT_CARD_SCORE,
                    |m| is_valid_luhn(&m.replace(['-', ' '], "")),
                )),
                PiiEntityType::IpAddress => {
                    results.extend(Self::find(&self.ipv4, text, *entity_type, IP_SCORE, |m| {
                        !is_likely_version_number(m)
                    }));
                    results.extend(Self::find(&self.ipv6, text, *entity_type, IP_SCORE, |_| true));
                }
                PiiEntityType::Person | PiiEntityType::Location | PiiEntityType::DateTime => {}
            }
        }

        debug!("Pattern backend found {} spans", results.len());
        Ok(results)
    }

    async fn anonymize(
        &self,
        text: &str,
        results: &[AnalyzerResult],
    ) -> Result<String, ClassificationError> {
        Ok(replace_with_placeholders(text, results))
    }

    fn name(&self) -> &'static str {
        "patterns"
    }
}

/// Luhn algorithm for credit card validation
fn is_valid_luhn(card_number: &str) -> bool {
    let digits: Vec<u32> = card_number.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    checksum % 10 == 0
}

/// Dotted quads with zero components are usually version numbers, not hosts
fn is_likely_version_number(ip_str: &str) -> bool {
    let parts: Vec<&str> = ip_str.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    let zero_count = parts.iter().filter(|&&p| p == "0").count();
    parts[0] == "0" || parts[3] == "0" || zero_count >= 2
}
