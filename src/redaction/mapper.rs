// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Maps PII text spans to pixel regions
//!
//! Each token is located in the extracted text by a forward search from the
//! end of the previous match, so block breaks and repeated whitespace in the
//! full text do not shift token offsets. Tokens that cannot be found take no
//! part in mapping.

use tracing::debug;

use super::types::BlurRegion;
use crate::pii::PiiEntity;
use crate::vision::ocr::{BoundingBox, TokenBox};

/// Placeholder rectangle used when no layout covers an entity
pub const PLACEHOLDER_REGION: BoundingBox = BoundingBox {
    x: 0,
    y: 0,
    width: 100,
    height: 30,
};

/// Byte span of each token in `text`, `None` for tokens not found
fn token_spans(text: &str, tokens: &[TokenBox]) -> Vec<Option<(usize, usize)>> {
    let mut cursor = 0;
    tokens
        .iter()
        .map(|token| {
            let needle = token.text.trim();
            if needle.is_empty() {
                return None;
            }
            let Some(offset) = text[cursor..].find(needle) else {
                debug!("Token {:?} not found in extracted text after byte {}", needle, cursor);
                return None;
            };
            let start = cursor + offset;
            cursor = start + needle.len();
            Some((start, cursor))
        })
        .collect()
}

/// Convert entities into blur regions, one per entity, in entity order
///
/// `text` is the extracted text the entity offsets index into. Each region
/// is the union of the boxes of every located token overlapping the entity
/// span. Entities no token covers get [`PLACEHOLDER_REGION`].
pub fn map_entities_to_regions(
    text: &str,
    entities: &[PiiEntity],
    tokens: &[TokenBox],
) -> Vec<BlurRegion> {
    let spans = token_spans(text, tokens);

    entities
        .iter()
        .map(|entity| {
            let covered = tokens
                .iter()
                .zip(spans.iter())
                .filter_map(|(token, span)| span.map(|span| (token, span)))
                .filter(|(_, (start, end))| *start < entity.end && *end > entity.start)
                .map(|(token, _)| token.bounding_box)
                .reduce(|acc, bbox| acc.union(&bbox));

            let bbox = covered.unwrap_or_else(|| {
                debug!(
                    "No token covers {} at {}..{}, using placeholder region",
                    entity.entity_type, entity.start, entity.end
                );
                PLACEHOLDER_REGION
            });
            BlurRegion::from_bounding_box(&bbox, entity.entity_type.as_str())
        })
        .collect()
}
