// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Cloud Vision text detection client
//!
//! Calls the REST `images:annotate` endpoint with the `TEXT_DETECTION`
//! feature. The first returned annotation is the full text of the image, the
//! remaining ones are individual words with bounding polygons.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::model::BoundingBox;
use super::provider::ExtractionError;

pub const GOOGLE_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// One text annotation from a hosted backend
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnnotation {
    /// Annotated text
    pub text: String,
    /// Backend-assigned confidence, 0.0 when the backend gave none
    pub confidence: f32,
    /// Axis-aligned box around the annotation, if the backend returned one
    pub bounding_box: Option<BoundingBox>,
}

/// Contract of a hosted text detection service
///
/// The first element of the returned list is the full-text annotation.
#[async_trait]
pub trait HostedVisionClient: Send + Sync {
    async fn detect_text(&self, image_bytes: &[u8]) -> Result<Vec<TextAnnotation>, ExtractionError>;

    /// Get the backend name for logging
    fn name(&self) -> &'static str;
}

// --- Vision API serde structs ---

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: RequestImage,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct RequestImage {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    confidence: f32,
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Deserialize)]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

// Zero coordinates are omitted from the JSON
#[derive(Debug, Deserialize)]
struct Vertex {
    #[serde(default)]
    x: i64,
    #[serde(default)]
    y: i64,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

impl BoundingPoly {
    fn to_bounding_box(&self) -> Option<BoundingBox> {
        let min_x = self.vertices.iter().map(|v| v.x).min()?.max(0);
        let min_y = self.vertices.iter().map(|v| v.y).min()?.max(0);
        let max_x = self.vertices.iter().map(|v| v.x).max()?.max(min_x);
        let max_y = self.vertices.iter().map(|v| v.y).max()?.max(min_y);
        Some(BoundingBox::new(
            min_x as u32,
            min_y as u32,
            (max_x - min_x) as u32,
            (max_y - min_y) as u32,
        ))
    }
}

impl From<EntityAnnotation> for TextAnnotation {
    fn from(annotation: EntityAnnotation) -> Self {
        Self {
            bounding_box: annotation
                .bounding_poly
                .as_ref()
                .and_then(BoundingPoly::to_bounding_box),
            text: annotation.description,
            confidence: annotation.confidence,
        }
    }
}

/// Google Cloud Vision client authenticated with an API key
pub struct GoogleVisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl GoogleVisionClient {
    /// Create a new client
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("Google Vision client configured: endpoint={}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            timeout,
        })
    }

    fn build_request(image_bytes: &[u8]) -> AnnotateRequest {
        AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: RequestImage {
                    content: STANDARD.encode(image_bytes),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION".to_string(),
                }],
            }],
        }
    }

    fn parse_response(response: AnnotateResponse) -> Result<Vec<TextAnnotation>, ExtractionError> {
        let Some(first) = response.responses.into_iter().next() else {
            return Ok(Vec::new());
        };

        if let Some(error) = first.error {
            return Err(ExtractionError::HostedApi {
                status: error.code,
                message: error.message,
            });
        }

        Ok(first
            .text_annotations
            .into_iter()
            .map(TextAnnotation::from)
            .collect())
    }
}

#[async_trait]
impl HostedVisionClient for GoogleVisionClient {
    async fn detect_text(&self, image_bytes: &[u8]) -> Result<Vec<TextAnnotation>, ExtractionError> {
        let request = Self::build_request(image_bytes);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Timeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    ExtractionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExtractionError::HostedApi {
                status: status.as_u16(),
                message,
            });
        }

        let data: AnnotateResponse =
            response
                .json()
                .await
                .map_err(|e| ExtractionError::HostedApi {
                    status: 0,
                    message: format!("JSON parse error: {}", e),
                })?;

        let annotations = Self::parse_response(data)?;
        debug!("Google Vision returned {} annotations", annotations.len());
        Ok(annotations)
    }

    fn name(&self) -> &'static str {
        "google-vision"
    }
}
