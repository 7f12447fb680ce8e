// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fetch-by-URI image sources

use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::errors::TransportError;

/// Retrieves raw screenshot bytes by URI
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, TransportError>;
}

/// HTTP(S) image source with a bounded request timeout
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, TransportError> {
        debug!("Fetching image from: {}", uri);

        let response = self.client.get(uri).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(uri.to_string())
            } else {
                TransportError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16(), uri.to_string()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Local filesystem source accepting plain paths and `file://` URIs
#[derive(Debug, Default, Clone)]
pub struct FileImageSource;

impl FileImageSource {
    fn resolve(uri: &str) -> Result<PathBuf, TransportError> {
        if uri.starts_with("file://") {
            let url = Url::parse(uri).map_err(|_| TransportError::UnsupportedUri(uri.to_string()))?;
            return url
                .to_file_path()
                .map_err(|_| TransportError::UnsupportedUri(uri.to_string()));
        }
        Ok(PathBuf::from(uri))
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, TransportError> {
        let path = Self::resolve(uri)?;
        debug!("Reading image from: {}", path.display());
        tokio::fs::read(&path)
            .await
            .map_err(|e| TransportError::Io(path.display().to_string(), e.to_string()))
    }
}

/// Dispatches on URI scheme: http(s) to the network, everything else local
pub struct AnyImageSource {
    http: HttpImageSource,
    file: FileImageSource,
}

impl AnyImageSource {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            http: HttpImageSource::new(timeout)?,
            file: FileImageSource,
        })
    }
}

#[async_trait]
impl ImageSource for AnyImageSource {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, TransportError> {
        match Url::parse(uri) {
            Ok(url) => match url.scheme() {
                "http" | "https" => self.http.fetch(uri).await,
                "file" => self.file.fetch(uri).await,
                _ => Err(TransportError::UnsupportedUri(uri.to_string())),
            },
            // Relative and absolute paths have no scheme
            Err(_) => self.file.fetch(uri).await,
        }
    }
}
