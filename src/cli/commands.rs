// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{PiiBackendKind, RedactionConfig};
use crate::redaction::{
    AnyImageSource, BlurRegion, ImageSource, RedactionPipeline, RedactionResult, Redactor,
};

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Screenshot path or URL
    #[arg(long)]
    pub image: String,

    /// Step identifier echoed in the result
    #[arg(long, default_value = "cli")]
    pub step_id: String,

    /// PII backend override (presidio/patterns)
    #[arg(long, env = "PII_BACKEND")]
    pub pii_backend: Option<String>,
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Screenshot path or URL
    #[arg(long)]
    pub image: String,

    /// JSON file with a list of regions or a detect result
    #[arg(long)]
    pub regions: PathBuf,

    /// Where to write the redacted PNG
    #[arg(long)]
    pub output: PathBuf,

    /// Gaussian blur sigma
    #[arg(long, env = "BLUR_SIGMA")]
    pub blur_sigma: Option<f32>,
}

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Text to anonymize
    #[arg(long)]
    pub text: String,

    /// PII backend override (presidio/patterns)
    #[arg(long, env = "PII_BACKEND")]
    pub pii_backend: Option<String>,
}

fn load_config(pii_backend: Option<&str>, blur_sigma: Option<f32>) -> Result<RedactionConfig> {
    dotenv::dotenv().ok();

    let mut config = RedactionConfig::from_env();
    if let Some(value) = pii_backend {
        config.pii.backend = PiiBackendKind::parse(value)
            .ok_or_else(|| anyhow!("Unknown PII backend: {}", value))?;
    }
    if let Some(sigma) = blur_sigma {
        config.blur_sigma = sigma;
    }
    Ok(config)
}

/// Parse a regions file: either a bare region list or a detect result
pub fn parse_regions(json: &str) -> Result<Vec<BlurRegion>> {
    if let Ok(regions) = serde_json::from_str::<Vec<BlurRegion>>(json) {
        return Ok(regions);
    }
    let result: RedactionResult =
        serde_json::from_str(json).context("Regions file is neither a region list nor a detect result")?;
    Ok(result.blurred_regions)
}

/// Run detection and print the result as JSON
pub async fn detect(args: DetectArgs) -> Result<()> {
    let config = load_config(args.pii_backend.as_deref(), None)?;
    config.validate().map_err(|e| anyhow!(e))?;
    let pipeline = RedactionPipeline::from_config(&config)?;

    let result = pipeline.detect_uri(&args.step_id, &args.image).await?;
    if !result.has_pii() {
        info!("No PII found in {}", args.image);
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Blur regions on an image and write the PNG
pub async fn apply(args: ApplyArgs) -> Result<()> {
    let config = load_config(None, args.blur_sigma)?;

    let regions_json = tokio::fs::read_to_string(&args.regions)
        .await
        .with_context(|| format!("Failed to read {}", args.regions.display()))?;
    let regions = parse_regions(&regions_json)?;

    let region_count = regions.len();
    let redacted = apply_regions(&config, &args.image, regions).await?;
    write_output(&args.output, &redacted).await?;

    info!(
        "Wrote {} ({} regions, {} bytes)",
        args.output.display(),
        region_count,
        redacted.len()
    );
    Ok(())
}

/// Fetch an image and blur `regions` without building the extraction or PII backends
async fn apply_regions(
    config: &RedactionConfig,
    image: &str,
    regions: Vec<BlurRegion>,
) -> Result<Vec<u8>> {
    config.validate_redactor().map_err(|e| anyhow!(e))?;
    let source = AnyImageSource::new(config.fetch_timeout())?;
    let image_bytes = source.fetch(image).await?;

    Ok(Redactor::new(config.blur_sigma)
        .redact_blocking(image_bytes, regions)
        .await?)
}

/// Print the anonymized text
pub async fn anonymize(args: AnonymizeArgs) -> Result<()> {
    let config = load_config(args.pii_backend.as_deref(), None)?;
    config.validate().map_err(|e| anyhow!(e))?;
    let pipeline = RedactionPipeline::from_config(&config)?;

    println!("{}", pipeline.anonymize(&args.text).await?);
    Ok(())
}

async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
