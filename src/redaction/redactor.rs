// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Region blur over decoded screenshots

use image::{imageops, DynamicImage, ImageBuffer, Pixel};
use tracing::debug;

use super::errors::RedactionError;
use super::types::BlurRegion;
use crate::config::DEFAULT_BLUR_SIGMA;
use crate::vision::image_utils::{decode_image_bytes, encode_png};
use crate::vision::ImageError;

/// Clamp a region to a `width` x `height` image
///
/// Returns `(x, y, width, height)` or `None` when nothing of the region
/// remains inside the image.
pub fn clamp_region(region: &BlurRegion, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let image_width = width as i64;
    let image_height = height as i64;

    let x = region.x.clamp(0, image_width);
    let y = region.y.clamp(0, image_height);
    let w = region.width.min(image_width - x);
    let h = region.height.min(image_height - y);

    if w <= 0 || h <= 0 {
        return None;
    }
    Some((x as u32, y as u32, w as u32, h as u32))
}

/// Applies a Gaussian blur to each region and re-encodes as PNG
///
/// Regions are blurred one after another in input order, so overlapping
/// regions are blurred more than once. Inputs with more than 8 bits per
/// channel are processed and encoded as 16-bit RGBA, everything else as
/// 8-bit RGBA.
#[derive(Debug, Clone)]
pub struct Redactor {
    sigma: f32,
}

impl Redactor {
    pub fn new(sigma: f32) -> Self {
        Self { sigma }
    }

    /// Blur `regions` on the image in `image_bytes`
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - PNG bytes with the same dimensions as the input
    /// * `Err(ImageError)` - If the input is not a decodable image
    pub fn redact(&self, image_bytes: &[u8], regions: &[BlurRegion]) -> Result<Vec<u8>, ImageError> {
        let (img, info) = decode_image_bytes(image_bytes, usize::MAX)?;

        let color = img.color();
        let wide = color.bytes_per_pixel() > color.channel_count();
        let (canvas, applied) = if wide {
            let mut canvas = img.to_rgba16();
            let applied = self.blur_regions(&mut canvas, regions);
            (DynamicImage::ImageRgba16(canvas), applied)
        } else {
            let mut canvas = img.to_rgba8();
            let applied = self.blur_regions(&mut canvas, regions);
            (DynamicImage::ImageRgba8(canvas), applied)
        };

        debug!(
            "Blurred {}/{} regions on {}x{} {:?} image",
            applied,
            regions.len(),
            info.width,
            info.height,
            color
        );
        encode_png(&canvas)
    }

    /// [`redact`](Self::redact) on the blocking thread pool
    pub async fn redact_blocking(
        &self,
        image_bytes: Vec<u8>,
        regions: Vec<BlurRegion>,
    ) -> Result<Vec<u8>, RedactionError> {
        let redactor = self.clone();
        let redacted = tokio::task::spawn_blocking(move || redactor.redact(&image_bytes, &regions))
            .await
            .map_err(|e| RedactionError::Task(e.to_string()))??;
        Ok(redacted)
    }

    fn blur_regions<P>(
        &self,
        canvas: &mut ImageBuffer<P, Vec<P::Subpixel>>,
        regions: &[BlurRegion],
    ) -> usize
    where
        P: Pixel + 'static,
        P::Subpixel: 'static,
    {
        let (width, height) = canvas.dimensions();
        let mut applied = 0;
        for region in regions {
            let Some((x, y, w, h)) = clamp_region(region, width, height) else {
                debug!(
                    "Skipping {} region ({}, {}, {}x{}) outside {}x{} image",
                    region.region_type,
                    region.x,
                    region.y,
                    region.width,
                    region.height,
                    width,
                    height
                );
                continue;
            };

            let patch = imageops::crop_imm(&*canvas, x, y, w, h).to_image();
            let blurred = imageops::blur(&patch, self.sigma);
            imageops::replace(canvas, &blurred, x as i64, y as i64);
            applied += 1;
        }
        applied
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_SIGMA)
    }
}
