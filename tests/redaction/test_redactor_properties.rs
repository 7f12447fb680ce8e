// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Pixel-level properties of region blur

use super::support::*;
use scribe_redactor::redaction::{clamp_region, BlurRegion, Redactor};

fn inside_any(x: u32, y: u32, regions: &[(u32, u32, u32, u32)]) -> bool {
    regions
        .iter()
        .any(|&(rx, ry, rw, rh)| x >= rx && x < rx + rw && y >= ry && y < ry + rh)
}

#[test]
fn test_pixels_outside_regions_unchanged() {
    let (width, height) = (120, 80);
    let input = screenshot_png(width, height);
    let regions = vec![
        BlurRegion::new(10, 10, 30, 15, "EMAIL_ADDRESS"),
        BlurRegion::new(100, 60, 50, 50, "PHONE_NUMBER"),
        BlurRegion::new(-5, 70, 20, 20, "PERSON"),
    ];
    let clamped: Vec<_> = regions
        .iter()
        .filter_map(|r| clamp_region(r, width, height))
        .collect();
    assert_eq!(clamped.len(), 3);

    let output = Redactor::new(5.0).redact(&input, &regions).unwrap();
    let before = decode(&input);
    let after = decode(&output);

    assert_eq!(after.dimensions(), (width, height));
    for (x, y, pixel) in after.enumerate_pixels() {
        if !inside_any(x, y, &clamped) {
            assert_eq!(pixel, before.get_pixel(x, y), "pixel ({}, {}) changed", x, y);
        }
    }
}

#[test]
fn test_disjoint_region_order_is_irrelevant() {
    let input = screenshot_png(100, 100);
    let a = BlurRegion::new(5, 5, 20, 20, "PERSON");
    let b = BlurRegion::new(60, 60, 25, 25, "LOCATION");
    let redactor = Redactor::new(3.0);

    let ab = redactor.redact(&input, &[a.clone(), b.clone()]).unwrap();
    let ba = redactor.redact(&input, &[b, a]).unwrap();
    assert_eq!(ab, ba);
}

#[test]
fn test_empty_region_list_is_byte_identical_across_calls() {
    let input = screenshot_png(64, 64);
    let redactor = Redactor::default();

    let outputs: Vec<Vec<u8>> = (0..3).map(|_| redactor.redact(&input, &[]).unwrap()).collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(decode(&outputs[0]), decode(&input));
}

#[test]
fn test_region_outside_image_is_skipped() {
    let input = screenshot_png(64, 32);
    let regions = vec![
        BlurRegion::new(64, 0, 10, 10, "SSN"),
        BlurRegion::new(0, 32, 10, 10, "SSN"),
        BlurRegion::new(-30, 0, 20, 10, "SSN"),
    ];

    let output = Redactor::default().redact(&input, &regions).unwrap();
    assert_eq!(decode(&output), decode(&input));
}

#[test]
fn test_overlapping_regions_compound() {
    let input = screenshot_png(80, 80);
    let region = BlurRegion::new(20, 20, 30, 30, "CREDIT_CARD");
    let overlapping = BlurRegion::new(30, 30, 30, 30, "CREDIT_CARD");
    let redactor = Redactor::new(3.0);

    let single = decode(&redactor.redact(&input, &[region.clone()]).unwrap());
    let double = decode(&redactor.redact(&input, &[region, overlapping]).unwrap());

    // The shared area differs from a single pass
    let differs = (30..50).any(|x| (30..50).any(|y| single.get_pixel(x, y) != double.get_pixel(x, y)));
    assert!(differs);

    // Area covered only by the first region matches the single pass
    for x in 20..30 {
        for y in 20..30 {
            assert_eq!(single.get_pixel(x, y), double.get_pixel(x, y));
        }
    }
}

#[test]
fn test_jpeg_input_is_reencoded_as_png() {
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    let img = RgbImage::from_fn(32, 24, |x, y| Rgb([(x * 8) as u8, (y * 10) as u8, 90]));
    let mut jpeg = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut jpeg, ImageFormat::Jpeg)
        .unwrap();

    let output = Redactor::default()
        .redact(&jpeg.into_inner(), &[BlurRegion::new(0, 0, 8, 8, "PERSON")])
        .unwrap();
    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);
    assert_eq!(decode(&output).dimensions(), (32, 24));
}
