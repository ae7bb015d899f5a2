//! Histogram computation pipeline.

use image::DynamicImage;
use log::debug;
use ndarray::Array3;
use std::path::Path;

use crate::error::{Error, Result};

/// Added to the normalization divisor so a degenerate image cannot divide
/// by zero.
const NORMALIZE_EPSILON: f32 = 1e-10;

/// Load an image and reduce it to normalized 3-D histogram bins, flattened
/// row-major over the (band0, band1, band2) bin indices.
pub(crate) fn compute_image_hash(path: &Path, bins_per_band: u32) -> Result<Vec<f32>> {
    let img = image::open(path)?;
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(Error::UnsupportedImageShape { width, height });
    }
    let channels = img.color().channel_count();
    if channels != 3 {
        return Err(Error::UnsupportedChannelLayout { channels });
    }

    let pixels = rgb_values(&img)?;
    let max_value = infer_value_range(&pixels);
    debug!(
        "histogram hash: {}x{} image, {} bins per band, value range 0..{}",
        width, height, bins_per_band, max_value
    );

    let bins = bins_per_band as usize;
    let mut hist = Array3::<f32>::zeros((bins, bins, bins));
    if max_value > 0.0 {
        let inv_range = 1.0 / max_value;
        for rgb in &pixels {
            let b0 = bin_index(rgb[0], max_value, inv_range, bins);
            let b1 = bin_index(rgb[1], max_value, inv_range, bins);
            let b2 = bin_index(rgb[2], max_value, inv_range, bins);
            hist[[b0, b1, b2]] += 1.0;
        }
    } else {
        // Degenerate value range: every sample lands in the first bin.
        hist[[0, 0, 0]] = (pixels.len() * 3) as f32;
    }

    let sum: f32 = hist.iter().sum();
    let inv_sum = 1.0 / (sum + NORMALIZE_EPSILON);
    Ok(hist.iter().map(|&count| count * inv_sum).collect())
}

/// Extract each pixel's raw channel values without rescaling, so the value
/// range inference sees the decoder's native sample width.
fn rgb_values(img: &DynamicImage) -> Result<Vec<[f32; 3]>> {
    let values = match img {
        DynamicImage::ImageRgb8(buf) => buf
            .pixels()
            .map(|p| [f32::from(p[0]), f32::from(p[1]), f32::from(p[2])])
            .collect(),
        DynamicImage::ImageRgb16(buf) => buf
            .pixels()
            .map(|p| [f32::from(p[0]), f32::from(p[1]), f32::from(p[2])])
            .collect(),
        DynamicImage::ImageRgb32F(buf) => buf.pixels().map(|p| [p[0], p[1], p[2]]).collect(),
        other => {
            return Err(Error::UnsupportedChannelLayout {
                channels: other.color().channel_count(),
            })
        }
    };
    Ok(values)
}

/// Infer the effective maximum sample value from the brightest observed one.
///
/// Decoded pixels carry no bit-depth metadata, so the historical threshold
/// ladder stands in for it, including its 1677215.1 rung.
fn infer_value_range(pixels: &[[f32; 3]]) -> f32 {
    let mut observed = 0.0f32;
    for rgb in pixels {
        for &value in rgb {
            if value > observed {
                observed = value;
            }
        }
    }
    if observed > 255.1 {
        if observed > 65535.1 {
            if observed > 1677215.1 {
                4294967295.0
            } else {
                16777215.0
            }
        } else {
            65535.0
        }
    } else {
        255.0
    }
}

/// Equal-width bin index over [0, max_value], top value clamped into the
/// last bin.
fn bin_index(value: f32, max_value: f32, inv_range: f32, bins: usize) -> usize {
    if value >= max_value {
        bins - 1
    } else {
        ((value * bins as f32 * inv_range) as usize).min(bins - 1)
    }
}
