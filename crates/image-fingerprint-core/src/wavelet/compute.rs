//! Marr-wavelet fingerprint computation pipeline.
//!
//! The image is reduced to one or two grayscale planes, resized to a
//! standard square dimension, blurred, and correlated with a
//! Laplacian-of-Gaussian kernel. The filtered response is summed into a
//! 32x32 heat map whose 4x4 blocks quantize to one 16-bit word each.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use log::debug;
use ndarray::Array2;
use std::path::Path;

use super::bits::fast_pow;
use crate::error::{Error, Result};

/// Heat-map edge length; the fingerprint packs one bit per heat-map cell.
const HEAT_MAP_DIM: usize = 32;

/// Standard square dimensions an image is reduced to before filtering,
/// largest first. Sources smaller than 64x64 fall back to 32.
const STANDARD_DIMS: [u32; 4] = [512, 256, 128, 64];

pub(crate) fn compute_image_hash(
    path: &Path,
    scale_base: i32,
    scale_exponent: i32,
) -> Result<Vec<u16>> {
    // Input sanity checks.
    if scale_base < 1 {
        return Err(Error::InvalidArgument(format!(
            "wavelet scale base must be positive, got {scale_base}"
        )));
    }
    if scale_exponent < 0 {
        return Err(Error::InvalidArgument(format!(
            "wavelet scale exponent must be non-negative, got {scale_exponent}"
        )));
    }
    let sigma = fast_pow(scale_base, scale_exponent).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "wavelet scale {scale_base}^{scale_exponent} overflows"
        ))
    })?;

    let img = image::open(path)?;
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(Error::UnsupportedImageShape { width, height });
    }

    let planes = grayscale_planes(&img)?;
    let resize_dim = standard_dim(width, height);
    debug!(
        "wavelet hash: {}x{} image resized to {}, sigma {}",
        width, height, resize_dim, sigma
    );

    let kernel = marr_kernel(sigma);
    let mut heat = Array2::<f64>::zeros((HEAT_MAP_DIM, HEAT_MAP_DIM));
    for plane in &planes {
        let plane = imageops::resize(plane, resize_dim, resize_dim, FilterType::CatmullRom);
        let plane = blur_three(&plane);
        let filtered = correlate(&plane, &kernel);
        accumulate_heat(&filtered, &mut heat);
    }

    Ok(quantize(&heat))
}

/// Split the source into the grayscale plane(s) the filter runs over.
///
/// 3-channel images reduce to perceptual luminance; 1-channel images pass
/// through; 4-channel images carry luminance and alpha as separate planes so
/// transparency contributes to the fingerprint.
fn grayscale_planes(img: &DynamicImage) -> Result<Vec<GrayImage>> {
    match img.color().channel_count() {
        1 | 3 => Ok(vec![img.to_luma8()]),
        4 => {
            let merged = img.to_luma_alpha8();
            let (width, height) = merged.dimensions();
            let mut luminance = GrayImage::new(width, height);
            let mut alpha = GrayImage::new(width, height);
            for (x, y, pixel) in merged.enumerate_pixels() {
                luminance.put_pixel(x, y, Luma([pixel[0]]));
                alpha.put_pixel(x, y, Luma([pixel[1]]));
            }
            Ok(vec![luminance, alpha])
        }
        channels => Err(Error::UnsupportedChannelLayout { channels }),
    }
}

/// Largest standard dimension not exceeding both source sides.
fn standard_dim(width: u32, height: u32) -> u32 {
    for &dim in &STANDARD_DIMS {
        if width >= dim && height >= dim {
            return dim;
        }
    }
    32
}

/// Three successive radius-1.0 blur passes to suppress noise before
/// filtering.
fn blur_three(plane: &GrayImage) -> GrayImage {
    let mut blurred = imageops::blur(plane, 1.0);
    for _ in 0..2 {
        blurred = imageops::blur(&blurred, 1.0);
    }
    blurred
}

/// Marr (Laplacian-of-Gaussian) correlation kernel for scale `sigma`:
/// (2 - r^2) * exp(-r^2 / 2) at offsets normalized by sigma, over a
/// (8*sigma+1) square support.
fn marr_kernel(sigma: i32) -> Array2<f64> {
    let size = (8 * i64::from(sigma) + 1) as usize;
    let center = 4.0 * f64::from(sigma);
    let inv_sigma = 1.0 / f64::from(sigma);
    Array2::from_shape_fn((size, size), |(ky, kx)| {
        let u = inv_sigma * (kx as f64 - center);
        let v = inv_sigma * (ky as f64 - center);
        let r2 = u * u + v * v;
        (2.0 - r2) * (-0.5 * r2).exp()
    })
}

/// Correlate the kernel against the plane, replicating edge pixels.
///
/// Correlation, not convolution: the kernel is applied unflipped.
fn correlate(plane: &GrayImage, kernel: &Array2<f64>) -> Array2<f64> {
    let (width, height) = plane.dimensions();
    let (kernel_h, kernel_w) = (kernel.nrows() as i64, kernel.ncols() as i64);
    let (center_y, center_x) = (kernel_h / 2, kernel_w / 2);
    let mut out = Array2::<f64>::zeros((height as usize, width as usize));
    for y in 0..i64::from(height) {
        for x in 0..i64::from(width) {
            let mut acc = 0.0;
            for ky in 0..kernel_h {
                let sy = (y + ky - center_y).clamp(0, i64::from(height) - 1) as u32;
                for kx in 0..kernel_w {
                    let sx = (x + kx - center_x).clamp(0, i64::from(width) - 1) as u32;
                    acc += kernel[[ky as usize, kx as usize]]
                        * f64::from(plane.get_pixel(sx, sy)[0]);
                }
            }
            out[[y as usize, x as usize]] = acc;
        }
    }
    out
}

/// Sum equal square crops of the filtered response into the heat map.
///
/// The heat map is indexed (x block, y block); every standard dimension is a
/// multiple of 32, so the crops tile the response exactly.
fn accumulate_heat(filtered: &Array2<f64>, heat: &mut Array2<f64>) {
    let crop = filtered.nrows() / HEAT_MAP_DIM;
    for hx in 0..HEAT_MAP_DIM {
        for hy in 0..HEAT_MAP_DIM {
            let mut sum = 0.0;
            for y in hy * crop..(hy + 1) * crop {
                for x in hx * crop..(hx + 1) * crop {
                    sum += filtered[[y, x]];
                }
            }
            heat[[hx, hy]] += sum;
        }
    }
}

/// Pack the heat map into one 16-bit word per 4x4 block.
///
/// Words are ordered x-block major. Within a block, cells scan each cell row
/// left to right, most significant bit first; a bit is set when its cell
/// strictly exceeds the block mean.
fn quantize(heat: &Array2<f64>) -> Vec<u16> {
    let blocks_per_axis = HEAT_MAP_DIM / 4;
    let mut words = Vec::with_capacity(blocks_per_axis * blocks_per_axis);
    for block_x in 0..blocks_per_axis {
        for block_y in 0..blocks_per_axis {
            let mut cells = [0.0f64; 16];
            for dy in 0..4 {
                for dx in 0..4 {
                    cells[dy * 4 + dx] = heat[[block_x * 4 + dx, block_y * 4 + dy]];
                }
            }
            let mean = cells.iter().sum::<f64>() / 16.0;
            let mut word = 0u16;
            for &cell in &cells {
                word <<= 1;
                if cell > mean {
                    word |= 0x01;
                }
            }
            words.push(word);
        }
    }
    words
}
