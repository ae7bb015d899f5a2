#![allow(dead_code)]

use image::{GrayImage, ImageBuffer, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Write a solid-color RGB PNG and return its path.
pub fn solid_rgb_png(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    let img = RgbImage::from_pixel(width, height, Rgb(rgb));
    let path = dir.join(format!("{name}.png"));
    img.save(&path).unwrap();
    path
}

/// Write an RGB PNG with smooth per-channel gradients.
pub fn gradient_rgb_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    });
    let path = dir.join(format!("{name}.png"));
    img.save(&path).unwrap();
    path
}

/// Write a grayscale PNG with a horizontal ramp and an off-center bright
/// rectangle, so the scene is clearly not mirror-symmetric.
pub fn scene_gray_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = GrayImage::from_fn(width, height, |x, y| {
        let mut value = (x * 200 / width.max(1)) as u8;
        if x >= width / 8 && x < width / 3 && y >= height / 4 && y < height / 2 {
            value = 255;
        }
        Luma([value])
    });
    let path = dir.join(format!("{name}.png"));
    img.save(&path).unwrap();
    path
}

/// Write a solid grayscale PNG.
pub fn solid_gray_png(dir: &Path, name: &str, width: u32, height: u32, value: u8) -> PathBuf {
    let img = GrayImage::from_pixel(width, height, Luma([value]));
    let path = dir.join(format!("{name}.png"));
    img.save(&path).unwrap();
    path
}

/// Write a grayscale-plus-alpha PNG (2 channels).
pub fn luma_alpha_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img: ImageBuffer<LumaA<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(width, height, LumaA([90, 200]));
    let path = dir.join(format!("{name}.png"));
    img.save(&path).unwrap();
    path
}

/// Write an RGBA PNG with varying color and alpha.
pub fn gradient_rgba_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
            (255 - (x * 200 / width.max(1))) as u8,
        ])
    });
    let path = dir.join(format!("{name}.png"));
    img.save(&path).unwrap();
    path
}

/// Write the horizontally flipped copy of an existing image.
pub fn flipped_png(dir: &Path, name: &str, source: &Path) -> PathBuf {
    let img = image::open(source).unwrap().fliph();
    let path = dir.join(format!("{name}.png"));
    img.save(&path).unwrap();
    path
}
