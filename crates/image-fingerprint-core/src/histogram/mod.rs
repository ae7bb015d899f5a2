//! Multi-band color-histogram fingerprinting.
//!
//! Builds a normalized 3-D color histogram from an image, one axis per color
//! band, and exposes it as a flat array of 32-bit floats. Two histograms are
//! compared with a chi-square distance: 0 means identical distributions, and
//! larger values mean less similar images. The metric is symmetric and
//! unbounded; callers interpret the raw statistic.

mod codec;
mod compute;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DecodeStatus, Error, Result};

/// Number of bins along each color axis unless a caller chooses otherwise.
pub const DEFAULT_BINS_PER_BAND: u32 = 4;

/// Keeps a bin pair with two zero counts from dividing by zero.
const CHI_SQUARE_EPSILON: f32 = 1e-10;

/// A normalized 3-D color-histogram fingerprint.
///
/// `contents` always holds exactly `bins_per_band^3` values, row-major over
/// the (band0, band1, band2) bin indices. Values are normalized counts in
/// [0, 1] and sum to roughly 1 for any non-degenerate source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramFingerprint {
    bins_per_band: u32,
    contents: Vec<f32>,
}

impl HistogramFingerprint {
    /// Create an empty fingerprint with the default bin count.
    pub fn new() -> Self {
        let bins = DEFAULT_BINS_PER_BAND as usize;
        Self {
            bins_per_band: DEFAULT_BINS_PER_BAND,
            contents: vec![0.0; bins * bins * bins],
        }
    }

    /// Create an empty fingerprint with `bins_per_band` bins per color axis.
    pub fn with_bins(bins_per_band: u32) -> Result<Self> {
        if bins_per_band < 2 {
            return Err(Error::InvalidArgument(format!(
                "must request 2 or more bins per band, got {bins_per_band}"
            )));
        }
        let bins = bins_per_band as usize;
        Ok(Self {
            bins_per_band,
            contents: vec![0.0; bins * bins * bins],
        })
    }

    /// Compute a fingerprint from an image file.
    ///
    /// The image must decode to a flat 2D image with exactly 3 color
    /// channels. The effective value range is inferred from the brightest
    /// sample, so 8- and 16-bit sources bin consistently.
    pub fn from_image_file<P: AsRef<Path>>(path: P, bins_per_band: u32) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("image path must not be empty".into()));
        }
        let mut fingerprint = Self::with_bins(bins_per_band)?;
        fingerprint.contents = compute::compute_image_hash(path, bins_per_band)?;
        Ok(fingerprint)
    }

    pub fn bins_per_band(&self) -> u32 {
        self.bins_per_band
    }

    /// The normalized bin values, row-major over (band0, band1, band2).
    pub fn contents(&self) -> &[f32] {
        &self.contents
    }

    /// Copy the bin values into a plain float vector.
    pub fn as_floats(&self) -> Vec<f32> {
        self.contents.clone()
    }

    /// Fill the fingerprint from a float slice in `as_floats` order.
    ///
    /// Copies `min(values.len(), capacity)` values; the rest of either side
    /// is left untouched.
    pub fn set_from_floats(&mut self, values: &[f32]) {
        let count = self.contents.len().min(values.len());
        self.contents[..count].copy_from_slice(&values[..count]);
    }

    /// Encode as whitespace-delimited `%9.7f` text fields.
    pub fn to_text(&self) -> String {
        codec::encode(&self.contents)
    }

    /// Decode from whitespace-delimited text, filling bins in order.
    ///
    /// Input shorter than the expected field count is a soft failure: the
    /// prefix read so far is kept and [`DecodeStatus::Underrun`] is returned.
    pub fn set_from_text(&mut self, text: &str) -> DecodeStatus {
        codec::decode(text, &mut self.contents)
    }

    /// Chi-square distance to another histogram fingerprint.
    pub fn compare(&self, other: &Self) -> Result<f64> {
        if self.bins_per_band != other.bins_per_band {
            return Err(Error::InvalidArgument(format!(
                "cannot compare histograms with {} and {} bins per band",
                self.bins_per_band, other.bins_per_band
            )));
        }
        Ok(chi_square_distance(&self.contents, &other.contents))
    }
}

impl Default for HistogramFingerprint {
    fn default() -> Self {
        Self::new()
    }
}

/// Chi-square distance over paired bins: sum of (a-b)^2 / (a+b+eps).
pub fn chi_square_distance(hash_a: &[f32], hash_b: &[f32]) -> f64 {
    let mut sum = 0.0f32;
    for (&a, &b) in hash_a.iter().zip(hash_b) {
        sum += (a - b) * (a - b) / (a + b + CHI_SQUARE_EPSILON);
    }
    f64::from(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fingerprint_has_cubed_length() {
        let fp = HistogramFingerprint::new();
        assert_eq!(fp.bins_per_band(), 4);
        assert_eq!(fp.contents().len(), 64);
    }

    #[test]
    fn with_bins_rejects_fewer_than_two() {
        assert!(matches!(
            HistogramFingerprint::with_bins(1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            HistogramFingerprint::with_bins(0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn compare_rejects_mismatched_bin_counts() {
        let a = HistogramFingerprint::with_bins(2).unwrap();
        let b = HistogramFingerprint::with_bins(3).unwrap();
        assert!(a.compare(&b).is_err());
    }

    #[test]
    fn chi_square_is_zero_for_identical_inputs() {
        let values = [0.25f32, 0.5, 0.125, 0.125];
        assert_eq!(chi_square_distance(&values, &values), 0.0);
    }

    #[test]
    fn set_from_floats_truncates_both_ways() {
        let mut fp = HistogramFingerprint::with_bins(2).unwrap();
        fp.set_from_floats(&[1.0, 2.0, 3.0]);
        assert_eq!(&fp.contents()[..3], &[1.0, 2.0, 3.0]);
        assert_eq!(fp.contents()[3], 0.0);

        let long: Vec<f32> = (0..10).map(|i| i as f32).collect();
        fp.set_from_floats(&long);
        assert_eq!(fp.contents().len(), 8);
        assert_eq!(fp.contents()[7], 7.0);
    }
}
