//! Marr-wavelet structural fingerprinting.
//!
//! A grayscale, blurred, downsampled copy of the image is filtered with a
//! Laplacian-of-Gaussian (Marr) kernel, reduced to a 32x32 heat map, and
//! quantized into a 1024-bit fingerprint. Similarity is one minus the
//! normalized Hamming distance. A stored fingerprint can be rewritten in
//! place to represent the horizontally mirrored source image, and a lossy
//! 64-bit compressed hash supports fast approximate pre-filtering.

pub mod bits;
mod codec;
mod compute;
mod mirror;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DecodeStatus, Error, Result};
use self::bits::word_weight;

/// Fingerprint byte length unless a caller chooses otherwise: 1024 bits.
pub const DEFAULT_SIZE_IN_BYTES: usize = 128;

/// Recommended wavelet scale base; sigma = base ^ exponent.
pub const DEFAULT_SCALE_BASE: i32 = 2;

/// Recommended wavelet scale exponent, giving sigma = 2.
pub const DEFAULT_SCALE_EXPONENT: i32 = 1;

/// A 1024-bit structural fingerprint stored as 64 sixteen-bit words.
///
/// Each word holds the quantized bits of one 4x4 heat-map block. The only
/// supported mutation after population is the in-place mirror-flip
/// transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveletFingerprint {
    size_in_bytes: usize,
    contents: Vec<u16>,
}

impl WaveletFingerprint {
    /// Create an empty fingerprint of the default 128-byte length.
    pub fn new() -> Self {
        Self {
            size_in_bytes: DEFAULT_SIZE_IN_BYTES,
            contents: vec![0; DEFAULT_SIZE_IN_BYTES / 2],
        }
    }

    /// Create an empty fingerprint of a non-standard byte length.
    pub fn with_size(size_in_bytes: usize) -> Result<Self> {
        if size_in_bytes == 0 || size_in_bytes % 2 != 0 {
            return Err(Error::InvalidArgument(format!(
                "fingerprint size must be a positive even byte count, got {size_in_bytes}"
            )));
        }
        Ok(Self {
            size_in_bytes,
            contents: vec![0; size_in_bytes / 2],
        })
    }

    /// Compute a fingerprint from an image file.
    ///
    /// Recommended scale: base 2, exponent 1. The image must decode to a
    /// flat 2D image with 1, 3, or 4 channels.
    pub fn from_image_file<P: AsRef<Path>>(
        path: P,
        scale_base: i32,
        scale_exponent: i32,
    ) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("image path must not be empty".into()));
        }
        let contents = compute::compute_image_hash(path, scale_base, scale_exponent)?;
        Ok(Self {
            size_in_bytes: contents.len() * 2,
            contents,
        })
    }

    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    /// The fingerprint words, x-block major over the heat map.
    pub fn contents(&self) -> &[u16] {
        &self.contents
    }

    /// Copy the words into a plain vector.
    pub fn as_words(&self) -> Vec<u16> {
        self.contents.clone()
    }

    /// Fill the fingerprint from a word slice in `as_words` order.
    ///
    /// Copies `min(values.len(), capacity)` words; the rest of either side
    /// is left untouched.
    pub fn set_from_words(&mut self, values: &[u16]) {
        let count = self.contents.len().min(values.len());
        self.contents[..count].copy_from_slice(&values[..count]);
    }

    /// Raw little-endian byte rendering with a trailing NUL.
    ///
    /// Legacy path: embedded NUL bytes and the assumed pair order make this
    /// unreliable for round-tripping. Prefer the text codec.
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size_in_bytes + 1);
        for word in &self.contents {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes.push(0);
        bytes
    }

    /// Rebuild the words from little-endian byte pairs. Legacy path, see
    /// [`WaveletFingerprint::as_bytes`].
    pub fn set_from_bytes(&mut self, bytes: &[u8]) {
        for (word, pair) in self.contents.iter_mut().zip(bytes.chunks_exact(2)) {
            *word = u16::from_le_bytes([pair[0], pair[1]]);
        }
    }

    /// Encode as whitespace-delimited `%5u` text fields.
    pub fn to_text(&self) -> String {
        codec::encode(&self.contents)
    }

    /// Decode from whitespace-delimited text, filling words in order.
    ///
    /// Input shorter than the expected field count is a soft failure: the
    /// prefix read so far is kept and [`DecodeStatus::Underrun`] is returned.
    pub fn set_from_text(&mut self, text: &str) -> DecodeStatus {
        codec::decode(text, &mut self.contents)
    }

    /// Similarity to another fingerprint: 1 minus the normalized Hamming
    /// distance, so 1.0 means identical bit patterns.
    pub fn compare(&self, other: &Self) -> Result<f64> {
        self.check_comparable(other)?;
        Ok(1.0 - hamming_distance(&self.contents, &other.contents))
    }

    /// Similarity allowing for an unknown horizontal orientation.
    ///
    /// Compares both as-is and against the mirror of `other`, and reports
    /// whichever matches better. A negative value flags that the mirrored
    /// orientation won; its magnitude is the usual similarity score.
    pub fn compare_with_mirror(&self, other: &Self) -> Result<f64> {
        self.check_comparable(other)?;
        let distance = hamming_distance(&self.contents, &other.contents);
        let mut mirrored = other.clone();
        mirrored.transform_to_mirror();
        let distance_mirror = hamming_distance(&self.contents, &mirrored.contents);
        if distance < distance_mirror {
            Ok(1.0 - distance)
        } else {
            Ok(-(1.0 - distance_mirror))
        }
    }

    /// Rewrite this fingerprint in place to represent the horizontally
    /// mirrored source image. Applying the transform twice restores the
    /// original bit pattern exactly.
    pub fn transform_to_mirror(&mut self) {
        mirror::mirror_in_place(&mut self.contents);
    }

    /// Lossy 64-bit summary: one bit per word, set when the word exceeds
    /// the integer mean of all words. Word 0 maps to the most significant
    /// bit.
    pub fn compressed_hash(&self) -> u64 {
        let count = self.contents.len();
        let sum: u64 = self.contents.iter().map(|&w| u64::from(w)).sum();
        let average = (sum / count as u64) as u16;
        let mut hash = 0u64;
        for (index, &word) in self.contents.iter().enumerate() {
            if word > average {
                let shift = count - 1 - index;
                if shift < 64 {
                    hash |= 1u64 << shift;
                }
            }
        }
        hash
    }

    /// Distance between this fingerprint's compressed hash and another.
    pub fn compare_compressed_hash(&self, other_hash: u64) -> u8 {
        compressed_hash_distance(self.compressed_hash(), other_hash)
    }

    fn check_comparable(&self, other: &Self) -> Result<()> {
        if self.contents.len() != other.contents.len() {
            return Err(Error::InvalidArgument(format!(
                "cannot compare fingerprints of {} and {} bytes",
                self.size_in_bytes, other.size_in_bytes
            )));
        }
        Ok(())
    }
}

impl Default for WaveletFingerprint {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized Hamming distance over paired 16-bit words, in [0, 1].
pub fn hamming_distance(hash_a: &[u16], hash_b: &[u16]) -> f64 {
    if hash_a.is_empty() || hash_b.is_empty() {
        return -1.0;
    }
    let mut distance = 0u32;
    for (&a, &b) in hash_a.iter().zip(hash_b) {
        distance += word_weight(a ^ b);
    }
    let bits = (16 * hash_a.len().min(hash_b.len())) as f64;
    f64::from(distance) / bits
}

/// Population count of the XOR of two compressed hashes, in [0, 64].
pub fn compressed_hash_distance(hash_a: u64, hash_b: u64) -> u8 {
    (hash_a ^ hash_b).count_ones() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fingerprint_is_sixty_four_words() {
        let fp = WaveletFingerprint::new();
        assert_eq!(fp.size_in_bytes(), 128);
        assert_eq!(fp.contents().len(), 64);
    }

    #[test]
    fn with_size_rejects_odd_and_zero() {
        assert!(matches!(
            WaveletFingerprint::with_size(129),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            WaveletFingerprint::with_size(0),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(WaveletFingerprint::with_size(4).unwrap().contents().len(), 2);
    }

    #[test]
    fn hamming_distance_of_identical_is_zero() {
        let words = vec![969u16, 22401, 56583, 25799];
        assert_eq!(hamming_distance(&words, &words), 0.0);
    }

    #[test]
    fn hamming_distance_of_complements_is_one() {
        let a = vec![0u16; 8];
        let b = vec![0xFFFFu16; 8];
        assert_eq!(hamming_distance(&a, &b), 1.0);
    }

    #[test]
    fn compare_rejects_mismatched_sizes() {
        let a = WaveletFingerprint::new();
        let b = WaveletFingerprint::with_size(4).unwrap();
        assert!(a.compare(&b).is_err());
        assert!(a.compare_with_mirror(&b).is_err());
    }

    #[test]
    fn compressed_hash_flags_words_above_mean() {
        let mut fp = WaveletFingerprint::new();
        let mut words = vec![0u16; 64];
        words[0] = 100;
        fp.set_from_words(&words);
        // Mean is 1, so only word 0 is above it: the top bit.
        assert_eq!(fp.compressed_hash(), 1u64 << 63);
    }

    #[test]
    fn compressed_hash_of_uniform_contents_is_zero() {
        let mut fp = WaveletFingerprint::new();
        fp.set_from_words(&[5u16; 64]);
        assert_eq!(fp.compressed_hash(), 0);
    }

    #[test]
    fn compressed_hash_distance_counts_differing_bits() {
        assert_eq!(compressed_hash_distance(0, 0), 0);
        assert_eq!(compressed_hash_distance(u64::MAX, 0), 64);
        assert_eq!(compressed_hash_distance(0b1010, 0b0110), 2);
    }

    #[test]
    fn bytes_round_trip_little_endian_pairs() {
        let mut fp = WaveletFingerprint::with_size(6).unwrap();
        fp.set_from_words(&[0x0102, 0xA0B0, 7]);
        let bytes = fp.as_bytes();
        assert_eq!(bytes, vec![0x02, 0x01, 0xB0, 0xA0, 7, 0, 0]);

        let mut decoded = WaveletFingerprint::with_size(6).unwrap();
        decoded.set_from_bytes(&bytes[..6]);
        assert_eq!(decoded.as_words(), fp.as_words());
    }
}
