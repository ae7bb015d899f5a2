//! Core functionality for computing and comparing perceptual image
//! fingerprints.
//!
//! This library provides two independent fingerprinting engines:
//! - A multi-band color-histogram hash, compared with a chi-square distance
//! - A Marr-wavelet structural hash, compared with a normalized Hamming
//!   distance, with a mirror-flip transform and a compressed 64-bit summary
//!
//! Fingerprints convert to and from plain numeric arrays and a
//! whitespace-delimited text encoding, so they can be stored and compared
//! without keeping the source images around.

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::Config;
pub use error::{DecodeStatus, Error, Result};
pub use histogram::HistogramFingerprint;
pub use wavelet::WaveletFingerprint;

// -- Public Modules --
pub mod config;
pub mod histogram;
pub mod logging;
pub mod wavelet;
