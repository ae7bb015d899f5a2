use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::histogram::DEFAULT_BINS_PER_BAND;
use crate::wavelet::{DEFAULT_SCALE_BASE, DEFAULT_SCALE_EXPONENT, DEFAULT_SIZE_IN_BYTES};

/// Tunable parameters for fingerprint computation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Histogram bins along each color axis (minimum 2)
    pub bins_per_band: u32,

    /// Base of the wavelet scale, sigma = base ^ exponent
    pub wavelet_scale_base: i32,

    /// Exponent of the wavelet scale (non-negative)
    pub wavelet_scale_exponent: i32,

    /// Wavelet fingerprint length in bytes (even)
    pub wavelet_size_in_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bins_per_band: DEFAULT_BINS_PER_BAND,
            wavelet_scale_base: DEFAULT_SCALE_BASE,
            wavelet_scale_exponent: DEFAULT_SCALE_EXPONENT,
            wavelet_size_in_bytes: DEFAULT_SIZE_IN_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config =
            serde_json::from_str(&text).map_err(|e| Error::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the parameter ranges the engines will enforce
    pub fn validate(&self) -> Result<()> {
        if self.bins_per_band < 2 {
            return Err(Error::Configuration(format!(
                "bins_per_band must be at least 2, got {}",
                self.bins_per_band
            )));
        }
        if self.wavelet_scale_base < 1 {
            return Err(Error::Configuration(format!(
                "wavelet_scale_base must be positive, got {}",
                self.wavelet_scale_base
            )));
        }
        if self.wavelet_scale_exponent < 0 {
            return Err(Error::Configuration(format!(
                "wavelet_scale_exponent must be non-negative, got {}",
                self.wavelet_scale_exponent
            )));
        }
        if self.wavelet_size_in_bytes == 0 || self.wavelet_size_in_bytes % 2 != 0 {
            return Err(Error::Configuration(format!(
                "wavelet_size_in_bytes must be a positive even byte count, got {}",
                self.wavelet_size_in_bytes
            )));
        }
        Ok(())
    }
}
