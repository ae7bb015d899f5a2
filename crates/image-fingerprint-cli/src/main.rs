use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use image_fingerprint_core::{logging, Config, HistogramFingerprint, WaveletFingerprint};

#[derive(Parser)]
#[command(name = "image-fingerprint")]
#[command(about = "Compute and compare perceptual image fingerprints")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// How the two comparison operands are supplied: image files or fingerprint
/// text blocks
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompareMode {
    /// image vs image
    Ivi,
    /// image vs fingerprint
    Ivf,
    /// fingerprint vs image
    Fvi,
    /// fingerprint vs fingerprint
    Fvf,
}

impl CompareMode {
    fn first_is_image(self) -> bool {
        matches!(self, Self::Ivi | Self::Ivf)
    }

    fn second_is_image(self) -> bool {
        matches!(self, Self::Ivi | Self::Fvi)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the color-histogram fingerprint of an image
    HistGen {
        image: PathBuf,

        /// Histogram bins along each color axis
        #[arg(long)]
        bins: Option<u32>,
    },

    /// Compare two images or histogram fingerprints (chi-square distance)
    HistCmp {
        #[arg(long, value_enum, default_value = "ivi")]
        mode: CompareMode,

        first: String,
        second: String,

        /// Histogram bins along each color axis
        #[arg(long)]
        bins: Option<u32>,
    },

    /// Print the Marr-wavelet fingerprint of an image
    WaveletGen { image: PathBuf },

    /// Compare two images or wavelet fingerprints (mirror-aware similarity)
    WaveletCmp {
        #[arg(long, value_enum, default_value = "ivi")]
        mode: CompareMode,

        first: String,
        second: String,
    },
}

fn main() -> Result<(), anyhow::Error> {
    // Initialize logger
    logging::init_logger();

    // Parse command line arguments
    let cli = Cli::parse();

    // Set up configuration
    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::HistGen { image, bins } => {
            let bins = bins.unwrap_or(config.bins_per_band);
            let fingerprint = HistogramFingerprint::from_image_file(&image, bins)
                .with_context(|| format!("computing histogram fingerprint for {}", image.display()))?;
            println!("{}", fingerprint.to_text());
        }

        Commands::HistCmp {
            mode,
            first,
            second,
            bins,
        } => {
            let bins = bins.unwrap_or(config.bins_per_band);
            let fingerprint_1 = histogram_operand(&first, mode.first_is_image(), bins)?;
            let fingerprint_2 = histogram_operand(&second, mode.second_is_image(), bins)?;
            println!("{:.5}", fingerprint_1.compare(&fingerprint_2)?);
        }

        Commands::WaveletGen { image } => {
            let fingerprint = WaveletFingerprint::from_image_file(
                &image,
                config.wavelet_scale_base,
                config.wavelet_scale_exponent,
            )
            .with_context(|| format!("computing wavelet fingerprint for {}", image.display()))?;
            println!("{}", fingerprint.to_text());
        }

        Commands::WaveletCmp {
            mode,
            first,
            second,
        } => {
            let fingerprint_1 = wavelet_operand(&first, mode.first_is_image(), &config)?;
            let fingerprint_2 = wavelet_operand(&second, mode.second_is_image(), &config)?;
            println!("{:.5}", fingerprint_1.compare_with_mirror(&fingerprint_2)?);
        }
    }

    Ok(())
}

/// Resolve one histogram comparison operand: an image path to fingerprint,
/// or a pre-serialized fingerprint text block.
fn histogram_operand(
    input: &str,
    is_image: bool,
    bins: u32,
) -> Result<HistogramFingerprint, anyhow::Error> {
    if is_image {
        return match HistogramFingerprint::from_image_file(input, bins) {
            Ok(fingerprint) => Ok(fingerprint),
            Err(error) => {
                logging::log_hash_error(Path::new(input), &error);
                Err(error).with_context(|| format!("computing histogram fingerprint for {input}"))
            }
        };
    }
    let mut fingerprint = HistogramFingerprint::with_bins(bins)?;
    if !fingerprint.set_from_text(input).is_complete() {
        bail!("histogram fingerprint text shorter than expected");
    }
    Ok(fingerprint)
}

/// Resolve one wavelet comparison operand, as above.
fn wavelet_operand(
    input: &str,
    is_image: bool,
    config: &Config,
) -> Result<WaveletFingerprint, anyhow::Error> {
    if is_image {
        return match WaveletFingerprint::from_image_file(
            input,
            config.wavelet_scale_base,
            config.wavelet_scale_exponent,
        ) {
            Ok(fingerprint) => Ok(fingerprint),
            Err(error) => {
                logging::log_hash_error(Path::new(input), &error);
                Err(error).with_context(|| format!("computing wavelet fingerprint for {input}"))
            }
        };
    }
    let mut fingerprint = WaveletFingerprint::with_size(config.wavelet_size_in_bytes)?;
    if !fingerprint.set_from_text(input).is_complete() {
        bail!("wavelet fingerprint text shorter than expected");
    }
    Ok(fingerprint)
}
