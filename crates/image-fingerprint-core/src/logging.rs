use log::error;
use std::path::Path;

/// Initialize the logger from the `FINGERPRINT_LOG` environment variable,
/// defaulting to `info`. Repeated calls after the first are no-ops.
pub fn init_logger() {
    let filter = std::env::var("FINGERPRINT_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = env_logger::Builder::new().parse_filters(&filter).try_init();
}

/// Log hash computation error
pub fn log_hash_error(path: &Path, error: &dyn std::error::Error) {
    error!(
        "Hash computation failed - Path: {}, Error: {}",
        path.display(),
        error
    );
}
