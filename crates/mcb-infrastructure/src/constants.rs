//! Infrastructure-layer constants.
//!
//! Config-file and logging constants specific to this layer. Domain
//! constants (indexing/BM25/hybrid-fusion tuning) are the single source of
//! truth in `mcb-domain` and re-exported below rather than duplicated.

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Default configuration filename searched for when no path is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "mcb.toml";

/// Default configuration directory name, relative to the current directory.
pub const DEFAULT_CONFIG_DIR: &str = "mcb";

/// Environment variable prefix for configuration overrides (e.g. `MCB_LOGGING_LEVEL`).
pub const CONFIG_ENV_PREFIX: &str = "MCB";

// ============================================================================
// LOGGING
// ============================================================================

/// Default log level when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log file rotation size threshold, in bytes.
pub const LOG_ROTATION_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum number of rotated log files retained.
pub const LOG_MAX_FILES: usize = 5;

pub use mcb_domain::constants::*;
