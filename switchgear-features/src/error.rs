// Error types for flag resolution

use thiserror::Error;

/// Errors raised while building the flag registry.
///
/// Evaluation itself never fails: unknown flags, unknown users and empty
/// inputs all resolve to disabled. Errors only surface from explicit or
/// implicit initialization, and any failure aborts the whole batch so the
/// registry is replaced all-or-nothing.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// The configuration subsystem could not supply a flag list
    #[error("Configuration error: {0}")]
    Configuration(#[from] switchgear_config::ConfigError),

    /// A declared user-list path could not be read
    #[error("Failed to read user list {path}: {source}")]
    UserList {
        path: String,
        source: std::io::Error,
    },

    /// A rollout fraction did not parse as a decimal in [0, 1]
    #[error("Invalid rollout fraction {value:?} for flag {flag:?}")]
    InvalidFraction { flag: String, value: String },
}

pub type FeatureResult<T> = std::result::Result<T, FeatureError>;
