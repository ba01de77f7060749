use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or validating a configuration file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("[{section}] {reason}")]
    Invalid {
        section: &'static str,
        reason: &'static str,
    },
}
