//! Site config error types.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with `folio.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read site config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Site config is not valid folio.toml")]
    Toml(#[from] toml::de::Error),

    /// A key is present but holds an unusable value.
    #[error("[{0}] {1}")]
    Invalid(&'static str, &'static str),

    /// A key another setting depends on is missing.
    #[error("[{0}] is required for {1}")]
    Missing(&'static str, &'static str),
}
