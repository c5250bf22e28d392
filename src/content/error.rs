//! Content loading error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the portfolio content files.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Content file parsing error in `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("Duplicate project slug `{0}`")]
    DuplicateSlug(String),

    #[error("Tags `{0}` and `{1}` share the URL `/projects/tags/{2}/`")]
    TagCollision(String, String, String),

    #[error("Tag `{0}` has no letters or digits to build a URL from")]
    EmptyTagSlug(String),
}
