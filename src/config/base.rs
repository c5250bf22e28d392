//! `[base]` section configuration.
//!
//! Contains basic site information like title, description and url.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in folio.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Jane Doe | Full-Stack Developer"
/// description = "Portfolio of Jane Doe"
/// url = "https://janedoe.dev"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title displayed in browser tab and headers.
    pub title: String,

    /// Site description for SEO meta tags.
    pub description: String,

    /// Base URL for absolute links in the sitemap.
    /// Required when `[build.sitemap].enable = true`.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// BCP 47 language code (e.g., "en-US").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Copyright notice for site footer.
    #[serde(default)]
    pub copyright: String,
}
