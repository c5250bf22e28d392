//! `[build]` section configuration.
//!
//! Contains build settings: paths, minification and sitemap.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in folio.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"      # Content TOML files
/// assets = "assets"        # Images, resume PDF
/// output = "public"        # Output directory
/// minify = true            # Minify HTML
///
/// [build.sitemap]
/// enable = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content source directory (`profile.toml`, `projects.toml`, ...).
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Static files copied verbatim to `{output}/assets/`.
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Minify HTML output (removes whitespace).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Clear output directory before each build.
    #[serde(default)]
    pub clean: bool,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// `[build.sitemap]` section.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Write `sitemap.xml` (requires `[base].url`).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Output path, relative to the output directory.
    #[serde(default = "defaults::build::sitemap::path")]
    #[educe(Default = defaults::build::sitemap::path())]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"
            description = "Test"
        "#,
        )
        .unwrap();

        assert_eq!(config.build.content, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.assets, PathBuf::from("assets"));
        assert!(config.build.minify);
        assert!(!config.build.clean);
        assert!(config.build.sitemap.enable);
        assert_eq!(config.build.sitemap.path, PathBuf::from("sitemap.xml"));
    }

    #[test]
    fn test_build_config_custom() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"
            description = "Test"

            [build]
            output = "dist"
            minify = false

            [build.sitemap]
            enable = false
        "#,
        )
        .unwrap();

        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert!(!config.build.minify);
        assert!(!config.build.sitemap.enable);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
            [base]
            title = "Test"
            description = "Test"

            [build]
            drafts = true
        "#,
        );
        assert!(result.is_err());
    }
}
