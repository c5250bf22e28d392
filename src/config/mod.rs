//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                      |
//! |-------------|----------------------------------------------|
//! | `[base]`    | Site metadata (title, description, url)      |
//! | `[build]`   | Content/output paths, minify, sitemap        |
//! | `[serve]`   | Preview server (interface, port)             |
//! | `[contact]` | Form relay endpoint and access key           |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Jane Doe"
//! description = "Full-stack developer"
//! url = "https://janedoe.dev"
//!
//! [build]
//! output = "public"
//! minify = true
//!
//! [serve]
//! port = 5277
//!
//! [contact]
//! access_key_env = "WEB3FORMS_KEY"
//! ```

mod base;
mod build;
mod contact;
pub mod defaults;
mod error;
mod serve;

use base::BaseConfig;
use build::BuildConfig;
use contact::ContactConfig;
use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Directory under the site root holding local state (preferences).
pub const STATE_DIR: &str = ".folio";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Contact form relay
    #[serde(default)]
    pub contact: ContactConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Path of the persistent preference store
    pub fn prefs_path(&self) -> PathBuf {
        self.get_root().join(STATE_DIR).join("prefs.toml")
    }

    /// Absolute URL of a site path like `/projects/`
    pub fn page_url(&self, path: &str) -> String {
        let base = self.base.url.as_deref().unwrap_or("").trim_end_matches('/');
        format!("{base}{path}")
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        // Determine the final root path based on command
        let base = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };

        self.update_path_with_root(&root, cli);

        if let Some(args) = cli.build_args() {
            Self::update_option(&mut self.build.minify, args.minify.as_ref());
            Self::update_option(&mut self.build.sitemap.enable, args.sitemap.as_ref());
            self.build.clean |= args.clean;
            if args.base_url.is_some() {
                self.base.url = args.base_url.clone();
            }
        }

        if let Commands::Serve {
            interface, port, ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            self.base.url = Some(format!(
                "http://{}:{}",
                self.serve.interface, self.serve.port
            ));
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, cli: &Cli) {
        // Apply CLI overrides first
        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        // Normalize root to absolute path
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.assets = Self::normalize_path(&root.join(&self.build.assets));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.sitemap.path = self.build.output.join(&self.build.sitemap.path);
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if self.build.sitemap.enable && self.base.url.is_none() {
            bail!(ConfigError::Missing("base.url", "sitemap generation"));
        }

        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Invalid(
                "base.url",
                "must start with http:// or https://"
            ));
        }

        if !self.contact.endpoint.starts_with("http://")
            && !self.contact.endpoint.starts_with("https://")
        {
            bail!(ConfigError::Invalid(
                "contact.endpoint",
                "must start with http:// or https://"
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("folio.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn load(dir: &Path, args: &[&str]) -> SiteConfig {
        let root = dir.to_str().unwrap();
        let mut argv = vec!["folio", "--root", root];
        argv.extend_from_slice(args);
        let cli = Cli::parse_from(argv);

        let mut config = SiteConfig::from_path(&dir.join("folio.toml")).unwrap();
        config.update_with_cli(&cli);
        config
    }

    const MINIMAL: &str = r#"
        [base]
        title = "Test"
        description = "Test"
        url = "https://example.com"
    "#;

    #[test]
    fn test_from_path_missing_file() {
        let err = SiteConfig::from_path(Path::new("/definitely/missing/folio.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Cannot read site config"));
    }

    #[test]
    fn test_paths_resolved_against_root() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), MINIMAL);

        let config = load(dir.path(), &["build"]);
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(config.get_root(), root);
        assert_eq!(config.build.content, root.join("content"));
        assert_eq!(config.build.assets, root.join("assets"));
        assert_eq!(config.build.output, root.join("public"));
        assert_eq!(config.build.sitemap.path, root.join("public/sitemap.xml"));
        assert_eq!(config.prefs_path(), root.join(".folio/prefs.toml"));
        config.validate().unwrap();
    }

    #[test]
    fn test_cli_overrides() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), MINIMAL);

        let config = load(
            dir.path(),
            &["-o", "dist", "build", "--minify=false", "--base-url", "https://other.dev"],
        );
        assert!(config.build.output.ends_with("dist"));
        assert!(!config.build.minify);
        assert_eq!(config.base.url.as_deref(), Some("https://other.dev"));
    }

    #[test]
    fn test_serve_sets_local_url() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), MINIMAL);

        let config = load(dir.path(), &["serve", "--port", "8080"]);
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.base.url.as_deref(), Some("http://127.0.0.1:8080"));
    }

    #[test]
    fn test_validate_sitemap_needs_url() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "[base]\ntitle = \"T\"\ndescription = \"D\"\n");

        let config = load(dir.path(), &["build"]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sitemap"));

        let config = load(dir.path(), &["build", "--sitemap=false"]);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_endpoint_scheme() {
        let dir = TempDir::new().unwrap();
        write_config(
            dir.path(),
            &format!("{MINIMAL}\n[contact]\nendpoint = \"ftp://relay\"\n"),
        );

        let config = load(dir.path(), &["tags"]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[contact.endpoint]"));
    }

    #[test]
    fn test_page_url() {
        let mut config = SiteConfig::default();
        config.base.url = Some("https://example.com/".into());
        assert_eq!(config.page_url("/projects/"), "https://example.com/projects/");
    }

    #[test]
    fn test_default_config_serializes() {
        let text = toml::to_string_pretty(&SiteConfig::default()).unwrap();
        let parsed = SiteConfig::from_str(&text).unwrap();
        assert_eq!(parsed.serve.port, 5277);
    }
}
