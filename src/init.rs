//! Site initialization module.
//!
//! Creates a new portfolio site: `folio.toml` plus starter content files.

use crate::{
    config::{STATE_DIR, SiteConfig},
    content::{EDUCATION_FILE, PROFILE_FILE, PROJECTS_FILE, SKILLS_FILE},
};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

/// Default config filename
const CONFIG_FILE: &str = "folio.toml";

/// Starter content, one entry per content file
const STARTER_CONTENT: &[(&str, &str)] = &[
    (PROFILE_FILE, include_str!("embed/content/profile.toml")),
    (PROJECTS_FILE, include_str!("embed/content/projects.toml")),
    (SKILLS_FILE, include_str!("embed/content/skills.toml")),
    (EDUCATION_FILE, include_str!("embed/content/education.toml")),
];

/// Create a new site with default structure
pub fn new_site(config: &'static SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // Without a name the site is created in place, which must be empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `folio init <SITE_NAME>` to create in a subdirectory."
        );
    }

    let content_dir = &config.build.content;
    if content_dir.exists() {
        bail!(
            "Path `{}` already exists. Try `folio init <SITE_NAME>` instead.",
            content_dir.display()
        );
    }
    fs::create_dir_all(content_dir)
        .with_context(|| format!("Failed to create {}", content_dir.display()))?;

    write_starter_content(content_dir)?;
    init_default_config(root)?;

    let output = config
        .build
        .output
        .strip_prefix(root)
        .unwrap_or(&config.build.output);
    init_ignored_files(root, &[output, Path::new(STATE_DIR)])?;

    Ok(())
}

/// Write the starter `profile`, `projects`, `skills` and `education` files.
pub fn write_starter_content(dir: &Path) -> Result<()> {
    for (name, text) in STARTER_CONTENT {
        let path = dir.join(name);
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Config written by `init`: defaults plus placeholder site metadata.
fn starter_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.base.title = "Jane Doe | Full-Stack Developer".into();
    config.base.description = "Portfolio of Jane Doe".into();
    config.base.url = Some("https://example.com".into());
    config
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&starter_config())?;
    fs::write(root.join(CONFIG_FILE), content)?;
    Ok(())
}

/// Initialize .gitignore and .ignore files with specified paths
fn init_ignored_files(root: &Path, paths: &[&Path]) -> Result<()> {
    let content = paths
        .iter()
        .filter_map(|p| p.to_str())
        .collect::<Vec<_>>()
        .join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::content::Content;
    use clap::Parser;
    use tempfile::TempDir;

    fn init_config(root: &Path, name: Option<&str>) -> &'static SiteConfig {
        let mut argv = vec!["folio", "--root", root.to_str().unwrap(), "init"];
        argv.extend(name);
        let cli = Cli::parse_from(argv);

        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);
        Box::leak(Box::new(config))
    }

    #[test]
    fn test_new_site_named() {
        let dir = TempDir::new().unwrap();
        let config = init_config(dir.path(), Some("portfolio"));
        new_site(config, true).unwrap();

        let site = dir.path().join("portfolio");
        assert!(site.join("folio.toml").exists());
        assert!(site.join("content/projects.toml").exists());

        let ignore = fs::read_to_string(site.join(".gitignore")).unwrap();
        assert_eq!(ignore, "public\n.folio");

        // The written config loads and passes validation
        let mut loaded = SiteConfig::from_path(&site.join("folio.toml")).unwrap();
        let cli = Cli::parse_from(["folio", "--root", site.to_str().unwrap(), "build"]);
        loaded.update_with_cli(&cli);
        loaded.validate().unwrap();

        let content = Content::load(&loaded.build.content).unwrap();
        assert_eq!(content.profile.name, "Jane Doe");
    }

    #[test]
    fn test_new_site_in_place_requires_empty_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("stray.txt"), "").unwrap();

        let config = init_config(dir.path(), None);
        let err = new_site(config, false).unwrap_err();
        assert!(err.to_string().contains("not empty"));
    }

    #[test]
    fn test_starter_config_roundtrip() {
        let text = toml::to_string_pretty(&starter_config()).unwrap();
        let parsed = SiteConfig::from_str(&text).unwrap();
        assert_eq!(parsed.base.url.as_deref(), Some("https://example.com"));
        assert!(parsed.build.sitemap.enable);
    }
}
