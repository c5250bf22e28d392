//! Folio - A static site generator for a personal portfolio.

mod build;
mod cli;
mod commands;
mod config;
mod contact;
mod content;
mod filter;
mod generator;
mod init;
mod logger;
mod render;
mod serve;
mod settings;
mod storage;
mod utils;

use anyhow::{Context, Result, bail};
use build::{Site, build_site};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use contact::ContactFields;
use content::Content;
use generator::sitemap::build_sitemap;
use init::new_site;
use serve::serve_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Init { name } => new_site(config, name.is_some()),
        Commands::Build { .. } => build_all(config).map(|_| ()),
        Commands::Serve { .. } => {
            let site = build_all(config)?;
            serve_site(config, &site)
        }
        Commands::Projects {
            search,
            tag,
            featured,
        } => {
            let content = load_content(config)?;
            commands::list_projects(&content, search, tag.as_deref(), *featured);
            Ok(())
        }
        Commands::Tags => {
            commands::list_tags(&load_content(config)?);
            Ok(())
        }
        Commands::Show { slug } => commands::show_project(&load_content(config)?, slug),
        Commands::Contact {
            name,
            email,
            subject,
            message,
        } => {
            let fields = ContactFields {
                name: name.clone(),
                email: email.clone(),
                subject: subject.clone(),
                message: message.clone(),
            };
            commands::send_contact(config, &load_content(config)?, fields)
        }
        Commands::Prefs { theme, sound } => commands::update_prefs(config, *theme, *sound),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    // Validate config state based on command
    let config_exists = config.config_path.exists();
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}

fn load_content(config: &SiteConfig) -> Result<Content> {
    Content::load(&config.build.content).context("Failed to load content")
}

/// Build the site, then the sitemap from the rendered pages.
fn build_all(config: &'static SiteConfig) -> Result<Site> {
    let site = Site::load(config)?;
    let pages = build_site(config, &site)?;
    build_sitemap(config, &pages)?;
    Ok(site)
}
