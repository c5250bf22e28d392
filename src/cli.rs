//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Folio portfolio site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// enable sitemap generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sitemap: Option<bool>,

    /// Override base URL for the site.
    ///
    /// Useful when the production URL differs from the one in folio.toml:
    ///   folio build --base-url "https://you.github.io/portfolio"
    #[arg(long = "base-url")]
    pub base_url: Option<String>,
}

/// Value of `folio prefs --theme`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Dark,
    Light,
    Toggle,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a starter portfolio site
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Deletes the output directory if there is one and rebuilds the site
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build and serve the site locally
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List projects, optionally filtered
    Projects {
        /// Case-insensitive text matched against name, summary and tech
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only projects carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only featured projects
        #[arg(long)]
        featured: bool,
    },

    /// List every project tag
    Tags,

    /// Show one project in full
    Show {
        /// Project slug
        slug: String,
    },

    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        message: String,
    },

    /// Show or change the saved UI preferences
    Prefs {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        sound: Option<bool>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }

    /// Build flags of `build` and `serve`
    pub fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } | Commands::Serve { build_args, .. } => Some(build_args),
            _ => None,
        }
    }
}
