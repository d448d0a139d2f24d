//! pagekit CLI - page scaffolding and batch builds for multi-page frontend projects.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::Project;

#[derive(Parser)]
#[command(name = "pagekit")]
#[command(about = "Page scaffolding and batch builds for multi-page frontend projects")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to pagekit.toml config file
    #[arg(short, long, default_value = "pagekit.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up config, manifest, landing page and page template
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Create a new page from the template
    New {
        /// `page:description`, e.g. `blog:My Blog` (read from stdin if omitted)
        input: Option<String>,
    },

    /// Build every page listed in the manifest
    BuildAll {
        /// `test` selects the test build script
        mode: Option<String>,

        /// Exit with an error if any page fails to build
        #[arg(long)]
        strict: bool,
    },

    /// Print the build layout (root, entries, output directory) as JSON
    Layout {
        /// Page to build or serve
        #[arg(long, env = "npm_config_page")]
        page: Option<String>,

        /// Run mode: dev, dev-all, build, build:test
        #[arg(long, env = "npm_lifecycle_event", default_value = "")]
        mode: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout is reserved for `layout` output.
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::New { input } => {
            let project = Project::load(&cli.config)?;
            commands::new::run(&project, input).await?;
        }
        Commands::BuildAll { mode, strict } => {
            let project = Project::load(&cli.config)?;
            commands::build_all::run(&project, mode.as_deref(), strict).await?;
        }
        Commands::Layout { page, mode } => {
            let project = Project::load(&cli.config)?;
            commands::layout::run(&project, page.as_deref(), &mode)?;
        }
    }

    Ok(())
}
