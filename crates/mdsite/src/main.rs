//! mdsite CLI - build a static HTML site from Markdown.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

/// With no arguments, converts every Markdown file under the working
/// directory into `docs/`, using `template.html` and copying `static/`.
#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Build a static HTML site from a tree of Markdown files")]
#[command(version)]
pub struct Cli {
    /// Path to mdsite.toml config file (ignored when absent)
    #[arg(short, long, default_value = "mdsite.toml")]
    config: PathBuf,

    /// Output directory (defaults to config or "docs")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with an error when any file or stage failed
    #[arg(long)]
    strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    commands::build::run(&cli.config, cli.output, cli.strict)
}
