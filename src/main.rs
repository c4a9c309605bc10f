//! glosstrack CLI - inspect subtitle tracks as annotated, time-indexed text

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use glosstrack::Config;

#[derive(Parser)]
#[command(name = "glosstrack")]
#[command(about = "Annotated, time-indexed subtitle text for language learning")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/glosstrack/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an SRT file and print the chunk set as portable JSON
    Ingest {
        /// SRT file to ingest
        file: PathBuf,

        /// Language code, skipping detection
        #[arg(short, long)]
        language: Option<String>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Show the chunks active at a playback time
    At {
        /// SRT or portable JSON file
        file: PathBuf,

        /// Playback time in seconds
        seconds: f64,
    },

    /// Show the chunks intersecting a time range
    Range {
        /// SRT or portable JSON file
        file: PathBuf,

        /// Range start in seconds
        begin: f64,

        /// Range end in seconds (exclusive)
        end: f64,
    },

    /// Render chunk text with its annotations
    Render {
        /// SRT or portable JSON file
        file: PathBuf,

        /// Only chunks active at this time
        #[arg(long)]
        at: Option<f64>,

        /// Emit HTML instead of plain text
        #[arg(long)]
        html: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Ingest {
            file,
            language,
            pretty,
        } => cmd::cmd_ingest(&file, language.as_deref(), pretty, &config).await?,
        Commands::At { file, seconds } => cmd::cmd_at(&file, seconds, &config).await?,
        Commands::Range { file, begin, end } => {
            cmd::cmd_range(&file, begin, end, &config).await?;
        }
        Commands::Render { file, at, html } => cmd::cmd_render(&file, at, html, &config).await?,
    }

    Ok(())
}
