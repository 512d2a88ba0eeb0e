mod commands;
mod summary;
mod timing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contrast", about = "Percentile contrast stretching for 8-bit images")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stretch the contrast of an image
    Enhance(commands::enhance::EnhanceArgs),
    /// Print the per-channel intensity histogram
    Histogram(commands::histogram::HistogramArgs),
    /// Show image dimensions and intensity range
    Info(commands::info::InfoArgs),
    /// Print the default configuration as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Enhance(args) => commands::enhance::run(args),
        Commands::Histogram(args) => commands::histogram::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
