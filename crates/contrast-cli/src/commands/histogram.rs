use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use contrast_core::io::image_io::load_image;
use contrast_core::parallel::Executor;

use crate::summary::print_histogram;

#[derive(Args)]
pub struct HistogramArgs {
    /// Input image
    pub file: PathBuf,

    /// Worker threads (0 = all cores)
    #[arg(short = 'j', long, default_value = "0")]
    pub threads: usize,
}

pub fn run(args: &HistogramArgs) -> Result<()> {
    let mut image = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let executor = Executor::new(args.threads)?;

    print_histogram("Image color frequency", image.refresh_histogram(&executor));
    Ok(())
}
