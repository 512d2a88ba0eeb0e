use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use contrast_core::io::image_io::load_image;
use contrast_core::parallel::Executor;

use crate::summary::print_image_info;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let mut image = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    print_image_info(&image, &args.file);

    let channels = image.channels();
    let histogram = image.refresh_histogram(&Executor::sequential());
    for channel in 0..channels {
        match histogram.populated_range(channel) {
            Some((low, high)) => println!("  Channel {}     {low} .. {high}", channel + 1),
            None => println!("  Channel {}     empty", channel + 1),
        }
    }
    Ok(())
}
