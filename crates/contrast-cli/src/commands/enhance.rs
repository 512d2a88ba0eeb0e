use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use contrast_core::bounds::{BoundsPolicy, IgnoreFraction, SkipRounding};
use contrast_core::config::EnhanceConfig;
use contrast_core::enhance::enhance_global_contrast;
use contrast_core::io::image_io::{load_image, save_image};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

use crate::summary::{print_enhance_summary, print_histogram};
use crate::timing::StageTimer;

#[derive(Clone, ValueEnum)]
pub enum PolicyArg {
    PerChannel,
    Global,
}

impl From<PolicyArg> for BoundsPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::PerChannel => BoundsPolicy::PerChannel,
            PolicyArg::Global => BoundsPolicy::Global,
        }
    }
}

#[derive(Clone, ValueEnum)]
pub enum RoundingArg {
    Floor,
    Round,
}

impl From<RoundingArg> for SkipRounding {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Floor => SkipRounding::Floor,
            RoundingArg::Round => SkipRounding::Round,
        }
    }
}

#[derive(Args)]
pub struct EnhanceArgs {
    /// Input image (PGM/PPM, or any format the image crate reads)
    pub file: PathBuf,

    /// Output file path (.pgm/.ppm keep the input's max value)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Fraction of darkest and brightest pixels to ignore per channel (0.0 to <0.5)
    #[arg(long, conflicts_with = "percent")]
    pub ignore: Option<f64>,

    /// Ignore percentage as a whole number (0-49)
    #[arg(long)]
    pub percent: Option<u32>,

    /// Channel bounds policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Rounding of the per-tail skip count
    #[arg(long, value_enum)]
    pub rounding: Option<RoundingArg>,

    /// Worker threads (0 = all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Config file (TOML); flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the histogram before and after enhancement
    #[arg(long)]
    pub histogram: bool,
}

pub fn run(args: &EnhanceArgs) -> Result<()> {
    let config = build_config(args)?;
    debug!(?config, "Resolved enhance config");
    let options = config.options()?;
    let executor = config.executor()?;

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:12} [{bar:30}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    if args.histogram {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    let mut timer = StageTimer::new();

    pb.set_message("Loading");
    let mut image = timer
        .time("Load", || load_image(&args.file))
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    pb.inc(1);

    if args.histogram {
        print_histogram("Histogram before", image.refresh_histogram(&executor));
    }

    pb.set_message("Enhancing");
    let report = timer.time("Enhance", || {
        enhance_global_contrast(&mut image, &options, &executor)
    })?;
    pb.inc(1);

    if args.histogram {
        print_histogram("Histogram after", image.refresh_histogram(&executor));
    }

    pb.set_message("Saving");
    timer
        .time("Save", || save_image(&image, &args.output))
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    pb.finish_with_message("Done");

    print_enhance_summary(
        &args.file,
        &args.output,
        &config,
        &report,
        image.channels(),
        executor.threads(),
        &timer,
    );
    Ok(())
}

fn build_config(args: &EnhanceArgs) -> Result<EnhanceConfig> {
    let mut config = match args.config {
        Some(ref path) => EnhanceConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => EnhanceConfig::default(),
    };

    if let Some(fraction) = args.ignore {
        config.ignore_fraction = fraction;
        config.ignore_percent = None;
    }
    if let Some(percent) = args.percent {
        IgnoreFraction::from_percent(percent)?;
        config.ignore_percent = Some(percent);
    }
    if let Some(ref policy) = args.policy {
        config.policy = policy.clone().into();
    }
    if let Some(ref rounding) = args.rounding {
        config.rounding = rounding.clone().into();
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    Ok(config)
}
