use tracing::{debug, info};

use crate::bounds::{BoundsPolicy, BoundsSolver, ChannelBounds, IgnoreFraction, SkipRounding};
use crate::error::Result;
use crate::raster::Image;
use crate::parallel::Executor;
use crate::remap::remap;

/// Parameters of a global contrast enhancement pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnhanceOptions {
    pub ignore_fraction: IgnoreFraction,
    pub rounding: SkipRounding,
    pub policy: BoundsPolicy,
}

/// What a pass computed and applied.
#[derive(Clone, Debug, PartialEq)]
pub struct EnhanceReport {
    /// Pixels ignored at each tail of every channel.
    pub to_skip: u64,
    pub ignore_fraction: IgnoreFraction,
    /// Bounds applied, one pair per channel.
    pub bounds: Vec<ChannelBounds>,
    pub policy: BoundsPolicy,
}

/// Min-max contrast stretch, or percentile stretch when the ignore fraction
/// is nonzero.
///
/// Runs as three barriers: histogram, bounds, remap. The histogram is rebuilt
/// afterwards so `image.histogram()` describes the output.
pub fn enhance_global_contrast(
    image: &mut Image,
    options: &EnhanceOptions,
    executor: &Executor,
) -> Result<EnhanceReport> {
    let pixel_count = image.pixel_count();
    let solver = BoundsSolver::new(pixel_count, options.ignore_fraction, options.rounding);

    info!(
        width = image.width(),
        height = image.height(),
        channels = image.channels(),
        ignore_fraction = %options.ignore_fraction,
        to_skip = solver.to_skip(),
        threads = executor.threads(),
        "Enhancing global contrast"
    );

    let histogram = image.refresh_histogram(executor);
    histogram.check_totals(pixel_count)?;
    let bounds = solver.solve(histogram, options.policy)?;

    for (channel, b) in bounds.iter().enumerate() {
        debug!(channel, low = b.low(), high = b.high(), "Channel bounds");
    }

    remap(image, &bounds, executor)?;
    image.refresh_histogram(executor).check_totals(pixel_count)?;

    info!(policy = %options.policy, "Contrast enhancement complete");

    Ok(EnhanceReport {
        to_skip: solver.to_skip(),
        ignore_fraction: options.ignore_fraction,
        bounds,
        policy: options.policy,
    })
}
