/// Maximum number of interleaved channels (RGB, no alpha).
pub const MAX_CHANNELS: usize = 3;

/// Largest representable max intensity for 8-bit samples.
pub const MAX_INTENSITY_LIMIT: u32 = 255;

/// Default fraction of pixels ignored at each tail (pure min-max stretch).
pub const DEFAULT_IGNORE_FRACTION: f64 = 0.0;

/// Minimum pixel count (w*h) to hand work to the thread pool.
/// Smaller images are processed inline on the calling thread.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Lower bound on pixels per worker chunk, so that per-chunk histograms
/// (up to 3 * 256 counters) stay small relative to the work they cover.
pub const MIN_PIXELS_PER_CHUNK: usize = 4_096;
