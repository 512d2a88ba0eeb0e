use crate::consts::{MAX_CHANNELS, MAX_INTENSITY_LIMIT};
use crate::error::{ContrastError, Result};
use crate::histogram::{build_histogram, Histogram};
use crate::parallel::Executor;

/// An 8-bit raster image with interleaved channels.
///
/// Samples are stored row-major, one pixel group of `channels` samples after
/// another. The per-channel histogram is derived state: it is stamped with the
/// generation it was computed from and discarded whenever the pixels change.
#[derive(Clone, Debug)]
pub struct Image {
    pixels: Vec<u8>,
    channels: usize,
    width: usize,
    height: usize,
    max_intensity: u8,
    generation: u64,
    histogram: Option<Histogram>,
}

impl Image {
    /// Take ownership of `pixels` after validating the shape against it.
    ///
    /// Nothing is copied. On error the buffer is dropped and no image exists.
    pub fn new(
        pixels: Vec<u8>,
        channels: usize,
        width: usize,
        height: usize,
        max_intensity: u32,
    ) -> Result<Self> {
        if !(1..=MAX_CHANNELS).contains(&channels) {
            return Err(ContrastError::out_of_range(
                "number of channels",
                1,
                MAX_CHANNELS,
                channels,
            ));
        }
        if width == 0 {
            return Err(ContrastError::invalid("width", "width must be positive, got 0"));
        }
        if height == 0 {
            return Err(ContrastError::invalid("height", "height must be positive, got 0"));
        }
        if max_intensity > MAX_INTENSITY_LIMIT {
            return Err(ContrastError::out_of_range(
                "maximum color intensity",
                0,
                MAX_INTENSITY_LIMIT,
                max_intensity,
            ));
        }
        let max_intensity = max_intensity as u8;

        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| {
                ContrastError::invalid(
                    "image size",
                    format!("image size {width}x{height}x{channels} overflows usize"),
                )
            })?;
        if pixels.len() != expected {
            return Err(ContrastError::invalid(
                "pixel buffer length",
                format!(
                    "pixel buffer length must be {expected} ({width}x{height}x{channels}), got {}",
                    pixels.len()
                ),
            ));
        }

        if let Some(index) = pixels.iter().position(|&v| v > max_intensity) {
            return Err(ContrastError::invalid(
                "sample value",
                format!(
                    "sample value {} at index {index} exceeds maximum color intensity {max_intensity}",
                    pixels[index]
                ),
            ));
        }

        Ok(Self {
            pixels,
            channels,
            width,
            height,
            max_intensity,
            generation: 0,
            histogram: None,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_intensity(&self) -> u8 {
        self.max_intensity
    }

    /// Number of pixels (`width * height`), not samples.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Give the pixel buffer back to the caller, same length and layout as it
    /// was handed in.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Incremented on every pixel mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The stored histogram, if it still describes the current pixels.
    pub fn histogram(&self) -> Option<&Histogram> {
        self.histogram
            .as_ref()
            .filter(|h| h.generation() == self.generation)
    }

    /// Return the current histogram, rebuilding it first if it is stale.
    pub fn refresh_histogram(&mut self, executor: &Executor) -> &Histogram {
        let histogram = match self.histogram.take() {
            Some(h) if h.generation() == self.generation => h,
            _ => build_histogram(self, executor),
        };
        self.histogram.insert(histogram)
    }

    /// Mutable access to the samples. Invalidates the stored histogram.
    pub(crate) fn pixels_mut_invalidating(&mut self) -> &mut [u8] {
        self.generation += 1;
        self.histogram = None;
        &mut self.pixels
    }
}
