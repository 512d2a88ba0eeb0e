use crate::error::{ContrastError, Result};
use crate::raster::Image;
use crate::parallel::Executor;

/// Per-channel frequency table over intensity levels `0..=max_intensity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<Vec<u64>>,
    generation: u64,
}

/// One row of the diagnostic histogram dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistogramEntry {
    pub channel: usize,
    pub bin: usize,
    pub count: u64,
}

impl Histogram {
    /// All-zero histogram with `max_intensity + 1` bins per channel.
    pub fn empty(channels: usize, max_intensity: u8) -> Self {
        Self {
            counts: vec![vec![0; usize::from(max_intensity) + 1]; channels],
            generation: 0,
        }
    }

    /// Count every pixel group in `samples` (interleaved, whole pixels).
    ///
    /// Samples must not exceed the histogram's max intensity.
    pub fn accumulate(&mut self, samples: &[u8]) {
        let channels = self.counts.len();
        if channels == 1 {
            let bins = &mut self.counts[0];
            for &v in samples {
                bins[usize::from(v)] += 1;
            }
            return;
        }
        for pixel in samples.chunks_exact(channels) {
            for (bins, &v) in self.counts.iter_mut().zip(pixel) {
                bins[usize::from(v)] += 1;
            }
        }
    }

    /// Element-wise sum of two partial histograms of the same shape.
    pub fn merge(mut self, other: Histogram) -> Histogram {
        for (dst, src) in self.counts.iter_mut().zip(&other.counts) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d += s;
            }
        }
        self
    }

    pub fn channels(&self) -> usize {
        self.counts.len()
    }

    /// Bins per channel (`max_intensity + 1`).
    pub fn bins(&self) -> usize {
        self.counts.first().map_or(0, Vec::len)
    }

    /// Counts for `channel`. Panics if the channel does not exist.
    pub fn channel(&self, channel: usize) -> &[u64] {
        &self.counts[channel]
    }

    pub fn channel_total(&self, channel: usize) -> u64 {
        self.counts[channel].iter().sum()
    }

    /// Image generation this histogram was computed from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Lowest and highest bins with a nonzero count.
    pub fn populated_range(&self, channel: usize) -> Option<(usize, usize)> {
        let bins = &self.counts[channel];
        let low = bins.iter().position(|&c| c > 0)?;
        let high = bins.iter().rposition(|&c| c > 0)?;
        Some((low, high))
    }

    /// Verify that every channel counts exactly `pixel_count` pixels.
    pub fn check_totals(&self, pixel_count: usize) -> Result<()> {
        for channel in 0..self.channels() {
            let total = self.channel_total(channel);
            if total != pixel_count as u64 {
                return Err(ContrastError::Invariant(format!(
                    "histogram channel {channel} counts {total} pixels, image has {pixel_count}"
                )));
            }
        }
        Ok(())
    }

    /// Every (channel, bin, count) triple, channel-major, bins ascending.
    pub fn entries(&self) -> impl Iterator<Item = HistogramEntry> + '_ {
        self.counts.iter().enumerate().flat_map(|(channel, bins)| {
            bins.iter().enumerate().map(move |(bin, &count)| HistogramEntry {
                channel,
                bin,
                count,
            })
        })
    }
}

/// Count every sample of `image`, one private histogram per work chunk,
/// summed after the parallel phase.
pub fn build_histogram(image: &Image, executor: &Executor) -> Histogram {
    let channels = image.channels();
    let max_intensity = image.max_intensity();

    let mut histogram = executor.fold_chunks(
        image.pixels(),
        channels,
        || Histogram::empty(channels, max_intensity),
        |mut partial, chunk| {
            partial.accumulate(chunk);
            partial
        },
        Histogram::merge,
    );
    histogram.generation = image.generation();
    histogram
}
