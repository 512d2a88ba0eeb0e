use serde::{Deserialize, Serialize};

use crate::error::{ContrastError, Result};
use crate::histogram::Histogram;

/// Fraction of pixels discarded from each tail of a channel's distribution.
///
/// Valid range is `[0.0, 0.5)`: discarding half from both ends would leave
/// nothing to stretch. A whole percentage is kept as an integer so its skip
/// count is computed without going through `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IgnoreFraction(Share);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Share {
    Fraction(f64),
    Percent(u32),
}

impl Default for IgnoreFraction {
    fn default() -> Self {
        Self(Share::Fraction(0.0))
    }
}

impl IgnoreFraction {
    pub fn new(fraction: f64) -> Result<Self> {
        if !(0.0..0.5).contains(&fraction) {
            return Err(ContrastError::invalid(
                "ignore fraction",
                format!("ignore fraction must be in interval [0; 0.5), got {fraction}"),
            ));
        }
        Ok(Self(Share::Fraction(fraction)))
    }

    /// Integer percentage form, `0..=49`.
    pub fn from_percent(percent: u32) -> Result<Self> {
        if percent >= 50 {
            return Err(ContrastError::invalid(
                "ignore fraction",
                format!("ignore percentage must be in interval [0; 49], got {percent}"),
            ));
        }
        Ok(Self(Share::Percent(percent)))
    }

    pub fn get(self) -> f64 {
        match self.0 {
            Share::Fraction(f) => f,
            Share::Percent(p) => f64::from(p) / 100.0,
        }
    }

    /// The whole percentage, if this was built from one.
    pub fn percent(self) -> Option<u32> {
        match self.0 {
            Share::Percent(p) => Some(p),
            Share::Fraction(_) => None,
        }
    }

    /// `pixel_count * self` made whole, before the tail-overlap cap.
    fn scale(self, pixel_count: u64, rounding: SkipRounding) -> u64 {
        match self.0 {
            Share::Percent(p) => {
                let product = u128::from(pixel_count) * u128::from(p);
                let skip = match rounding {
                    SkipRounding::Floor => product / 100,
                    SkipRounding::Round => (product + 50) / 100,
                };
                skip as u64
            }
            Share::Fraction(f) => {
                let exact = pixel_count as f64 * f;
                match rounding {
                    SkipRounding::Floor => exact.floor() as u64,
                    SkipRounding::Round => exact.round() as u64,
                }
            }
        }
    }
}

impl std::fmt::Display for IgnoreFraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Share::Fraction(v) => write!(f, "{v:.4}"),
            Share::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// How `pixel_count * fraction` becomes a whole number of pixels to skip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipRounding {
    /// Truncate toward zero.
    #[default]
    Floor,
    /// Round half away from zero, capped so the two tails never overlap.
    Round,
}

impl std::fmt::Display for SkipRounding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Floor => write!(f, "Floor"),
            Self::Round => write!(f, "Round"),
        }
    }
}

/// Whether each channel is stretched by its own cutoffs or all channels share
/// one pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundsPolicy {
    /// Independent cutoffs per channel; each channel fills the full range.
    #[default]
    PerChannel,
    /// `(min of lows, max of highs)` applied to every channel, which keeps the
    /// relative balance between channels.
    Global,
}

impl std::fmt::Display for BoundsPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerChannel => write!(f, "Per Channel"),
            Self::Global => write!(f, "Global"),
        }
    }
}

/// Low/high intensity cutoffs for one channel. `low <= high` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelBounds {
    low: u8,
    high: u8,
}

impl ChannelBounds {
    pub fn new(low: u8, high: u8) -> Result<Self> {
        if low > high {
            return Err(ContrastError::invalid(
                "channel bounds",
                format!("low cutoff {low} exceeds high cutoff {high}"),
            ));
        }
        Ok(Self { low, high })
    }

    pub fn low(self) -> u8 {
        self.low
    }

    pub fn high(self) -> u8 {
        self.high
    }

    /// Both cutoffs on the same level; such a channel collapses to 0.
    pub fn is_flat(self) -> bool {
        self.low == self.high
    }
}

/// Number of pixels to discard from each tail.
pub fn skip_count(pixel_count: usize, fraction: IgnoreFraction, rounding: SkipRounding) -> u64 {
    let pixel_count = pixel_count as u64;
    let skip = fraction.scale(pixel_count, rounding);
    // 2 * skip < pixel_count keeps at least one pixel between the tails.
    skip.min(pixel_count.saturating_sub(1) / 2)
}

/// Percentile cutoff solver. The skip count is fixed once per image.
#[derive(Clone, Copy, Debug)]
pub struct BoundsSolver {
    to_skip: u64,
}

impl BoundsSolver {
    pub fn new(pixel_count: usize, fraction: IgnoreFraction, rounding: SkipRounding) -> Self {
        Self {
            to_skip: skip_count(pixel_count, fraction, rounding),
        }
    }

    pub fn with_skip(to_skip: u64) -> Self {
        Self { to_skip }
    }

    pub fn to_skip(&self) -> u64 {
        self.to_skip
    }

    /// Cutoffs for one channel.
    ///
    /// The low cutoff is the first bin, scanning up from 0, at which the
    /// running count exceeds the skip count; the high cutoff is the same scan
    /// running down from the top bin.
    pub fn solve_channel(&self, histogram: &Histogram, channel: usize) -> Result<ChannelBounds> {
        if channel >= histogram.channels() {
            return Err(ContrastError::out_of_range(
                "channel",
                0,
                histogram.channels().saturating_sub(1),
                channel,
            ));
        }
        let counts = histogram.channel(channel);

        let low = first_retained(counts.iter().enumerate(), self.to_skip).ok_or_else(|| {
            exhausted("low", channel, counts.len(), self.to_skip)
        })?;
        let high = first_retained(counts.iter().enumerate().rev(), self.to_skip).ok_or_else(
            || exhausted("high", channel, counts.len(), self.to_skip),
        )?;

        if low > high {
            return Err(ContrastError::Invariant(format!(
                "channel {channel}: low cutoff {low} above high cutoff {high} with {} pixels skipped per tail",
                self.to_skip
            )));
        }
        Ok(ChannelBounds {
            low: low as u8,
            high: high as u8,
        })
    }

    /// Cutoffs for every channel under `policy`.
    pub fn solve(&self, histogram: &Histogram, policy: BoundsPolicy) -> Result<Vec<ChannelBounds>> {
        let per_channel = (0..histogram.channels())
            .map(|channel| self.solve_channel(histogram, channel))
            .collect::<Result<Vec<_>>>()?;

        match policy {
            BoundsPolicy::PerChannel => Ok(per_channel),
            BoundsPolicy::Global => {
                let shared = global_bounds(&per_channel).ok_or_else(|| {
                    ContrastError::Invariant("histogram has no channels".into())
                })?;
                Ok(vec![shared; per_channel.len()])
            }
        }
    }
}

/// `(min low, max high)` over all channels.
pub fn global_bounds(per_channel: &[ChannelBounds]) -> Option<ChannelBounds> {
    let low = per_channel.iter().map(|b| b.low).min()?;
    let high = per_channel.iter().map(|b| b.high).max()?;
    Some(ChannelBounds { low, high })
}

fn first_retained<'a>(bins: impl Iterator<Item = (usize, &'a u64)>, to_skip: u64) -> Option<usize> {
    let mut skipped = 0u64;
    for (bin, &count) in bins {
        skipped += count;
        if skipped > to_skip {
            return Some(bin);
        }
    }
    None
}

fn exhausted(side: &str, channel: usize, bins: usize, to_skip: u64) -> ContrastError {
    ContrastError::Invariant(format!(
        "{side} cutoff scan of channel {channel} exhausted {bins} bins without passing {to_skip} skipped pixels"
    ))
}
