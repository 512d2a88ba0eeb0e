use crate::bounds::ChannelBounds;
use crate::error::{ContrastError, Result};
use crate::raster::Image;
use crate::parallel::Executor;

/// Affine stretch of one sample: `[low, high]` onto `[0, max_intensity]`.
///
/// The sample is clamped into the bounds first. A flat channel
/// (`low == high`) maps to 0. Division truncates.
pub fn remap_sample(value: u8, bounds: ChannelBounds, max_intensity: u8) -> u8 {
    if bounds.is_flat() {
        return 0;
    }
    let (low, high) = (bounds.low(), bounds.high());
    let clamped = value.clamp(low, high);
    let offset = u32::from(clamped - low);
    let span = u32::from(high - low);
    (offset * u32::from(max_intensity) / span) as u8
}

/// [`remap_sample`] for every possible 8-bit input.
pub fn lookup_table(bounds: ChannelBounds, max_intensity: u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (value, out) in table.iter_mut().enumerate() {
        *out = remap_sample(value as u8, bounds, max_intensity);
    }
    table
}

/// Stretch every sample of `image` in place, one bounds pair per channel.
///
/// The stored histogram is invalidated.
pub fn remap(image: &mut Image, bounds: &[ChannelBounds], executor: &Executor) -> Result<()> {
    let channels = image.channels();
    let max_intensity = image.max_intensity();

    if bounds.len() != channels {
        return Err(ContrastError::invalid(
            "channel bounds",
            format!(
                "expected channel bounds for {channels} channels, got {}",
                bounds.len()
            ),
        ));
    }
    if let Some(b) = bounds.iter().find(|b| b.high() > max_intensity) {
        return Err(ContrastError::invalid(
            "channel bounds",
            format!(
                "high cutoff {} exceeds maximum color intensity {max_intensity}",
                b.high()
            ),
        ));
    }

    let tables: Vec<[u8; 256]> = bounds
        .iter()
        .map(|&b| lookup_table(b, max_intensity))
        .collect();

    let pixels = image.pixels_mut_invalidating();
    executor.for_each_chunk_mut(pixels, channels, |chunk| {
        if let [table] = tables.as_slice() {
            for v in chunk.iter_mut() {
                *v = table[usize::from(*v)];
            }
            return;
        }
        for pixel in chunk.chunks_exact_mut(channels) {
            for (v, table) in pixel.iter_mut().zip(&tables) {
                *v = table[usize::from(*v)];
            }
        }
    });
    Ok(())
}
