#![allow(dead_code)]

use contrast_core::raster::Image;

/// Grayscale image with max intensity 255.
pub fn gray(width: usize, height: usize, pixels: Vec<u8>) -> Image {
    Image::new(pixels, 1, width, height, 255).expect("valid grayscale image")
}

/// RGB image with max intensity 255.
pub fn rgb(width: usize, height: usize, pixels: Vec<u8>) -> Image {
    Image::new(pixels, 3, width, height, 255).expect("valid RGB image")
}

/// Deterministic pseudo-random samples in `0..=max` (xorshift).
pub fn noise(len: usize, max: u8, seed: u64) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % (max as u64 + 1)) as u8
        })
        .collect()
}

/// Samples concentrated in `[lo, hi]` with a few outliers at both extremes.
pub fn low_contrast(len: usize, lo: u8, hi: u8, seed: u64) -> Vec<u8> {
    let span = hi - lo;
    noise(len, 255, seed)
        .into_iter()
        .enumerate()
        .map(|(i, v)| match i % 97 {
            0 => 0,
            1 => 255,
            _ => lo + v % (span + 1),
        })
        .collect()
}
