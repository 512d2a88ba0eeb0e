use std::path::Path;

use image::{GrayImage, RgbImage};

use crate::error::{ContrastError, Result};
use crate::raster::Image;

use super::pnm::{read_pnm, write_pnm};

fn is_pnm(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ["pgm", "ppm", "pnm"].iter().any(|ext| e.eq_ignore_ascii_case(ext)))
}

/// Load an image file. PNM keeps its declared max value; every other format
/// goes through the `image` crate as 8-bit gray or RGB with max value 255.
pub fn load_image(path: &Path) -> Result<Image> {
    if is_pnm(path) {
        return read_pnm(path);
    }

    let img = image::open(path)?;
    if img.color().has_color() {
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();
        Image::new(rgb.into_raw(), 3, w as usize, h as usize, 255)
    } else {
        let gray = img.to_luma8();
        let (w, h) = gray.dimensions();
        Image::new(gray.into_raw(), 1, w as usize, h as usize, 255)
    }
}

/// Save an image, choosing the format from the file extension.
pub fn save_image(image: &Image, path: &Path) -> Result<()> {
    if is_pnm(path) {
        return write_pnm(image, path);
    }
    if image.max_intensity() != 255 {
        return Err(ContrastError::UnsupportedFormat(format!(
            "max intensity {} can only be stored as PNM",
            image.max_intensity()
        )));
    }

    let (w, h) = match (u32::try_from(image.width()), u32::try_from(image.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(ContrastError::UnsupportedFormat(format!(
                "{}x{} exceeds the encoder's dimension limit",
                image.width(),
                image.height()
            )))
        }
    };
    let size_mismatch = || ContrastError::Invariant("buffer size does not match dimensions".into());

    match image.channels() {
        1 => GrayImage::from_raw(w, h, image.pixels().to_vec())
            .ok_or_else(size_mismatch)?
            .save(path)?,
        3 => RgbImage::from_raw(w, h, image.pixels().to_vec())
            .ok_or_else(size_mismatch)?
            .save(path)?,
        n => {
            return Err(ContrastError::UnsupportedFormat(format!(
                "cannot save {n}-channel image"
            )))
        }
    }
    Ok(())
}
