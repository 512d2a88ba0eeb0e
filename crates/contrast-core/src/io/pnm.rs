//! Binary PGM (`P5`) and PPM (`P6`) codec with 8-bit samples.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::warn;

use crate::consts::MAX_INTENSITY_LIMIT;
use crate::error::{ContrastError, Result};
use crate::raster::Image;

/// Binary PNM variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PnmKind {
    /// `P5`, one channel.
    Graymap,
    /// `P6`, interleaved RGB.
    Pixmap,
}

impl PnmKind {
    pub fn magic(self) -> &'static [u8; 2] {
        match self {
            Self::Graymap => b"P5",
            Self::Pixmap => b"P6",
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Graymap => 1,
            Self::Pixmap => 3,
        }
    }

    fn for_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Graymap),
            3 => Some(Self::Pixmap),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PnmHeader {
    pub kind: PnmKind,
    pub width: usize,
    pub height: usize,
    pub max_value: u32,
    /// Byte offset of the first raster sample.
    pub data_offset: usize,
}

impl PnmHeader {
    /// Raster size in bytes.
    pub fn raster_len(&self) -> Result<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(self.kind.channels()))
            .ok_or_else(|| {
                ContrastError::InvalidPnm(format!(
                    "dimensions {}x{} too large",
                    self.width, self.height
                ))
            })
    }
}

/// Memory-map and decode a PNM file.
pub fn read_pnm(path: &Path) -> Result<Image> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    decode_pnm(&mmap)
}

/// Decode a complete PNM file held in memory.
pub fn decode_pnm(bytes: &[u8]) -> Result<Image> {
    let header = parse_header(bytes)?;
    let raster_len = header.raster_len()?;
    let raster = &bytes[header.data_offset..];

    if raster.len() < raster_len {
        return Err(ContrastError::InvalidPnm(format!(
            "raster truncated: expected {raster_len} bytes, got {}",
            raster.len()
        )));
    }
    if raster.len() > raster_len {
        warn!(
            extra = raster.len() - raster_len,
            "Ignoring trailing bytes after PNM raster"
        );
    }

    Image::new(
        raster[..raster_len].to_vec(),
        header.kind.channels(),
        header.width,
        header.height,
        header.max_value,
    )
}

/// Parse the textual header: magic, width, height, max value, then exactly
/// one whitespace byte before the raster.
pub fn parse_header(bytes: &[u8]) -> Result<PnmHeader> {
    let mut cursor = HeaderCursor { bytes, pos: 0 };

    let kind = match cursor.token()? {
        b"P5" => PnmKind::Graymap,
        b"P6" => PnmKind::Pixmap,
        other => {
            return Err(ContrastError::InvalidPnm(format!(
                "unsupported magic {:?} (expected P5 or P6)",
                String::from_utf8_lossy(other)
            )))
        }
    };
    let width = cursor.number("width")?;
    let height = cursor.number("height")?;
    let max_value = cursor.number("max value")?;

    if width == 0 || height == 0 {
        return Err(ContrastError::InvalidPnm(format!(
            "invalid dimensions {width}x{height}"
        )));
    }
    if max_value == 0 || max_value > MAX_INTENSITY_LIMIT as usize {
        return Err(ContrastError::InvalidPnm(format!(
            "max value {max_value} outside 1..={MAX_INTENSITY_LIMIT} (16-bit samples are not supported)"
        )));
    }

    match bytes.get(cursor.pos) {
        Some(b) if b.is_ascii_whitespace() => cursor.pos += 1,
        _ => {
            return Err(ContrastError::InvalidPnm(
                "missing whitespace after max value".into(),
            ))
        }
    }

    Ok(PnmHeader {
        kind,
        width,
        height,
        max_value: max_value as u32,
        data_offset: cursor.pos,
    })
}

/// Encode as `P5` (grayscale) or `P6` (RGB).
pub fn encode_pnm(image: &Image) -> Result<Vec<u8>> {
    let kind = PnmKind::for_channels(image.channels()).ok_or_else(|| {
        ContrastError::UnsupportedFormat(format!(
            "PNM cannot store {}-channel images",
            image.channels()
        ))
    })?;
    if image.max_intensity() == 0 {
        return Err(ContrastError::UnsupportedFormat(
            "PNM max value must be at least 1".into(),
        ));
    }

    let header = format!(
        "{}\n{} {}\n{}\n",
        String::from_utf8_lossy(kind.magic()),
        image.width(),
        image.height(),
        image.max_intensity()
    );
    let mut buf = Vec::with_capacity(header.len() + image.pixels().len());
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(image.pixels());
    Ok(buf)
}

pub fn write_pnm(image: &Image, path: &Path) -> Result<()> {
    std::fs::write(path, encode_pnm(image)?)?;
    Ok(())
}

struct HeaderCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderCursor<'a> {
    /// Skip whitespace and `#` comments (to end of line).
    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'#' {
                while let Some(&c) = self.bytes.get(self.pos) {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn token(&mut self) -> Result<&'a [u8]> {
        self.skip_separators();
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b'#' {
                break;
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(ContrastError::InvalidPnm("unexpected end of header".into()));
        }
        Ok(&self.bytes[start..self.pos])
    }

    fn number(&mut self, field: &str) -> Result<usize> {
        let token = self.token()?;
        std::str::from_utf8(token)
            .ok()
            .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                ContrastError::InvalidPnm(format!(
                    "{field} is not a number: {:?}",
                    String::from_utf8_lossy(token)
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_with_comments() {
        let bytes = b"P6\n# created by a scanner\n2 1 # trailing\n255\n\x01\x02\x03\x04\x05\x06";
        let header = parse_header(bytes).unwrap();
        assert_eq!(header.kind, PnmKind::Pixmap);
        assert_eq!((header.width, header.height, header.max_value), (2, 1, 255));
        assert_eq!(&bytes[header.data_offset..], b"\x01\x02\x03\x04\x05\x06");
    }

    #[test]
    fn raster_may_start_with_whitespace_bytes() {
        // The single separator byte is consumed; a raster starting with 0x0a
        // (newline) must survive.
        let bytes = b"P5 2 1 255\n\n\x07";
        let header = parse_header(bytes).unwrap();
        assert_eq!(&bytes[header.data_offset..], b"\n\x07");
    }

    #[test]
    fn rejects_negative_dimensions() {
        let err = parse_header(b"P5 -2 1 255\n").unwrap_err();
        assert!(matches!(err, ContrastError::InvalidPnm(_)));
    }
}
