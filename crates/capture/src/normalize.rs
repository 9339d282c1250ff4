//! Converts a mapped source frame from its native pixel depth into the
//! packed 24-bit RGB layout that [RgbFrame] holds and the JPEG encoder eats.

use thiserror::Error;

use crate::device::Geometry;
use crate::frame::RgbFrame;

/// The source pixel encodings that can be normalized, keyed by the depth the
/// device reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// 16 bpp, packed 5-6-5, little-endian.
    Rgb565,
    /// 24 bpp, already packed R,G,B.
    Rgb888,
    /// 32 bpp, little-endian `u32` with blue in the low byte and the high
    /// byte unused.
    Xrgb8888,
}

impl PixelLayout {
    /// The layout for a pixel depth, or [None] if the depth isn't one of the
    /// three this crate understands.
    pub const fn from_bits_per_pixel(bits_per_pixel: u32) -> Option<Self> {
        match bits_per_pixel {
            16 => Some(Self::Rgb565),
            24 => Some(Self::Rgb888),
            32 => Some(Self::Xrgb8888),
            _ => None,
        }
    }

    /// How many bytes one source pixel occupies.
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb565 => 2,
            Self::Rgb888 => 3,
            Self::Xrgb8888 => 4,
        }
    }
}

/// Convert a full source frame into a freshly allocated [RgbFrame].
///
/// Every source row is addressed through [Geometry::line_length], so driver
/// padding at the end of a row never leaks into the output; the output has no
/// padding at all. Each source pixel lands at the same (row, column) in the
/// output regardless of depth.
///
/// Depths other than 16, 24, and 32 bpp are rejected up front, as is a
/// source buffer too short for the geometry.
pub fn normalize(src: &[u8], geometry: &Geometry) -> Result<RgbFrame, NormalizeError> {
    let layout = PixelLayout::from_bits_per_pixel(geometry.bits_per_pixel()).ok_or(
        NormalizeError::UnsupportedDepth {
            bits_per_pixel: geometry.bits_per_pixel(),
        },
    )?;

    let expected = geometry.map_len();
    if src.len() < expected {
        return Err(NormalizeError::SourceTooShort {
            expected,
            actual: src.len(),
        });
    }

    let dimensions = geometry.dimensions();
    let width = dimensions.width() as usize;
    let stride = geometry.line_length();
    let pixel_len = layout.bytes_per_pixel();

    let mut data = vec![0u8; dimensions.area() * RgbFrame::CHANNELS].into_boxed_slice();

    for (row, out_row) in data
        .chunks_exact_mut(width * RgbFrame::CHANNELS)
        .enumerate()
    {
        let row_start = row * stride;
        let src_row = &src[row_start..row_start + width * pixel_len];

        match layout {
            PixelLayout::Rgb565 => {
                for (src_pixel, out_pixel) in src_row
                    .chunks_exact(pixel_len)
                    .zip(out_row.chunks_exact_mut(RgbFrame::CHANNELS))
                {
                    let c = u16::from_le_bytes([src_pixel[0], src_pixel[1]]);

                    // Each channel is rescaled linearly from its native bit
                    // depth to the full 8-bit range, so all-ones maps to 255.
                    out_pixel[0] = ((c >> 11) as u32 * 255 / 31) as u8;
                    out_pixel[1] = (((c >> 5) & 0x3F) as u32 * 255 / 63) as u8;
                    out_pixel[2] = ((c & 0x1F) as u32 * 255 / 31) as u8;
                }
            }

            PixelLayout::Rgb888 => out_row.copy_from_slice(src_row),

            PixelLayout::Xrgb8888 => {
                for (src_pixel, out_pixel) in src_row
                    .chunks_exact(pixel_len)
                    .zip(out_row.chunks_exact_mut(RgbFrame::CHANNELS))
                {
                    let c = u32::from_le_bytes([
                        src_pixel[0],
                        src_pixel[1],
                        src_pixel[2],
                        src_pixel[3],
                    ]);

                    out_pixel[0] = (c >> 16) as u8;
                    out_pixel[1] = (c >> 8) as u8;
                    out_pixel[2] = c as u8;
                }
            }
        }
    }

    Ok(RgbFrame::from_raw(data, dimensions)
        .expect("The buffer was allocated with exactly the right length."))
}

/// Indicates that a source frame couldn't be normalized.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("{bits_per_pixel} bits per pixel is not a supported source format.")]
    UnsupportedDepth { bits_per_pixel: u32 },

    #[error("The source buffer holds {actual} bytes but the geometry calls for {expected}.")]
    SourceTooShort { expected: usize, actual: usize },
}
