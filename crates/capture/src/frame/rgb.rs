//! Declares [RgbFrame], the normalized form every captured frame ends up in.

use std::slice::Chunks;

use thiserror::Error;

use super::Dimensions;

/// A frame of packed 24-bit RGB pixels.
///
/// The buffer is interleaved R,G,B in row-major order with no padding between
/// rows, so its length is always exactly
/// `dimensions.area() * RgbFrame::CHANNELS`. That invariant is enforced by
/// [Self::from_raw] (the only way to construct one from the outside) and it's
/// what lets the JPEG encoder consume the buffer without any further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    data: Box<[u8]>,
    dimensions: Dimensions,
}

impl RgbFrame {
    /// The number of interleaved channels per pixel (R, G, and B).
    pub const CHANNELS: usize = 3;

    /// Tries to create a frame from a raw byte buffer, returning an error if
    /// `data.len() != dimensions.area() * Self::CHANNELS`.
    pub fn from_raw(data: Box<[u8]>, dimensions: Dimensions) -> Result<Self, FrameLengthError> {
        let expected = dimensions.area() * Self::CHANNELS;
        if data.len() != expected {
            Err(FrameLengthError {
                expected,
                actual: data.len(),
            })
        } else {
            Ok(Self { data, dimensions })
        }
    }

    /// The dimensions of this frame.
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// A reference to the raw interleaved R,G,B bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// An iterator over rows of raw bytes, each exactly
    /// `width * Self::CHANNELS` long.
    pub fn rows(&self) -> Chunks<'_, u8> {
        self.data
            .chunks(self.dimensions.width() as usize * Self::CHANNELS)
    }

    /// Consume the frame, returning the raw byte buffer.
    pub fn into_bytes(self) -> Box<[u8]> {
        self.data
    }
}

/// Indicates that a byte buffer was the wrong length for its dimensions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Expected a buffer of {expected} bytes but got {actual}.")]
pub struct FrameLengthError {
    pub expected: usize,
    pub actual: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_must_match_dimensions() {
        let dimensions: Dimensions = (2, 2).into();

        assert!(RgbFrame::from_raw(vec![0; 12].into_boxed_slice(), dimensions).is_ok());

        let err = RgbFrame::from_raw(vec![0; 11].into_boxed_slice(), dimensions).unwrap_err();
        assert_eq!(
            err,
            FrameLengthError {
                expected: 12,
                actual: 11,
            }
        );
    }

    #[test]
    fn rows_are_unpadded() {
        let dimensions: Dimensions = (3, 2).into();
        let data: Box<[u8]> = (0u8..18).collect();
        let frame = RgbFrame::from_raw(data, dimensions).unwrap();

        let rows: Vec<&[u8]> = frame.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(rows[1], &[9, 10, 11, 12, 13, 14, 15, 16, 17]);
    }
}
