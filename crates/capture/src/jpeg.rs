//! The JPEG end of the pipeline. The codec itself comes from the `image`
//! crate; this module just adapts [RgbFrame]s to it and puts the result where
//! it belongs.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;

use crate::frame::RgbFrame;

/// Encode a frame as a baseline JPEG into any writer.
///
/// `quality` is on the encoder's 1 (worst) to 100 (best) scale.
pub fn encode<W: Write>(frame: &RgbFrame, quality: u8, writer: W) -> Result<(), EncodeError> {
    let mut encoder = JpegEncoder::new_with_quality(writer, quality);
    encoder.encode(
        frame.as_bytes(),
        frame.dimensions().width(),
        frame.dimensions().height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

/// Encode a frame as a baseline JPEG straight to a file, overwriting
/// whatever was there before.
pub fn write_to_path<P: AsRef<Path>>(
    frame: &RgbFrame,
    quality: u8,
    path: P,
) -> Result<(), EncodeError> {
    write_to_path_impl(frame, quality, path.as_ref())
}

fn write_to_path_impl(frame: &RgbFrame, quality: u8, path: &Path) -> Result<(), EncodeError> {
    let file = File::create(path).map_err(|source| EncodeError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    encode(frame, quality, &mut writer)?;
    writer.flush().map_err(EncodeError::Flush)?;

    Ok(())
}

/// Indicates that an encoded frame never made it out intact.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to encode the frame: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to flush the encoded frame: {0}")]
    Flush(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Dimensions;

    fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> RgbFrame {
        let dimensions = Dimensions::new(width, height).unwrap();
        let data: Box<[u8]> = rgb
            .iter()
            .copied()
            .cycle()
            .take(dimensions.area() * RgbFrame::CHANNELS)
            .collect();
        RgbFrame::from_raw(data, dimensions).unwrap()
    }

    #[test]
    fn output_starts_with_the_jpeg_soi_marker() {
        let frame = solid_frame(2, 2, [255, 0, 0]);

        let mut encoded = Vec::new();
        encode(&frame, 100, &mut encoded).unwrap();

        assert_eq!(&encoded[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn output_decodes_back_to_the_same_dimensions() {
        let frame = solid_frame(16, 9, [0, 128, 255]);

        let mut encoded = Vec::new();
        encode(&frame, 90, &mut encoded).unwrap();

        let decoded = image::load_from_memory(&encoded).unwrap().to_rgb8();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 9);
    }
}
