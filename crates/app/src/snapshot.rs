//! The top-level capture routine: open the device, normalize one frame, and
//! hand it to the JPEG encoder.

use std::path::PathBuf;

use thiserror::Error;

use capture::{DeviceError, EncodeError, Framebuffer, NormalizeError, jpeg, normalize};

/// The device captured from when no other is named.
pub const DEFAULT_DEVICE: &str = "/dev/fb0";

/// The output path written to when no other is named.
pub const DEFAULT_OUTPUT: &str = "output.jpg";

/// The quality encoded at when no other is given.
pub const DEFAULT_QUALITY: u8 = 100;

/// Everything [take] needs to know for one capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// The framebuffer device to capture from.
    pub device: PathBuf,
    /// Where the JPEG goes. An existing file is overwritten.
    pub output: PathBuf,
    /// JPEG quality, 1 to 100.
    pub quality: u8,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.into(),
            output: DEFAULT_OUTPUT.into(),
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Capture a single frame from the configured device and write it out as a
/// JPEG.
///
/// The device descriptor and the memory mapping are both released before this
/// function returns, whether it succeeds or not; the normalized frame is
/// dropped once encoding finishes.
pub fn take(config: &SnapshotConfig) -> Result<(), SnapshotError> {
    let device = Framebuffer::open(&config.device)?;

    let geometry = device.geometry();
    log::info!(
        "Capturing {} at {} bits per pixel from {}.",
        geometry.dimensions(),
        geometry.bits_per_pixel(),
        config.device.display(),
    );

    let frame = {
        let mapping = device.map()?;
        normalize(&mapping, &geometry)?
        // The mapping is released here; encoding only needs the normalized
        // copy.
    };

    jpeg::write_to_path(&frame, config.quality, &config.output)?;
    log::info!("Wrote {}.", config.output.display());

    Ok(())
}

/// Indicates that a snapshot never made it to disk.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_documented_literals() {
        let config = SnapshotConfig::default();
        assert_eq!(config.device, PathBuf::from("/dev/fb0"));
        assert_eq!(config.output, PathBuf::from("output.jpg"));
        assert_eq!(config.quality, 100);
    }

    #[test]
    fn missing_device_is_reported_as_an_open_failure() {
        let config = SnapshotConfig {
            device: "/this/path/does/not/exist".into(),
            ..SnapshotConfig::default()
        };

        let err = take(&config).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Device(DeviceError::Open { .. })
        ));
    }
}
