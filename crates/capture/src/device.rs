//! This module contains [Framebuffer], a handle to an open framebuffer
//! device, along with the [Geometry] it reports and the read-only [Mapping]
//! of its pixel memory.

mod sys;

use std::fs::File;
use std::io;
use std::marker::PhantomData;
use std::ops::Deref;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::ptr;
use std::slice;

use thiserror::Error;

use crate::frame::Dimensions;

/// An open framebuffer device (e.g. `/dev/fb0`) whose geometry has already
/// been queried and validated.
///
/// The descriptor is held open for as long as this object lives and is closed
/// when it drops, on every path, error or not.
#[derive(Debug)]
pub struct Framebuffer {
    file: File,
    geometry: Geometry,
}

impl Framebuffer {
    /// Open a framebuffer device for reading and query its geometry.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DeviceError> {
        Self::open_impl(path.as_ref())
    }

    fn open_impl(path: &Path) -> Result<Self, DeviceError> {
        let file = File::open(path).map_err(|source| DeviceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // The variable info is where the resolution and pixel depth live; the
        // fixed info is where the line stride lives. Both are read once and
        // are immutable for the rest of the run.
        let var = sys::var_screen_info(&file).map_err(DeviceError::VariableInfo)?;
        let fix = sys::fix_screen_info(&file).map_err(DeviceError::FixedInfo)?;

        let Some(dimensions) = Dimensions::new(var.xres, var.yres) else {
            return Err(DeviceError::ZeroDimension {
                width: var.xres,
                height: var.yres,
            });
        };

        let geometry = Geometry::new(dimensions, var.bits_per_pixel, fix.line_length as usize)?;

        Ok(Self { file, geometry })
    }

    /// The geometry the device reported when it was opened.
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Map the device's pixel memory into the process, read-only and shared,
    /// starting at device offset 0.
    ///
    /// The mapping borrows `self` so it can never outlive the open
    /// descriptor. It is unmapped when it drops.
    pub fn map(&self) -> Result<Mapping<'_>, DeviceError> {
        let len = self.geometry.map_len();

        // SAFETY: We're asking the kernel for a fresh read-only mapping of an
        // open descriptor; no existing memory is aliased or modified. The
        // result is checked against `MAP_FAILED` before anyone reads from it.
        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ,
                libc::MAP_SHARED,
                self.file.as_raw_fd(),
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(DeviceError::Map(io::Error::last_os_error()));
        }

        log::debug!("Mapped {len} bytes of device memory.");

        Ok(Mapping {
            ptr: ptr as *const u8,
            len,
            _device: PhantomData,
        })
    }
}

/// What the device reported about its surface: visible resolution, pixel
/// depth, and the byte stride of each scanline.
///
/// The stride can exceed `width * bytes_per_pixel` when the driver pads rows
/// for alignment, which is why every row address in the source goes through
/// [Self::line_length] rather than being derived from the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    dimensions: Dimensions,
    bits_per_pixel: u32,
    line_length: usize,
}

impl Geometry {
    /// Construct a geometry, checking that `line_length` can actually hold a
    /// full row of pixels.
    pub const fn new(
        dimensions: Dimensions,
        bits_per_pixel: u32,
        line_length: usize,
    ) -> Result<Self, DeviceError> {
        let min_line_length = dimensions.width() as usize * bits_per_pixel.div_ceil(8) as usize;
        if line_length < min_line_length {
            return Err(DeviceError::StrideTooSmall {
                line_length,
                dimensions,
                bits_per_pixel,
            });
        }

        Ok(Self {
            dimensions,
            bits_per_pixel,
            line_length,
        })
    }

    /// The visible resolution.
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// The native pixel depth, in bits.
    pub const fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    /// The number of bytes in one scanline of the source, padding included.
    pub const fn line_length(&self) -> usize {
        self.line_length
    }

    /// The number of bytes a full frame occupies in the source, and therefore
    /// the number of bytes that get mapped.
    pub const fn map_len(&self) -> usize {
        self.line_length * self.dimensions.height() as usize
    }
}

/// A read-only view of the device's pixel memory.
///
/// Derefs to `&[u8]`. The memory is owned by the device driver; this object
/// only tracks the process-side mapping and unmaps it on drop.
#[derive(Debug)]
pub struct Mapping<'fb> {
    ptr: *const u8,
    len: usize,
    _device: PhantomData<&'fb Framebuffer>,
}

impl Deref for Mapping<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // SAFETY: `ptr` came from a successful `mmap` of `len` bytes and
        // stays valid until `munmap`, which only happens in our `Drop` (after
        // which no reference handed out here can still be alive, since they
        // all borrow `self`).
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl Drop for Mapping<'_> {
    fn drop(&mut self) {
        // SAFETY: `ptr`/`len` describe exactly the region `mmap` returned,
        // and we only unmap once. There is nothing useful to do if the kernel
        // refuses, so the result is discarded.
        _ = unsafe { libc::munmap(self.ptr as *mut libc::c_void, self.len) };
    }
}

/// Indicates that the framebuffer device could not be opened, described, or
/// mapped.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to query the variable screen info: {0}")]
    VariableInfo(#[source] io::Error),

    #[error("Failed to query the fixed screen info: {0}")]
    FixedInfo(#[source] io::Error),

    #[error("The device reported a {width}x{height} resolution.")]
    ZeroDimension { width: u32, height: u32 },

    #[error(
        "The device reported a line stride of {line_length} bytes, which \
        can't hold a row of {dimensions} at {bits_per_pixel} bits per pixel."
    )]
    StrideTooSmall {
        line_length: usize,
        dimensions: Dimensions,
        bits_per_pixel: u32,
    },

    #[error("Failed to map the device memory: {0}")]
    Map(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_must_hold_a_full_row() {
        let dimensions: Dimensions = (640, 480).into();

        // 640 pixels at 32 bpp need 2560 bytes per row.
        assert!(Geometry::new(dimensions, 32, 2560).is_ok());
        assert!(Geometry::new(dimensions, 32, 4096).is_ok());
        assert!(matches!(
            Geometry::new(dimensions, 32, 2559),
            Err(DeviceError::StrideTooSmall { .. })
        ));
    }

    #[test]
    fn map_len_uses_the_stride() {
        let geometry = Geometry::new((640, 480).into(), 16, 2048).unwrap();
        assert_eq!(geometry.map_len(), 2048 * 480);
    }

    #[test]
    fn missing_device_is_an_open_error() {
        let err = Framebuffer::open("/this/path/does/not/exist").unwrap_err();
        assert!(matches!(err, DeviceError::Open { .. }));
    }
}
