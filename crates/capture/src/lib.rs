//! This library contains all of the functionality for grabbing a frame out of
//! a framebuffer device and turning it into something a JPEG encoder can eat:
//! opening and memory-mapping the device, describing its [geometry], and
//! converting its native pixel format into packed 24-bit RGB.
//!
//! [geometry]: device::Geometry

pub mod device;
pub mod frame;
pub mod jpeg;
pub mod normalize;

pub use device::{DeviceError, Framebuffer, Geometry, Mapping};
pub use frame::{Dimensions, RgbFrame};
pub use jpeg::EncodeError;
pub use normalize::{NormalizeError, PixelLayout, normalize};
