#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

pub mod argb32;
pub mod capability;
pub mod color_565;
pub mod cpu_detect;
pub mod error;
#[allow(missing_docs)]
pub mod pixel_format;
#[allow(missing_docs)]
pub mod raster;

pub use argb32::Argb32;
pub use capability::{detect, Capability, CapabilitySet};
pub use error::DecodeError;
pub use pixel_format::{BitDepth, PixelFormat, Sbit};
pub use raster::{CanonicalRaster, RasterFormat};

#[cfg(test)]
pub mod test_prelude;
