//! Error type shared by every decoder in the workspace.

use thiserror::Error;

/// Largest width or height accepted by any decoder.
pub const MAX_DIMENSION: u32 = 32768;

/// Errors returned by the decode entry points.
///
/// Every precondition is checked before the source buffer is indexed, so an error never
/// leaves a partially written raster behind for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Width or height is zero, exceeds [`MAX_DIMENSION`], or violates a format constraint
    /// such as block alignment or a power-of-two requirement.
    #[error("Invalid dimensions {width}x{height}: {reason}.")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: &'static str,
    },

    /// The format is not implemented for this entry point, or was disabled at build time.
    #[error("Unsupported format: {0}.")]
    UnsupportedFormat(&'static str),

    /// The source buffer is shorter than the computed decode size.
    #[error("Input too short: need {needed} bytes, but only {actual} bytes available.")]
    TruncatedInput { needed: usize, actual: usize },

    /// The palette buffer holds fewer entries than the format requires.
    #[error("Palette too short: need {needed} bytes, but only {actual} bytes available.")]
    MalformedPalette { needed: usize, actual: usize },

    /// A non-zero row stride is smaller than one row, or not a whole number of pixels.
    #[error("Invalid stride: {stride} bytes. A row needs at least {min} bytes, in whole pixels.")]
    InvalidStride { stride: usize, min: usize },

    /// An index read from the source points outside the codebook or the source buffer.
    #[error("Index {index} is out of range (limit: {limit}).")]
    OutOfRangeIndex { index: usize, limit: usize },
}

impl DecodeError {
    /// Shorthand for [`DecodeError::InvalidDimensions`].
    #[inline]
    pub fn dimensions(width: u32, height: u32, reason: &'static str) -> Self {
        DecodeError::InvalidDimensions {
            width,
            height,
            reason,
        }
    }
}

/// Validates the dimensions every decoder shares: both non-zero and at most [`MAX_DIMENSION`].
#[inline]
pub fn check_dimensions(width: u32, height: u32) -> Result<(), DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::dimensions(width, height, "width and height must be non-zero"));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(DecodeError::dimensions(
            width,
            height,
            "width and height must not exceed 32768",
        ));
    }
    Ok(())
}

/// Validates that both dimensions are multiples of the given tile extent.
#[inline]
pub fn check_multiple_of(
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    reason: &'static str,
) -> Result<(), DecodeError> {
    if width % tile_width != 0 || height % tile_height != 0 {
        return Err(DecodeError::dimensions(width, height, reason));
    }
    Ok(())
}

/// Validates that `src` holds at least `needed` bytes.
#[inline]
pub fn check_source_len(src: &[u8], needed: usize) -> Result<(), DecodeError> {
    if src.len() < needed {
        return Err(DecodeError::TruncatedInput {
            needed,
            actual: src.len(),
        });
    }
    Ok(())
}

/// Validates that `palette` holds at least `needed` bytes.
#[inline]
pub fn check_palette_len(palette: &[u8], needed: usize) -> Result<(), DecodeError> {
    if palette.len() < needed {
        return Err(DecodeError::MalformedPalette {
            needed,
            actual: palette.len(),
        });
    }
    Ok(())
}

/// Computes `width * height * bytes_per_unit`, rejecting sizes that overflow `usize`.
#[inline]
pub fn image_size(width: u32, height: u32, bytes_per_unit: usize) -> Result<usize, DecodeError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(bytes_per_unit))
        .ok_or_else(|| DecodeError::dimensions(width, height, "image size overflows"))
}
