//! Validated entry point of the linear unpacker.

use likely_stable::unlikely;
use texdecode_common::error::{check_dimensions, check_source_len, image_size};
use texdecode_common::pixel_format::PixelFormat;
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::DecodeError;

use crate::dispatch::{strategies, StrategyTable};

/// Converts a linear array of `format` pixels into an ARGB32 raster.
///
/// `stride` is the distance between source rows in bytes. Pass `0` for tightly packed rows.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` or `height` is zero or too large.
/// - [`DecodeError::InvalidStride`] if a non-zero `stride` is shorter than one row or is not a
///   whole number of pixels.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `stride * height` (or
///   `width * height * bytes_per_pixel` when `stride` is zero).
pub fn unpack(
    format: PixelFormat,
    width: u32,
    height: u32,
    src: &[u8],
    stride: usize,
) -> Result<CanonicalRaster, DecodeError> {
    unpack_with(strategies(), format, width, height, src, stride)
}

/// [`unpack`] using an explicit strategy table.
pub fn unpack_with(
    table: &StrategyTable,
    format: PixelFormat,
    width: u32,
    height: u32,
    src: &[u8],
    stride: usize,
) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;

    let bpp = format.bytes_per_pixel();
    let row_bytes = width as usize * bpp;
    let (src_stride, needed) = if stride == 0 {
        (row_bytes, image_size(width, height, bpp)?)
    } else {
        if unlikely(stride < row_bytes || stride % bpp != 0) {
            return Err(DecodeError::InvalidStride {
                stride,
                min: row_bytes,
            });
        }
        let needed = stride
            .checked_mul(height as usize)
            .ok_or_else(|| DecodeError::dimensions(width, height, "image size overflows"))?;
        (stride, needed)
    };
    check_source_len(src, needed)?;

    let mut raster = CanonicalRaster::new_argb32(width, height)?;
    table.select(format).run(format, src, src_stride, &mut raster);
    raster.set_sbit(format.sbit());
    Ok(raster)
}
