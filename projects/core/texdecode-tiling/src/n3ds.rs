//! Nintendo 3DS textures: 8x8 tiles with Z order inside each tile.

use texdecode_common::color_565::Color565;
use texdecode_common::error::{check_dimensions, check_multiple_of, check_source_len, image_size};
use texdecode_common::pixel_format::Sbit;
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::DecodeError;

use crate::address::{compute_source_offset, TilingMode};

fn check_n3ds(width: u32, height: u32, src: &[u8]) -> Result<(), DecodeError> {
    check_dimensions(width, height)?;
    check_multiple_of(width, height, 8, 8, "3DS tiled dimensions must be multiples of 8")?;
    check_source_len(src, image_size(width, height, 2)?)
}

/// Converts a tiled little-endian RGB565 3DS texture.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if either dimension is not a multiple of 8.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height * 2`.
pub fn from_n3ds_tiled_rgb565(width: u32, height: u32, src: &[u8]) -> Result<CanonicalRaster, DecodeError> {
    check_n3ds(width, height, src)?;

    log::trace!("Decoding {width}x{height} 3DS RGB565 texture");
    let mut raster = CanonicalRaster::new_argb32(width, height)?;
    for (y, row) in raster.argb32_rows_mut().enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            let i = compute_source_offset(x as u32, y as u32, width, height, TilingMode::N3dsTiled) * 2;
            *px = Color565::from_le_bytes([src[i], src[i + 1]]).to_argb32();
        }
    }
    raster.set_sbit(Sbit::new(5, 6, 5, 0, 0));
    Ok(raster)
}

/// Converts a tiled RGB565 3DS texture with a separate 4-bit alpha plane.
///
/// The alpha plane uses the same tiling as the color data at two pixels per byte, the low
/// nybble holding the first pixel.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if either dimension is not a multiple of 8.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height * 2` or `alpha`
///   is shorter than `width * height / 2`.
pub fn from_n3ds_tiled_rgb565_a4(
    width: u32,
    height: u32,
    src: &[u8],
    alpha: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    check_n3ds(width, height, src)?;
    check_source_len(alpha, width as usize * height as usize / 2)?;

    log::trace!("Decoding {width}x{height} 3DS RGB565+A4 texture");
    let mut raster = CanonicalRaster::new_argb32(width, height)?;
    for (y, row) in raster.argb32_rows_mut().enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            let i = compute_source_offset(x as u32, y as u32, width, height, TilingMode::N3dsTiled);
            let a = (alpha[i / 2] >> ((i & 1) * 4)) & 0x0F;
            *px = Color565::from_le_bytes([src[i * 2], src[i * 2 + 1]]).to_argb32_with_alpha(a | a << 4);
        }
    }
    raster.set_sbit(Sbit::new(5, 6, 5, 0, 4));
    Ok(raster)
}
