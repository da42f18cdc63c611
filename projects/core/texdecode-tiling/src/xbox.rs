//! Xbox textures: swizzled linear pixels and XPR0 DXT1.

use texdecode_bcn::{Bc1Alpha, BcnFormat};
use texdecode_common::error::check_dimensions;
use texdecode_common::pixel_format::PixelFormat;
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::DecodeError;

use crate::swizzle::unswizzle;

/// Converts a swizzled Xbox texture of direct `format` pixels.
///
/// The pixels are unswizzled into linear order, then unpacked like any linear image.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` or `height` is zero or too large.
/// - [`DecodeError::TruncatedInput`] if `src` does not cover the swizzled image.
pub fn from_xbox_swizzled(
    format: PixelFormat,
    width: u32,
    height: u32,
    src: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;
    let bpp = format.bytes_per_pixel();
    let mut linear = vec![0u8; width as usize * height as usize * bpp];
    unswizzle(src, width, height, bpp, &mut linear)?;
    texdecode_linear::unpack(format, width, height, &linear, 0)
}

/// Decodes an XPR0 DXT1 texture.
///
/// DXT1 data is stored as plain linear blocks; the GPU unswizzles block textures on its own.
/// Index 3 of a three-color block is transparent.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if either dimension is not a power of two.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than the blocks the image needs.
pub fn from_xpr0_dxt1(width: u32, height: u32, src: &[u8]) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;
    if !width.is_power_of_two() || !height.is_power_of_two() {
        return Err(DecodeError::dimensions(width, height, "XPR0 textures must be a power of two"));
    }
    texdecode_bcn::decode(BcnFormat::Dxt1A1, width, height, src, Bc1Alpha::Transparent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swizzle::swizzle;
    use crate::test_prelude::*;

    #[test]
    fn swizzled_texture_matches_its_linear_source() {
        init_logging();
        let (width, height) = (16u32, 8u32);
        let linear: Vec<u8> = (0..width * height)
            .flat_map(|i| (0xFF00_0000 | i * 0x0102_03).to_le_bytes())
            .collect();
        let mut swizzled = vec![0; linear.len()];
        swizzle(&linear, width, height, 4, &mut swizzled).unwrap();

        let raster = from_xbox_swizzled(PixelFormat::Argb8888, width, height, &swizzled).unwrap();
        let expected = texdecode_linear::unpack(PixelFormat::Argb8888, width, height, &linear, 0).unwrap();
        assert_eq!(raster.to_packed_argb32(), expected.to_packed_argb32());
        assert_eq!(raster.sbit(), Some(PixelFormat::Argb8888.sbit()));
    }

    #[test]
    fn swizzled_short_source_is_truncated() {
        assert_eq!(
            from_xbox_swizzled(PixelFormat::Rgb565, 4, 4, &[0; 30]).unwrap_err(),
            DecodeError::TruncatedInput {
                needed: 32,
                actual: 30
            }
        );
    }

    #[test]
    fn xpr0_dxt1_decodes_linear_blocks_with_transparency() {
        // One 4x4 block: c0 = c1 = black, every index 3.
        let block = [0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
        let raster = from_xpr0_dxt1(4, 4, &block).unwrap();
        assert!(raster.to_packed_argb32().iter().all(|&px| px == 0));
    }

    #[test]
    fn xpr0_dxt1_rejects_non_power_of_two() {
        assert!(matches!(
            from_xpr0_dxt1(12, 4, &[0; 24]),
            Err(DecodeError::InvalidDimensions { .. })
        ));
    }
}
