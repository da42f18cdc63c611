//! GameCube and Wii textures: big-endian pixels in 4x4 and 8x4 tiles.

use texdecode_bcn::{color_palette, Bc1Alpha, ColorMode};
use texdecode_common::argb32::alpha;
use texdecode_common::color_565::Color565;
use texdecode_common::error::{check_dimensions, check_multiple_of, check_palette_len, check_source_len, image_size};
use texdecode_common::pixel_format::{PixelFormat, Sbit};
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::{Argb32, DecodeError};

use crate::address::{compute_source_offset, TilingMode};

/// Entries in a CI8 palette.
pub const GCN_CI8_PALETTE_LEN: usize = 256;

/// Walks the tiles of a `width` x `height` image, yielding each tile's top-left pixel.
/// Tiles are stored row-major and `width`/`height` must be multiples of the tile size.
fn tiles(width: u32, height: u32, tile_width: u32, tile_height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..height / tile_height)
        .flat_map(move |ty| (0..width / tile_width).map(move |tx| (tx * tile_width, ty * tile_height)))
}

/// Converts a 16-bit GameCube texture stored in 4x4 tiles.
///
/// `format` must be [`PixelFormat::Rgb5A3`], [`PixelFormat::Rgb565`] or [`PixelFormat::Ia8`].
/// Pixels are big-endian.
///
/// # Errors
///
/// - [`DecodeError::UnsupportedFormat`] for any other `format`.
/// - [`DecodeError::InvalidDimensions`] if either dimension is not a multiple of 4.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height * 2`.
pub fn from_gcn16(format: PixelFormat, width: u32, height: u32, src: &[u8]) -> Result<CanonicalRaster, DecodeError> {
    if !matches!(format, PixelFormat::Rgb5A3 | PixelFormat::Rgb565 | PixelFormat::Ia8) {
        return Err(DecodeError::UnsupportedFormat(format.name()));
    }
    check_dimensions(width, height)?;
    check_multiple_of(width, height, 4, 4, "GameCube 16-bit dimensions must be multiples of 4")?;
    check_source_len(src, image_size(width, height, 2)?)?;

    log::trace!("Decoding {width}x{height} GameCube {format} texture");
    let mut raster = CanonicalRaster::new_argb32(width, height)?;
    let mut tile = [0 as Argb32; 16];
    for ((x, y), block) in tiles(width, height, 4, 4).zip(src.chunks_exact(32)) {
        for (px, word) in tile.iter_mut().zip(block.chunks_exact(2)) {
            *px = format.to_argb32(u16::from_be_bytes([word[0], word[1]]) as u32);
        }
        raster.blit_tile(x, y, 4, 4, &tile);
    }
    raster.set_sbit(format.sbit());
    Ok(raster)
}

fn gcn_ci8_tiles(raster: &mut CanonicalRaster, src: &[u8]) {
    let (width, height) = (raster.width(), raster.height());
    for ((x, y), block) in tiles(width, height, 8, 4).zip(src.chunks_exact(32)) {
        raster.blit_ci8_tile(x, y, 8, 4, block);
    }
}

fn check_ci8_source(width: u32, height: u32, src: &[u8]) -> Result<(), DecodeError> {
    check_dimensions(width, height)?;
    check_multiple_of(width, height, 8, 4, "GameCube 8-bit dimensions must be multiples of 8x4")?;
    check_source_len(src, image_size(width, height, 1)?)
}

/// Converts an 8-bit paletted GameCube texture stored in 8x4 tiles.
///
/// `palette` holds 256 big-endian RGB5A3 entries.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` is not a multiple of 8 or `height` is not a
///   multiple of 4.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height`.
/// - [`DecodeError::MalformedPalette`] if `palette` is shorter than 512 bytes.
pub fn from_gcn_ci8(width: u32, height: u32, src: &[u8], palette: &[u8]) -> Result<CanonicalRaster, DecodeError> {
    check_ci8_source(width, height, src)?;
    check_palette_len(palette, GCN_CI8_PALETTE_LEN * 2)?;

    let mut raster = CanonicalRaster::new_ci8(width, height)?;
    let mut tr_idx = None;
    for (i, (dst, entry)) in raster
        .palette_mut()
        .iter_mut()
        .zip(palette.chunks_exact(2))
        .enumerate()
    {
        *dst = PixelFormat::Rgb5A3.to_argb32(u16::from_be_bytes([entry[0], entry[1]]) as u32);
        if tr_idx.is_none() && alpha(*dst) == 0 {
            tr_idx = Some(i as u8);
        }
    }
    raster.set_tr_idx(tr_idx);

    gcn_ci8_tiles(&mut raster, src);
    raster.set_sbit(PixelFormat::Rgb5A3.sbit());
    Ok(raster)
}

/// Converts an 8-bit grayscale GameCube texture stored in 8x4 tiles.
///
/// The result is a CI8 raster with a 256-step gray ramp.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` is not a multiple of 8 or `height` is not a
///   multiple of 4.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height`.
pub fn from_gcn_i8(width: u32, height: u32, src: &[u8]) -> Result<CanonicalRaster, DecodeError> {
    check_ci8_source(width, height, src)?;

    let mut raster = CanonicalRaster::new_ci8(width, height)?;
    for (i, dst) in raster.palette_mut().iter_mut().enumerate() {
        *dst = 0xFF00_0000 + i as u32 * 0x0001_0101;
    }
    raster.set_tr_idx(None);

    gcn_ci8_tiles(&mut raster, src);
    raster.set_sbit(Sbit::new(8, 8, 8, 0, 0));
    Ok(raster)
}

/// Decodes one big-endian DXT1 block. Index 3 of a three-color block is transparent, and the
/// first pixel sits in the top two bits of the index word.
fn decode_gcn_dxt1_block(block: &[u8]) -> [Argb32; 16] {
    let c0 = Color565::from_be_bytes([block[0], block[1]]);
    let c1 = Color565::from_be_bytes([block[2], block[3]]);
    let palette = color_palette(c0, c1, ColorMode::Auto(Bc1Alpha::Transparent));
    let indices = u32::from_be_bytes([block[4], block[5], block[6], block[7]]);
    core::array::from_fn(|i| palette[(indices >> (2 * (15 - i)) & 3) as usize])
}

/// Converts a GameCube DXT1 texture, which groups its 4x4 blocks into 8x8 super-tiles.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if either dimension is not a multiple of 8.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height / 2`.
pub fn from_dxt1_gcn(width: u32, height: u32, src: &[u8]) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;
    check_multiple_of(width, height, 8, 8, "GameCube DXT1 dimensions must be multiples of 8")?;
    check_source_len(src, width as usize * height as usize / 2)?;

    log::trace!("Decoding {width}x{height} GameCube DXT1 texture");
    let mut raster = CanonicalRaster::new_argb32(width, height)?;
    for y in (0..height).step_by(4) {
        for x in (0..width).step_by(4) {
            let block = compute_source_offset(x, y, width, height, TilingMode::BlockSuperTiles) * 8;
            raster.blit_tile(x, y, 4, 4, &decode_gcn_dxt1_block(&src[block..block + 8]));
        }
    }
    raster.set_sbit(Sbit::new(8, 8, 8, 0, 1));
    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn gcn16_reads_big_endian_4x4_tiles() {
        init_logging();
        // 8x4: two tiles. Tile 0 is all red RGB565, tile 1 counts up in blue.
        let mut src = Vec::new();
        src.extend((0..16).flat_map(|_| 0xF800u16.to_be_bytes()));
        src.extend((0..16u16).flat_map(|i| (i * 2).to_be_bytes()));
        let raster = from_gcn16(PixelFormat::Rgb565, 8, 4, &src).unwrap();

        assert_eq!(raster.pixel(3, 3), Some(0xFFFF0000));
        // Tile 1, pixel 5 is (5, 1): blue 10 of 31.
        assert_eq!(raster.pixel(5, 1), Some(PixelFormat::Rgb565.to_argb32(10)));
        assert_eq!(raster.sbit(), Some(Sbit::new(5, 6, 5, 0, 0)));
    }

    #[rstest]
    // Opaque RGB5A3: top bit set, 5-5-5.
    #[case(PixelFormat::Rgb5A3, 0xFC00, 0xFFFF0000)]
    // Translucent RGB5A3: 3-bit alpha, 4-4-4.
    #[case(PixelFormat::Rgb5A3, 0x0F00, 0x00FF0000)]
    // IA8: intensity in the high byte.
    #[case(PixelFormat::Ia8, 0x80C0, 0xC0808080)]
    fn gcn16_converts_each_format(#[case] format: PixelFormat, #[case] word: u16, #[case] expected: Argb32) {
        let src: Vec<u8> = (0..16).flat_map(|_| word.to_be_bytes()).collect();
        let raster = from_gcn16(format, 4, 4, &src).unwrap();
        assert_eq!(raster.pixel(0, 0), Some(expected));
        assert_eq!(raster.sbit(), Some(format.sbit()));
    }

    #[test]
    fn gcn16_rejects_other_formats_and_misaligned_sizes() {
        assert_eq!(
            from_gcn16(PixelFormat::Argb1555, 4, 4, &[0; 32]).unwrap_err(),
            DecodeError::UnsupportedFormat("ARGB1555")
        );
        assert!(matches!(
            from_gcn16(PixelFormat::Rgb565, 6, 4, &[0; 48]),
            Err(DecodeError::InvalidDimensions { .. })
        ));
    }

    fn rgb5a3_palette() -> Vec<u8> {
        // Entry 0 opaque, entry 1 fully transparent, the rest opaque white.
        let mut palette = vec![0xFF; 512];
        palette[..4].copy_from_slice(&[0xFC, 0x00, 0x00, 0x00]);
        palette
    }

    #[test]
    fn gcn_ci8_reads_8x4_tiles_and_finds_the_transparent_entry() {
        init_logging();
        // 16x4: tile 1 starts at byte 32.
        let src: Vec<u8> = (0..64u8).collect();
        let raster = from_gcn_ci8(16, 4, &src, &rgb5a3_palette()).unwrap();

        assert_eq!(raster.ci8_row(0), &[0, 1, 2, 3, 4, 5, 6, 7, 32, 33, 34, 35, 36, 37, 38, 39]);
        assert_eq!(raster.ci8_row(3)[8], 56);
        assert_eq!(raster.tr_idx(), Some(1));
        assert_eq!(raster.palette()[0], 0xFFFF0000);
        assert_eq!(raster.palette()[1], 0x00000000);
        assert_eq!(raster.sbit(), Some(Sbit::new(5, 5, 5, 0, 4)));
    }

    #[test]
    fn gcn_ci8_short_palette_is_malformed() {
        assert_eq!(
            from_gcn_ci8(8, 4, &[0; 32], &[0; 510]).unwrap_err(),
            DecodeError::MalformedPalette {
                needed: 512,
                actual: 510
            }
        );
    }

    #[test]
    fn gcn_i8_uses_a_gray_ramp() {
        let src: Vec<u8> = (0..32u8).map(|i| i * 8).collect();
        let raster = from_gcn_i8(8, 4, &src).unwrap();
        assert_eq!(raster.pixel(1, 0), Some(0xFF080808));
        assert_eq!(raster.pixel(7, 3), Some(0xFFF8F8F8));
        assert_eq!(raster.palette()[255], 0xFFFFFFFF);
        assert_eq!(raster.tr_idx(), None);
        assert_eq!(raster.sbit(), Some(Sbit::new(8, 8, 8, 0, 0)));
    }

    #[test]
    fn gcn_i8_rejects_misaligned_sizes() {
        assert!(matches!(
            from_gcn_i8(4, 4, &[0; 16]),
            Err(DecodeError::InvalidDimensions { .. })
        ));
    }

    /// A big-endian block with white and black endpoints where every pixel uses `index`.
    fn be_block(c0: u16, c1: u16, index: u32) -> [u8; 8] {
        let indices = (0..16).fold(0u32, |acc, _| acc << 2 | index);
        let mut block = [0; 8];
        block[..2].copy_from_slice(&c0.to_be_bytes());
        block[2..4].copy_from_slice(&c1.to_be_bytes());
        block[4..].copy_from_slice(&indices.to_be_bytes());
        block
    }

    #[test]
    fn dxt1_gcn_places_blocks_in_super_tiles() {
        init_logging();
        // 16x8: two super-tiles, eight blocks. Block n is solid color0 = n.
        let src: Vec<u8> = (0..8u16).flat_map(|n| be_block(n * 0x0800, 0, 0)).collect();
        let raster = from_dxt1_gcn(16, 8, &src).unwrap();

        let block_at = |x: u32, y: u32| {
            let px = raster.pixel(x, y).unwrap();
            (0..8u16).position(|n| Color565::from_raw(n * 0x0800).to_argb32() == px)
        };
        assert_eq!(block_at(0, 0), Some(0));
        assert_eq!(block_at(4, 0), Some(1));
        assert_eq!(block_at(0, 4), Some(2));
        assert_eq!(block_at(4, 4), Some(3));
        assert_eq!(block_at(8, 0), Some(4));
        assert_eq!(block_at(12, 4), Some(7));
        assert_eq!(raster.sbit(), Some(Sbit::new(8, 8, 8, 0, 1)));
    }

    #[test]
    fn dxt1_gcn_index_order_and_transparency() {
        // c0 <= c1: three colors plus transparent index 3. Pixel 0 uses index 1, pixel 15
        // uses index 3.
        let mut block = be_block(0x0000, 0xFFFF, 0);
        block[4..].copy_from_slice(&(1u32 << 30 | 3).to_be_bytes());
        let mut src = vec![0u8; 32];
        src[..8].copy_from_slice(&block);

        let raster = from_dxt1_gcn(8, 8, &src).unwrap();
        assert_eq!(raster.pixel(0, 0), Some(0xFFFFFFFF));
        assert_eq!(raster.pixel(1, 0), Some(0xFF000000));
        assert_eq!(raster.pixel(3, 3), Some(0x00000000));
    }

    #[test]
    fn dxt1_gcn_short_source_is_truncated() {
        assert_eq!(
            from_dxt1_gcn(8, 8, &[0; 31]).unwrap_err(),
            DecodeError::TruncatedInput {
                needed: 32,
                actual: 31
            }
        );
    }
}
