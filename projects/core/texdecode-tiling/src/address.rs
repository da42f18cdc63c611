//! Source addressing for every platform layout.

use crate::swizzle::SwizzleMasks;
use crate::twiddle::{twiddled_index, z_order_index};

/// A platform memory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilingMode {
    /// Row-major pixels.
    Linear,
    /// Morton order over the whole image (Dreamcast). Square power-of-two images only.
    Twiddled,
    /// One index byte per 2x2 pixel group, groups in Morton order (Dreamcast VQ).
    VectorQuantized,
    /// Bits of x and y interleaved through generated masks (Xbox).
    Swizzled,
    /// Row-major tiles of `width` x `height` pixels, row-major inside each tile (GameCube 4x4
    /// and 8x4, Nintendo DS 8x8).
    Tiled {
        /// Tile width, in pixels.
        width: u32,
        /// Tile height, in pixels.
        height: u32,
    },
    /// 4x4 blocks grouped into 2x2 super-tiles, super-tiles row-major (GameCube DXT1).
    BlockSuperTiles,
    /// Row-major 8x8 tiles with Z order inside each tile (Nintendo 3DS).
    N3dsTiled,
}

/// Offset in the source of the unit that holds pixel `(x, y)` of a `width` x `height` image.
///
/// The unit is a pixel for every mode except [`TilingMode::VectorQuantized`], where it is the
/// index byte of the 2x2 group, and [`TilingMode::BlockSuperTiles`], where it is the 4x4 block.
/// `(x, y)` must lie inside the image.
pub fn compute_source_offset(x: u32, y: u32, width: u32, height: u32, mode: TilingMode) -> usize {
    debug_assert!(x < width && y < height, "({x}, {y}) is outside {width}x{height}");
    match mode {
        TilingMode::Linear => y as usize * width as usize + x as usize,
        TilingMode::Twiddled => twiddled_index(x, y),
        TilingMode::VectorQuantized => twiddled_index(x / 2, y / 2),
        TilingMode::Swizzled => SwizzleMasks::new(width, height).offset(x, y),
        TilingMode::Tiled {
            width: tile_width,
            height: tile_height,
        } => tiled_offset(x, y, width, tile_width, tile_height),
        TilingMode::BlockSuperTiles => {
            let (bx, by) = (x as usize / 4, y as usize / 4);
            let super_tiles_x = (width as usize).div_ceil(8);
            let super_tile = (by / 2) * super_tiles_x + bx / 2;
            super_tile * 4 + (by % 2) * 2 + bx % 2
        }
        TilingMode::N3dsTiled => {
            let tile = tiled_offset(x, y, width, 8, 8) / 64;
            tile * 64 + z_order_index(x % 8, y % 8)
        }
    }
}

#[inline]
pub(crate) fn tiled_offset(x: u32, y: u32, width: u32, tile_width: u32, tile_height: u32) -> usize {
    let tiles_x = width.div_ceil(tile_width) as usize;
    let tile = (y / tile_height) as usize * tiles_x + (x / tile_width) as usize;
    let inner = (y % tile_height) * tile_width + x % tile_width;
    tile * (tile_width * tile_height) as usize + inner as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn is_bijection(width: u32, height: u32, mode: TilingMode) -> bool {
        let mut seen = vec![false; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                match seen.get_mut(compute_source_offset(x, y, width, height, mode)) {
                    Some(slot) if !*slot => *slot = true,
                    _ => return false,
                }
            }
        }
        true
    }

    #[rstest]
    #[case(TilingMode::Linear, 7, 3)]
    #[case(TilingMode::Twiddled, 256, 256)]
    #[case(TilingMode::Swizzled, 64, 16)]
    #[case(TilingMode::Tiled { width: 4, height: 4 }, 16, 8)]
    #[case(TilingMode::Tiled { width: 8, height: 4 }, 32, 12)]
    #[case(TilingMode::N3dsTiled, 48, 24)]
    fn pixel_modes_are_bijections(#[case] mode: TilingMode, #[case] width: u32, #[case] height: u32) {
        assert!(is_bijection(width, height, mode));
    }

    #[test]
    fn twiddled_is_a_bijection_for_every_power_of_two_up_to_256() {
        for k in 0..=8 {
            let n = 1 << k;
            assert!(is_bijection(n, n, TilingMode::Twiddled), "{n}x{n}");
        }
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(4, 0, 1)]
    #[case(0, 4, 2)]
    #[case(7, 7, 3)]
    #[case(8, 0, 4)]
    #[case(0, 8, 8)]
    #[case(13, 9, 13)]
    fn block_super_tiles_group_four_blocks(#[case] x: u32, #[case] y: u32, #[case] expected: usize) {
        // 16x16: two super-tiles per row.
        assert_eq!(compute_source_offset(x, y, 16, 16, TilingMode::BlockSuperTiles), expected);
    }

    #[rstest]
    #[case(1, 0, 1)]
    #[case(0, 1, 2)]
    #[case(2, 0, 4)]
    #[case(7, 7, 63)]
    #[case(8, 0, 64)]
    #[case(0, 8, 128)]
    fn n3ds_tiles_use_z_order_inside(#[case] x: u32, #[case] y: u32, #[case] expected: usize) {
        assert_eq!(compute_source_offset(x, y, 16, 16, TilingMode::N3dsTiled), expected);
    }

    #[test]
    fn vector_quantized_groups_share_an_index() {
        let at = |x, y| compute_source_offset(x, y, 8, 8, TilingMode::VectorQuantized);
        assert_eq!(at(0, 0), at(1, 1));
        assert_eq!(at(2, 0), 2);
        assert_eq!(at(0, 2), 1);
        assert_eq!(at(7, 7), 15);
    }
}
