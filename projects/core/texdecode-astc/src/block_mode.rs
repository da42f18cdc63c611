//! The 11-bit block mode: weight grid size, weight range and dual-plane flag.

use crate::ise::{Quant, QUANTS};

/// Largest number of weights a block may carry.
pub(crate) const MAX_WEIGHTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockMode {
    pub grid_width: usize,
    pub grid_height: usize,
    pub dual_plane: bool,
    pub weight_quant: Quant,
}

impl BlockMode {
    /// Number of weights stored in the block, counting both planes.
    pub fn weight_count(&self) -> usize {
        self.grid_width * self.grid_height * if self.dual_plane { 2 } else { 1 }
    }

    /// Number of bits the weights occupy.
    pub fn weight_bits(&self) -> usize {
        self.weight_quant.ise_bits(self.weight_count())
    }

    /// Decodes a 2D block mode for a `block_width` x `block_height` footprint. Returns `None`
    /// for reserved modes and for grids the footprint cannot hold.
    pub fn decode(mode: u32, block_width: usize, block_height: usize) -> Option<Self> {
        let bit = |i: u32| (mode >> i) & 1;
        let a = ((mode >> 5) & 0x3) as usize;
        let mut high_precision = bit(9) != 0;
        let mut dual_plane = bit(10) != 0;

        let (range, grid_width, grid_height) = if mode & 0x3 != 0 {
            let b = ((mode >> 7) & 0x3) as usize;
            let (width, height) = match (mode >> 2) & 0x3 {
                0 => (b + 4, a + 2),
                1 => (b + 8, a + 2),
                2 => (a + 2, b + 8),
                _ if bit(8) == 0 => (a + 2, (b & 1) + 6),
                _ => ((b & 1) + 2, a + 2),
            };
            ((mode & 0x3) << 1 | bit(4), width, height)
        } else {
            let range = ((mode >> 2) & 0x3) << 1 | bit(4);
            if range < 2 {
                return None;
            }
            let b = ((mode >> 9) & 0x3) as usize;
            let (width, height) = match (mode >> 7) & 0x3 {
                0 => (12, a + 2),
                1 => (a + 2, 12),
                2 => {
                    high_precision = false;
                    dual_plane = false;
                    (a + 6, b + 6)
                }
                _ => match a {
                    0 => (6, 10),
                    1 => (10, 6),
                    _ => return None,
                },
            };
            (range, width, height)
        };

        let quant_index = (range as usize - 2) + if high_precision { 6 } else { 0 };
        let block_mode = Self {
            grid_width,
            grid_height,
            dual_plane,
            weight_quant: QUANTS[quant_index],
        };
        let weight_bits = block_mode.weight_bits();
        if grid_width > block_width
            || grid_height > block_height
            || block_mode.weight_count() > MAX_WEIGHTS
            || !(24..=96).contains(&weight_bits)
        {
            return None;
        }
        Some(block_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    // 4x4 grid, 2-bit weights.
    #[case(0x042, (4, 4), false, 4)]
    #[case(0x442, (4, 4), true, 4)]
    // R = 7 with high precision: 32 levels on a 4x2 grid.
    #[case(0x213, (4, 2), false, 32)]
    #[case(0x017, (8, 2), false, 8)]
    // bits[1:0] == 0 layouts.
    #[case(0x108, (6, 6), false, 4)]
    #[case(0x114, (6, 6), false, 3)]
    #[case(0x1B4, (10, 6), false, 3)]
    fn decodes_grid_and_range(
        #[case] mode: u32,
        #[case] grid: (usize, usize),
        #[case] dual_plane: bool,
        #[case] levels: u16,
    ) {
        let decoded = BlockMode::decode(mode, 12, 12).unwrap();
        assert_eq!((decoded.grid_width, decoded.grid_height), grid);
        assert_eq!(decoded.dual_plane, dual_plane);
        assert_eq!(decoded.weight_quant.levels, levels);
    }

    #[rstest]
    #[case(0x000)] // R < 2
    #[case(0x010)] // R == 1
    #[case(0x1EC)] // bits[8:5] == 1111
    #[case(0x041)] // 16 one-bit weights: too few bits
    #[case(0x5FB)] // 5x11 dual-plane grid: too many weights
    fn rejects_reserved_and_invalid_modes(#[case] mode: u32) {
        assert_eq!(BlockMode::decode(mode, 12, 12), None);
    }

    #[test]
    fn grid_must_fit_in_the_footprint() {
        // 12x2 grid of quints.
        let mode = 0x018;
        assert!(BlockMode::decode(mode, 12, 12).is_some());
        assert_eq!(BlockMode::decode(mode, 10, 10), None);
    }
}
