//! ETC1 and ETC2 color block decoding.
//!
//! A color block is 8 bytes, big-endian: three color bytes, a control byte, then the most
//! and least significant bits of the 16 pixel indices. Pixels are numbered column by column.
//!
//! References:
//! - https://registry.khronos.org/OpenGL/extensions/OES/OES_compressed_ETC1_RGB8_texture.txt
//! - https://registry.khronos.org/DataFormat/specs/1.3/dataformat.1.3.html#ETC2

use texdecode_common::argb32::{argb, expand_bits, TRANSPARENT};
use texdecode_common::Argb32;

/// Which extensions of the ETC1 block format are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EtcMode {
    /// ETC1 only: individual and differential blocks.
    Etc1,
    /// ETC2: adds the `T`, `H` and `Planar` modes.
    Etc2,
    /// ETC2 with punch-through alpha: the differential bit is the opaque bit.
    Etc2PunchThrough,
}

// Modifiers in index order: small positive, large positive, small negative, large negative.
#[rustfmt::skip]
const INTENSITY: [[i32; 4]; 8] = [
    [ 2,   8,  -2,   -8],
    [ 5,  17,  -5,  -17],
    [ 9,  29,  -9,  -29],
    [13,  42, -13,  -42],
    [18,  60, -18,  -60],
    [24,  80, -24,  -80],
    [33, 106, -33, -106],
    [47, 183, -47, -183],
];

// Punch-through blocks without the opaque bit drop the small modifiers.
#[rustfmt::skip]
const INTENSITY_A1: [[i32; 4]; 8] = [
    [0,   8, 0,   -8],
    [0,  17, 0,  -17],
    [0,  29, 0,  -29],
    [0,  42, 0,  -42],
    [0,  60, 0,  -60],
    [0,  80, 0,  -80],
    [0, 106, 0, -106],
    [0, 183, 0, -183],
];

/// Sub-block membership of each pixel (column-major bit order), by flip bit.
const SUBBLOCKS: [u16; 2] = [0xFF00, 0xCCCC];

/// 3-bit two's complement.
const DIFF: [i32; 8] = [0, 1, 2, 3, -4, -3, -2, -1];

/// `T` and `H` mode distances.
const DISTANCES: [i32; 8] = [3, 6, 11, 16, 23, 32, 41, 64];

/// Tile position of the `i`-th pixel of a block. Blocks store pixels column by column.
#[inline(always)]
pub(crate) const fn tile_index(i: usize) -> usize {
    (i % 4) * 4 + i / 4
}

type Rgb = [i32; 3];

#[inline(always)]
fn clamp(color: Rgb) -> Argb32 {
    let [r, g, b] = color.map(|c| c.clamp(0, 255) as u8);
    argb(0xFF, r, g, b)
}

#[inline(always)]
fn offset(color: Rgb, delta: i32) -> Argb32 {
    clamp(color.map(|c| c + delta))
}

#[inline(always)]
fn expand(value: u8, bits: u8) -> i32 {
    expand_bits(value as u32, bits) as i32
}

/// The colors of a block, by decoding mode.
enum Colors {
    /// Individual or differential: a base color per sub-block, adjusted by intensity.
    SubBlocks([Rgb; 2]),
    /// `T` or `H`: four paint colors selected directly by the pixel index.
    Paint([Argb32; 4]),
    /// `Planar`: origin, horizontal and vertical colors.
    Planar([Rgb; 3]),
}

fn t_mode(block: &[u8; 8]) -> Colors {
    let [b0, b1, b2, control, ..] = *block;
    let c1 = [
        expand(((b0 & 0x18) >> 1) | (b0 & 0x03), 4),
        expand(b1 >> 4, 4),
        expand(b1 & 0x0F, 4),
    ];
    let c2 = [expand(b2 >> 4, 4), expand(b2 & 0x0F, 4), expand(control >> 4, 4)];
    let d = DISTANCES[(((control & 0x0C) >> 1) | (control & 0x01)) as usize];
    Colors::Paint([clamp(c1), offset(c2, d), clamp(c2), offset(c2, -d)])
}

fn h_mode(block: &[u8; 8]) -> Colors {
    let [b0, b1, b2, control, ..] = *block;
    let c1 = [
        expand((b0 >> 3) & 0x0F, 4),
        expand(((b0 & 0x07) << 1) | ((b1 >> 4) & 0x01), 4),
        expand((b1 & 0x08) | ((b1 & 0x03) << 1) | (b2 >> 7), 4),
    ];
    let c2 = [
        expand((b2 >> 3) & 0x0F, 4),
        expand(((b2 & 0x07) << 1) | (control >> 7), 4),
        expand((control >> 3) & 0x0F, 4),
    ];
    // The low bit of the distance index is implied by the order of the two colors.
    let d_index = (control & 0x04) | ((control & 0x01) << 1) | (clamp(c1) >= clamp(c2)) as u8;
    let d = DISTANCES[d_index as usize];
    Colors::Paint([offset(c1, d), offset(c1, -d), offset(c2, d), offset(c2, -d)])
}

fn planar_mode(block: &[u8; 8]) -> Colors {
    let p = block;
    let origin = [
        expand((p[0] >> 1) & 0x3F, 6),
        expand(((p[0] << 6) & 0x40) | ((p[1] >> 1) & 0x3F), 7),
        expand(((p[1] << 5) & 0x20) | (p[2] & 0x18) | ((p[2] << 1) & 0x06) | (p[3] >> 7), 6),
    ];
    let horizontal = [
        expand(((p[3] >> 1) & 0x3C) | (p[3] & 0x01), 6),
        expand(p[4] >> 1, 7),
        expand(((p[4] << 5) & 0x20) | (p[5] >> 3), 6),
    ];
    let vertical = [
        expand(((p[5] << 3) & 0x38) | (p[6] >> 5), 6),
        expand(((p[6] << 2) & 0x7C) | (p[7] >> 6), 7),
        expand(p[7] & 0x3F, 6),
    ];
    Colors::Planar([origin, horizontal, vertical])
}

/// Decodes an ETC1 or ETC2 color block into a row-major 4x4 tile.
pub fn decode_etc_block(block: &[u8; 8], mode: EtcMode) -> [Argb32; 16] {
    let [r, g, b, control, ..] = *block;
    let punch_through = mode == EtcMode::Etc2PunchThrough;
    let opaque = !punch_through || control & 0x02 != 0;
    let differential = punch_through || control & 0x02 != 0;

    let colors = if !differential {
        Colors::SubBlocks([
            [expand(r >> 4, 4), expand(g >> 4, 4), expand(b >> 4, 4)],
            [expand(r, 4), expand(g, 4), expand(b, 4)],
        ])
    } else {
        let sum = |base: u8| (base >> 3) as i32 + DIFF[(base & 0x07) as usize];
        let (sr, sg, sb) = (sum(r), sum(g), sum(b));
        let overflows = |s: i32| mode != EtcMode::Etc1 && !(0..32).contains(&s);
        if overflows(sr) {
            t_mode(block)
        } else if overflows(sg) {
            h_mode(block)
        } else if overflows(sb) {
            planar_mode(block)
        } else {
            Colors::SubBlocks([
                [expand(r >> 3, 5), expand(g >> 3, 5), expand(b >> 3, 5)],
                [sr, sg, sb].map(|s| expand(s as u8, 5)),
            ])
        }
    };

    let msb = u16::from_be_bytes([block[4], block[5]]);
    let lsb = u16::from_be_bytes([block[6], block[7]]);
    let index = |i: usize| ((((msb >> i) & 1) << 1) | ((lsb >> i) & 1)) as usize;

    let mut out = [0; 16];
    match colors {
        Colors::SubBlocks(base) => {
            let table = if opaque { &INTENSITY } else { &INTENSITY_A1 };
            let codewords = [(control >> 5) as usize, ((control >> 2) & 0x07) as usize];
            let subblocks = SUBBLOCKS[(control & 0x01) as usize];
            for i in 0..16 {
                let idx = index(i);
                out[tile_index(i)] = if !opaque && idx == 2 {
                    TRANSPARENT
                } else {
                    let sub = ((subblocks >> i) & 1) as usize;
                    offset(base[sub], table[codewords[sub]][idx])
                };
            }
        }
        Colors::Paint(paint) => {
            for i in 0..16 {
                let idx = index(i);
                out[tile_index(i)] = if !opaque && idx == 2 {
                    TRANSPARENT
                } else {
                    paint[idx]
                };
            }
        }
        Colors::Planar([o, h, v]) => {
            for i in 0..16 {
                let (x, y) = ((i / 4) as i32, (i % 4) as i32);
                let color = core::array::from_fn(|c| {
                    (x * (h[c] - o[c]) + y * (v[c] - o[c]) + 4 * o[c] + 2) >> 2
                });
                out[tile_index(i)] = clamp(color);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn block(r: u8, g: u8, b: u8, control: u8, msb: u16, lsb: u16) -> [u8; 8] {
        let [m0, m1] = msb.to_be_bytes();
        let [l0, l1] = lsb.to_be_bytes();
        [r, g, b, control, m0, m1, l0, l1]
    }

    fn gray(v: u8) -> Argb32 {
        argb(0xFF, v, v, v)
    }

    #[rstest]
    // Individual mode, base 0x88 in both sub-blocks, codeword 0.
    #[case(block(0x88, 0x88, 0x88, 0x00, 0x0000, 0x0000), gray(0x8A))]
    #[case(block(0x88, 0x88, 0x88, 0x00, 0xFFFF, 0xFFFF), gray(0x80))]
    // Differential mode, base 16 (0x84) with a zero delta.
    #[case(block(0x80, 0x80, 0x80, 0x02, 0x0000, 0x0000), gray(0x86))]
    #[case(block(0x80, 0x80, 0x80, 0x02, 0x0000, 0xFFFF), gray(0x8C))]
    // Codeword 7 on both sub-blocks saturates.
    #[case(block(0x88, 0x88, 0x88, 0xFC, 0x0000, 0xFFFF), gray(0xFF))]
    #[case(block(0x88, 0x88, 0x88, 0xFC, 0xFFFF, 0xFFFF), gray(0x00))]
    fn etc1_uniform_tiles(#[case] block: [u8; 8], #[case] expected: Argb32) {
        assert_eq!(decode_etc_block(&block, EtcMode::Etc1), [expected; 16]);
        assert_eq!(decode_etc_block(&block, EtcMode::Etc2), [expected; 16]);
    }

    #[rstest]
    #[case(0x00, [0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1])]
    #[case(0x01, [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1])]
    fn flip_bit_selects_sub_block_shape(#[case] control: u8, #[case] second: [u8; 16]) {
        // Sub-block 0 is black and sub-block 1 is white.
        let pixels = decode_etc_block(&block(0x0F, 0x0F, 0x0F, control, 0, 0), EtcMode::Etc1);
        for (px, sub) in pixels.iter().zip(second) {
            assert_eq!(*px, if sub == 1 { gray(0xFF) } else { gray(0x02) });
        }
    }

    #[test]
    fn pixels_are_stored_column_major() {
        // Pixel 1 is the second pixel of the first column.
        let pixels = decode_etc_block(&block(0x88, 0x88, 0x88, 0x00, 0, 0b10), EtcMode::Etc1);
        assert_eq!(pixels[4], gray(0x90));
        assert!(pixels.iter().enumerate().all(|(i, &px)| i == 4 || px == gray(0x8A)));
    }

    // Red overflows: T mode with c1 black, c2 0x88 and distance 3.
    const T_BLOCK: [u8; 4] = [0x04, 0x00, 0x88, 0x82];

    #[rstest]
    #[case(0x0000, 0x0000, gray(0x00))]
    #[case(0x0000, 0xFFFF, gray(0x8B))]
    #[case(0xFFFF, 0x0000, gray(0x88))]
    #[case(0xFFFF, 0xFFFF, gray(0x85))]
    fn etc2_t_mode_paint_colors(#[case] msb: u16, #[case] lsb: u16, #[case] expected: Argb32) {
        let [r, g, b, control] = T_BLOCK;
        let pixels = decode_etc_block(&block(r, g, b, control, msb, lsb), EtcMode::Etc2);
        assert_eq!(pixels, [expected; 16]);
    }

    #[rstest]
    #[case(0x0000, gray(0x06))]
    #[case(0xFFFF, gray(0x00))]
    fn etc2_h_mode_paint_colors(#[case] lsb: u16, #[case] expected: Argb32) {
        // Green overflows; both colors are black, so the distance index is 1.
        let pixels = decode_etc_block(&block(0x00, 0x04, 0x00, 0x02, 0, lsb), EtcMode::Etc2);
        assert_eq!(pixels, [expected; 16]);
    }

    #[test]
    fn etc2_planar_mode_interpolates_vertically() {
        // Blue overflows; only the vertical color has blue (63).
        let mut b = block(0x00, 0x00, 0x04, 0x02, 0, 0);
        b[7] = 0x3F;
        let pixels = decode_etc_block(&b, EtcMode::Etc2);
        for (y, blue) in [0x00, 0x40, 0x80, 0xBF].into_iter().enumerate() {
            for x in 0..4 {
                assert_eq!(pixels[y * 4 + x], argb(0xFF, 0, 0, blue), "({x}, {y})");
            }
        }
    }

    #[rstest]
    #[case(0x0000, 0x0000, gray(0x00))]
    #[case(0xFFFF, 0x0000, TRANSPARENT)]
    fn punch_through_index_2_is_transparent(
        #[case] msb: u16,
        #[case] lsb: u16,
        #[case] expected: Argb32,
    ) {
        // T mode without the opaque bit.
        let [r, g, b, _] = T_BLOCK;
        let pixels = decode_etc_block(&block(r, g, b, 0x80, msb, lsb), EtcMode::Etc2PunchThrough);
        assert_eq!(pixels, [expected; 16]);
    }

    #[rstest]
    #[case(0x00, 0x0000, 0x0000, gray(0x84))] // small modifier dropped
    #[case(0x00, 0xFFFF, 0x0000, TRANSPARENT)]
    #[case(0x02, 0x0000, 0x0000, gray(0x86))] // opaque: regular table
    #[case(0x02, 0xFFFF, 0x0000, gray(0x82))]
    fn punch_through_differential_blocks(
        #[case] control: u8,
        #[case] msb: u16,
        #[case] lsb: u16,
        #[case] expected: Argb32,
    ) {
        let block = block(0x80, 0x80, 0x80, control, msb, lsb);
        let pixels = decode_etc_block(&block, EtcMode::Etc2PunchThrough);
        assert_eq!(pixels, [expected; 16]);
    }
}
