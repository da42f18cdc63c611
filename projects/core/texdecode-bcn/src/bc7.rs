//! BC7 block decoder.
//!
//! A BC7 block starts with a unary mode number (the count of trailing zero bits), followed by
//! mode-specific fields in this order: partition, rotation, index selection, color endpoints
//! (all red values, then all green, then all blue), alpha endpoints, p-bits, primary indices
//! and, for modes 4 and 5, secondary indices.
//!
//! Reference:
//! https://learn.microsoft.com/en-us/windows/win32/direct3d11/bc7-format-mode-reference

use texdecode_common::argb32::{argb, expand_bits, TRANSPARENT};
use texdecode_common::Argb32;

/// How a mode stores the least significant bit of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PBits {
    None,
    /// One bit per endpoint.
    PerEndpoint,
    /// One bit per subset, shared by both of its endpoints.
    PerSubset,
}

#[derive(Debug, Clone, Copy)]
struct ModeInfo {
    subsets: u8,
    partition_bits: u8,
    rotation_bits: u8,
    index_selection_bits: u8,
    color_bits: u8,
    alpha_bits: u8,
    pbits: PBits,
    index_bits: u8,
    secondary_index_bits: u8,
}

#[allow(clippy::too_many_arguments)]
const fn mode(
    subsets: u8,
    partition_bits: u8,
    rotation_bits: u8,
    index_selection_bits: u8,
    color_bits: u8,
    alpha_bits: u8,
    pbits: PBits,
    index_bits: u8,
    secondary_index_bits: u8,
) -> ModeInfo {
    ModeInfo {
        subsets,
        partition_bits,
        rotation_bits,
        index_selection_bits,
        color_bits,
        alpha_bits,
        pbits,
        index_bits,
        secondary_index_bits,
    }
}

#[rustfmt::skip]
const MODES: [ModeInfo; 8] = [
    mode(3, 4, 0, 0, 4, 0, PBits::PerEndpoint, 3, 0),
    mode(2, 6, 0, 0, 6, 0, PBits::PerSubset,   3, 0),
    mode(3, 6, 0, 0, 5, 0, PBits::None,        2, 0),
    mode(2, 6, 0, 0, 7, 0, PBits::PerEndpoint, 2, 0),
    mode(1, 0, 2, 1, 5, 6, PBits::None,        2, 3),
    mode(1, 0, 2, 0, 7, 8, PBits::None,        2, 2),
    mode(1, 0, 0, 0, 7, 7, PBits::PerEndpoint, 4, 0),
    mode(2, 6, 0, 0, 5, 5, PBits::PerEndpoint, 2, 0),
];

const WEIGHTS2: [u32; 4] = [0, 21, 43, 64];
const WEIGHTS3: [u32; 8] = [0, 9, 18, 27, 37, 46, 55, 64];
const WEIGHTS4: [u32; 16] = [0, 4, 9, 13, 17, 21, 26, 30, 34, 38, 43, 47, 51, 55, 60, 64];

// Subset of each pixel, two bits per pixel, pixel 0 in the low bits.
#[rustfmt::skip]
const PARTITIONS2: [u32; 64] = [
    0x50505050, 0x40404040, 0x54545454, 0x54505040, 0x50404000, 0x55545450, 0x55545040, 0x54504000,
    0x50400000, 0x55555450, 0x55544000, 0x54400000, 0x55555440, 0x55550000, 0x55555500, 0x55000000,
    0x55150100, 0x00004054, 0x15010000, 0x00405054, 0x00004050, 0x15050100, 0x05010000, 0x40505054,
    0x00404050, 0x05010100, 0x14141414, 0x05141450, 0x01155440, 0x00555500, 0x15014054, 0x05414150,
    0x44444444, 0x55005500, 0x11441144, 0x05055050, 0x05500550, 0x11114444, 0x41144114, 0x44111144,
    0x15055054, 0x01055040, 0x05041050, 0x05455150, 0x14414114, 0x50050550, 0x41411414, 0x00141400,
    0x00041504, 0x00105410, 0x10541000, 0x04150400, 0x50410514, 0x41051450, 0x05415014, 0x14054150,
    0x41050514, 0x41505014, 0x40011554, 0x54150140, 0x50505500, 0x00555050, 0x15151010, 0x54540404,
];

#[rustfmt::skip]
const PARTITIONS3: [u32; 64] = [
    0xAA685050, 0x6A5A5040, 0x5A5A4200, 0x5450A0A8, 0xA5A50000, 0xA0A05050, 0x5555A0A0, 0x5A5A5050,
    0xAA550000, 0xAA555500, 0xAAAA5500, 0x90909090, 0x94949494, 0xA4A4A4A4, 0xA9A59450, 0x2A0A4250,
    0xA5945040, 0x0A425054, 0xA5A5A500, 0x55A0A0A0, 0xA8A85454, 0x6A6A4040, 0xA4A45000, 0x1A1A0500,
    0x0050A4A4, 0xAAA59090, 0x14696914, 0x69691400, 0xA08585A0, 0xAA821414, 0x50A4A450, 0x6A5A0200,
    0xA9A58000, 0x5090A0A8, 0xA8A09050, 0x24242424, 0x00AA5500, 0x24924924, 0x24499224, 0x50A50A50,
    0x500AA550, 0xAAAA4444, 0x66660000, 0xA5A0A5A0, 0x50A050A0, 0x69286928, 0x44AAAA44, 0x66666600,
    0xAA444444, 0x54A854A8, 0x95809580, 0x96969600, 0xA85454A8, 0x80959580, 0xAA141414, 0x96960000,
    0xAAAA1414, 0xA05050A0, 0xA0A5A5A0, 0x96000000, 0x40804080, 0xA9A8A9A8, 0xAAAAAA44, 0x2A4A5254,
];

// Anchor pixel of subset 1 in two-subset partitions.
#[rustfmt::skip]
const ANCHORS_2_OF_2: [u8; 64] = [
    15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15,
    15,  2,  8,  2,  2,  8,  8, 15,  2,  8,  2,  2,  8,  8,  2,  2,
    15, 15,  6,  8,  2,  8, 15, 15,  2,  8,  2,  2,  2, 15, 15,  6,
     6,  2,  6,  8, 15, 15,  2,  2, 15, 15, 15, 15, 15,  2,  2, 15,
];

// Anchor pixels of subsets 1 and 2 in three-subset partitions.
#[rustfmt::skip]
const ANCHORS_2_OF_3: [u8; 64] = [
     3,  3, 15, 15,  8,  3, 15, 15,  8,  8,  6,  6,  6,  5,  3,  3,
     3,  3,  8, 15,  3,  3,  6, 10,  5,  8,  8,  6,  8,  5, 15, 15,
     8, 15,  3,  5,  6, 10,  8, 15, 15,  3, 15,  5, 15, 15, 15, 15,
     3, 15,  5,  5,  5,  8,  5, 10,  5, 10,  8, 13, 15, 12,  3,  3,
];

#[rustfmt::skip]
const ANCHORS_3_OF_3: [u8; 64] = [
    15,  8,  8,  3, 15, 15,  3,  8, 15, 15, 15, 15, 15, 15, 15,  8,
    15,  8, 15,  3, 15,  8, 15,  8,  3, 15,  6, 10, 15, 15, 10,  8,
    15,  3, 15, 10, 10,  8,  9, 10,  6, 15,  8, 15,  3,  6,  6,  8,
    15,  3, 15, 15, 15, 15, 15, 15, 15, 15, 15, 15,  3, 15, 15,  8,
];

/// Reads little-endian bit fields from the front of a block.
struct BitReader {
    bits: u128,
}

impl BitReader {
    #[inline(always)]
    fn read(&mut self, count: u8) -> u8 {
        let value = (self.bits & ((1u128 << count) - 1)) as u8;
        self.bits >>= count;
        value
    }
}

#[inline(always)]
fn subset_of(subsets: u8, partition: usize, pixel: usize) -> usize {
    let table = match subsets {
        2 => PARTITIONS2[partition],
        3 => PARTITIONS3[partition],
        _ => return 0,
    };
    ((table >> (pixel * 2)) & 0b11) as usize
}

/// Anchor pixels store their index with the most significant bit omitted (it is always 0).
#[inline(always)]
fn is_anchor(subsets: u8, partition: usize, pixel: usize) -> bool {
    pixel == 0
        || match subsets {
            2 => pixel == ANCHORS_2_OF_2[partition] as usize,
            3 => {
                pixel == ANCHORS_2_OF_3[partition] as usize
                    || pixel == ANCHORS_3_OF_3[partition] as usize
            }
            _ => false,
        }
}

#[inline(always)]
fn interpolate(e0: u8, e1: u8, index: u8, bits: u8) -> u8 {
    let weight = match bits {
        2 => WEIGHTS2[index as usize],
        3 => WEIGHTS3[index as usize],
        _ => WEIGHTS4[index as usize],
    };
    (((64 - weight) * e0 as u32 + weight * e1 as u32 + 32) >> 6) as u8
}

/// Decodes a BC7 block.
///
/// A block with the reserved mode (a first byte of zero) decodes to transparent black.
pub fn decode_bc7_block(block: &[u8; 16]) -> [Argb32; 16] {
    let mode = block[0].trailing_zeros() as usize;
    let Some(info) = MODES.get(mode) else {
        log::warn!("BC7 block uses the reserved mode; decoding it as transparent black");
        return [TRANSPARENT; 16];
    };

    let mut bits = BitReader {
        bits: u128::from_le_bytes(*block),
    };
    bits.read(mode as u8 + 1);
    let partition = bits.read(info.partition_bits) as usize;
    let rotation = bits.read(info.rotation_bits);
    let index_selection = bits.read(info.index_selection_bits);

    // [endpoint][R, G, B, A]
    let mut endpoints = [[0u8; 4]; 6];
    let endpoints = &mut endpoints[..info.subsets as usize * 2];
    for channel in 0..3 {
        for endpoint in endpoints.iter_mut() {
            endpoint[channel] = bits.read(info.color_bits);
        }
    }
    if info.alpha_bits > 0 {
        for endpoint in endpoints.iter_mut() {
            endpoint[3] = bits.read(info.alpha_bits);
        }
    }

    let (mut color_bits, mut alpha_bits) = (info.color_bits, info.alpha_bits);
    let pbit_group = match info.pbits {
        PBits::None => 0,
        PBits::PerEndpoint => 1,
        PBits::PerSubset => 2,
    };
    if pbit_group > 0 {
        for group in endpoints.chunks_exact_mut(pbit_group) {
            let pbit = bits.read(1);
            for endpoint in group {
                for component in endpoint.iter_mut() {
                    *component = *component << 1 | pbit;
                }
            }
        }
        color_bits += 1;
        if alpha_bits > 0 {
            alpha_bits += 1;
        }
    }

    for endpoint in endpoints.iter_mut() {
        for component in &mut endpoint[..3] {
            *component = expand_bits(*component as u32, color_bits);
        }
        endpoint[3] = if alpha_bits > 0 {
            expand_bits(endpoint[3] as u32, alpha_bits)
        } else {
            0xFF
        };
    }

    let mut primary = [0u8; 16];
    for (pixel, index) in primary.iter_mut().enumerate() {
        let anchor = is_anchor(info.subsets, partition, pixel);
        *index = bits.read(info.index_bits - anchor as u8);
    }
    let mut secondary = [0u8; 16];
    if info.secondary_index_bits > 0 {
        for (pixel, index) in secondary.iter_mut().enumerate() {
            *index = bits.read(info.secondary_index_bits - (pixel == 0) as u8);
        }
    }

    let (color_indices, color_index_bits, alpha_indices, alpha_index_bits) =
        match (info.secondary_index_bits, index_selection) {
            (0, _) => (&primary, info.index_bits, &primary, info.index_bits),
            (_, 0) => (&primary, info.index_bits, &secondary, info.secondary_index_bits),
            _ => (&secondary, info.secondary_index_bits, &primary, info.index_bits),
        };

    let mut out = [0; 16];
    for (pixel, px) in out.iter_mut().enumerate() {
        let subset = subset_of(info.subsets, partition, pixel);
        let (e0, e1) = (endpoints[subset * 2], endpoints[subset * 2 + 1]);
        let ci = color_indices[pixel];
        let mut r = interpolate(e0[0], e1[0], ci, color_index_bits);
        let mut g = interpolate(e0[1], e1[1], ci, color_index_bits);
        let mut b = interpolate(e0[2], e1[2], ci, color_index_bits);
        let mut a = interpolate(e0[3], e1[3], alpha_indices[pixel], alpha_index_bits);
        match rotation {
            1 => core::mem::swap(&mut a, &mut r),
            2 => core::mem::swap(&mut a, &mut g),
            3 => core::mem::swap(&mut a, &mut b),
            _ => {}
        }
        *px = argb(a, r, g, b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    /// Assembles a block from little-endian bit fields.
    #[derive(Default)]
    struct BitWriter {
        bits: u128,
        len: u32,
    }

    impl BitWriter {
        fn push(&mut self, value: u32, count: u32) -> &mut Self {
            self.bits |= (value as u128 & ((1u128 << count) - 1)) << self.len;
            self.len += count;
            self
        }

        fn repeat(&mut self, value: u32, count: u32, times: usize) -> &mut Self {
            for _ in 0..times {
                self.push(value, count);
            }
            self
        }

        fn finish(&self) -> [u8; 16] {
            assert_eq!(self.len, 128, "block must be exactly 128 bits");
            self.bits.to_le_bytes()
        }
    }

    /// Mode 6: one subset, 7-bit RGBA endpoints and a p-bit each, 4-bit indices.
    fn mode6(e0: [u32; 4], e1: [u32; 4], pbits: [u32; 2], index: u32) -> [u8; 16] {
        let mut w = BitWriter::default();
        w.push(1 << 6, 7);
        for channel in 0..4 {
            w.push(e0[channel], 7).push(e1[channel], 7);
        }
        w.push(pbits[0], 1).push(pbits[1], 1);
        w.push(index, 3).repeat(index, 4, 15);
        w.finish()
    }

    #[test]
    fn reserved_mode_is_transparent_black() {
        init_logging();
        assert_eq!(decode_bc7_block(&[0; 16]), [TRANSPARENT; 16]);
    }

    #[test]
    fn mode6_all_index_zero_selects_first_endpoint() {
        // The p-bit of e0 is set, so its 7-bit values gain a low 1 bit.
        let block = mode6([127, 0, 64, 127], [0; 4], [1, 0], 0);
        assert_eq!(decode_bc7_block(&block), [argb(0xFF, 0xFF, 0x01, 0x81); 16]);
    }

    #[test]
    fn mode6_all_index_max_selects_second_endpoint() {
        let mut w = BitWriter::default();
        w.push(1 << 6, 7);
        for (e0, e1) in [(0, 127), (0, 32), (0, 0), (0, 127)] {
            w.push(e0, 7).push(e1, 7);
        }
        w.push(0, 1).push(1, 1);
        w.push(0b111, 3).repeat(0b1111, 4, 15);
        // The anchor pixel cannot encode index 15.
        assert_eq!(decode_bc7_block(&w.finish())[1..], [argb(0xFF, 0xFF, 0x41, 0x01); 15]);
    }

    /// Mode 4 with e0 black and transparent, e1 white and opaque.
    fn mode4(rotation: u32, index_selection: u32, primary: u32, secondary: u32) -> [u8; 16] {
        let mut w = BitWriter::default();
        w.push(1 << 4, 5).push(rotation, 2).push(index_selection, 1);
        for _ in 0..3 {
            w.push(0, 5).push(31, 5);
        }
        w.push(0, 6).push(63, 6);
        w.push(primary, 1).repeat(primary, 2, 15);
        w.push(secondary, 2).repeat(secondary, 3, 15);
        w.finish()
    }

    #[rstest]
    // Color from the 2-bit primary indices, alpha from the 3-bit secondary ones.
    #[case(0, 0, 0, 7, argb(0xFF, 0x00, 0x00, 0x00))]
    #[case(0, 0, 3, 0, argb(0x00, 0xFF, 0xFF, 0xFF))]
    // Index selection swaps the two index sets.
    #[case(0, 1, 0, 7, argb(0x00, 0xFF, 0xFF, 0xFF))]
    #[case(0, 1, 3, 0, argb(0xFF, 0x00, 0x00, 0x00))]
    // Rotation 1 swaps alpha and red.
    #[case(1, 0, 0, 7, argb(0x00, 0xFF, 0x00, 0x00))]
    // Rotation 3 swaps alpha and blue.
    #[case(3, 0, 3, 0, argb(0xFF, 0xFF, 0xFF, 0x00))]
    fn mode4_index_selection_and_rotation(
        #[case] rotation: u32,
        #[case] index_selection: u32,
        #[case] primary: u32,
        #[case] secondary: u32,
        #[case] expected: Argb32,
    ) {
        // Pixel 0 is the anchor; its indices are one bit shorter.
        let block = mode4(rotation, index_selection, primary, secondary);
        let pixels = decode_bc7_block(&block);
        assert_eq!(pixels[1..], [expected; 15]);
    }

    #[test]
    fn mode1_uses_the_partition_table() {
        // Partition 0 puts the two left columns in subset 0 and the two right ones in subset 1.
        let mut w = BitWriter::default();
        w.push(0b10, 2).push(0, 6);
        for _ in 0..3 {
            w.push(0, 6).push(0, 6).push(63, 6).push(63, 6);
        }
        // Shared p-bits for subsets 0 and 1.
        w.push(0, 1).push(1, 1);
        // Pixels 0 and 15 are anchors.
        w.push(0, 2).repeat(0, 3, 14).push(0, 2);
        let pixels = decode_bc7_block(&w.finish());
        for y in 0..4 {
            for x in 0..4 {
                let expected = if x < 2 { 0xFF000000 } else { 0xFFFFFFFF };
                assert_eq!(pixels[y * 4 + x], expected, "({x}, {y})");
            }
        }
    }

    #[rstest]
    #[case(2, 0, 0xFF)]
    #[case(2, 1, 0xAB)]
    #[case(3, 4, 0x6C)]
    #[case(4, 8, 0x78)]
    #[case(4, 15, 0x00)]
    fn interpolation_weights(#[case] bits: u8, #[case] index: u8, #[case] expected: u8) {
        assert_eq!(interpolate(0xFF, 0x00, index, bits), expected);
    }
}
