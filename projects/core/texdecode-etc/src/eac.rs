//! EAC single-channel blocks, used for ETC2 alpha and for the R11 and RG11 formats.
//!
//! A block is a base value, a multiplier, a modifier table index and sixteen 3-bit
//! codes. Codes are big-endian and numbered column by column, like ETC color indices.

use crate::color::tile_index;

#[rustfmt::skip]
const MODIFIERS: [[i32; 8]; 16] = [
    [-3, -6,  -9, -15, 2, 5, 8, 14],
    [-3, -7, -10, -13, 2, 6, 9, 12],
    [-2, -5,  -8, -13, 1, 4, 7, 12],
    [-2, -4,  -6, -13, 1, 3, 5, 12],
    [-3, -6,  -8, -12, 2, 5, 7, 11],
    [-3, -7,  -9, -11, 2, 6, 8, 10],
    [-4, -7,  -8, -11, 3, 6, 7, 10],
    [-3, -5,  -8, -11, 2, 4, 7, 10],
    [-2, -6,  -8, -10, 1, 5, 7,  9],
    [-2, -5,  -8, -10, 1, 4, 7,  9],
    [-2, -4,  -8, -10, 1, 3, 7,  9],
    [-2, -5,  -7, -10, 1, 4, 6,  9],
    [-3, -4,  -7, -10, 2, 3, 6,  9],
    [-1, -2,  -3, -10, 0, 1, 2,  9],
    [-4, -6,  -8,  -9, 3, 5, 7,  8],
    [-3, -5,  -7,  -9, 2, 4, 6,  8],
];

/// How the stored value is reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EacPrecision {
    /// 8-bit alpha of ETC2 RGBA8: `base + modifier * multiplier`.
    Alpha8,
    /// Unsigned 11-bit R11/RG11 channel, reduced to 8 bits.
    Unsigned11,
}

/// Decodes an EAC block into 16 row-major 8-bit values.
pub fn decode_eac_block(block: &[u8; 8], precision: EacPrecision) -> [u8; 16] {
    let base = block[0] as i32;
    let multiplier = (block[1] >> 4) as i32;
    let modifiers = &MODIFIERS[(block[1] & 0x0F) as usize];
    let codes = u64::from_be_bytes(*block) & 0xFFFF_FFFF_FFFF;

    let mut out = [0; 16];
    for i in 0..16 {
        let modifier = modifiers[((codes >> (45 - 3 * i)) & 0x07) as usize];
        out[tile_index(i)] = match precision {
            EacPrecision::Alpha8 => (base + modifier * multiplier).clamp(0, 255) as u8,
            EacPrecision::Unsigned11 => {
                let step = if multiplier == 0 { 1 } else { multiplier * 8 };
                ((base * 8 + 4 + modifier * step).clamp(0, 2047) >> 3) as u8
            }
        };
    }
    out
}
