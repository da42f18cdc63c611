//! Decoding one 128-bit ASTC block into a tile of pixels.
//!
//! Only the low dynamic range profile is supported. Blocks that use HDR endpoints, reserved
//! encodings or layouts that do not fit in 128 bits decode to the error color.

use texdecode_common::argb32::argb;
use texdecode_common::Argb32;

use crate::block_mode::{BlockMode, MAX_WEIGHTS};
use crate::endpoints::{decode_endpoints, is_hdr, value_count, Rgba};
use crate::ise::{
    decode_ise, field, low_bits, unquantize_color, unquantize_weight, MIN_COLOR_QUANT, QUANTS,
};
use crate::partition::select_partition;

/// Color written for blocks that cannot be decoded: opaque magenta.
pub const ERROR_COLOR: Argb32 = 0xFFFF00FF;

/// Low 9 bits of a void-extent block.
const VOID_EXTENT: u32 = 0x1FC;

/// Most endpoint values a block may carry.
const MAX_COLOR_VALUES: usize = 18;

/// Decodes one block of a `block_width` x `block_height` footprint into `out`, row-major.
///
/// `out` must hold at least `block_width * block_height` pixels. Invalid blocks are filled with
/// [`ERROR_COLOR`] and return `false`.
pub fn decode_astc_block(
    block: &[u8; 16],
    block_width: usize,
    block_height: usize,
    out: &mut [Argb32],
) -> bool {
    debug_assert!(out.len() >= block_width * block_height);
    let bits = u128::from_le_bytes(*block);
    match decode_block(bits, block_width, block_height, out) {
        Ok(()) => true,
        Err(reason) => {
            log::trace!("Undecodable ASTC block ({reason})");
            out.fill(ERROR_COLOR);
            false
        }
    }
}

fn decode_block(
    bits: u128,
    block_width: usize,
    block_height: usize,
    out: &mut [Argb32],
) -> Result<(), &'static str> {
    if field(bits, 0, 9) == VOID_EXTENT {
        return decode_void_extent(bits, out);
    }

    let mode =
        BlockMode::decode(field(bits, 0, 11), block_width, block_height).ok_or("block mode")?;
    let partitions = field(bits, 11, 2) + 1;
    if mode.dual_plane && partitions == 4 {
        return Err("dual plane with four partitions");
    }
    let weight_bits = mode.weight_bits() as u32;

    // Endpoint modes. Blocks with several partitions either share one mode or pick each from
    // two adjacent classes, with the extra selector bits stored just below the weights.
    let mut cems = [0u32; 4];
    let (seed, extra_bits, color_start) = if partitions == 1 {
        cems[0] = field(bits, 13, 4);
        (0, 0, 17)
    } else {
        let seed = field(bits, 13, 10);
        let selector = field(bits, 23, 2);
        if selector == 0 {
            cems.fill(field(bits, 25, 4));
            (seed, 0, 29)
        } else {
            let extra = 3 * partitions - 4;
            let combined =
                field(bits, 25, 4) | field(bits, 128 - weight_bits - extra, extra) << 4;
            for (i, cem) in (0..partitions).zip(cems.iter_mut()) {
                let class = selector - 1 + ((combined >> i) & 1);
                *cem = class << 2 | (combined >> (partitions + 2 * i)) & 0x3;
            }
            (seed, extra, 29)
        }
    };
    let cems = &cems[..partitions as usize];
    if cems.iter().any(|&cem| is_hdr(cem)) {
        return Err("HDR endpoints");
    }
    let value_total: usize = cems.iter().map(|&cem| value_count(cem)).sum();
    if value_total > MAX_COLOR_VALUES {
        return Err("too many endpoint values");
    }

    let color_end = 128 - weight_bits - extra_bits - if mode.dual_plane { 2 } else { 0 };
    let ccs = mode
        .dual_plane
        .then(|| field(bits, color_end, 2) as usize);
    let color_bits = color_end
        .checked_sub(color_start)
        .ok_or("no room for endpoints")? as usize;
    let color_quant = QUANTS[MIN_COLOR_QUANT..]
        .iter()
        .rev()
        .copied()
        .find(|quant| quant.ise_bits(value_total) <= color_bits)
        .ok_or("no room for endpoints")?;

    let mut values = [0u8; MAX_COLOR_VALUES];
    let values = &mut values[..value_total];
    decode_ise(
        color_quant,
        low_bits(bits >> color_start, color_quant.ise_bits(value_total)),
        values,
    );
    for value in values.iter_mut() {
        *value = unquantize_color(color_quant, *value);
    }

    let mut endpoints = [([0u8; 4], [0u8; 4]); 4];
    let mut offset = 0;
    for (pair, &cem) in endpoints.iter_mut().zip(cems) {
        *pair = decode_endpoints(cem, &values[offset..]).ok_or("HDR endpoints")?;
        offset += value_count(cem);
    }

    // Weights are stored bit-reversed from the top of the block.
    let mut weights = [0u8; MAX_WEIGHTS];
    let weights = &mut weights[..mode.weight_count()];
    decode_ise(
        mode.weight_quant,
        low_bits(bits.reverse_bits(), weight_bits as usize),
        weights,
    );
    for weight in weights.iter_mut() {
        *weight = unquantize_weight(mode.weight_quant, *weight);
    }

    let small_block = block_width * block_height < 31;
    let ds = (1024 + block_width / 2) / (block_width - 1);
    let dt = (1024 + block_height / 2) / (block_height - 1);
    for (t, row) in out.chunks_exact_mut(block_width).take(block_height).enumerate() {
        for (s, px) in row.iter_mut().enumerate() {
            let plane0 = infill(weights, &mode, 0, ds * s, dt * t);
            let plane1 = match ccs {
                Some(_) => infill(weights, &mode, 1, ds * s, dt * t),
                None => plane0,
            };
            let partition =
                select_partition(seed, s as u32, t as u32, 0, partitions, small_block) as usize;
            let (e0, e1) = endpoints[partition];
            let rgba: Rgba = core::array::from_fn(|c| {
                let weight = if ccs == Some(c) { plane1 } else { plane0 };
                interpolate(e0[c], e1[c], weight)
            });
            *px = argb(rgba[3], rgba[0], rgba[1], rgba[2]);
        }
    }
    Ok(())
}

/// A block of one constant color, stored as four 16-bit UNORM channels.
fn decode_void_extent(bits: u128, out: &mut [Argb32]) -> Result<(), &'static str> {
    if field(bits, 9, 1) != 0 {
        return Err("HDR void extent");
    }
    let [s_low, s_high, t_low, t_high] = [12, 25, 38, 51].map(|start| field(bits, start, 13));
    let unbounded = s_low & s_high & t_low & t_high == 0x1FFF;
    if !unbounded && (s_low >= s_high || t_low >= t_high) {
        return Err("void extent coordinates");
    }
    let [r, g, b, a] = [64, 80, 96, 112].map(|start| unorm16_to_unorm8(field(bits, start, 16)));
    out.fill(argb(a, r, g, b));
    Ok(())
}

/// Bilinearly samples the weight grid of `plane` at texel position `(cs, ct)`, both scaled by
/// 1024 across the footprint. Returns a weight in `0..=64`.
#[inline]
fn infill(weights: &[u8], mode: &BlockMode, plane: usize, cs: usize, ct: usize) -> i32 {
    let planes = if mode.dual_plane { 2 } else { 1 };
    let grid_width = mode.grid_width;
    let gs = (cs * (grid_width - 1) + 32) >> 6;
    let gt = (ct * (mode.grid_height - 1) + 32) >> 6;
    let (js, fs) = (gs >> 4, (gs & 0xF) as i32);
    let (jt, ft) = (gt >> 4, (gt & 0xF) as i32);

    let v0 = js + jt * grid_width;
    // Taps past the grid always have a zero factor.
    let p = |i: usize| weights.get(i * planes + plane).copied().unwrap_or(0) as i32;
    let w11 = (fs * ft + 8) >> 4;
    let w10 = ft - w11;
    let w01 = fs - w11;
    let w00 = 16 - fs - ft + w11;
    (p(v0) * w00 + p(v0 + 1) * w01 + p(v0 + grid_width) * w10 + p(v0 + grid_width + 1) * w11 + 8)
        >> 4
}

/// Interpolates one channel at 16-bit precision.
#[inline(always)]
fn interpolate(e0: u8, e1: u8, weight: i32) -> u8 {
    let c0 = e0 as u32 * 0x101;
    let c1 = e1 as u32 * 0x101;
    let weight = weight as u32;
    unorm16_to_unorm8((c0 * (64 - weight) + c1 * weight + 32) >> 6)
}

/// Rounds a 16-bit UNORM value to the nearest 8-bit one.
#[inline(always)]
fn unorm16_to_unorm8(value: u32) -> u8 {
    ((value * 255 + 32767) / 65535) as u8
}
