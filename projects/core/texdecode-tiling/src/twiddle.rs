//! Morton ("twiddled") addressing.
//!
//! A twiddled image interleaves the bits of the x and y coordinates. The spread of a coordinate
//! (its bits moved to even positions) comes from a table built once per process.

use std::sync::OnceLock;

/// Largest coordinate the spread table covers.
pub const TWIDDLE_MAP_SIZE: usize = 4096;

static TWIDDLE_MAP: OnceLock<[u32; TWIDDLE_MAP_SIZE]> = OnceLock::new();

/// Moves bit `i` of `value` to bit `2 * i`.
const fn spread(value: u32) -> u32 {
    let mut out = 0;
    let mut i = 0;
    while i < 16 {
        out |= ((value >> i) & 1) << (2 * i);
        i += 1;
    }
    out
}

/// The spread table for coordinates `0..TWIDDLE_MAP_SIZE`.
pub fn twiddle_map() -> &'static [u32; TWIDDLE_MAP_SIZE] {
    TWIDDLE_MAP.get_or_init(|| {
        log::debug!("Building the {TWIDDLE_MAP_SIZE}-entry twiddle map");
        core::array::from_fn(|i| spread(i as u32))
    })
}

/// Spreads the bits of `value` to even positions.
#[inline]
pub fn spread_bits(value: u32) -> u32 {
    match twiddle_map().get(value as usize) {
        Some(&spread) => spread,
        None => spread(value),
    }
}

/// Index of pixel `(x, y)` in a square twiddled image: y bits on even positions, x bits on
/// odd positions.
#[inline]
pub fn twiddled_index(x: u32, y: u32) -> usize {
    (spread_bits(x) << 1 | spread_bits(y)) as usize
}

/// Index of pixel `(x, y)` in Z order: x bits on even positions, y bits on odd positions.
#[inline]
pub fn z_order_index(x: u32, y: u32) -> usize {
    (spread_bits(x) | spread_bits(y) << 1) as usize
}
