//! Procedural partition assignment.
//!
//! Multi-partition blocks do not store a partition map. Each texel's partition is derived from a
//! 10-bit seed, the partition count and the texel coordinates through a fixed hash.

#[inline(always)]
fn hash52(seed: u32) -> u32 {
    let mut p = seed;
    p ^= p >> 15;
    p = p.wrapping_sub(p << 17);
    p = p.wrapping_add(p << 7);
    p = p.wrapping_add(p << 4);
    p ^= p >> 5;
    p = p.wrapping_add(p << 16);
    p ^= p >> 7;
    p ^= p >> 3;
    p ^= p << 6;
    p ^= p >> 17;
    p
}

/// Partition of texel `(x, y, z)` for a block with `count` partitions.
///
/// `small_block` is set for footprints with fewer than 31 texels, whose coordinates are doubled
/// before hashing.
pub(crate) fn select_partition(
    seed: u32,
    x: u32,
    y: u32,
    z: u32,
    count: u32,
    small_block: bool,
) -> u32 {
    if count <= 1 {
        return 0;
    }
    let (x, y, z) = if small_block {
        (x << 1, y << 1, z << 1)
    } else {
        (x, y, z)
    };

    let seed = seed + (count - 1) * 1024;
    let rnum = hash52(seed);

    let mut seeds = [
        rnum & 0xF,
        (rnum >> 4) & 0xF,
        (rnum >> 8) & 0xF,
        (rnum >> 12) & 0xF,
        (rnum >> 16) & 0xF,
        (rnum >> 20) & 0xF,
        (rnum >> 24) & 0xF,
        (rnum >> 28) & 0xF,
        (rnum >> 18) & 0xF,
        (rnum >> 22) & 0xF,
        (rnum >> 26) & 0xF,
        ((rnum >> 30) | (rnum << 2)) & 0xF,
    ];
    for s in seeds.iter_mut() {
        *s *= *s;
    }

    let (sh1, sh2) = if seed & 1 != 0 {
        (if seed & 2 != 0 { 4 } else { 5 }, if count == 3 { 6 } else { 5 })
    } else {
        (if count == 3 { 6 } else { 5 }, if seed & 2 != 0 { 4 } else { 5 })
    };
    let sh3 = if seed & 0x10 != 0 { sh1 } else { sh2 };

    for (i, s) in seeds.iter_mut().enumerate() {
        *s >>= match i {
            0..=7 if i % 2 == 0 => sh1,
            0..=7 => sh2,
            _ => sh3,
        };
    }

    let [s1, s2, s3, s4, s5, s6, s7, s8, s9, s10, s11, s12] = seeds;
    let a = (s1 * x + s2 * y + s11 * z + (rnum >> 14)) & 0x3F;
    let b = (s3 * x + s4 * y + s12 * z + (rnum >> 10)) & 0x3F;
    let mut c = (s5 * x + s6 * y + s9 * z + (rnum >> 6)) & 0x3F;
    let mut d = (s7 * x + s8 * y + s10 * z + (rnum >> 2)) & 0x3F;
    if count < 4 {
        d = 0;
    }
    if count < 3 {
        c = 0;
    }

    if a >= b && a >= c && a >= d {
        0
    } else if b >= c && b >= d {
        1
    } else if c >= d {
        2
    } else {
        3
    }
}
