//! The canonical pixel: a host `u32` laid out as `A<<24 | R<<16 | G<<8 | B`.
//!
//! Stored little-endian, the bytes of one pixel are `B, G, R, A`.

/// One canonical pixel.
pub type Argb32 = u32;

/// Fully transparent black.
pub const TRANSPARENT: Argb32 = 0;

/// Opaque black.
pub const OPAQUE_BLACK: Argb32 = 0xFF00_0000;

/// Builds a pixel from its four channels.
#[inline(always)]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Argb32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Alpha channel of `px`.
#[inline(always)]
pub const fn alpha(px: Argb32) -> u8 {
    (px >> 24) as u8
}

/// Red channel of `px`.
#[inline(always)]
pub const fn red(px: Argb32) -> u8 {
    (px >> 16) as u8
}

/// Green channel of `px`.
#[inline(always)]
pub const fn green(px: Argb32) -> u8 {
    (px >> 8) as u8
}

/// Blue channel of `px`.
#[inline(always)]
pub const fn blue(px: Argb32) -> u8 {
    px as u8
}

/// Widens a `bits`-wide channel value to 8 bits by replicating its most significant bits
/// into the vacated low bits.
///
/// `bits == 0` yields 0 and `bits >= 8` returns the low 8 bits of `value` unchanged.
#[inline(always)]
pub const fn expand_bits(value: u32, bits: u8) -> u8 {
    if bits >= 8 {
        return value as u8;
    }
    let v = value & ((1u32 << bits) - 1);
    (match bits {
        0 => 0,
        1 => 0u32.wrapping_sub(v),
        2 => v * 0x55,
        3 => (v << 5) | (v << 2) | (v >> 1),
        4 => v * 0x11,
        5 => (v << 3) | (v >> 2),
        6 => (v << 2) | (v >> 4),
        _ => (v << 1) | (v >> 6),
    }) as u8
}

/// Reverses premultiplied alpha for one pixel.
///
/// Each color channel becomes `min(255, (c * 255 + a / 2) / a)`. A fully transparent pixel
/// has no recoverable color and becomes transparent black.
#[inline]
pub const fn un_premultiply_pixel(px: Argb32) -> Argb32 {
    let a = alpha(px) as u32;
    match a {
        0 => TRANSPARENT,
        255 => px,
        _ => argb(
            a as u8,
            un_premultiply_channel(red(px), a),
            un_premultiply_channel(green(px), a),
            un_premultiply_channel(blue(px), a),
        ),
    }
}

#[inline(always)]
const fn un_premultiply_channel(c: u8, a: u32) -> u8 {
    let v = (c as u32 * 255 + a / 2) / a;
    if v > 255 {
        255
    } else {
        v as u8
    }
}

/// Multiplies each color channel of `px` by its alpha.
#[inline]
pub const fn premultiply_pixel(px: Argb32) -> Argb32 {
    let a = alpha(px) as u32;
    argb(
        a as u8,
        premultiply_channel(red(px), a),
        premultiply_channel(green(px), a),
        premultiply_channel(blue(px), a),
    )
}

#[inline(always)]
const fn premultiply_channel(c: u8, a: u32) -> u8 {
    ((c as u32 * a + 127) / 255) as u8
}
