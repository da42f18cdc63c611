//! S3TC (DXT1 to DXT5), BC4 and BC5 block decoders.
//!
//! Every decoder takes one encoded block and returns the 16 pixels of its 4x4 tile in
//! row-major order. Based on MSDN:
//! https://learn.microsoft.com/en-us/windows/win32/direct3d10/d3d10-graphics-programming-guide-resources-block-compression

use texdecode_common::argb32::{argb, OPAQUE_BLACK, TRANSPARENT};
use texdecode_common::color_565::Color565;
use texdecode_common::Argb32;

/// What index 3 of a three-color DXT1 block decodes to.
///
/// The bit pattern is ambiguous: both conventions exist in real files, so the caller picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bc1Alpha {
    /// Opaque black.
    #[default]
    Opaque,
    /// Transparent black.
    Transparent,
}

/// How the four-entry color palette of a block is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Four colors if `c0 > c1`, otherwise three colors plus index 3 as given.
    Auto(Bc1Alpha),
    /// Always four colors. Used by the color half of DXT2 and DXT3.
    FourColor,
}

/// Builds the four-entry palette of a color block from its endpoints.
#[inline]
pub fn color_palette(c0: Color565, c1: Color565, mode: ColorMode) -> [Argb32; 4] {
    let a = c0.to_argb32();
    let b = c1.to_argb32();
    match mode {
        ColorMode::Auto(alpha) if !c0.greater_than(&c1) => [
            a,
            b,
            mix(a, b, 1, 1, 2),
            match alpha {
                Bc1Alpha::Opaque => OPAQUE_BLACK,
                Bc1Alpha::Transparent => TRANSPARENT,
            },
        ],
        _ => [a, b, mix(a, b, 2, 1, 3), mix(a, b, 1, 2, 3)],
    }
}

/// `(a * wa + b * wb) / divisor` per color channel, opaque.
#[inline(always)]
fn mix(a: Argb32, b: Argb32, wa: u32, wb: u32, divisor: u32) -> Argb32 {
    let channel = |shift: u32| {
        let ca = (a >> shift) & 0xFF;
        let cb = (b >> shift) & 0xFF;
        ((ca * wa + cb * wb) / divisor) << shift
    };
    OPAQUE_BLACK | channel(16) | channel(8) | channel(0)
}

/// Decodes the 8-byte color half shared by DXT1 to DXT5.
#[inline]
fn decode_color_block(block: &[u8; 8], mode: ColorMode) -> [Argb32; 16] {
    let c0 = Color565::from_le_bytes([block[0], block[1]]);
    let c1 = Color565::from_le_bytes([block[2], block[3]]);
    let palette = color_palette(c0, c1, mode);
    let indices = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);

    let mut out = [0; 16];
    for (i, px) in out.iter_mut().enumerate() {
        *px = palette[((indices >> (i * 2)) & 0b11) as usize];
    }
    out
}

/// Builds the eight-entry palette of an interpolated alpha (or BC4 channel) block.
#[inline]
pub fn alpha_palette(a0: u8, a1: u8) -> [u8; 8] {
    let (a0w, a1w) = (a0 as u32, a1 as u32);
    let lerp = |w0: u32, w1: u32, divisor: u32| ((a0w * w0 + a1w * w1) / divisor) as u8;
    if a0 > a1 {
        [
            a0,
            a1,
            lerp(6, 1, 7),
            lerp(5, 2, 7),
            lerp(4, 3, 7),
            lerp(3, 4, 7),
            lerp(2, 5, 7),
            lerp(1, 6, 7),
        ]
    } else {
        [
            a0,
            a1,
            lerp(4, 1, 5),
            lerp(3, 2, 5),
            lerp(2, 3, 5),
            lerp(1, 4, 5),
            0,
            255,
        ]
    }
}

/// Decodes an 8-byte interpolated channel block: two endpoints and 48 bits of 3-bit codes.
#[inline]
fn decode_channel_block(block: &[u8; 8]) -> [u8; 16] {
    let palette = alpha_palette(block[0], block[1]);
    let mut codes = [0u8; 8];
    codes[..6].copy_from_slice(&block[2..]);
    let codes = u64::from_le_bytes(codes);

    let mut out = [0; 16];
    for (i, value) in out.iter_mut().enumerate() {
        *value = palette[((codes >> (i * 3)) & 0b111) as usize];
    }
    out
}

/// Splits a 16-byte block into its two 8-byte halves.
#[inline(always)]
fn halves(block: &[u8; 16]) -> ([u8; 8], [u8; 8]) {
    let mut first = [0; 8];
    let mut second = [0; 8];
    first.copy_from_slice(&block[..8]);
    second.copy_from_slice(&block[8..]);
    (first, second)
}

/// Decodes a DXT1 block.
///
/// # Example
///
/// ```
/// use texdecode_bcn::{decode_dxt1_block, Bc1Alpha};
///
/// // Solid red: both endpoints 0xF800, every index 0.
/// let block = [0x00, 0xF8, 0x00, 0xF8, 0, 0, 0, 0];
/// let pixels = decode_dxt1_block(&block, Bc1Alpha::Opaque);
/// assert!(pixels.iter().all(|&px| px == 0xFFFF0000));
/// ```
#[inline]
pub fn decode_dxt1_block(block: &[u8; 8], alpha: Bc1Alpha) -> [Argb32; 16] {
    decode_color_block(block, ColorMode::Auto(alpha))
}

/// Decodes a DXT3 block: 64 bits of explicit 4-bit alpha followed by a four-color DXT1 block.
///
/// DXT2 uses the same layout with premultiplied color.
#[inline]
pub fn decode_dxt3_block(block: &[u8; 16]) -> [Argb32; 16] {
    let (alpha, color) = halves(block);
    let alpha = u64::from_le_bytes(alpha);
    let mut out = decode_color_block(&color, ColorMode::FourColor);
    for (i, px) in out.iter_mut().enumerate() {
        let a = ((alpha >> (i * 4)) & 0xF) as u32;
        *px = (*px & 0x00FF_FFFF) | (a | a << 4) << 24;
    }
    out
}

/// Decodes a DXT5 block: an interpolated alpha block followed by a DXT1 color block.
///
/// Unlike DXT3, the color half honors three-color mode when `c0 <= c1`, with index 3 as
/// opaque black. The alpha block replaces that alpha afterwards.
///
/// DXT4 uses the same layout with premultiplied color.
#[inline]
pub fn decode_dxt5_block(block: &[u8; 16]) -> [Argb32; 16] {
    let (alpha, color) = halves(block);
    let alpha = decode_channel_block(&alpha);
    let mut out = decode_color_block(&color, ColorMode::Auto(Bc1Alpha::Opaque));
    for (px, a) in out.iter_mut().zip(alpha) {
        *px = (*px & 0x00FF_FFFF) | (a as u32) << 24;
    }
    out
}

/// Decodes a BC4 block into opaque red.
#[inline]
pub fn decode_bc4_block(block: &[u8; 8]) -> [Argb32; 16] {
    decode_channel_block(block).map(|r| argb(0xFF, r, 0, 0))
}

/// Decodes a BC5 block (a red BC4 block followed by a green one) into opaque red and green.
#[inline]
pub fn decode_bc5_block(block: &[u8; 16]) -> [Argb32; 16] {
    let (red, green) = halves(block);
    let red = decode_channel_block(&red);
    let green = decode_channel_block(&green);
    let mut out = [0; 16];
    for (i, px) in out.iter_mut().enumerate() {
        *px = argb(0xFF, red[i], green[i], 0);
    }
    out
}
