//! Portable scalar unpacker. Handles every [`PixelFormat`].
//!
//! The row converters are compiled for several x86-64 feature levels through
//! [`mod@multiversion`]; the best one is picked at runtime.

use multiversion::multiversion;
use texdecode_common::pixel_format::{BitDepth, Conversion, PixelFormat};
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::Argb32;

/// Unpacks `raster.height()` rows of `format` pixels, `src_stride` bytes apart, into `raster`.
///
/// The caller validates that `src` holds every row; rows that do not fit are left untouched.
pub(crate) fn unpack_portable(
    format: PixelFormat,
    src: &[u8],
    src_stride: usize,
    raster: &mut CanonicalRaster,
) {
    let row_bytes = raster.width() as usize * format.bytes_per_pixel();
    for (y, dst) in raster.argb32_rows_mut().enumerate() {
        let start = y * src_stride;
        let Some(src_row) = src.get(start..start + row_bytes) else {
            return;
        };
        convert_row(format, src_row, dst);
    }
}

/// Converts one row of `format` pixels into canonical pixels.
///
/// Converts `min(dst.len(), src.len() / bytes_per_pixel)` pixels.
#[inline]
pub fn convert_row(format: PixelFormat, src: &[u8], dst: &mut [Argb32]) {
    let conversion = format.conversion();
    match format.depth() {
        BitDepth::Bits8 => convert_row_8(conversion, src, dst),
        BitDepth::Bits16 => convert_row_16(conversion, src, dst),
        BitDepth::Bits24 => convert_row_24(conversion, src, dst),
        BitDepth::Bits32 => convert_row_32(conversion, src, dst),
    }
}

/// Applies `conversion` to each source word, hoisting the conversion kind out of the loop.
#[inline(always)]
fn convert_words(
    conversion: Conversion,
    words: impl Iterator<Item = u32>,
    dst: &mut [Argb32],
) {
    match conversion {
        Conversion::BitField(layout) => {
            for (px, word) in dst.iter_mut().zip(words) {
                *px = layout.to_argb32(word);
            }
        }
        Conversion::Special(special) => {
            for (px, word) in dst.iter_mut().zip(words) {
                *px = special.to_argb32(word);
            }
        }
    }
}

#[multiversion(targets(
    // x86-64-v3 without lahfsahf
    "x86_64+avx+avx2+bmi1+bmi2+cmpxchg16b+f16c+fma+fxsr+lzcnt+movbe+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3+xsave",
    // x86-64-v2 without lahfsahf
    "x86_64+cmpxchg16b+fxsr+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3",
))]
fn convert_row_8(conversion: Conversion, src: &[u8], dst: &mut [Argb32]) {
    convert_words(conversion, src.iter().map(|&b| b as u32), dst);
}

#[multiversion(targets(
    // x86-64-v3 without lahfsahf
    "x86_64+avx+avx2+bmi1+bmi2+cmpxchg16b+f16c+fma+fxsr+lzcnt+movbe+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3+xsave",
    // x86-64-v2 without lahfsahf
    "x86_64+cmpxchg16b+fxsr+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3",
))]
fn convert_row_16(conversion: Conversion, src: &[u8], dst: &mut [Argb32]) {
    convert_words(
        conversion,
        src.chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]) as u32),
        dst,
    );
}

#[multiversion(targets(
    // x86-64-v3 without lahfsahf
    "x86_64+avx+avx2+bmi1+bmi2+cmpxchg16b+f16c+fma+fxsr+lzcnt+movbe+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3+xsave",
    // x86-64-v2 without lahfsahf
    "x86_64+cmpxchg16b+fxsr+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3",
))]
fn convert_row_24(conversion: Conversion, src: &[u8], dst: &mut [Argb32]) {
    convert_words(
        conversion,
        src.chunks_exact(3)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], 0])),
        dst,
    );
}

#[multiversion(targets(
    // x86-64-v3 without lahfsahf
    "x86_64+avx+avx2+bmi1+bmi2+cmpxchg16b+f16c+fma+fxsr+lzcnt+movbe+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3+xsave",
    // x86-64-v2 without lahfsahf
    "x86_64+cmpxchg16b+fxsr+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3",
))]
fn convert_row_32(conversion: Conversion, src: &[u8], dst: &mut [Argb32]) {
    convert_words(
        conversion,
        src.chunks_exact(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        dst,
    );
}
