//! SSSE3 unpackers for 24-bit and byte-aligned 32-bit formats.
//!
//! When every output channel is either a whole source byte or absent, a pixel converts with
//! a single `pshufb`. The shuffle control is derived from the format's channel layout, so
//! every such format shares the two kernels below. Absent alpha is OR'd in as `0xFF`.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::portable::unpack_portable;
use texdecode_common::pixel_format::{
    BitDepth, Channel, Conversion, PixelFormat, SpecialConversion,
};
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::Argb32;

/// The source byte (within one pixel) feeding each output byte, in output order
/// `B, G, R, A`. Negative entries produce zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteShuffle {
    pub lanes: [i8; 4],
    /// OR `0xFF` into alpha after shuffling.
    pub alpha_fill: bool,
}

impl ByteShuffle {
    /// Converts one source word with the same semantics as the vector kernel.
    #[inline]
    pub fn apply(&self, word: u32) -> Argb32 {
        let bytes = word.to_le_bytes();
        let mut out = [0u8; 4];
        for (dst, &lane) in out.iter_mut().zip(&self.lanes) {
            if lane >= 0 {
                *dst = bytes[lane as usize];
            }
        }
        let px = u32::from_le_bytes(out);
        if self.alpha_fill {
            px | 0xFF00_0000
        } else {
            px
        }
    }

    /// Builds a 16-byte `pshufb` control for pixels `pixel_bytes` apart.
    fn control(&self, pixel_bytes: usize) -> [i8; 16] {
        let mut control = [-1i8; 16];
        for pixel in 0..4 {
            for (k, &lane) in self.lanes.iter().enumerate() {
                if lane >= 0 {
                    control[pixel * 4 + k] = (pixel * pixel_bytes) as i8 + lane;
                }
            }
        }
        control
    }
}

/// Returns the byte shuffle for `format`, or `None` if it is not a pure byte permutation.
pub fn byte_shuffle(format: PixelFormat) -> Option<ByteShuffle> {
    fn lane(channel: Channel) -> Option<i8> {
        if !channel.is_present() {
            Some(-1)
        } else if channel.bits == 8 && channel.shift % 8 == 0 {
            Some((channel.shift / 8) as i8)
        } else {
            None
        }
    }

    if !matches!(format.depth(), BitDepth::Bits24 | BitDepth::Bits32) {
        return None;
    }

    match format.conversion() {
        Conversion::Special(SpecialConversion::G16R16) => Some(ByteShuffle {
            lanes: [-1, 3, 1, -1],
            alpha_fill: true,
        }),
        Conversion::Special(_) => None,
        Conversion::BitField(layout) => Some(ByteShuffle {
            lanes: [
                lane(layout.blue)?,
                lane(layout.green)?,
                lane(layout.red)?,
                lane(layout.alpha)?,
            ],
            alpha_fill: !layout.alpha.is_present(),
        }),
    }
}

/// Whether the SSSE3 strategies convert `format` themselves rather than delegating.
pub fn is_accelerated(format: PixelFormat) -> bool {
    byte_shuffle(format).is_some()
}

#[inline]
#[target_feature(enable = "ssse3")]
unsafe fn load_control(shuffle: &ByteShuffle, pixel_bytes: usize) -> (__m128i, __m128i) {
    let control = shuffle.control(pixel_bytes);
    let alpha = if shuffle.alpha_fill {
        _mm_set1_epi32(0xFF00_0000u32 as i32)
    } else {
        _mm_setzero_si128()
    };
    (_mm_loadu_si128(control.as_ptr() as *const __m128i), alpha)
}

/// Converts one row of 24-bit pixels, 16 pixels (48 bytes) per iteration.
///
/// # Safety
///
/// - CPU must support SSSE3 instructions
#[target_feature(enable = "ssse3")]
pub unsafe fn convert_row_24_ssse3(shuffle: &ByteShuffle, src: &[u8], dst: &mut [Argb32]) {
    let count = dst.len().min(src.len() / 3);
    let (control, alpha) = load_control(shuffle, 3);

    let src_ptr = src.as_ptr();
    let dst_ptr = dst.as_mut_ptr();
    let mut x = 0;
    while x + 16 <= count {
        let a = _mm_loadu_si128(src_ptr.add(x * 3) as *const __m128i);
        let b = _mm_loadu_si128(src_ptr.add(x * 3 + 16) as *const __m128i);
        let c = _mm_loadu_si128(src_ptr.add(x * 3 + 32) as *const __m128i);

        // Realign so each register starts on a pixel boundary.
        let p0 = a;
        let p1 = _mm_alignr_epi8::<12>(b, a);
        let p2 = _mm_alignr_epi8::<8>(c, b);
        let p3 = _mm_srli_si128::<4>(c);

        for (i, p) in [p0, p1, p2, p3].into_iter().enumerate() {
            let px = _mm_or_si128(_mm_shuffle_epi8(p, control), alpha);
            _mm_storeu_si128(dst_ptr.add(x + i * 4) as *mut __m128i, px);
        }
        x += 16;
    }

    // Handle remaining pixels
    for (px, b) in dst[x..count].iter_mut().zip(src[x * 3..].chunks_exact(3)) {
        *px = shuffle.apply(u32::from_le_bytes([b[0], b[1], b[2], 0]));
    }
}

/// Converts one row of 32-bit pixels, 4 pixels per iteration.
///
/// # Safety
///
/// - CPU must support SSSE3 instructions
#[target_feature(enable = "ssse3")]
pub unsafe fn convert_row_32_ssse3(shuffle: &ByteShuffle, src: &[u8], dst: &mut [Argb32]) {
    let count = dst.len().min(src.len() / 4);
    let (control, alpha) = load_control(shuffle, 4);

    let src_ptr = src.as_ptr();
    let dst_ptr = dst.as_mut_ptr();
    let mut x = 0;
    while x + 4 <= count {
        let p = _mm_loadu_si128(src_ptr.add(x * 4) as *const __m128i);
        let px = _mm_or_si128(_mm_shuffle_epi8(p, control), alpha);
        _mm_storeu_si128(dst_ptr.add(x) as *mut __m128i, px);
        x += 4;
    }

    // Handle remaining pixels
    for (px, b) in dst[x..count].iter_mut().zip(src[x * 4..].chunks_exact(4)) {
        *px = shuffle.apply(u32::from_le_bytes([b[0], b[1], b[2], b[3]]));
    }
}

/// Shared row loop of the 24-bit and 32-bit strategies.
///
/// # Safety
///
/// - CPU must support SSSE3 instructions
#[inline(always)]
unsafe fn unpack_shuffled(
    format: PixelFormat,
    src: &[u8],
    src_stride: usize,
    raster: &mut CanonicalRaster,
    row_fn: unsafe fn(&ByteShuffle, &[u8], &mut [Argb32]),
) {
    let Some(shuffle) = byte_shuffle(format) else {
        unpack_portable(format, src, src_stride, raster);
        return;
    };

    let row_bytes = raster.width() as usize * format.bytes_per_pixel();
    for (y, dst) in raster.argb32_rows_mut().enumerate() {
        let start = y * src_stride;
        let Some(src_row) = src.get(start..start + row_bytes) else {
            return;
        };
        row_fn(&shuffle, src_row, dst);
    }
}

/// SSSE3 strategy for 24-bit sources.
///
/// # Safety
///
/// - CPU must support SSSE3 instructions
pub(crate) unsafe fn unpack24_ssse3(
    format: PixelFormat,
    src: &[u8],
    src_stride: usize,
    raster: &mut CanonicalRaster,
) {
    if format.depth() != BitDepth::Bits24 {
        unpack_portable(format, src, src_stride, raster);
        return;
    }
    unpack_shuffled(format, src, src_stride, raster, convert_row_24_ssse3);
}

/// SSSE3 strategy for 32-bit sources.
///
/// # Safety
///
/// - CPU must support SSSE3 instructions
pub(crate) unsafe fn unpack32_ssse3(
    format: PixelFormat,
    src: &[u8],
    src_stride: usize,
    raster: &mut CanonicalRaster,
) {
    if format.depth() != BitDepth::Bits32 {
        unpack_portable(format, src, src_stride, raster);
        return;
    }
    unpack_shuffled(format, src, src_stride, raster, convert_row_32_ssse3);
}
