//! SSE2 unpacker for 16-bit bit-field formats.
//!
//! One kernel covers every 16-bit [`Conversion::BitField`] layout. Eight source pixels are
//! loaded per iteration and each channel is extracted with variable-count shifts, then widened
//! to 8 bits with one multiply and one shift:
//!
//! ```text
//! bits  multiplier  post-shift   equivalent
//!  1       255          0        v ? 0xFF : 0
//!  2        85          0        v * 0x55
//!  3        73          1        v<<5 | v<<2 | v>>1
//!  4        17          0        v<<4 | v
//!  5        33          2        v<<3 | v>>2
//!  6        65          4        v<<2 | v>>4
//!  7       129          6        v<<1 | v>>6
//!  8         1          0        v
//! ```
//!
//! The copies of `v` never overlap inside the product, so the result is bit-identical to the
//! scalar replication in [`texdecode_common::argb32::expand_bits`].
//!
//! Blue and green are then packed into the low 16 bits of each output pixel and red and alpha
//! into the high 16 bits with `punpcklwd`/`punpckhwd`.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::portable::unpack_portable;
use texdecode_common::pixel_format::{Channel, ChannelLayout, Conversion, PixelFormat};
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::Argb32;

/// Multiplier and post-shift that widen a `bits`-wide value to 8 bits.
const fn widen_constants(bits: u8) -> (i16, i32) {
    match bits {
        1 => (255, 0),
        2 => (85, 0),
        3 => (73, 1),
        4 => (17, 0),
        5 => (33, 2),
        6 => (65, 4),
        7 => (129, 6),
        _ => (1, 0),
    }
}

/// Registers describing how to extract and widen one channel.
#[derive(Clone, Copy)]
struct ChannelRegs {
    shift: __m128i,
    mask: __m128i,
    multiplier: __m128i,
    post_shift: __m128i,
}

impl ChannelRegs {
    #[target_feature(enable = "sse2")]
    unsafe fn new(channel: Channel) -> Self {
        let (multiplier, post_shift) = widen_constants(channel.bits);
        let mask = if channel.is_present() {
            ((1u32 << channel.bits.min(8)) - 1) as i16
        } else {
            0
        };
        Self {
            shift: _mm_cvtsi32_si128(channel.shift as i32),
            mask: _mm_set1_epi16(mask),
            multiplier: _mm_set1_epi16(multiplier),
            post_shift: _mm_cvtsi32_si128(post_shift),
        }
    }

    /// Extracts this channel from eight 16-bit source words, widened to 8 bits per lane.
    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn extract(&self, words: __m128i) -> __m128i {
        let v = _mm_and_si128(_mm_srl_epi16(words, self.shift), self.mask);
        _mm_srl_epi16(_mm_mullo_epi16(v, self.multiplier), self.post_shift)
    }
}

/// Converts one row of 16-bit bit-field pixels.
///
/// # Safety
///
/// - CPU must support SSE2 instructions
#[target_feature(enable = "sse2")]
pub unsafe fn convert_row_bitfield16_sse2(layout: &ChannelLayout, src: &[u8], dst: &mut [Argb32]) {
    let count = dst.len().min(src.len() / 2);
    let red = ChannelRegs::new(layout.red);
    let green = ChannelRegs::new(layout.green);
    let blue = ChannelRegs::new(layout.blue);
    let alpha = ChannelRegs::new(layout.alpha);
    // A missing alpha channel reads as opaque.
    let alpha_fill = _mm_set1_epi16(if layout.alpha.is_present() { 0 } else { 0xFF00u16 as i16 });

    let src_ptr = src.as_ptr();
    let dst_ptr = dst.as_mut_ptr();
    let mut x = 0;
    while x + 8 <= count {
        let words = _mm_loadu_si128(src_ptr.add(x * 2) as *const __m128i);

        let b = blue.extract(words);
        let g = green.extract(words);
        let r = red.extract(words);
        let a = alpha.extract(words);

        let bg = _mm_or_si128(b, _mm_slli_epi16::<8>(g));
        let ra = _mm_or_si128(_mm_or_si128(r, _mm_slli_epi16::<8>(a)), alpha_fill);

        _mm_storeu_si128(
            dst_ptr.add(x) as *mut __m128i,
            _mm_unpacklo_epi16(bg, ra),
        );
        _mm_storeu_si128(
            dst_ptr.add(x + 4) as *mut __m128i,
            _mm_unpackhi_epi16(bg, ra),
        );
        x += 8;
    }

    // Handle remaining pixels
    let mut tail = src[x * 2..count * 2].chunks_exact(2);
    for px in &mut dst[x..count] {
        if let Some(b) = tail.next() {
            *px = layout.to_argb32(u16::from_le_bytes([b[0], b[1]]) as u32);
        }
    }
}

/// SSE2 strategy for 16-bit sources. Formats outside the kernel go through the portable path.
///
/// # Safety
///
/// - CPU must support SSE2 instructions
pub(crate) unsafe fn unpack16_sse2(
    format: PixelFormat,
    src: &[u8],
    src_stride: usize,
    raster: &mut CanonicalRaster,
) {
    let Conversion::BitField(layout) = format.conversion() else {
        unpack_portable(format, src, src_stride, raster);
        return;
    };
    if format.bytes_per_pixel() != 2 {
        unpack_portable(format, src, src_stride, raster);
        return;
    }

    let row_bytes = raster.width() as usize * 2;
    for (y, dst) in raster.argb32_rows_mut().enumerate() {
        let start = y * src_stride;
        let Some(src_row) = src.get(start..start + row_bytes) else {
            return;
        };
        convert_row_bitfield16_sse2(&layout, src_row, dst);
    }
}

/// Whether [`unpack16_sse2`] converts `format` itself rather than delegating.
pub fn is_accelerated(format: PixelFormat) -> bool {
    format.bytes_per_pixel() == 2 && matches!(format.conversion(), Conversion::BitField(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portable::convert_row;
    use crate::test_prelude::*;
    use texdecode_common::cpu_detect::has_sse2;

    #[test]
    fn matches_scalar_for_every_16_bit_bit_field_format() {
        if !has_sse2() {
            return;
        }

        // 8 full vectors plus a 5 pixel tail.
        let src: Vec<u8> = (0..(69 * 2)).map(|i| (i * 37 + 11) as u8).collect();
        for format in PixelFormat::all_values().iter().copied() {
            let Conversion::BitField(layout) = format.conversion() else {
                continue;
            };
            if format.bytes_per_pixel() != 2 {
                continue;
            }

            let mut expected = vec![0; 69];
            convert_row(format, &src, &mut expected);
            let mut actual = vec![0; 69];
            unsafe { convert_row_bitfield16_sse2(&layout, &src, &mut actual) };
            assert_eq!(actual, expected, "{format}");
        }
    }

    #[rstest]
    #[case(PixelFormat::Rg88)]
    #[case(PixelFormat::Gr88)]
    #[case(PixelFormat::Rgb565)]
    #[case(PixelFormat::Argb4444)]
    fn accelerates_bit_field_formats(#[case] format: PixelFormat) {
        assert!(is_accelerated(format));
    }

    #[rstest]
    #[case(PixelFormat::Rgb5A3)]
    #[case(PixelFormat::Bgr5A3)]
    #[case(PixelFormat::Bgr555Ps1)]
    #[case(PixelFormat::Rgb888)]
    fn delegates_special_formats(#[case] format: PixelFormat) {
        assert!(!is_accelerated(format));
    }
}
