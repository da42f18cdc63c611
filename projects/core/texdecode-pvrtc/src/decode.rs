//! Image-level PVRTC1 decoding.

use core::fmt;
use derive_enum_all_values::AllValues;
use likely_stable::unlikely;
use texdecode_common::argb32::argb;
use texdecode_common::error::{check_dimensions, check_source_len};
use texdecode_common::pixel_format::Sbit;
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::{Argb32, DecodeError};

use crate::word::{twiddle_uv, Color, Word};

/// Modulation weights out of 8, by 2-bit modulation value.
const WEIGHTS: [i32; 4] = [0, 3, 5, 8];

/// 4bpp punch-through weights. Value 2 also clears alpha.
const PUNCH_THROUGH_WEIGHTS: [i32; 4] = [0, 4, 4, 8];

/// A PVRTC1 variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum PvrtcFormat {
    /// 2 bits per pixel, alpha ignored.
    Rgb2bpp,
    /// 2 bits per pixel with alpha.
    Rgba2bpp,
    /// 4 bits per pixel, alpha ignored.
    Rgb4bpp,
    /// 4 bits per pixel with alpha.
    Rgba4bpp,
}

impl PvrtcFormat {
    /// Short uppercase name.
    pub const fn name(self) -> &'static str {
        match self {
            PvrtcFormat::Rgb2bpp => "PVRTC_2BPP_RGB",
            PvrtcFormat::Rgba2bpp => "PVRTC_2BPP_RGBA",
            PvrtcFormat::Rgb4bpp => "PVRTC_4BPP_RGB",
            PvrtcFormat::Rgba4bpp => "PVRTC_4BPP_RGBA",
        }
    }

    /// Pixels covered by one 64-bit word, as `(width, height)`.
    pub const fn word_dimensions(self) -> (usize, usize) {
        if self.is_2bpp() {
            (8, 4)
        } else {
            (4, 4)
        }
    }

    const fn is_2bpp(self) -> bool {
        matches!(self, PvrtcFormat::Rgb2bpp | PvrtcFormat::Rgba2bpp)
    }

    /// Whether the alpha stored in the words is kept.
    pub const fn has_alpha(self) -> bool {
        matches!(self, PvrtcFormat::Rgba2bpp | PvrtcFormat::Rgba4bpp)
    }

    /// Significant bits of the decoded channels.
    pub const fn sbit(self) -> Sbit {
        if self.has_alpha() {
            Sbit::new(8, 8, 8, 0, 8)
        } else {
            Sbit::new(8, 8, 8, 0, 0)
        }
    }

    /// Number of words along each axis for a `width` x `height` image. Never less than 2.
    pub fn word_grid(self, width: u32, height: u32) -> (usize, usize) {
        let (ww, wh) = self.word_dimensions();
        (
            (width as usize).div_ceil(ww).max(2),
            (height as usize).div_ceil(wh).max(2),
        )
    }

    /// Number of source bytes needed to decode a `width` x `height` image.
    pub fn required_source_len(self, width: u32, height: u32) -> usize {
        let (x_words, y_words) = self.word_grid(width, height);
        x_words * y_words * 8
    }
}

impl fmt::Display for PvrtcFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The words of one image, in row-major order, and the grid they cover.
struct Words {
    words: Vec<Word>,
    x_words: usize,
    y_words: usize,
    word_width: usize,
    word_height: usize,
}

impl Words {
    fn new(format: PvrtcFormat, width: u32, height: u32, src: &[u8]) -> Self {
        let (x_words, y_words) = format.word_grid(width, height);
        let (word_width, word_height) = format.word_dimensions();
        let mut words = vec![Word::default(); x_words * y_words];
        for y in 0..y_words {
            for x in 0..x_words {
                let offset = twiddle_uv(x_words, y_words, x, y) * 8;
                if let Some(bytes) = src.get(offset..offset + 8) {
                    let mut raw = [0; 8];
                    raw.copy_from_slice(bytes);
                    words[y * x_words + x] = Word::from_le_bytes(raw);
                }
            }
        }
        Self {
            words,
            x_words,
            y_words,
            word_width,
            word_height,
        }
    }

    /// Full width of the decoded area, in pixels.
    #[inline(always)]
    fn pixel_width(&self) -> usize {
        self.x_words * self.word_width
    }

    #[inline(always)]
    fn pixel_height(&self) -> usize {
        self.y_words * self.word_height
    }

    /// The word that holds the modulation of pixel `(x, y)`, with coordinates wrapped.
    #[inline(always)]
    fn word_at(&self, x: usize, y: usize) -> Word {
        let x = x % self.pixel_width() / self.word_width;
        let y = y % self.pixel_height() / self.word_height;
        self.words[y * self.x_words + x]
    }

    /// Colors `A` and `B` at pixel `(x, y)`, bilinearly upscaled and widened to 8 bits.
    ///
    /// Each word's colors sit at the center of its footprint; pixels between centers blend
    /// the four surrounding words, wrapping around the image edges.
    fn upscaled_colors(&self, x: usize, y: usize) -> ([i32; 4], [i32; 4]) {
        let (ww, wh) = (self.word_width, self.word_height);
        let fx = (x + self.pixel_width() - ww / 2) % self.pixel_width();
        let fy = (y + self.pixel_height() - wh / 2) % self.pixel_height();
        let (x0, lx) = (fx / ww, (fx % ww) as i32);
        let (y0, ly) = (fy / wh, (fy % wh) as i32);
        let x1 = (x0 + 1) % self.x_words;
        let y1 = (y0 + 1) % self.y_words;

        let (ww, wh) = (ww as i32, wh as i32);
        let corners = [
            (self.words[y0 * self.x_words + x0], (ww - lx) * (wh - ly)),
            (self.words[y0 * self.x_words + x1], lx * (wh - ly)),
            (self.words[y1 * self.x_words + x0], (ww - lx) * ly),
            (self.words[y1 * self.x_words + x1], lx * ly),
        ];

        let mut a: Color = [0; 4];
        let mut b: Color = [0; 4];
        for (word, weight) in corners {
            let (ca, cb) = (word.color_a(), word.color_b());
            for c in 0..4 {
                a[c] += ca[c] * weight;
                b[c] += cb[c] * weight;
            }
        }
        // Normalize to 4 fractional bits, then widen 5-bit color and 4-bit alpha.
        let shift = (ww * wh).trailing_zeros() - 4;
        let widen = |sum: Color| -> [i32; 4] {
            let s = sum.map(|v| v >> shift);
            [
                (s[0] >> 6) + (s[0] >> 1),
                (s[1] >> 6) + (s[1] >> 1),
                (s[2] >> 6) + (s[2] >> 1),
                (s[3] >> 4) + s[3],
            ]
        };
        (widen(a), widen(b))
    }

    /// Modulation weight out of 8 for pixel `(x, y)` and whether it is punched through.
    fn modulation(&self, format: PvrtcFormat, x: usize, y: usize) -> (i32, bool) {
        let word = self.word_at(x, y);
        let (lx, ly) = (x % self.word_width, y % self.word_height);
        if !format.is_2bpp() {
            let value = ((word.modulation >> (2 * (ly * 4 + lx))) & 3) as usize;
            return if word.mode() {
                (PUNCH_THROUGH_WEIGHTS[value], value == 2)
            } else {
                (WEIGHTS[value], false)
            };
        }

        if !word.mode() || (lx ^ ly) & 1 == 0 {
            return (self.stored_2bpp(x, y), false);
        }

        // Interpolated pixel of the checkerboard.
        let (w, h) = (self.pixel_width(), self.pixel_height());
        let horizontal = self.stored_2bpp(x + w - 1, y) + self.stored_2bpp(x + 1, y);
        let vertical = self.stored_2bpp(x, y + h - 1) + self.stored_2bpp(x, y + 1);
        let weight = if word.modulation & 1 == 0 {
            (horizontal + vertical + 2) / 4
        } else if word.modulation & (1 << 20) != 0 {
            (vertical + 1) / 2
        } else {
            (horizontal + 1) / 2
        };
        (weight, false)
    }

    /// Weight of a 2bpp pixel that carries its own modulation value.
    fn stored_2bpp(&self, x: usize, y: usize) -> i32 {
        let word = self.word_at(x, y);
        let (lx, ly) = (x % self.pixel_width() % 8, y % self.pixel_height() % 4);
        if !word.mode() {
            return if (word.modulation >> (ly * 8 + lx)) & 1 != 0 {
                8
            } else {
                0
            };
        }
        // Bit 0 and, in the single-axis modes, bit 20 are flags. They are replaced by their
        // upper neighbor bit.
        let mut data = word.modulation;
        data = (data & !1) | ((data >> 1) & 1);
        if word.modulation & 1 != 0 {
            data = (data & !(1 << 20)) | ((data >> 1) & (1 << 20));
        }
        WEIGHTS[((data >> (2 * (ly * 4 + lx / 2))) & 3) as usize]
    }
}

/// Decodes a `width` x `height` PVRTC1 image.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` or `height` is zero, too large or not a
///   power of two.
/// - [`DecodeError::TruncatedInput`] if `src` holds fewer words than the image needs.
pub fn decode(
    format: PvrtcFormat,
    width: u32,
    height: u32,
    src: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;
    if unlikely(!width.is_power_of_two() || !height.is_power_of_two()) {
        return Err(DecodeError::dimensions(
            width,
            height,
            "PVRTC dimensions must be powers of two",
        ));
    }
    check_source_len(src, format.required_source_len(width, height))?;
    log::trace!("Decoding {width}x{height} {format} image");

    let words = Words::new(format, width, height, src);
    let mut raster = CanonicalRaster::new_argb32(width, height)?;
    for (y, row) in raster.argb32_rows_mut().enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            *px = decode_pixel(&words, format, x, y);
        }
    }
    raster.set_sbit(format.sbit());
    Ok(raster)
}

#[inline]
fn decode_pixel(words: &Words, format: PvrtcFormat, x: usize, y: usize) -> Argb32 {
    let (a, b) = words.upscaled_colors(x, y);
    let (weight, punch_through) = words.modulation(format, x, y);
    let mix = |c: usize| ((a[c] * (8 - weight) + b[c] * weight) / 8).clamp(0, 255) as u8;
    let alpha = if !format.has_alpha() {
        0xFF
    } else if punch_through {
        0
    } else {
        mix(3)
    };
    argb(alpha, mix(0), mix(1), mix(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    const WHITE_A: u32 = 0x8000_FFFE;
    const BLACK_A: u32 = 0x8000_8000;

    fn word(modulation: u32, color: u32) -> [u8; 8] {
        let mut out = [0; 8];
        out[..4].copy_from_slice(&modulation.to_le_bytes());
        out[4..].copy_from_slice(&color.to_le_bytes());
        out
    }

    /// An image where every word is the same.
    fn uniform(format: PvrtcFormat, size: u32, modulation: u32, color: u32) -> CanonicalRaster {
        let words = format.required_source_len(size, size) / 8;
        let src = word(modulation, color).repeat(words);
        decode(format, size, size, &src).unwrap()
    }

    fn assert_uniform(raster: &CanonicalRaster, expected: Argb32) {
        for (i, px) in raster.to_packed_argb32().into_iter().enumerate() {
            assert_eq!(px, expected, "pixel {i}: {px:08X}");
        }
    }

    #[rstest]
    #[case(PvrtcFormat::Rgba4bpp, 0x0000_0000, WHITE_A, 0xFFFFFFFF)]
    #[case(PvrtcFormat::Rgba4bpp, 0xFFFF_FFFF, WHITE_A, 0xFF000000)]
    #[case(PvrtcFormat::Rgba4bpp, 0x5555_5555, WHITE_A, 0xFF9F9F9F)]
    #[case(PvrtcFormat::Rgba4bpp, 0xAAAA_AAAA, WHITE_A, 0xFF5F5F5F)]
    // Punch-through: value 2 is half way with zero alpha.
    #[case(PvrtcFormat::Rgba4bpp, 0xAAAA_AAAA, WHITE_A | 1, 0x007F7F7F)]
    #[case(PvrtcFormat::Rgb4bpp, 0xAAAA_AAAA, WHITE_A | 1, 0xFF7F7F7F)]
    #[case(PvrtcFormat::Rgba4bpp, 0x5555_5555, WHITE_A | 1, 0xFF7F7F7F)]
    #[case(PvrtcFormat::Rgba2bpp, 0x0000_0000, WHITE_A, 0xFFFFFFFF)]
    #[case(PvrtcFormat::Rgba2bpp, 0xFFFF_FFFF, WHITE_A, 0xFF000000)]
    #[case(PvrtcFormat::Rgba2bpp, 0xFFFF_FFFF, WHITE_A | 1, 0xFF000000)]
    fn uniform_images(
        #[case] format: PvrtcFormat,
        #[case] modulation: u32,
        #[case] color: u32,
        #[case] expected: Argb32,
    ) {
        assert_uniform(&uniform(format, 16, modulation, color), expected);
    }

    #[rstest]
    #[case(PvrtcFormat::Rgba4bpp, 0xEEFFFFFF)]
    #[case(PvrtcFormat::Rgb4bpp, 0xFFFFFFFF)]
    fn translucent_color_a(#[case] format: PvrtcFormat, #[case] expected: Argb32) {
        assert_uniform(&uniform(format, 8, 0, 0x8000_7FFE), expected);
    }

    #[rstest]
    #[case(2, 2, 0xFFFFFFFF)] // center of the white word
    #[case(6, 6, 0xFF000000)] // center of a black word
    #[case(4, 2, 0xFF7F7F7F)] // half way to the right neighbor
    #[case(0, 0, 0xFF3F3F3F)] // a quarter of the white word, wrapped
    fn upscales_colors_bilinearly(#[case] x: u32, #[case] y: u32, #[case] expected: Argb32) {
        // 2x2 words: (0, 0) is white and the others are black.
        let mut src = word(0, WHITE_A).to_vec();
        for _ in 0..3 {
            src.extend_from_slice(&word(0, BLACK_A));
        }
        let raster = decode(PvrtcFormat::Rgba4bpp, 8, 8, &src).unwrap();
        assert_eq!(raster.pixel(x, y), Some(expected));
    }

    #[test]
    fn twiddled_word_order() {
        // 4x4 words; only word (1, 0) is white, stored at Morton index 2.
        let mut src = Vec::new();
        for i in 0..16 {
            src.extend_from_slice(&word(0, if i == 2 { WHITE_A } else { BLACK_A }));
        }
        let raster = decode(PvrtcFormat::Rgba4bpp, 16, 16, &src).unwrap();
        assert_eq!(raster.pixel(6, 2), Some(0xFFFFFFFF));
        assert_eq!(raster.pixel(2, 6), Some(0xFF000000));
    }

    #[test]
    fn checkerboard_interpolates_vertically() {
        // Rows 0 and 2 store weight 8, rows 1 and 3 store weight 0. Bits 0 and 20 select the
        // vertical-only mode.
        let raster = uniform(PvrtcFormat::Rgba2bpp, 16, 0x00FF_00FF, WHITE_A | 1);
        for y in 0..16 {
            for x in 0..16 {
                let expected = if x % 2 == 0 { 0xFF000000 } else { 0xFFFFFFFF };
                assert_eq!(raster.pixel(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn one_bit_modulation_is_row_major() {
        // Only the first row of each word selects B.
        let raster = uniform(PvrtcFormat::Rgba2bpp, 16, 0x0000_00FF, WHITE_A);
        for y in 0..8 {
            let expected = if y % 4 == 0 { 0xFF000000 } else { 0xFFFFFFFF };
            assert_eq!(raster.pixel(3, y), Some(expected), "row {y}");
        }
    }

    #[rstest]
    #[case(PvrtcFormat::Rgba4bpp, 8, 8, 32)]
    #[case(PvrtcFormat::Rgba4bpp, 4, 4, 32)]
    #[case(PvrtcFormat::Rgba4bpp, 32, 16, 256)]
    #[case(PvrtcFormat::Rgb2bpp, 16, 8, 32)]
    #[case(PvrtcFormat::Rgb2bpp, 32, 32, 256)]
    fn required_lengths(
        #[case] format: PvrtcFormat,
        #[case] width: u32,
        #[case] height: u32,
        #[case] expected: usize,
    ) {
        assert_eq!(format.required_source_len(width, height), expected);
        assert_eq!(
            decode(format, width, height, &vec![0; expected - 1]).unwrap_err(),
            DecodeError::TruncatedInput {
                needed: expected,
                actual: expected - 1
            }
        );
    }

    #[rstest]
    #[case(12, 8)]
    #[case(8, 0)]
    #[case(16, 24)]
    fn rejects_non_power_of_two_dimensions(#[case] width: u32, #[case] height: u32) {
        assert!(matches!(
            decode(PvrtcFormat::Rgba4bpp, width, height, &[0; 4096]),
            Err(DecodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn small_images_are_cropped_from_two_by_two_words() {
        let raster = uniform(PvrtcFormat::Rgb4bpp, 4, 0, WHITE_A);
        assert_eq!((raster.width(), raster.height()), (4, 4));
        assert_eq!(raster.sbit(), Some(Sbit::new(8, 8, 8, 0, 0)));
        assert_uniform(&raster, 0xFFFFFFFF);
    }
}
