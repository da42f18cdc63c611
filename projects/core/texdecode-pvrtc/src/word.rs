//! The 64-bit PVRTC word and its addressing.
//!
//! A word is two little-endian `u32`s: the modulation data, then the color data. The color data
//! holds color `B` in its high half, color `A` in bits 1-15 and the modulation mode in bit 0.

/// One color channel set: 5-bit red, green and blue and 4-bit alpha, in that order.
pub(crate) type Color = [i32; 4];

/// A decoded 64-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Word {
    pub modulation: u32,
    pub color: u32,
}

impl Word {
    /// Reads a word from 8 bytes.
    #[inline]
    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        let [m0, m1, m2, m3, c0, c1, c2, c3] = bytes;
        Self {
            modulation: u32::from_le_bytes([m0, m1, m2, m3]),
            color: u32::from_le_bytes([c0, c1, c2, c3]),
        }
    }

    /// Whether the modulation data uses the alternative mode: punch-through for 4bpp and
    /// interpolated checkerboard values for 2bpp.
    #[inline(always)]
    pub fn mode(self) -> bool {
        self.color & 1 != 0
    }

    /// Color `A`: RGB554 when opaque, otherwise ARGB3443.
    pub fn color_a(self) -> Color {
        let c = (self.color & 0xFFFF) as i32;
        if c & 0x8000 != 0 {
            [(c >> 10) & 0x1F, (c >> 5) & 0x1F, widen4((c >> 1) & 0x0F), 0x0F]
        } else {
            [
                widen4((c >> 8) & 0x0F),
                widen4((c >> 4) & 0x0F),
                widen3((c >> 1) & 0x07),
                (c >> 11) & 0x0E,
            ]
        }
    }

    /// Color `B`: RGB555 when opaque, otherwise ARGB3444.
    pub fn color_b(self) -> Color {
        let c = (self.color >> 16) as i32;
        if c & 0x8000 != 0 {
            [(c >> 10) & 0x1F, (c >> 5) & 0x1F, c & 0x1F, 0x0F]
        } else {
            [
                widen4((c >> 8) & 0x0F),
                widen4((c >> 4) & 0x0F),
                widen4(c & 0x0F),
                (c >> 11) & 0x0E,
            ]
        }
    }
}

#[inline(always)]
fn widen4(v: i32) -> i32 {
    (v << 1) | (v >> 3)
}

#[inline(always)]
fn widen3(v: i32) -> i32 {
    (v << 2) | (v >> 1)
}

/// Index of word `(x, y)` in a `x_words` x `y_words` grid stored in Morton order.
///
/// Both sizes must be powers of two. Bits of `y` land on even positions and bits of `x` on odd
/// positions, up to the smaller size; the rest of the larger coordinate is appended above.
pub fn twiddle_uv(x_words: usize, y_words: usize, x: usize, y: usize) -> usize {
    debug_assert!(x_words.is_power_of_two() && y_words.is_power_of_two());
    debug_assert!(x < x_words && y < y_words);
    let min = x_words.min(y_words);
    let mut twiddled = 0;
    let mut bit = 1;
    let mut shift = 0;
    while bit < min {
        if y & bit != 0 {
            twiddled |= 1 << (2 * shift);
        }
        if x & bit != 0 {
            twiddled |= 1 << (2 * shift + 1);
        }
        bit <<= 1;
        shift += 1;
    }
    let rest = if x_words > y_words { x } else { y };
    twiddled | (rest >> shift) << (2 * shift)
}
