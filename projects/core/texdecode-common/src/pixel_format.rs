//! # Pixel Format Registry
//!
//! Every direct (non-block) source encoding the decoders understand, with its bit depth,
//! channel layout and default significant-bit metadata.
//!
//! ## Channel layouts
//!
//! Most formats are plain bit fields on the little-endian source word. Each channel is a
//! `(shift, bits)` pair counted from the least significant bit and is widened to 8 bits by
//! replicating its most significant bits. A missing color channel reads as 0 and a missing
//! alpha channel reads as `0xFF`.
//!
//! ```text
//! RGB565:   RRRRRGGG GGGBBBBB    R(11,5) G(5,6) B(0,5)
//! ARGB1555: ARRRRRGG GGGBBBBB    A(15,1) R(10,5) G(5,5) B(0,5)
//! ```
//!
//! Formats whose conversion cannot be expressed that way carry a [`SpecialConversion`]
//! instead.

use crate::argb32::{argb, expand_bits, Argb32, TRANSPARENT};
use derive_enum_all_values::AllValues;

/// One channel of a bit-field layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    /// Position of the least significant bit of the channel in the source word.
    pub shift: u8,
    /// Width of the channel in bits. Zero means the channel is absent.
    pub bits: u8,
}

impl Channel {
    /// An absent channel.
    pub const NONE: Channel = Channel { shift: 0, bits: 0 };

    /// Creates a channel descriptor.
    pub const fn new(shift: u8, bits: u8) -> Self {
        Self { shift, bits }
    }

    /// Whether the channel exists in the source word.
    #[inline(always)]
    pub const fn is_present(self) -> bool {
        self.bits != 0
    }

    /// Extracts this channel from `word` and widens it to 8 bits.
    #[inline(always)]
    pub const fn extract(self, word: u32) -> u8 {
        expand_bits(word >> self.shift as u32, self.bits)
    }
}

/// Per-channel bit-field descriptors for one pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelLayout {
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
    pub alpha: Channel,
}

impl ChannelLayout {
    const fn rgba(red: (u8, u8), green: (u8, u8), blue: (u8, u8), alpha: (u8, u8)) -> Self {
        Self {
            red: Channel::new(red.0, red.1),
            green: Channel::new(green.0, green.1),
            blue: Channel::new(blue.0, blue.1),
            alpha: Channel::new(alpha.0, alpha.1),
        }
    }

    const fn rgb(red: (u8, u8), green: (u8, u8), blue: (u8, u8)) -> Self {
        Self::rgba(red, green, blue, (0, 0))
    }

    /// Luminance replicated into all three color channels.
    const fn luminance(l: (u8, u8), alpha: (u8, u8)) -> Self {
        Self::rgba(l, l, l, alpha)
    }

    /// Expands one source word into a canonical pixel.
    #[inline(always)]
    pub const fn to_argb32(&self, word: u32) -> Argb32 {
        let a = if self.alpha.is_present() {
            self.alpha.extract(word)
        } else {
            0xFF
        };
        argb(
            a,
            self.red.extract(word),
            self.green.extract(word),
            self.blue.extract(word),
        )
    }
}

/// Conversions that are not a pure bit-field expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialConversion {
    /// GameCube: opaque RGB555 when the top bit is set, otherwise RGB444 with 3-bit alpha.
    Rgb5A3,
    /// [`SpecialConversion::Rgb5A3`] with red and blue swapped.
    Bgr5A3,
    /// BGR555 where the raw value 0 is fully transparent.
    Bgr555Ps1,
    /// PlayStation 2: opaque BGR888 when the top bit is set, otherwise 7-bit alpha.
    Bgr888Abgr7888,
    /// Shared-exponent HDR, clamped to `[0, 1]`.
    Rgb9E5,
    /// 10-bit color channels truncated to 8 bits.
    A2R10G10B10,
    /// 10-bit color channels truncated to 8 bits, red in the low bits.
    A2B10G10R10,
    /// Two 16-bit channels truncated to 8 bits; blue is 0.
    G16R16,
}

/// Alpha values for the 3-bit alpha field of RGB5A3-style formats.
const A3_LOOKUP: [u8; 8] = [0x00, 0x24, 0x49, 0x6D, 0x92, 0xB6, 0xDB, 0xFF];

/// Alpha values for the 2-bit alpha field of the 10-bit formats.
const A2_LOOKUP: [u32; 4] = [0x0000_0000, 0x5500_0000, 0xAA00_0000, 0xFF00_0000];

impl SpecialConversion {
    /// Converts one source word to a canonical pixel.
    #[inline]
    pub fn to_argb32(self, px: u32) -> Argb32 {
        match self {
            SpecialConversion::Rgb5A3 => {
                if px & 0x8000 != 0 {
                    argb(
                        0xFF,
                        expand_bits(px >> 10, 5),
                        expand_bits(px >> 5, 5),
                        expand_bits(px, 5),
                    )
                } else {
                    argb(
                        A3_LOOKUP[((px >> 12) & 7) as usize],
                        expand_bits(px >> 8, 4),
                        expand_bits(px >> 4, 4),
                        expand_bits(px, 4),
                    )
                }
            }
            SpecialConversion::Bgr5A3 => {
                if px & 0x8000 != 0 {
                    argb(
                        0xFF,
                        expand_bits(px, 5),
                        expand_bits(px >> 5, 5),
                        expand_bits(px >> 10, 5),
                    )
                } else {
                    argb(
                        A3_LOOKUP[((px >> 12) & 7) as usize],
                        expand_bits(px, 4),
                        expand_bits(px >> 4, 4),
                        expand_bits(px >> 8, 4),
                    )
                }
            }
            SpecialConversion::Bgr555Ps1 => {
                if px & 0xFFFF == 0 {
                    TRANSPARENT
                } else {
                    argb(
                        0xFF,
                        expand_bits(px, 5),
                        expand_bits(px >> 5, 5),
                        expand_bits(px >> 10, 5),
                    )
                }
            }
            SpecialConversion::Bgr888Abgr7888 => {
                let a = if px & 0x8000_0000 != 0 {
                    0xFF
                } else {
                    expand_bits(px >> 24, 7)
                };
                argb(a, px as u8, (px >> 8) as u8, (px >> 16) as u8)
            }
            SpecialConversion::Rgb9E5 => rgb9_e5_to_argb32(px),
            SpecialConversion::A2R10G10B10 => {
                ((px >> 6) & 0x00FF_0000)
                    | ((px >> 4) & 0x0000_FF00)
                    | ((px >> 2) & 0x0000_00FF)
                    | A2_LOOKUP[(px >> 30) as usize]
            }
            SpecialConversion::A2B10G10R10 => {
                ((px << 14) & 0x00FF_0000)
                    | ((px >> 4) & 0x0000_FF00)
                    | ((px >> 22) & 0x0000_00FF)
                    | A2_LOOKUP[(px >> 30) as usize]
            }
            SpecialConversion::G16R16 => {
                0xFF00_0000 | ((px << 8) & 0x00FF_0000) | ((px >> 16) & 0x0000_FF00)
            }
        }
    }
}

/// Shared-exponent RGB to LDR. Each channel is `mantissa * 2^(exp - 15 - 9)`, clamped to
/// `[0, 1]` and scaled by 256.
fn rgb9_e5_to_argb32(px: u32) -> Argb32 {
    const EXP_BIAS: i32 = 15;
    const MANTISSA_BITS: i32 = 9;

    let e = (px >> 27) as i32 - EXP_BIAS - MANTISSA_BITS;
    let scale = 2f32.powi(e);
    let to_u8 = |mantissa: u32| -> u8 {
        let f = mantissa as f32 * scale;
        if f <= 0.0 {
            0
        } else if f >= 1.0 {
            0xFF
        } else {
            (f * 256.0) as u8
        }
    };

    argb(
        0xFF,
        to_u8(px & 0x1FF),
        to_u8((px >> 9) & 0x1FF),
        to_u8((px >> 18) & 0x1FF),
    )
}

/// How a [`PixelFormat`] maps its source word to a canonical pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    BitField(ChannelLayout),
    Special(SpecialConversion),
}

/// Width of one source pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum BitDepth {
    Bits8,
    Bits16,
    Bits24,
    Bits32,
}

impl BitDepth {
    /// Size of one source pixel in bytes.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            BitDepth::Bits8 => 1,
            BitDepth::Bits16 => 2,
            BitDepth::Bits24 => 3,
            BitDepth::Bits32 => 4,
        }
    }

    /// Size of one source pixel in bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.bytes_per_pixel() as u32 * 8
    }
}

/// Significant bits per channel, as carried by a PNG `sBIT` chunk.
///
/// `gray` is non-zero only for luminance sources. Color channels a source does not carry
/// are reported as 1 bit, since 0 is not a valid PNG value for a color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sbit {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub gray: u8,
    pub alpha: u8,
}

impl Sbit {
    /// Creates an sBIT record.
    pub const fn new(red: u8, green: u8, blue: u8, gray: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            gray,
            alpha,
        }
    }
}

/// Direct (non-block) source pixel encodings.
///
/// Names list channels from the most significant bit to the least significant bit of the
/// little-endian source word; `x` marks an ignored channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum PixelFormat {
    // 8-bit
    L8,
    A4L4,
    A8,
    R8,
    Rgb332,

    // 16-bit
    Rgb565,
    Bgr565,
    Argb1555,
    Abgr1555,
    Rgba5551,
    Bgra5551,
    Argb4444,
    Abgr4444,
    Rgba4444,
    Bgra4444,
    Xrgb4444,
    Xbgr4444,
    Rgbx4444,
    Bgrx4444,
    Argb8332,
    Rgb5A3,
    Bgr5A3,
    Ia8,
    Rgb555,
    Bgr555,
    Bgr555Ps1,
    Rg88,
    Gr88,
    L16,
    A8L8,
    L8A8,

    // 24-bit
    Rgb888,
    Bgr888,

    // 32-bit
    Argb8888,
    Abgr8888,
    Rgba8888,
    Bgra8888,
    Xrgb8888,
    Xbgr8888,
    Rgbx8888,
    Bgrx8888,
    Bgr888Abgr7888,
    G16R16,
    A2R10G10B10,
    A2B10G10R10,
    Rgb9E5,
    Rabg8888,
}

impl PixelFormat {
    /// Display name of the format.
    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::L8 => "L8",
            PixelFormat::A4L4 => "A4L4",
            PixelFormat::A8 => "A8",
            PixelFormat::R8 => "R8",
            PixelFormat::Rgb332 => "RGB332",
            PixelFormat::Rgb565 => "RGB565",
            PixelFormat::Bgr565 => "BGR565",
            PixelFormat::Argb1555 => "ARGB1555",
            PixelFormat::Abgr1555 => "ABGR1555",
            PixelFormat::Rgba5551 => "RGBA5551",
            PixelFormat::Bgra5551 => "BGRA5551",
            PixelFormat::Argb4444 => "ARGB4444",
            PixelFormat::Abgr4444 => "ABGR4444",
            PixelFormat::Rgba4444 => "RGBA4444",
            PixelFormat::Bgra4444 => "BGRA4444",
            PixelFormat::Xrgb4444 => "xRGB4444",
            PixelFormat::Xbgr4444 => "xBGR4444",
            PixelFormat::Rgbx4444 => "RGBx4444",
            PixelFormat::Bgrx4444 => "BGRx4444",
            PixelFormat::Argb8332 => "ARGB8332",
            PixelFormat::Rgb5A3 => "RGB5A3",
            PixelFormat::Bgr5A3 => "BGR5A3",
            PixelFormat::Ia8 => "IA8",
            PixelFormat::Rgb555 => "RGB555",
            PixelFormat::Bgr555 => "BGR555",
            PixelFormat::Bgr555Ps1 => "BGR555_PS1",
            PixelFormat::Rg88 => "RG88",
            PixelFormat::Gr88 => "GR88",
            PixelFormat::L16 => "L16",
            PixelFormat::A8L8 => "A8L8",
            PixelFormat::L8A8 => "L8A8",
            PixelFormat::Rgb888 => "RGB888",
            PixelFormat::Bgr888 => "BGR888",
            PixelFormat::Argb8888 => "ARGB8888",
            PixelFormat::Abgr8888 => "ABGR8888",
            PixelFormat::Rgba8888 => "RGBA8888",
            PixelFormat::Bgra8888 => "BGRA8888",
            PixelFormat::Xrgb8888 => "xRGB8888",
            PixelFormat::Xbgr8888 => "xBGR8888",
            PixelFormat::Rgbx8888 => "RGBx8888",
            PixelFormat::Bgrx8888 => "BGRx8888",
            PixelFormat::Bgr888Abgr7888 => "BGR888_ABGR7888",
            PixelFormat::G16R16 => "G16R16",
            PixelFormat::A2R10G10B10 => "A2R10G10B10",
            PixelFormat::A2B10G10R10 => "A2B10G10R10",
            PixelFormat::Rgb9E5 => "RGB9_E5",
            PixelFormat::Rabg8888 => "RABG8888",
        }
    }

    /// Width of one source pixel.
    pub const fn depth(self) -> BitDepth {
        use PixelFormat::*;
        match self {
            L8 | A4L4 | A8 | R8 | Rgb332 => BitDepth::Bits8,
            Rgb888 | Bgr888 => BitDepth::Bits24,
            Argb8888 | Abgr8888 | Rgba8888 | Bgra8888 | Xrgb8888 | Xbgr8888 | Rgbx8888
            | Bgrx8888 | Bgr888Abgr7888 | G16R16 | A2R10G10B10 | A2B10G10R10 | Rgb9E5
            | Rabg8888 => BitDepth::Bits32,
            _ => BitDepth::Bits16,
        }
    }

    /// Size of one source pixel in bytes.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        self.depth().bytes_per_pixel()
    }

    /// How a source word of this format becomes a canonical pixel.
    pub const fn conversion(self) -> Conversion {
        use Conversion::{BitField, Special};
        use PixelFormat::*;
        type L = ChannelLayout;
        match self {
            L8 => BitField(L::luminance((0, 8), (0, 0))),
            A4L4 => BitField(L::luminance((0, 4), (4, 4))),
            A8 => BitField(L::rgba((0, 0), (0, 0), (0, 0), (0, 8))),
            R8 => BitField(L::rgb((0, 8), (0, 0), (0, 0))),
            Rgb332 => BitField(L::rgb((5, 3), (2, 3), (0, 2))),

            Rgb565 => BitField(L::rgb((11, 5), (5, 6), (0, 5))),
            Bgr565 => BitField(L::rgb((0, 5), (5, 6), (11, 5))),
            Argb1555 => BitField(L::rgba((10, 5), (5, 5), (0, 5), (15, 1))),
            Abgr1555 => BitField(L::rgba((0, 5), (5, 5), (10, 5), (15, 1))),
            Rgba5551 => BitField(L::rgba((11, 5), (6, 5), (1, 5), (0, 1))),
            Bgra5551 => BitField(L::rgba((1, 5), (6, 5), (11, 5), (0, 1))),
            Argb4444 => BitField(L::rgba((8, 4), (4, 4), (0, 4), (12, 4))),
            Abgr4444 => BitField(L::rgba((0, 4), (4, 4), (8, 4), (12, 4))),
            Rgba4444 => BitField(L::rgba((12, 4), (8, 4), (4, 4), (0, 4))),
            Bgra4444 => BitField(L::rgba((4, 4), (8, 4), (12, 4), (0, 4))),
            Xrgb4444 => BitField(L::rgb((8, 4), (4, 4), (0, 4))),
            Xbgr4444 => BitField(L::rgb((0, 4), (4, 4), (8, 4))),
            Rgbx4444 => BitField(L::rgb((12, 4), (8, 4), (4, 4))),
            Bgrx4444 => BitField(L::rgb((4, 4), (8, 4), (12, 4))),
            Argb8332 => BitField(L::rgba((5, 3), (2, 3), (0, 2), (8, 8))),
            Rgb5A3 => Special(SpecialConversion::Rgb5A3),
            Bgr5A3 => Special(SpecialConversion::Bgr5A3),
            Ia8 | L8A8 => BitField(L::luminance((8, 8), (0, 8))),
            Rgb555 => BitField(L::rgb((10, 5), (5, 5), (0, 5))),
            Bgr555 => BitField(L::rgb((0, 5), (5, 5), (10, 5))),
            Bgr555Ps1 => Special(SpecialConversion::Bgr555Ps1),
            Rg88 => BitField(L::rgb((8, 8), (0, 8), (0, 0))),
            Gr88 => BitField(L::rgb((0, 8), (8, 8), (0, 0))),
            L16 => BitField(L::luminance((8, 8), (0, 0))),
            A8L8 => BitField(L::luminance((0, 8), (8, 8))),

            Rgb888 => BitField(L::rgb((16, 8), (8, 8), (0, 8))),
            Bgr888 => BitField(L::rgb((0, 8), (8, 8), (16, 8))),

            Argb8888 => BitField(L::rgba((16, 8), (8, 8), (0, 8), (24, 8))),
            Abgr8888 => BitField(L::rgba((0, 8), (8, 8), (16, 8), (24, 8))),
            Rgba8888 => BitField(L::rgba((24, 8), (16, 8), (8, 8), (0, 8))),
            Bgra8888 => BitField(L::rgba((8, 8), (16, 8), (24, 8), (0, 8))),
            Xrgb8888 => BitField(L::rgb((16, 8), (8, 8), (0, 8))),
            Xbgr8888 => BitField(L::rgb((0, 8), (8, 8), (16, 8))),
            Rgbx8888 => BitField(L::rgb((24, 8), (16, 8), (8, 8))),
            Bgrx8888 => BitField(L::rgb((8, 8), (16, 8), (24, 8))),
            Bgr888Abgr7888 => Special(SpecialConversion::Bgr888Abgr7888),
            G16R16 => Special(SpecialConversion::G16R16),
            A2R10G10B10 => Special(SpecialConversion::A2R10G10B10),
            A2B10G10R10 => Special(SpecialConversion::A2B10G10R10),
            Rgb9E5 => Special(SpecialConversion::Rgb9E5),
            Rabg8888 => BitField(L::rgba((24, 8), (0, 8), (8, 8), (16, 8))),
        }
    }

    /// Converts one little-endian source word of this format to a canonical pixel.
    ///
    /// Only the low [`PixelFormat::bytes_per_pixel`] bytes of `word` are significant.
    #[inline]
    pub fn to_argb32(self, word: u32) -> Argb32 {
        match self.conversion() {
            Conversion::BitField(layout) => layout.to_argb32(word),
            Conversion::Special(special) => special.to_argb32(word),
        }
    }

    /// Reads the source word for the pixel starting at `bytes[0]`.
    ///
    /// Returns `None` if `bytes` is shorter than one pixel.
    #[inline]
    pub fn read_word(self, bytes: &[u8]) -> Option<u32> {
        Some(match self.depth() {
            BitDepth::Bits8 => *bytes.first()? as u32,
            BitDepth::Bits16 => u16::from_le_bytes([*bytes.first()?, *bytes.get(1)?]) as u32,
            BitDepth::Bits24 => {
                let b = bytes.get(..3)?;
                u32::from_le_bytes([b[0], b[1], b[2], 0])
            }
            BitDepth::Bits32 => u32::from_le_bytes(bytes.get(..4)?.try_into().ok()?),
        })
    }

    /// Default sBIT metadata for rasters decoded from this format.
    pub const fn sbit(self) -> Sbit {
        use PixelFormat::*;
        match self {
            L8 | L16 => Sbit::new(8, 8, 8, 8, 0),
            A4L4 => Sbit::new(4, 4, 4, 4, 4),
            A8 => Sbit::new(1, 1, 1, 1, 8),
            R8 => Sbit::new(8, 1, 1, 0, 0),
            Rgb332 => Sbit::new(3, 3, 2, 0, 0),

            Rgb565 | Bgr565 => Sbit::new(5, 6, 5, 0, 0),
            Argb1555 | Abgr1555 | Rgba5551 | Bgra5551 | Bgr555Ps1 => Sbit::new(5, 5, 5, 0, 1),
            Argb4444 | Abgr4444 | Rgba4444 | Bgra4444 => Sbit::new(4, 4, 4, 0, 4),
            Xrgb4444 | Xbgr4444 | Rgbx4444 | Bgrx4444 => Sbit::new(4, 4, 4, 0, 0),
            Argb8332 => Sbit::new(3, 3, 2, 0, 8),
            Rgb5A3 | Bgr5A3 => Sbit::new(5, 5, 5, 0, 4),
            Ia8 | A8L8 | L8A8 => Sbit::new(8, 8, 8, 8, 8),
            Rgb555 | Bgr555 => Sbit::new(5, 5, 5, 0, 0),
            Rg88 | Gr88 | G16R16 => Sbit::new(8, 8, 1, 0, 0),

            Rgb888 | Bgr888 | Xrgb8888 | Xbgr8888 | Rgbx8888 | Bgrx8888 | Rgb9E5 => {
                Sbit::new(8, 8, 8, 0, 0)
            }
            Argb8888 | Abgr8888 | Rgba8888 | Bgra8888 | Bgr888Abgr7888 | Rabg8888 => {
                Sbit::new(8, 8, 8, 0, 8)
            }
            A2R10G10B10 | A2B10G10R10 => Sbit::new(8, 8, 8, 0, 2),
        }
    }

    /// Whether a decoded pixel of this format can have alpha below `0xFF`.
    pub const fn has_alpha(self) -> bool {
        match self.conversion() {
            Conversion::BitField(layout) => layout.alpha.is_present(),
            Conversion::Special(SpecialConversion::Rgb9E5 | SpecialConversion::G16R16) => false,
            Conversion::Special(_) => true,
        }
    }
}

impl core::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
