use crate::argb32::{argb, Argb32};

/// Represents a 16-bit RGB565 color (5 bits red, 6 bits green, 5 bits blue)
/// As encountered in the BC1 family and in a number of linear console formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color565 {
    /// The underlying 16-bit RGB565 value
    value: u16,
}

impl Color565 {
    /// Creates a new [`Color565`] from the raw 16-bit value
    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// Reads a little-endian [`Color565`] from the first two bytes of `bytes`.
    #[inline]
    pub const fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self::from_raw(u16::from_le_bytes(bytes))
    }

    /// Reads a big-endian [`Color565`], as stored by GameCube textures.
    #[inline]
    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self::from_raw(u16::from_be_bytes(bytes))
    }

    /// Creates a new [`Color565`] from separate 8-bit RGB components, truncating the low bits.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            value: ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3),
        }
    }

    /// Returns the raw 16-bit value
    #[inline]
    pub const fn raw_value(&self) -> u16 {
        self.value
    }

    // Endpoints are widened to 8 bits by replicating the top bits,
    // which is what every GPU vendor does for BC1.

    /// Extracts the expanded 8-bit red component
    #[inline]
    pub const fn red(&self) -> u8 {
        let r = (self.value & 0b11111000_00000000) >> 11;
        ((r << 3) | (r >> 2)) as u8
    }

    /// Extracts the expanded 8-bit green component
    #[inline]
    pub const fn green(&self) -> u8 {
        let g = (self.value & 0b00000111_11100000) >> 5;
        ((g << 2) | (g >> 4)) as u8
    }

    /// Extracts the expanded 8-bit blue component
    #[inline]
    pub const fn blue(&self) -> u8 {
        let b = self.value & 0b00000000_00011111;
        ((b << 3) | (b >> 2)) as u8
    }

    /// Compares two [`Color565`] values.
    ///
    /// BC1 selects four-color mode when the first endpoint is strictly greater than the second.
    #[inline]
    pub const fn greater_than(&self, other: &Self) -> bool {
        self.value > other.value
    }

    /// Converts this color to an opaque [`Argb32`] pixel.
    #[inline]
    pub const fn to_argb32(&self) -> Argb32 {
        argb(0xFF, self.red(), self.green(), self.blue())
    }

    /// Converts this color to an [`Argb32`] pixel with the specified alpha value.
    #[inline]
    pub const fn to_argb32_with_alpha(&self, alpha: u8) -> Argb32 {
        argb(alpha, self.red(), self.green(), self.blue())
    }
}
