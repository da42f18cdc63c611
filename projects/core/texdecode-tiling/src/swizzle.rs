//! GPU swizzle addressing, as used by Xbox textures.
//!
//! Swizzled offsets interleave x and y bits like Morton order, but only while each axis still
//! has bits left, so rectangular and non-power-of-two sizes pack without gaps between bits.

use texdecode_common::error::{check_dimensions, check_source_len};
use texdecode_common::DecodeError;

/// The bit positions of x and y inside a swizzled offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwizzleMasks {
    /// Bits that carry the x coordinate.
    pub x: u32,
    /// Bits that carry the y coordinate.
    pub y: u32,
}

impl SwizzleMasks {
    /// Generates the masks for a `width` x `height` image. Positions are handed out from the
    /// least significant bit, alternating x then y while the axis still needs bits.
    pub fn new(width: u32, height: u32) -> Self {
        let (mut x, mut y) = (0u32, 0u32);
        let mut bit = 1u64;
        let mut mask_bit = 1u32;
        loop {
            let mut done = true;
            if bit < width as u64 {
                x |= mask_bit;
                mask_bit <<= 1;
                done = false;
            }
            if bit < height as u64 {
                y |= mask_bit;
                mask_bit <<= 1;
                done = false;
            }
            if done {
                break;
            }
            bit <<= 1;
        }
        Self { x, y }
    }

    /// Offset of pixel `(x, y)`, in pixels.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (deposit(x, self.x) | deposit(y, self.y)) as usize
    }

    /// Number of pixels the swizzled image spans: one past the largest offset.
    pub fn span(&self, width: u32, height: u32) -> usize {
        self.offset(width.saturating_sub(1), height.saturating_sub(1)) + 1
    }
}

/// Scatters the low bits of `value` onto the set bits of `mask`, lowest first.
#[inline]
pub fn deposit(mut value: u32, mask: u32) -> u32 {
    let mut result = 0;
    let mut bit = 1u32;
    while value != 0 && bit != 0 {
        if mask & bit != 0 {
            if value & 1 != 0 {
                result |= bit;
            }
            value >>= 1;
        }
        bit = bit.wrapping_shl(1);
    }
    result
}

fn check_buffers(
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    src: &[u8],
    dst: &[u8],
    src_span: usize,
    dst_span: usize,
) -> Result<(), DecodeError> {
    check_dimensions(width, height)?;
    check_source_len(src, src_span * bytes_per_pixel)?;
    if dst.len() < dst_span * bytes_per_pixel {
        return Err(DecodeError::TruncatedInput {
            needed: dst_span * bytes_per_pixel,
            actual: dst.len(),
        });
    }
    Ok(())
}

/// Reorders a swizzled image in `src` into linear rows in `dst`.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` or `height` is zero or too large.
/// - [`DecodeError::TruncatedInput`] if `src` does not cover the swizzled span or `dst` is
///   shorter than `width * height` pixels.
pub fn unswizzle(
    src: &[u8],
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    dst: &mut [u8],
) -> Result<(), DecodeError> {
    let masks = SwizzleMasks::new(width, height);
    let linear = width as usize * height as usize;
    check_buffers(width, height, bytes_per_pixel, src, dst, masks.span(width, height), linear)?;

    for (y, row) in dst
        .chunks_exact_mut(width as usize * bytes_per_pixel)
        .take(height as usize)
        .enumerate()
    {
        for (x, px) in row.chunks_exact_mut(bytes_per_pixel).enumerate() {
            let from = masks.offset(x as u32, y as u32) * bytes_per_pixel;
            px.copy_from_slice(&src[from..from + bytes_per_pixel]);
        }
    }
    Ok(())
}

/// Reorders linear rows in `src` into a swizzled image in `dst`. The inverse of [`unswizzle`].
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` or `height` is zero or too large.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height` pixels or `dst`
///   does not cover the swizzled span.
pub fn swizzle(
    src: &[u8],
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    dst: &mut [u8],
) -> Result<(), DecodeError> {
    let masks = SwizzleMasks::new(width, height);
    let linear = width as usize * height as usize;
    check_buffers(width, height, bytes_per_pixel, src, dst, linear, masks.span(width, height))?;

    for (y, row) in src
        .chunks_exact(width as usize * bytes_per_pixel)
        .take(height as usize)
        .enumerate()
    {
        for (x, px) in row.chunks_exact(bytes_per_pixel).enumerate() {
            let to = masks.offset(x as u32, y as u32) * bytes_per_pixel;
            dst[to..to + bytes_per_pixel].copy_from_slice(px);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(4, 4, 0b0101, 0b1010)]
    #[case(8, 2, 0b1101, 0b0010)]
    #[case(2, 8, 0b0001, 0b1110)]
    #[case(1, 1, 0, 0)]
    #[case(16, 16, 0x55, 0xAA)]
    #[case(6, 3, 0b10101, 0b01010)]
    fn generates_masks(#[case] width: u32, #[case] height: u32, #[case] x: u32, #[case] y: u32) {
        let masks = SwizzleMasks::new(width, height);
        assert_eq!(masks, SwizzleMasks { x, y });
        assert_eq!(masks.x & masks.y, 0);
    }

    #[rstest]
    // Mask bits 2, 5, 7 and 9 take the four value bits.
    #[case(0b1011, 0x6A4, 0x224)]
    #[case(0b11, 0b1010, 0b1010)]
    #[case(0, 0xFF, 0)]
    fn deposits_value_bits_into_the_mask(#[case] value: u32, #[case] mask: u32, #[case] expected: u32) {
        assert_eq!(deposit(value, mask), expected);
    }

    #[test]
    fn swizzle_then_unswizzle_round_trips_64x64() {
        let (width, height, bpp) = (64, 64, 4);
        let linear: Vec<u8> = (0..width * height * bpp)
            .map(|i| (i as u32).wrapping_mul(2654435761).rotate_left(7) as u8)
            .collect();
        let mut swizzled = vec![0; linear.len()];
        swizzle(&linear, width as u32, height as u32, bpp, &mut swizzled).unwrap();
        assert_ne!(swizzled, linear);

        let mut restored = vec![0; linear.len()];
        unswizzle(&swizzled, width as u32, height as u32, bpp, &mut restored).unwrap();
        assert_eq!(restored, linear);
    }

    #[rstest]
    #[case(64, 16)]
    #[case(8, 32)]
    #[case(4, 4)]
    fn swizzled_offsets_are_a_bijection_for_powers_of_two(#[case] width: u32, #[case] height: u32) {
        let masks = SwizzleMasks::new(width, height);
        let mut seen = vec![false; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                let i = masks.offset(x, y);
                assert!(!seen[i]);
                seen[i] = true;
            }
        }
        assert_eq!(masks.span(width, height), seen.len());
    }

    #[test]
    fn short_source_is_truncated() {
        let mut dst = vec![0; 32];
        assert_eq!(
            unswizzle(&[0; 31], 4, 4, 2, &mut dst).unwrap_err(),
            DecodeError::TruncatedInput {
                needed: 32,
                actual: 31
            }
        );
    }
}
