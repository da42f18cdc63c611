//! Dreamcast (PowerVR2) textures: square twiddled images and vector quantization.

use derive_enum_all_values::AllValues;
use likely_stable::unlikely;
use texdecode_common::error::{check_dimensions, check_palette_len, check_source_len, image_size};
use texdecode_common::pixel_format::PixelFormat;
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::{Argb32, DecodeError};

use crate::address::{compute_source_offset, TilingMode};

/// Largest width a Dreamcast texture can have.
pub const MAX_DREAMCAST_DIMENSION: u32 = 4096;

/// Codebook size of a full VQ texture, in palette entries.
pub const FULL_VQ_PALETTE_ENTRIES: usize = 1024;

/// How the mipmap chain in front of the base level is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AllValues)]
pub enum MipmapLayout {
    /// No mipmaps. The base level starts at offset 0.
    #[default]
    None,
    /// Levels from 1x1 upward, back to back. Each level takes at least one byte.
    Packed,
    /// Like [`MipmapLayout::Packed`], with the 1x1 level padded to the size of a 2x1 level.
    Padded1x1,
    /// Like [`MipmapLayout::Packed`], with the 1x1 level padded to the size of a 2x2 level.
    Padded2x2,
}

/// Number of bytes the mipmap chain of a square `width` x `width` texture occupies in front of
/// its base level, at `bits_per_pixel` (16 for twiddled textures, 2 for VQ index data).
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if a mipmapped `width` is not a power of two.
pub fn mipmap_skip(width: u32, bits_per_pixel: usize, layout: MipmapLayout) -> Result<usize, DecodeError> {
    let padding = match layout {
        MipmapLayout::None => return Ok(0),
        MipmapLayout::Packed => 0,
        MipmapLayout::Padded1x1 => bits_per_pixel / 8,
        MipmapLayout::Padded2x2 => 3 * bits_per_pixel / 8,
    };
    if !width.is_power_of_two() {
        return Err(DecodeError::dimensions(width, width, "mipmapped textures must be a power of two"));
    }

    let mut skip = padding;
    let mut size = 1usize;
    while size < width as usize {
        skip += (size * size * bits_per_pixel / 8).max(1);
        size <<= 1;
    }
    Ok(skip)
}

/// Which vector quantization variant a texture uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VqKind {
    /// 256 codebook entries of four colors each.
    Full,
    /// A codebook trimmed to the texture width.
    Small {
        /// Whether the texture carries mipmaps, which enlarges the codebook.
        mipmaps: bool,
    },
}

/// Number of palette entries (four per codebook entry) a `width`-wide texture of `kind` carries.
pub const fn vq_palette_entries(kind: VqKind, width: u32) -> usize {
    match kind {
        VqKind::Full => FULL_VQ_PALETTE_ENTRIES,
        VqKind::Small { mipmaps: false } => match width {
            0..=16 => 8 * 4,
            17..=32 => 32 * 4,
            33..=64 => 128 * 4,
            _ => 256 * 4,
        },
        VqKind::Small { mipmaps: true } => match width {
            0..=16 => 16 * 4,
            17..=32 => 64 * 4,
            33..=64 => 128 * 4,
            _ => 256 * 4,
        },
    }
}

fn check_dreamcast_format(format: PixelFormat) -> Result<(), DecodeError> {
    match format {
        PixelFormat::Argb1555 | PixelFormat::Rgb565 | PixelFormat::Argb4444 => Ok(()),
        _ => Err(DecodeError::UnsupportedFormat(format.name())),
    }
}

fn check_square(width: u32, height: u32) -> Result<(), DecodeError> {
    check_dimensions(width, height)?;
    if unlikely(width != height) {
        return Err(DecodeError::dimensions(width, height, "Dreamcast textures must be square"));
    }
    if unlikely(width > MAX_DREAMCAST_DIMENSION) {
        return Err(DecodeError::dimensions(
            width,
            height,
            "Dreamcast textures must not exceed 4096x4096",
        ));
    }
    Ok(())
}

#[inline(always)]
fn read_u16_le(src: &[u8], index: usize) -> u16 {
    u16::from_le_bytes([src[index * 2], src[index * 2 + 1]])
}

/// Converts a square twiddled 16-bit Dreamcast texture.
///
/// `format` must be [`PixelFormat::Argb1555`], [`PixelFormat::Rgb565`] or
/// [`PixelFormat::Argb4444`]. Pixels are little-endian.
///
/// # Errors
///
/// - [`DecodeError::UnsupportedFormat`] for any other `format`.
/// - [`DecodeError::InvalidDimensions`] if the image is not square, not a power of two, or
///   larger than 4096x4096.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height * 2`.
pub fn from_dreamcast_square_twiddled16(
    format: PixelFormat,
    width: u32,
    height: u32,
    src: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    check_dreamcast_format(format)?;
    check_square(width, height)?;
    if unlikely(!width.is_power_of_two()) {
        return Err(DecodeError::dimensions(
            width,
            height,
            "twiddled textures must be a power of two",
        ));
    }
    check_source_len(src, image_size(width, height, 2)?)?;

    log::trace!("Decoding {width}x{height} twiddled {format} texture");
    let mut raster = CanonicalRaster::new_argb32(width, height)?;
    for (y, row) in raster.argb32_rows_mut().enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            let i = compute_source_offset(x as u32, y as u32, width, height, TilingMode::Twiddled);
            *px = format.to_argb32(read_u16_le(src, i) as u32);
        }
    }
    raster.set_sbit(format.sbit());
    Ok(raster)
}

/// Converts a vector-quantized 16-bit Dreamcast texture.
///
/// Each byte of `src` selects four consecutive entries of `palette`, which fill one 2x2 pixel
/// group in column-major order. Index bytes are stored in twiddled order.
///
/// # Errors
///
/// - [`DecodeError::UnsupportedFormat`] if `format` is not a Dreamcast 16-bit format.
/// - [`DecodeError::InvalidDimensions`] if the image is not square or larger than 4096x4096.
/// - [`DecodeError::MalformedPalette`] if `palette` holds fewer than
///   [`vq_palette_entries`] 16-bit entries.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than one byte per 2x2 group.
/// - [`DecodeError::OutOfRangeIndex`] if a small VQ index selects entries past the codebook,
///   or a group's twiddled offset lies past the end of `src`.
pub fn from_dreamcast_vq16(
    format: PixelFormat,
    kind: VqKind,
    width: u32,
    height: u32,
    src: &[u8],
    palette: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    check_dreamcast_format(format)?;
    check_square(width, height)?;

    let entries = vq_palette_entries(kind, width);
    check_palette_len(palette, entries * 2)?;
    let groups_x = width.div_ceil(2);
    let groups_y = height.div_ceil(2);
    check_source_len(src, groups_x as usize * groups_y as usize)?;

    log::trace!("Decoding {width}x{height} {kind:?} VQ {format} texture ({entries} palette entries)");
    let colors: Vec<Argb32> = (0..entries)
        .map(|i| format.to_argb32(read_u16_le(palette, i) as u32))
        .collect();

    let mut raster = CanonicalRaster::new_argb32(width, height)?;
    for gy in 0..groups_y {
        for gx in 0..groups_x {
            let (x, y) = (gx * 2, gy * 2);
            let offset = compute_source_offset(x, y, width, height, TilingMode::VectorQuantized);
            let Some(&index) = src.get(offset) else {
                return Err(DecodeError::OutOfRangeIndex {
                    index: offset,
                    limit: src.len(),
                });
            };
            let first = index as usize * 4;
            let Some(entry) = colors.get(first..first + 4) else {
                return Err(DecodeError::OutOfRangeIndex {
                    index: first,
                    limit: entries,
                });
            };
            raster.blit_tile(x, y, 2, 2, &[entry[0], entry[2], entry[1], entry[3]]);
        }
    }
    raster.set_sbit(format.sbit());
    Ok(raster)
}
