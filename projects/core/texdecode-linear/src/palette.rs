//! Palette resolver: expands 1, 2, 4 and 8-bit index streams into CI8 rasters.
//!
//! Palette entries are decoded with the [`PixelFormat`] registry, so any direct format can
//! describe a color table. Entries are little-endian, except where a tiled decoder in another
//! crate converts them first.

use likely_stable::unlikely;
use texdecode_common::argb32::alpha;
use texdecode_common::error::{check_dimensions, check_multiple_of, check_palette_len, check_source_len};
use texdecode_common::pixel_format::{PixelFormat, Sbit};
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::{Argb32, DecodeError};

/// Entries in a 4-bit palette.
pub const CI4_PALETTE_LEN: usize = 16;
/// Entries in an 8-bit palette.
pub const CI8_PALETTE_LEN: usize = 256;

const MONO_PALETTE: [Argb32; 2] = [0xFFFF_FFFF, 0xFF00_0000];
/// White to black. Lighter than an even ramp, which reads too dark.
const GRAY2_PALETTE: [Argb32; 4] = [0xFFFF_FFFF, 0xFFC0_C0C0, 0xFF80_8080, 0xFF00_0000];
const WIN_ICON_PALETTE: [Argb32; 3] = [0x0000_0000, 0xFF00_0000, 0xFFFF_FFFF];

/// Decodes `entries` palette entries of `format` from `palette` into `raster`, setting the
/// transparent index and sBIT.
///
/// The transparent index is the first entry whose alpha is zero.
pub fn load_palette(
    raster: &mut CanonicalRaster,
    format: PixelFormat,
    palette: &[u8],
    entries: usize,
) -> Result<(), DecodeError> {
    let bpp = format.bytes_per_pixel();
    check_palette_len(palette, entries * bpp)?;

    let mut tr_idx = None;
    for (i, (dst, src)) in raster
        .palette_mut()
        .iter_mut()
        .zip(palette.chunks_exact(bpp))
        .take(entries)
        .enumerate()
    {
        let Some(word) = format.read_word(src) else {
            break;
        };
        *dst = format.to_argb32(word);
        if tr_idx.is_none() && alpha(*dst) == 0 {
            tr_idx = Some(i as u8);
        }
    }

    raster.set_tr_idx(tr_idx);
    raster.set_sbit(format.sbit());
    Ok(())
}

/// Converts a linear 4-bit paletted image.
///
/// `msn_left` selects which nybble holds the left pixel of each pair: the most significant
/// one when `true`.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` is odd.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height / 2`.
/// - [`DecodeError::MalformedPalette`] if `palette` holds fewer than 16 entries.
pub fn from_linear_ci4(
    format: PixelFormat,
    width: u32,
    height: u32,
    src: &[u8],
    palette: &[u8],
    msn_left: bool,
) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;
    check_multiple_of(width, height, 2, 1, "CI4 width must be even")?;
    let row_bytes = width as usize / 2;
    check_source_len(src, row_bytes * height as usize)?;

    let mut raster = CanonicalRaster::new_ci8(width, height)?;
    load_palette(&mut raster, format, palette, CI4_PALETTE_LEN)?;

    for (dst, src) in raster.ci8_rows_mut().zip(src.chunks_exact(row_bytes)) {
        for (pair, &byte) in dst.chunks_exact_mut(2).zip(src) {
            let (left, right) = if msn_left {
                (byte >> 4, byte & 0x0F)
            } else {
                (byte & 0x0F, byte >> 4)
            };
            pair[0] = left;
            pair[1] = right;
        }
    }
    Ok(raster)
}

/// Converts a linear 8-bit paletted image.
///
/// # Errors
///
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height`.
/// - [`DecodeError::MalformedPalette`] if `palette` holds fewer than 256 entries.
pub fn from_linear_ci8(
    format: PixelFormat,
    width: u32,
    height: u32,
    src: &[u8],
    palette: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;
    let row_bytes = width as usize;
    check_source_len(src, row_bytes * height as usize)?;

    let mut raster = CanonicalRaster::new_ci8(width, height)?;
    load_palette(&mut raster, format, palette, CI8_PALETTE_LEN)?;

    for (dst, src) in raster.ci8_rows_mut().zip(src.chunks_exact(row_bytes)) {
        dst.copy_from_slice(src);
    }
    Ok(raster)
}

/// Computes the packed bytes of one source row and the distance between rows for an image
/// with `pixels_per_byte` pixels in each byte, the leftmost in the most significant bits.
///
/// Rows always start on a byte boundary. A `stride` of `0` means tightly packed rows.
fn packed_row_layout(
    width: u32,
    pixels_per_byte: u32,
    stride: usize,
) -> Result<(usize, usize), DecodeError> {
    let row_bytes = width.div_ceil(pixels_per_byte) as usize;
    if stride == 0 {
        return Ok((row_bytes, row_bytes));
    }
    if unlikely(stride < row_bytes) {
        return Err(DecodeError::InvalidStride {
            stride,
            min: row_bytes,
        });
    }
    Ok((row_bytes, stride))
}

/// `rows` source rows of `src_stride` bytes each.
#[inline]
fn plane_size(width: u32, height: u32, src_stride: usize, rows: usize) -> Result<usize, DecodeError> {
    src_stride
        .checked_mul(rows)
        .ok_or_else(|| DecodeError::dimensions(width, height, "image size overflows"))
}

/// Converts a 1-bit monochrome image. The most significant bit is the leftmost pixel; set
/// bits are black and clear bits are white.
///
/// Each row starts on a byte boundary. When `width` is not a multiple of 8, the unused low
/// bits of the last byte of a row are ignored. `stride` is the distance between rows in
/// bytes, or `0` for tightly packed rows.
///
/// # Errors
///
/// - [`DecodeError::InvalidStride`] if a non-zero `stride` is shorter than a row.
/// - [`DecodeError::TruncatedInput`] if `src` holds fewer than `height` rows.
pub fn from_linear_mono(
    width: u32,
    height: u32,
    src: &[u8],
    stride: usize,
) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;
    let (row_bytes, src_stride) = packed_row_layout(width, 8, stride)?;
    check_source_len(src, plane_size(width, height, src_stride, height as usize)?)?;

    let mut raster = CanonicalRaster::new_ci8(width, height)?;
    raster.palette_mut()[..2].copy_from_slice(&MONO_PALETTE);
    raster.set_tr_idx(None);
    raster.set_sbit(Sbit::new(1, 1, 1, 1, 0));

    for (dst, src) in raster.ci8_rows_mut().zip(src.chunks(src_stride)) {
        let src = &src[..row_bytes];
        for (x, px) in dst.iter_mut().enumerate() {
            *px = (src[x / 8] >> (7 - x % 8)) & 1;
        }
    }
    Ok(raster)
}

/// Converts a 2-bit grayscale image. Four pixels per byte, the leftmost in the two most
/// significant bits; 0 is white and 3 is black.
///
/// Row layout and `stride` work as in [`from_linear_mono`].
///
/// # Errors
///
/// - [`DecodeError::InvalidStride`] if a non-zero `stride` is shorter than a row.
/// - [`DecodeError::TruncatedInput`] if `src` holds fewer than `height` rows.
pub fn from_linear_gray2bpp(
    width: u32,
    height: u32,
    src: &[u8],
    stride: usize,
) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;
    let (row_bytes, src_stride) = packed_row_layout(width, 4, stride)?;
    check_source_len(src, plane_size(width, height, src_stride, height as usize)?)?;

    let mut raster = CanonicalRaster::new_ci8(width, height)?;
    raster.palette_mut()[..4].copy_from_slice(&GRAY2_PALETTE);
    raster.set_tr_idx(None);
    raster.set_sbit(Sbit::new(2, 2, 2, 2, 0));

    for (dst, src) in raster.ci8_rows_mut().zip(src.chunks(src_stride)) {
        let src = &src[..row_bytes];
        for (x, px) in dst.iter_mut().enumerate() {
            *px = (src[x / 4] >> (6 - 2 * (x % 4))) & 0b11;
        }
    }
    Ok(raster)
}

/// Converts a monochrome Windows icon: an AND mask of `height` rows followed by the image of
/// `height` rows, both 1 bit per pixel with the leftmost pixel in the most significant bit.
///
/// The result uses index 0 for transparent, 1 for black and 2 for white. A clear mask bit
/// shows the image bit (set is white). A set mask bit is transparent where the image bit is
/// clear; where it is set the screen would be inverted, which decodes as white.
///
/// Row layout and `stride` work as in [`from_linear_mono`], for both planes.
///
/// # Errors
///
/// - [`DecodeError::InvalidStride`] if a non-zero `stride` is shorter than a row.
/// - [`DecodeError::TruncatedInput`] if `src` holds fewer than `2 * height` rows.
pub fn from_linear_mono_win_icon(
    width: u32,
    height: u32,
    src: &[u8],
    stride: usize,
) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;
    let (row_bytes, src_stride) = packed_row_layout(width, 8, stride)?;
    let plane = plane_size(width, height, src_stride, height as usize)?;
    check_source_len(src, plane_size(width, height, src_stride, 2 * height as usize)?)?;

    let mut raster = CanonicalRaster::new_ci8(width, height)?;
    raster.palette_mut()[..3].copy_from_slice(&WIN_ICON_PALETTE);
    raster.set_tr_idx(Some(0));
    raster.set_sbit(Sbit::new(1, 1, 1, 1, 1));

    let (mask, image) = src.split_at(plane);
    for ((dst, mask), image) in raster
        .ci8_rows_mut()
        .zip(mask.chunks(src_stride))
        .zip(image.chunks(src_stride))
    {
        let (mask, image) = (&mask[..row_bytes], &image[..row_bytes]);
        for (x, px) in dst.iter_mut().enumerate() {
            let shift = 7 - x % 8;
            let masked = (mask[x / 8] >> shift) & 1 != 0;
            let white = (image[x / 8] >> shift) & 1 != 0;
            *px = match (masked, white) {
                (_, true) => 2,
                (true, false) => 0,
                (false, false) => 1,
            };
        }
    }
    Ok(raster)
}

/// Converts a Nintendo DS 4-bit image: 8x8 tiles in row-major order, the low nybble of each
/// byte is the left pixel, and the palette is 16 BGR555 entries whose first entry is always
/// transparent.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if either dimension is not a multiple of 8.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than `width * height / 2`.
/// - [`DecodeError::MalformedPalette`] if `palette` is shorter than 32 bytes.
pub fn from_nds_ci4(
    width: u32,
    height: u32,
    src: &[u8],
    palette: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    const TILE: usize = 8;
    const TILE_BYTES: usize = TILE * TILE / 2;

    check_dimensions(width, height)?;
    check_multiple_of(width, height, 8, 8, "NDS CI4 dimensions must be multiples of 8")?;
    check_source_len(src, width as usize * height as usize / 2)?;

    let mut raster = CanonicalRaster::new_ci8(width, height)?;
    load_palette(&mut raster, PixelFormat::Bgr555, palette, CI4_PALETTE_LEN)?;
    raster.palette_mut()[0] = 0;
    raster.set_tr_idx(Some(0));

    let tiles_x = width as usize / TILE;
    let mut tile = [0u8; TILE * TILE];
    for (i, block) in src
        .chunks_exact(TILE_BYTES)
        .take(tiles_x * (height as usize / TILE))
        .enumerate()
    {
        for (pair, &byte) in tile.chunks_exact_mut(2).zip(block) {
            pair[0] = byte & 0x0F;
            pair[1] = byte >> 4;
        }
        let x = (i % tiles_x * TILE) as u32;
        let y = (i / tiles_x * TILE) as u32;
        raster.blit_ci8_tile(x, y, TILE, TILE, &tile);
    }
    Ok(raster)
}
