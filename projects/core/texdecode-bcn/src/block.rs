//! The block walker shared by every block codec.
//!
//! A block codec turns a fixed number of source bytes into a fixed-size tile of pixels. The
//! walker validates the source length once, then decodes the image one row of blocks (a
//! "band") at a time, clipping tiles that extend past the right or bottom edge.
//!
//! With the `rayon` feature, bands are decoded in parallel. Every band writes a disjoint
//! slice of the raster, so the output is identical to the serial path.

use likely_stable::unlikely;
use texdecode_common::error::{check_dimensions, check_source_len};
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::{Argb32, DecodeError};

/// Largest tile any block codec produces (a 12x12 ASTC footprint).
pub const MAX_BLOCK_PIXELS: usize = 144;

/// A stateless decoder for one block family.
pub trait BlockCodec: Sync {
    /// Size of one encoded block, in bytes.
    fn block_bytes(&self) -> usize;

    /// Width and height of the tile decoded from one block.
    fn block_dimensions(&self) -> (usize, usize) {
        (4, 4)
    }

    /// Decodes `block` (exactly [`Self::block_bytes`] long) into `out`, a row-major tile of
    /// `width * height` pixels as given by [`Self::block_dimensions`].
    fn decode_into(&self, block: &[u8], out: &mut [Argb32]);
}

/// Number of blocks needed to cover `width` x `height` pixels, as `(columns, rows)`.
#[inline]
pub fn block_grid(codec: &(impl BlockCodec + ?Sized), width: u32, height: u32) -> (usize, usize) {
    let (bw, bh) = codec.block_dimensions();
    ((width as usize).div_ceil(bw), (height as usize).div_ceil(bh))
}

/// Number of source bytes needed to decode a `width` x `height` image.
///
/// # Errors
///
/// [`DecodeError::InvalidDimensions`] if the size does not fit in a `usize`.
pub fn required_source_len(
    codec: &(impl BlockCodec + ?Sized),
    width: u32,
    height: u32,
) -> Result<usize, DecodeError> {
    let (columns, rows) = block_grid(codec, width, height);
    columns
        .checked_mul(rows)
        .and_then(|blocks| blocks.checked_mul(codec.block_bytes()))
        .ok_or_else(|| DecodeError::dimensions(width, height, "image size overflows"))
}

/// Decodes a linear stream of blocks, left to right and top to bottom, into a new raster.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` or `height` is zero or too large.
/// - [`DecodeError::TruncatedInput`] if `src` holds fewer blocks than the image needs. Nothing
///   is decoded in that case.
pub fn decode_blocks(
    codec: &(impl BlockCodec + ?Sized),
    width: u32,
    height: u32,
    src: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    decode_blocks_with(codec, width, height, src, cfg!(feature = "rayon"))
}

pub(crate) fn decode_blocks_with(
    codec: &(impl BlockCodec + ?Sized),
    width: u32,
    height: u32,
    src: &[u8],
    #[cfg_attr(not(feature = "rayon"), allow(unused_variables))] parallel: bool,
) -> Result<CanonicalRaster, DecodeError> {
    check_dimensions(width, height)?;
    let (bw, bh) = codec.block_dimensions();
    if unlikely(bw * bh > MAX_BLOCK_PIXELS || bw == 0 || bh == 0) {
        return Err(DecodeError::UnsupportedFormat("block footprint"));
    }
    check_source_len(src, required_source_len(codec, width, height)?)?;

    let mut raster = CanonicalRaster::new_argb32(width, height)?;
    let (columns, _) = block_grid(codec, width, height);
    let band = Band {
        block_width: bw,
        block_height: bh,
        block_bytes: codec.block_bytes(),
        columns,
        width: width as usize,
        height: height as usize,
        stride: raster.stride_pixels(),
    };
    let band_pixels = band.stride * bh;
    let pixels = raster.argb32_data_mut();

    #[cfg(feature = "rayon")]
    if parallel {
        use rayon::prelude::*;
        pixels
            .par_chunks_mut(band_pixels)
            .enumerate()
            .for_each(|(row, dst)| band.decode(codec, src, row, dst));
        return Ok(raster);
    }

    for (row, dst) in pixels.chunks_mut(band_pixels).enumerate() {
        band.decode(codec, src, row, dst);
    }
    Ok(raster)
}

/// Geometry of one row of blocks.
struct Band {
    block_width: usize,
    block_height: usize,
    block_bytes: usize,
    columns: usize,
    width: usize,
    height: usize,
    stride: usize,
}

impl Band {
    fn decode(&self, codec: &(impl BlockCodec + ?Sized), src: &[u8], row: usize, dst: &mut [Argb32]) {
        let row_bytes = self.columns * self.block_bytes;
        let Some(blocks) = src.get(row * row_bytes..(row + 1) * row_bytes) else {
            return;
        };
        let rows = (self.height - row * self.block_height).min(self.block_height);
        let mut tile = [0u32; MAX_BLOCK_PIXELS];
        let tile = &mut tile[..self.block_width * self.block_height];

        for (column, block) in blocks.chunks_exact(self.block_bytes).enumerate() {
            codec.decode_into(block, tile);
            let x = column * self.block_width;
            let copy = (self.width - x).min(self.block_width);
            for (y, src_row) in tile.chunks_exact(self.block_width).take(rows).enumerate() {
                let start = y * self.stride + x;
                dst[start..start + copy].copy_from_slice(&src_row[..copy]);
            }
        }
    }
}
