//! The BCn block codec tags and the image-level decode entry point.

use core::fmt;
use derive_enum_all_values::AllValues;
use texdecode_common::pixel_format::Sbit;
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::{Argb32, DecodeError};

use crate::bc7::decode_bc7_block;
use crate::block::{decode_blocks, BlockCodec};
use crate::s3tc::*;

/// A block-compressed format decoded by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum BcnFormat {
    /// BC1. Index 3 of three-color blocks follows [`Bc1Alpha`].
    Dxt1,
    /// BC1 with index 3 of three-color blocks always transparent.
    Dxt1A1,
    /// BC2 with premultiplied color.
    Dxt2,
    /// BC2.
    Dxt3,
    /// BC3 with premultiplied color.
    Dxt4,
    /// BC3.
    Dxt5,
    /// One interpolated channel, decoded as red.
    Bc4,
    /// Two interpolated channels, decoded as red and green.
    Bc5,
    /// BC7.
    Bc7,
}

impl BcnFormat {
    /// Short uppercase name.
    pub const fn name(self) -> &'static str {
        match self {
            BcnFormat::Dxt1 => "DXT1",
            BcnFormat::Dxt1A1 => "DXT1_A1",
            BcnFormat::Dxt2 => "DXT2",
            BcnFormat::Dxt3 => "DXT3",
            BcnFormat::Dxt4 => "DXT4",
            BcnFormat::Dxt5 => "DXT5",
            BcnFormat::Bc4 => "BC4",
            BcnFormat::Bc5 => "BC5",
            BcnFormat::Bc7 => "BC7",
        }
    }

    /// Size of one 4x4 block, in bytes.
    pub const fn block_bytes(self) -> usize {
        match self {
            BcnFormat::Dxt1 | BcnFormat::Dxt1A1 | BcnFormat::Bc4 => 8,
            _ => 16,
        }
    }

    /// Whether color is stored premultiplied by alpha.
    pub const fn is_premultiplied(self) -> bool {
        matches!(self, BcnFormat::Dxt2 | BcnFormat::Dxt4)
    }

    /// Significant bits of the decoded channels.
    pub const fn sbit(self) -> Sbit {
        match self {
            BcnFormat::Dxt1 | BcnFormat::Dxt1A1 => Sbit::new(8, 8, 8, 0, 1),
            BcnFormat::Dxt2 | BcnFormat::Dxt3 => Sbit::new(8, 8, 8, 0, 4),
            BcnFormat::Dxt4 | BcnFormat::Dxt5 | BcnFormat::Bc7 => Sbit::new(8, 8, 8, 0, 8),
            BcnFormat::Bc4 => Sbit::new(8, 1, 1, 0, 0),
            BcnFormat::Bc5 => Sbit::new(8, 8, 1, 0, 0),
        }
    }
}

impl fmt::Display for BcnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A [`BlockCodec`] for one [`BcnFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcnCodec {
    format: BcnFormat,
    bc1_alpha: Bc1Alpha,
}

impl BcnCodec {
    /// Creates a codec. `bc1_alpha` only affects [`BcnFormat::Dxt1`].
    pub const fn new(format: BcnFormat, bc1_alpha: Bc1Alpha) -> Self {
        Self { format, bc1_alpha }
    }
}

/// Copies a block into a fixed-size array. The walker always passes whole blocks.
#[inline(always)]
fn array<const N: usize>(block: &[u8]) -> [u8; N] {
    debug_assert_eq!(block.len(), N);
    let mut out = [0; N];
    let len = block.len().min(N);
    out[..len].copy_from_slice(&block[..len]);
    out
}

impl BlockCodec for BcnCodec {
    fn block_bytes(&self) -> usize {
        self.format.block_bytes()
    }

    fn decode_into(&self, block: &[u8], out: &mut [Argb32]) {
        let pixels = match self.format {
            BcnFormat::Dxt1 => decode_dxt1_block(&array(block), self.bc1_alpha),
            BcnFormat::Dxt1A1 => decode_dxt1_block(&array(block), Bc1Alpha::Transparent),
            BcnFormat::Dxt2 | BcnFormat::Dxt3 => decode_dxt3_block(&array(block)),
            BcnFormat::Dxt4 | BcnFormat::Dxt5 => decode_dxt5_block(&array(block)),
            BcnFormat::Bc4 => decode_bc4_block(&array(block)),
            BcnFormat::Bc5 => decode_bc5_block(&array(block)),
            BcnFormat::Bc7 => decode_bc7_block(&array(block)),
        };
        out.copy_from_slice(&pixels);
    }
}

/// Decodes a `width` x `height` image stored as a linear array of `format` blocks.
///
/// Dimensions that are not a multiple of 4 are rounded up for the source size and the decoded
/// image is clipped. DXT2 and DXT4 are converted to straight alpha.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` or `height` is zero or too large.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than the blocks the image needs.
pub fn decode(
    format: BcnFormat,
    width: u32,
    height: u32,
    src: &[u8],
    bc1_alpha: Bc1Alpha,
) -> Result<CanonicalRaster, DecodeError> {
    log::trace!("Decoding {width}x{height} {format} image");
    let mut raster = decode_blocks(&BcnCodec::new(format, bc1_alpha), width, height, src)?;
    if format.is_premultiplied() {
        raster.un_premultiply();
    }
    raster.set_sbit(format.sbit());
    Ok(raster)
}
