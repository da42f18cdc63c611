//! ASTC footprints and the image-level decode entry point.

use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use derive_enum_all_values::AllValues;
use texdecode_bcn::{decode_blocks, BlockCodec};
use texdecode_common::pixel_format::Sbit;
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::{Argb32, DecodeError};

use crate::block::decode_astc_block;

/// A 2D block footprint. Every footprint is stored in 16 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum AstcFootprint {
    /// 4x4 texels (8 bpp).
    Astc4x4,
    /// 5x4 texels.
    Astc5x4,
    /// 5x5 texels.
    Astc5x5,
    /// 6x5 texels.
    Astc6x5,
    /// 6x6 texels.
    Astc6x6,
    /// 8x5 texels.
    Astc8x5,
    /// 8x6 texels.
    Astc8x6,
    /// 8x8 texels (2 bpp).
    Astc8x8,
    /// 10x5 texels.
    Astc10x5,
    /// 10x6 texels.
    Astc10x6,
    /// 10x8 texels.
    Astc10x8,
    /// 10x10 texels.
    Astc10x10,
    /// 12x10 texels.
    Astc12x10,
    /// 12x12 texels (0.89 bpp).
    Astc12x12,
}

impl AstcFootprint {
    /// Width and height of the footprint, in texels.
    pub const fn dimensions(self) -> (usize, usize) {
        match self {
            AstcFootprint::Astc4x4 => (4, 4),
            AstcFootprint::Astc5x4 => (5, 4),
            AstcFootprint::Astc5x5 => (5, 5),
            AstcFootprint::Astc6x5 => (6, 5),
            AstcFootprint::Astc6x6 => (6, 6),
            AstcFootprint::Astc8x5 => (8, 5),
            AstcFootprint::Astc8x6 => (8, 6),
            AstcFootprint::Astc8x8 => (8, 8),
            AstcFootprint::Astc10x5 => (10, 5),
            AstcFootprint::Astc10x6 => (10, 6),
            AstcFootprint::Astc10x8 => (10, 8),
            AstcFootprint::Astc10x10 => (10, 10),
            AstcFootprint::Astc12x10 => (12, 10),
            AstcFootprint::Astc12x12 => (12, 12),
        }
    }

    /// Looks up the footprint with the given dimensions.
    pub fn from_dimensions(width: usize, height: usize) -> Option<Self> {
        Self::all_values()
            .iter()
            .copied()
            .find(|footprint| footprint.dimensions() == (width, height))
    }
}

impl fmt::Display for AstcFootprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "ASTC_{width}x{height}")
    }
}

/// A [`BlockCodec`] for one [`AstcFootprint`].
///
/// Counts the blocks that decoded to the error color.
#[derive(Debug)]
pub struct AstcCodec {
    footprint: AstcFootprint,
    invalid_blocks: AtomicUsize,
}

impl AstcCodec {
    pub fn new(footprint: AstcFootprint) -> Self {
        Self {
            footprint,
            invalid_blocks: AtomicUsize::new(0),
        }
    }

    pub fn footprint(&self) -> AstcFootprint {
        self.footprint
    }

    /// Number of blocks decoded so far that were filled with the error color.
    pub fn invalid_blocks(&self) -> usize {
        self.invalid_blocks.load(Ordering::Relaxed)
    }
}

impl BlockCodec for AstcCodec {
    fn block_bytes(&self) -> usize {
        16
    }

    fn block_dimensions(&self) -> (usize, usize) {
        self.footprint.dimensions()
    }

    fn decode_into(&self, block: &[u8], out: &mut [Argb32]) {
        let (width, height) = self.footprint.dimensions();
        let valid = match <&[u8; 16]>::try_from(block) {
            Ok(block) => decode_astc_block(block, width, height, out),
            Err(_) => {
                out.fill(crate::block::ERROR_COLOR);
                false
            }
        };
        if !valid {
            self.invalid_blocks.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Decodes a `width` x `height` LDR image stored as a linear array of `footprint` blocks.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` or `height` is zero or too large.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than the blocks the image needs.
pub fn decode(
    footprint: AstcFootprint,
    width: u32,
    height: u32,
    src: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    log::trace!("Decoding {width}x{height} {footprint} image");
    let codec = AstcCodec::new(footprint);
    let mut raster = decode_blocks(&codec, width, height, src)?;
    let invalid = codec.invalid_blocks();
    if invalid > 0 {
        log::warn!(
            "{invalid} undecodable blocks in {width}x{height} {footprint} image, using the error color"
        );
    }
    raster.set_sbit(Sbit::new(8, 8, 8, 0, 8));
    Ok(raster)
}
