//! ETC/EAC format tags and the image-level decode entry point.

use core::fmt;
use derive_enum_all_values::AllValues;
use texdecode_bcn::{decode_blocks, BlockCodec};
use texdecode_common::argb32::{argb, blue, green, red};
use texdecode_common::pixel_format::Sbit;
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::{Argb32, DecodeError};

use crate::color::{decode_etc_block, EtcMode};
use crate::eac::{decode_eac_block, EacPrecision};

/// A block format decoded by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum EtcFormat {
    /// ETC1 RGB.
    Etc1,
    /// ETC2 RGB.
    Etc2Rgb,
    /// ETC2 RGB with 1-bit punch-through alpha.
    Etc2RgbA1,
    /// ETC2 RGB with an EAC alpha block.
    Etc2Rgba,
    /// One EAC channel, decoded as red.
    EacR11,
    /// Two EAC channels, decoded as red and green.
    EacRg11,
}

impl EtcFormat {
    /// Short uppercase name.
    pub const fn name(self) -> &'static str {
        match self {
            EtcFormat::Etc1 => "ETC1",
            EtcFormat::Etc2Rgb => "ETC2_RGB",
            EtcFormat::Etc2RgbA1 => "ETC2_RGB_A1",
            EtcFormat::Etc2Rgba => "ETC2_RGBA",
            EtcFormat::EacR11 => "EAC_R11",
            EtcFormat::EacRg11 => "EAC_RG11",
        }
    }

    /// Size of one 4x4 block, in bytes.
    pub const fn block_bytes(self) -> usize {
        match self {
            EtcFormat::Etc2Rgba | EtcFormat::EacRg11 => 16,
            _ => 8,
        }
    }

    /// Significant bits of the decoded channels.
    pub const fn sbit(self) -> Sbit {
        match self {
            EtcFormat::Etc1 | EtcFormat::Etc2Rgb => Sbit::new(8, 8, 8, 0, 0),
            EtcFormat::Etc2RgbA1 => Sbit::new(8, 8, 8, 0, 1),
            EtcFormat::Etc2Rgba => Sbit::new(8, 8, 8, 0, 8),
            EtcFormat::EacR11 => Sbit::new(8, 1, 1, 0, 0),
            EtcFormat::EacRg11 => Sbit::new(8, 8, 1, 0, 0),
        }
    }
}

impl fmt::Display for EtcFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits a block into its 8-byte halves. The walker always passes whole blocks.
#[inline(always)]
fn halves(block: &[u8]) -> ([u8; 8], [u8; 8]) {
    let mut first = [0; 8];
    let mut second = [0; 8];
    for (i, &byte) in block.iter().take(16).enumerate() {
        if i < 8 {
            first[i] = byte;
        } else {
            second[i - 8] = byte;
        }
    }
    (first, second)
}

/// A [`BlockCodec`] for one [`EtcFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtcCodec(pub EtcFormat);

impl BlockCodec for EtcCodec {
    fn block_bytes(&self) -> usize {
        self.0.block_bytes()
    }

    fn decode_into(&self, block: &[u8], out: &mut [Argb32]) {
        debug_assert_eq!(block.len(), self.block_bytes());
        let (first, second) = halves(block);
        let pixels = match self.0 {
            EtcFormat::Etc1 => decode_etc_block(&first, EtcMode::Etc1),
            EtcFormat::Etc2Rgb => decode_etc_block(&first, EtcMode::Etc2),
            EtcFormat::Etc2RgbA1 => decode_etc_block(&first, EtcMode::Etc2PunchThrough),
            EtcFormat::Etc2Rgba => {
                let alpha = decode_eac_block(&first, EacPrecision::Alpha8);
                let mut color = decode_etc_block(&second, EtcMode::Etc2);
                for (px, a) in color.iter_mut().zip(alpha) {
                    *px = argb(a, red(*px), green(*px), blue(*px));
                }
                color
            }
            EtcFormat::EacR11 => {
                decode_eac_block(&first, EacPrecision::Unsigned11).map(|r| argb(0xFF, r, 0, 0))
            }
            EtcFormat::EacRg11 => {
                let r = decode_eac_block(&first, EacPrecision::Unsigned11);
                let g = decode_eac_block(&second, EacPrecision::Unsigned11);
                core::array::from_fn(|i| argb(0xFF, r[i], g[i], 0))
            }
        };
        out.copy_from_slice(&pixels);
    }
}

/// Decodes a `width` x `height` image stored as a linear array of `format` blocks.
///
/// # Errors
///
/// - [`DecodeError::InvalidDimensions`] if `width` or `height` is zero or too large.
/// - [`DecodeError::TruncatedInput`] if `src` is shorter than the blocks the image needs.
pub fn decode(
    format: EtcFormat,
    width: u32,
    height: u32,
    src: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    log::trace!("Decoding {width}x{height} {format} image");
    let mut raster = decode_blocks(&EtcCodec(format), width, height, src)?;
    raster.set_sbit(format.sbit());
    Ok(raster)
}
