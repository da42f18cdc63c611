//! What kind of data a [`DecodeRequest`](crate::DecodeRequest) carries.

use texdecode_bcn::BcnFormat;
use texdecode_common::pixel_format::PixelFormat;
use texdecode_etc::EtcFormat;
use texdecode_tiling::VqKind;

/// Selects the decoder for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecSelector {
    /// Direct pixels in linear rows.
    Pixel {
        /// Source encoding.
        format: PixelFormat,
        /// Distance between source rows in bytes, or `0` for tightly packed rows.
        stride: usize,
    },
    /// Direct pixels in a console memory layout.
    TiledPixel {
        /// Source encoding.
        format: PixelFormat,
        /// Memory layout of the pixels.
        layout: PixelLayout,
    },
    /// Block-compressed data.
    Block {
        /// The block family.
        codec: BlockCodecTag,
        /// Memory layout of the blocks.
        tiling: BlockTiling,
    },
    /// Indices into a palette or codebook.
    Paletted(PalettedSource),
}

/// Console memory layouts for direct pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Dreamcast square twiddled. ARGB1555, RGB565 and ARGB4444 only.
    /// Honors [`DecodeOptions::mipmaps`](crate::DecodeOptions::mipmaps).
    DreamcastTwiddled,
    /// Xbox swizzled. Any direct format.
    XboxSwizzled,
    /// GameCube 4x4 tiles, big-endian. RGB5A3, RGB565 and IA8 only.
    GameCube,
    /// Nintendo 3DS 8x8 tiles. RGB565 only.
    N3ds,
    /// Nintendo 3DS 8x8 tiles of RGB565 with a separate 4-bit alpha plane, which travels in
    /// [`DecodeRequest::palette`](crate::DecodeRequest::palette). RGB565 only.
    N3dsA4,
}

/// Memory layouts for block-compressed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockTiling {
    /// Blocks in row-major order.
    #[default]
    Linear,
    /// GameCube 2x2 super-tiles of big-endian DXT1 blocks. DXT1 only.
    GameCube,
    /// Xbox XPR0 DXT1: linear blocks, power-of-two dimensions. DXT1 only.
    Xbox,
}

/// PVRTC bit rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PvrtcBpp {
    /// 8x4 pixels per 64-bit word.
    Bpp2,
    /// 4x4 pixels per 64-bit word.
    Bpp4,
}

/// A block-compressed format.
///
/// PVRTC and ASTC are described here rather than by their codec crates' types, so callers can
/// name them even when the `pvrtc` or `astc` feature is disabled. Decoding one then fails with
/// [`DecodeError::UnsupportedFormat`](crate::DecodeError::UnsupportedFormat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockCodecTag {
    /// S3TC, BC4, BC5 and BC7.
    Bcn(BcnFormat),
    /// ETC1, ETC2 and EAC.
    Etc(EtcFormat),
    /// PVRTC1.
    Pvrtc {
        /// Bit rate.
        bpp: PvrtcBpp,
        /// Whether the alpha channel is kept. Opaque variants force alpha to 255.
        alpha: bool,
    },
    /// ASTC LDR with a `block_width` x `block_height` footprint.
    Astc {
        /// Footprint width, in pixels.
        block_width: u8,
        /// Footprint height, in pixels.
        block_height: u8,
    },
}

impl BlockCodecTag {
    /// Short uppercase name.
    pub const fn name(self) -> &'static str {
        match self {
            BlockCodecTag::Bcn(format) => format.name(),
            BlockCodecTag::Etc(format) => format.name(),
            BlockCodecTag::Pvrtc { .. } => "PVRTC",
            BlockCodecTag::Astc { .. } => "ASTC",
        }
    }
}

/// Paletted and vector-quantized sources. The palette travels in
/// [`DecodeRequest::palette`](crate::DecodeRequest::palette).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PalettedSource {
    /// Linear 4-bit indices, 16 palette entries of `palette_format`.
    Ci4 {
        /// Encoding of the palette entries.
        palette_format: PixelFormat,
        /// Whether the most significant nybble is the left pixel.
        msn_left: bool,
    },
    /// Linear 8-bit indices, 256 palette entries of `palette_format`.
    Ci8 {
        /// Encoding of the palette entries.
        palette_format: PixelFormat,
    },
    /// Linear 1-bit pixels, white and black. Needs no palette.
    Mono {
        /// Distance between source rows in bytes, or `0` for tightly packed rows.
        stride: usize,
    },
    /// Linear 2-bit grayscale, white to black. Needs no palette.
    Gray2bpp {
        /// Distance between source rows in bytes, or `0` for tightly packed rows.
        stride: usize,
    },
    /// Monochrome Windows icon: a 1-bit AND mask followed by the 1-bit image. Needs no palette.
    MonoWinIcon {
        /// Distance between source rows in bytes, or `0` for tightly packed rows.
        stride: usize,
    },
    /// Nintendo DS 4-bit indices in 8x8 tiles, 16 BGR555 entries.
    NdsCi4,
    /// GameCube 8-bit indices in 8x4 tiles, 256 big-endian RGB5A3 entries.
    GameCubeCi8,
    /// GameCube 8-bit intensity in 8x4 tiles. Needs no palette.
    GameCubeI8,
    /// Dreamcast vector quantization with a codebook of `format` entries.
    /// Honors [`DecodeOptions::mipmaps`](crate::DecodeOptions::mipmaps).
    DreamcastVq {
        /// Encoding of the codebook entries.
        format: PixelFormat,
        /// Full or small codebook.
        kind: VqKind,
    },
}

impl PalettedSource {
    /// Whether this source reads [`DecodeRequest::palette`](crate::DecodeRequest::palette).
    pub const fn needs_palette(self) -> bool {
        !matches!(
            self,
            PalettedSource::Mono { .. }
                | PalettedSource::Gray2bpp { .. }
                | PalettedSource::MonoWinIcon { .. }
                | PalettedSource::GameCubeI8
        )
    }
}
