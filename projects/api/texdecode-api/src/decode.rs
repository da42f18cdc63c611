//! Routes a [`DecodeRequest`] to the decoder that handles it.

use texdecode_bcn::{Bc1Alpha, BcnFormat};
use texdecode_common::error::check_source_len;
use texdecode_common::pixel_format::PixelFormat;
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::DecodeError;
use texdecode_tiling::MipmapLayout;

use crate::request::DecodeRequest;
use crate::selector::{BlockCodecTag, BlockTiling, CodecSelector, PalettedSource, PixelLayout};

/// Bits per pixel of twiddled Dreamcast mipmap levels.
const TWIDDLED_MIPMAP_BPP: usize = 16;
/// VQ mipmap levels store one index byte per 2x2 group: 2 bits per pixel.
const VQ_MIPMAP_BPP: usize = 2;

/// Decodes one image.
///
/// # Errors
///
/// Whatever the selected decoder returns; see [`DecodeError`]. Selecting a format an entry
/// point does not handle, or a codec whose feature is disabled, yields
/// [`DecodeError::UnsupportedFormat`].
pub fn decode(request: &DecodeRequest) -> Result<CanonicalRaster, DecodeError> {
    let DecodeRequest {
        codec,
        width,
        height,
        source,
        palette,
        options,
    } = *request;

    match codec {
        CodecSelector::Pixel { format, stride } => {
            log::trace!("{width}x{height} {format}: linear unpack (stride {stride})");
            texdecode_linear::unpack(format, width, height, source, stride)
        }
        CodecSelector::TiledPixel { format, layout } => {
            log::trace!("{width}x{height} {format}: {layout:?} layout");
            decode_tiled_pixels(format, layout, width, height, source, palette, options.mipmaps)
        }
        CodecSelector::Block { codec, tiling } => {
            log::trace!("{width}x{height} {}: {tiling:?} blocks", codec.name());
            decode_block_codec(codec, tiling, width, height, source, options.bc1_alpha)
        }
        CodecSelector::Paletted(paletted) => {
            log::trace!("{width}x{height} {paletted:?}");
            decode_paletted(paletted, width, height, source, palette.unwrap_or(&[]), options.mipmaps)
        }
    }
}

fn decode_tiled_pixels(
    format: PixelFormat,
    layout: PixelLayout,
    width: u32,
    height: u32,
    source: &[u8],
    alpha_plane: Option<&[u8]>,
    mipmaps: MipmapLayout,
) -> Result<CanonicalRaster, DecodeError> {
    match layout {
        PixelLayout::DreamcastTwiddled => with_mipmaps_skipped(source, width, TWIDDLED_MIPMAP_BPP, mipmaps, |src| {
            texdecode_tiling::from_dreamcast_square_twiddled16(format, width, height, src)
        }),
        PixelLayout::XboxSwizzled => texdecode_tiling::from_xbox_swizzled(format, width, height, source),
        PixelLayout::GameCube => texdecode_tiling::from_gcn16(format, width, height, source),
        PixelLayout::N3ds => match format {
            PixelFormat::Rgb565 => texdecode_tiling::from_n3ds_tiled_rgb565(width, height, source),
            _ => Err(DecodeError::UnsupportedFormat(format.name())),
        },
        PixelLayout::N3dsA4 => match format {
            PixelFormat::Rgb565 => {
                texdecode_tiling::from_n3ds_tiled_rgb565_a4(width, height, source, alpha_plane.unwrap_or(&[]))
            }
            _ => Err(DecodeError::UnsupportedFormat(format.name())),
        },
    }
}

fn decode_block_codec(
    codec: BlockCodecTag,
    tiling: BlockTiling,
    width: u32,
    height: u32,
    source: &[u8],
    bc1_alpha: Bc1Alpha,
) -> Result<CanonicalRaster, DecodeError> {
    match (tiling, codec) {
        (BlockTiling::Linear, BlockCodecTag::Bcn(format)) => {
            texdecode_bcn::decode(format, width, height, source, bc1_alpha)
        }
        (BlockTiling::Linear, BlockCodecTag::Etc(format)) => texdecode_etc::decode(format, width, height, source),
        (BlockTiling::Linear, BlockCodecTag::Pvrtc { bpp, alpha }) => decode_pvrtc(bpp, alpha, width, height, source),
        (
            BlockTiling::Linear,
            BlockCodecTag::Astc {
                block_width,
                block_height,
            },
        ) => decode_astc(block_width, block_height, width, height, source),
        (BlockTiling::GameCube, BlockCodecTag::Bcn(BcnFormat::Dxt1)) => {
            texdecode_tiling::from_dxt1_gcn(width, height, source)
        }
        (BlockTiling::Xbox, BlockCodecTag::Bcn(BcnFormat::Dxt1)) => {
            texdecode_tiling::from_xpr0_dxt1(width, height, source)
        }
        (BlockTiling::GameCube | BlockTiling::Xbox, _) => Err(DecodeError::UnsupportedFormat(codec.name())),
    }
}

#[cfg(feature = "pvrtc")]
fn decode_pvrtc(
    bpp: crate::selector::PvrtcBpp,
    alpha: bool,
    width: u32,
    height: u32,
    source: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    use crate::selector::PvrtcBpp;
    use texdecode_pvrtc::PvrtcFormat;

    let format = match (bpp, alpha) {
        (PvrtcBpp::Bpp2, false) => PvrtcFormat::Rgb2bpp,
        (PvrtcBpp::Bpp2, true) => PvrtcFormat::Rgba2bpp,
        (PvrtcBpp::Bpp4, false) => PvrtcFormat::Rgb4bpp,
        (PvrtcBpp::Bpp4, true) => PvrtcFormat::Rgba4bpp,
    };
    texdecode_pvrtc::decode(format, width, height, source)
}

#[cfg(not(feature = "pvrtc"))]
fn decode_pvrtc(
    _bpp: crate::selector::PvrtcBpp,
    _alpha: bool,
    _width: u32,
    _height: u32,
    _source: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    Err(DecodeError::UnsupportedFormat("PVRTC"))
}

#[cfg(feature = "astc")]
fn decode_astc(
    block_width: u8,
    block_height: u8,
    width: u32,
    height: u32,
    source: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    match texdecode_astc::AstcFootprint::from_dimensions(block_width as usize, block_height as usize) {
        Some(footprint) => texdecode_astc::decode(footprint, width, height, source),
        None => Err(DecodeError::UnsupportedFormat("ASTC")),
    }
}

#[cfg(not(feature = "astc"))]
fn decode_astc(
    _block_width: u8,
    _block_height: u8,
    _width: u32,
    _height: u32,
    _source: &[u8],
) -> Result<CanonicalRaster, DecodeError> {
    Err(DecodeError::UnsupportedFormat("ASTC"))
}

fn decode_paletted(
    paletted: PalettedSource,
    width: u32,
    height: u32,
    source: &[u8],
    palette: &[u8],
    mipmaps: MipmapLayout,
) -> Result<CanonicalRaster, DecodeError> {
    match paletted {
        PalettedSource::Ci4 {
            palette_format,
            msn_left,
        } => texdecode_linear::from_linear_ci4(palette_format, width, height, source, palette, msn_left),
        PalettedSource::Ci8 { palette_format } => {
            texdecode_linear::from_linear_ci8(palette_format, width, height, source, palette)
        }
        PalettedSource::Mono { stride } => texdecode_linear::from_linear_mono(width, height, source, stride),
        PalettedSource::Gray2bpp { stride } => {
            texdecode_linear::from_linear_gray2bpp(width, height, source, stride)
        }
        PalettedSource::MonoWinIcon { stride } => {
            texdecode_linear::from_linear_mono_win_icon(width, height, source, stride)
        }
        PalettedSource::NdsCi4 => texdecode_linear::from_nds_ci4(width, height, source, palette),
        PalettedSource::GameCubeCi8 => texdecode_tiling::from_gcn_ci8(width, height, source, palette),
        PalettedSource::GameCubeI8 => texdecode_tiling::from_gcn_i8(width, height, source),
        PalettedSource::DreamcastVq { format, kind } => {
            with_mipmaps_skipped(source, width, VQ_MIPMAP_BPP, mipmaps, |src| {
                texdecode_tiling::from_dreamcast_vq16(format, kind, width, height, src, palette)
            })
        }
    }
}

/// Runs `decode_level` on `source` past the mipmap chain. Truncation errors are reported against
/// the whole of `source`.
fn with_mipmaps_skipped(
    source: &[u8],
    width: u32,
    bits_per_pixel: usize,
    layout: MipmapLayout,
    decode_level: impl FnOnce(&[u8]) -> Result<CanonicalRaster, DecodeError>,
) -> Result<CanonicalRaster, DecodeError> {
    let skip = texdecode_tiling::mipmap_skip(width, bits_per_pixel, layout)?;
    check_source_len(source, skip)?;
    if skip != 0 {
        log::trace!("Skipping {skip} bytes of {layout:?} mipmaps");
    }
    decode_level(&source[skip..]).map_err(|err| match err {
        DecodeError::TruncatedInput { needed, actual } => DecodeError::TruncatedInput {
            needed: needed + skip,
            actual: actual + skip,
        },
        err => err,
    })
}
