//! End-to-end decodes through the public entry point.

use rstest::rstest;
use texdecode_api::{
    decode, Argb32, Bc1Alpha, BcnFormat, BlockCodecTag, BlockTiling, CodecSelector, DecodeError,
    DecodeOptions, DecodeRequest, EtcFormat, PalettedSource, PixelFormat, PixelLayout, RasterFormat,
};

fn bcn(format: BcnFormat) -> CodecSelector {
    CodecSelector::Block {
        codec: BlockCodecTag::Bcn(format),
        tiling: BlockTiling::Linear,
    }
}

/// Indices 0, 1, 2, 3 across every row.
const RAMP_INDICES: [u8; 4] = [0xE4; 4];

#[test]
fn dxt1_four_color_ramp() {
    let mut block = vec![0xFF, 0xFF, 0x00, 0x00];
    block.extend_from_slice(&RAMP_INDICES);
    let raster = decode(&DecodeRequest::new(bcn(BcnFormat::Dxt1), 4, 4, &block)).unwrap();
    for y in 0..4 {
        assert_eq!(
            (0..4).map(|x| raster.pixel(x, y).unwrap()).collect::<Vec<_>>(),
            [0xFFFFFFFF, 0xFF000000, 0xFFAAAAAA, 0xFF555555]
        );
    }
}

#[rstest]
#[case(Bc1Alpha::Opaque, 0xFF000000)]
#[case(Bc1Alpha::Transparent, 0x00000000)]
fn dxt1_three_color_ramp(#[case] bc1_alpha: Bc1Alpha, #[case] index_3: Argb32) {
    let mut block = vec![0x00, 0x00, 0xFF, 0xFF];
    block.extend_from_slice(&RAMP_INDICES);
    let request = DecodeRequest::new(bcn(BcnFormat::Dxt1), 4, 4, &block)
        .with_options(DecodeOptions::new().bc1_alpha(bc1_alpha));
    let raster = decode(&request).unwrap();
    assert_eq!(raster.argb32_row(2), [0xFF000000, 0xFFFFFFFF, 0xFF7F7F7F, index_3]);
}

#[rstest]
#[case(RAMP_INDICES, [0xFF000000, 0xFFFFFFFF, 0xFF7F7F7F, 0xFF000000])]
#[case([0xFF; 4], [0xFF000000; 4])]
#[case([0xAA; 4], [0xFF7F7F7F; 4])]
fn dxt5_color_half_honors_three_color_mode(#[case] indices: [u8; 4], #[case] expected: [Argb32; 4]) {
    // Alpha endpoints 0xFF, every alpha index 0; color endpoints in three-color order.
    let mut block = vec![0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0x00, 0x00, 0xFF, 0xFF];
    block.extend_from_slice(&indices);
    let raster = decode(&DecodeRequest::new(bcn(BcnFormat::Dxt5), 4, 4, &block)).unwrap();
    assert_eq!(raster.argb32_row(0), expected);
}

#[test]
fn etc1_uniform_block() {
    let codec = CodecSelector::Block {
        codec: BlockCodecTag::Etc(EtcFormat::Etc1),
        tiling: BlockTiling::Linear,
    };
    let block = [0x88, 0x88, 0x88, 0x00, 0, 0, 0, 0];
    let raster = decode(&DecodeRequest::new(codec, 4, 4, &block)).unwrap();
    assert!(raster.to_packed_argb32().iter().all(|&px| px == 0xFF8A8A8A));
}

#[cfg(feature = "astc")]
#[test]
fn astc_void_extent_block() {
    let codec = CodecSelector::Block {
        codec: BlockCodecTag::Astc {
            block_width: 6,
            block_height: 6,
        },
        tiling: BlockTiling::Linear,
    };
    // Constant color 0x20, 0x40, 0x60, 0x80 with unbounded coordinates.
    let mut block = [0xFF; 16];
    block[0] = 0xFC;
    block[1] = 0xFD;
    for (i, c) in [0x20, 0x40, 0x60, 0x80].into_iter().enumerate() {
        block[8 + 2 * i] = c;
        block[9 + 2 * i] = c;
    }
    let raster = decode(&DecodeRequest::new(codec, 5, 3, &block)).unwrap();
    assert!(raster.to_packed_argb32().iter().all(|&px| px == 0x80204060));
}

#[test]
fn one_byte_short_is_truncated_for_every_bcn_format() {
    for format in BcnFormat::all_values().iter().copied() {
        let needed = 4 * format.block_bytes();
        let source = vec![0; needed - 1];
        assert_eq!(
            decode(&DecodeRequest::new(bcn(format), 8, 8, &source)).unwrap_err(),
            DecodeError::TruncatedInput {
                needed,
                actual: needed - 1
            },
            "{format}"
        );
    }
}

#[test]
fn gamecube_ci8_keeps_its_palette() {
    let codec = CodecSelector::Paletted(PalettedSource::GameCubeCi8);
    let source = [7u8; 32];
    let mut palette = vec![0xFF; 512];
    palette[14..16].copy_from_slice(&0xFC00u16.to_be_bytes());
    let raster = decode(&DecodeRequest::new(codec, 8, 4, &source).with_palette(&palette)).unwrap();

    assert_eq!(raster.format(), RasterFormat::Ci8);
    assert_eq!(raster.ci8_row(0)[0], 7);
    assert_eq!(raster.pixel(7, 3), Some(0xFFFF0000));
}

#[test]
fn mono_needs_no_palette() {
    let codec = CodecSelector::Paletted(PalettedSource::Mono { stride: 0 });
    let raster = decode(&DecodeRequest::new(codec, 8, 1, &[0b1000_0001])).unwrap();
    assert_eq!(raster.pixel(0, 0), Some(0xFF000000));
    assert_eq!(raster.pixel(1, 0), Some(0xFFFFFFFF));
    assert_eq!(raster.pixel(7, 0), Some(0xFF000000));
}

#[test]
fn gamecube_tiled_pixels() {
    let codec = CodecSelector::TiledPixel {
        format: PixelFormat::Rgb565,
        layout: PixelLayout::GameCube,
    };
    let source: Vec<u8> = (0..16).flat_map(|_| 0x07E0u16.to_be_bytes()).collect();
    let raster = decode(&DecodeRequest::new(codec, 4, 4, &source)).unwrap();
    assert!(raster.to_packed_argb32().iter().all(|&px| px == 0xFF00FF00));
}

#[test]
fn zero_sized_images_are_rejected() {
    let codec = CodecSelector::Pixel {
        format: PixelFormat::Argb8888,
        stride: 0,
    };
    assert!(matches!(
        decode(&DecodeRequest::new(codec, 0, 4, &[])),
        Err(DecodeError::InvalidDimensions { .. })
    ));
}

#[test]
fn short_stride_is_rejected() {
    let codec = CodecSelector::Pixel {
        format: PixelFormat::Rgb565,
        stride: 6,
    };
    assert_eq!(
        decode(&DecodeRequest::new(codec, 4, 2, &[0; 16])).unwrap_err(),
        DecodeError::InvalidStride { stride: 6, min: 8 }
    );
}
