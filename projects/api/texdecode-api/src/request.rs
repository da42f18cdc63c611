//! Decode requests and their per-call options.

use texdecode_bcn::Bc1Alpha;
use texdecode_tiling::MipmapLayout;

use crate::selector::CodecSelector;

/// Per-call decode options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecodeOptions {
    /// What index 3 of a three-color [`BcnFormat::Dxt1`](texdecode_bcn::BcnFormat::Dxt1)
    /// block decodes to. Defaults to opaque black.
    pub bc1_alpha: Bc1Alpha,
    /// Layout of the mipmap chain stored in front of a Dreamcast texture's base level.
    /// Defaults to none.
    pub mipmaps: MipmapLayout,
}

impl DecodeOptions {
    /// Options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`DecodeOptions::bc1_alpha`].
    pub fn bc1_alpha(mut self, bc1_alpha: Bc1Alpha) -> Self {
        self.bc1_alpha = bc1_alpha;
        self
    }

    /// Sets [`DecodeOptions::mipmaps`].
    pub fn mipmaps(mut self, mipmaps: MipmapLayout) -> Self {
        self.mipmaps = mipmaps;
        self
    }
}

/// Everything one [`decode`](crate::decode) call needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeRequest<'a> {
    /// The decoder to use.
    pub codec: CodecSelector,
    /// Image width, in pixels.
    pub width: u32,
    /// Image height, in pixels.
    pub height: u32,
    /// Encoded image data.
    pub source: &'a [u8],
    /// Palette or codebook for [`CodecSelector::Paletted`] sources.
    pub palette: Option<&'a [u8]>,
    /// Per-call options.
    pub options: DecodeOptions,
}

impl<'a> DecodeRequest<'a> {
    /// Creates a request without a palette and with default options.
    pub fn new(codec: CodecSelector, width: u32, height: u32, source: &'a [u8]) -> Self {
        Self {
            codec,
            width,
            height,
            source,
            palette: None,
            options: DecodeOptions::default(),
        }
    }

    /// Attaches a palette.
    pub fn with_palette(mut self, palette: &'a [u8]) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }
}
