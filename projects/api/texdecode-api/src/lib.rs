#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod decode;
pub mod request;
pub mod selector;

pub use decode::decode;
pub use request::{DecodeOptions, DecodeRequest};
pub use selector::{BlockCodecTag, BlockTiling, CodecSelector, PalettedSource, PixelLayout, PvrtcBpp};

// Types that appear in requests and results.
pub use texdecode_bcn::{Bc1Alpha, BcnFormat};
pub use texdecode_common::{
    detect, Argb32, CanonicalRaster, Capability, CapabilitySet, DecodeError, PixelFormat,
    RasterFormat, Sbit,
};
pub use texdecode_etc::EtcFormat;
pub use texdecode_linear::strategies;
pub use texdecode_tiling::{MipmapLayout, VqKind};

#[cfg(test)]
pub mod test_prelude;
