#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod color;
pub mod eac;
pub mod format;

pub use color::{decode_etc_block, EtcMode};
pub use eac::{decode_eac_block, EacPrecision};
pub use format::{decode, EtcCodec, EtcFormat};

#[cfg(test)]
pub mod test_prelude;
