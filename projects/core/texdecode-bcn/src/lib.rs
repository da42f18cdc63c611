#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod bc7;
pub mod block;
pub mod format;
pub mod s3tc;

pub use bc7::decode_bc7_block;
pub use block::{decode_blocks, required_source_len, BlockCodec, MAX_BLOCK_PIXELS};
pub use format::{decode, BcnCodec, BcnFormat};
pub use s3tc::{
    alpha_palette, color_palette, decode_bc4_block, decode_bc5_block, decode_dxt1_block,
    decode_dxt3_block, decode_dxt5_block, Bc1Alpha, ColorMode,
};

#[cfg(test)]
pub mod test_prelude;
