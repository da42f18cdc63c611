#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod block;
pub mod format;

mod block_mode;
mod endpoints;
mod ise;
mod partition;

pub use block::{decode_astc_block, ERROR_COLOR};
pub use format::{decode, AstcCodec, AstcFootprint};

#[cfg(test)]
pub mod test_prelude;
