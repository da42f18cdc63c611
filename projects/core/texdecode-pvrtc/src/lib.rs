#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod decode;
pub mod word;

pub use decode::{decode, PvrtcFormat};
pub use word::twiddle_uv;

#[cfg(test)]
pub mod test_prelude;
