//! Row kernels exposed for the criterion benches.

pub use crate::portable::convert_row;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use crate::sse2::convert_row_bitfield16_sse2;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use crate::ssse3::{byte_shuffle, convert_row_24_ssse3, convert_row_32_ssse3, ByteShuffle};
