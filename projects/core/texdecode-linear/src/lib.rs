#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod dispatch;
pub mod palette;
mod portable;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod sse2;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod ssse3;
mod unpack;

pub use dispatch::{strategies, Strategy, StrategyTable};
pub use palette::{
    from_linear_ci4, from_linear_ci8, from_linear_gray2bpp, from_linear_mono, from_linear_mono_win_icon,
    from_nds_ci4,
};
pub use portable::convert_row;
pub use unpack::{unpack, unpack_with};

// Re-export functions for benchmarking when the 'bench' feature is enabled
#[cfg(feature = "bench")]
pub mod bench;

#[cfg(test)]
pub mod test_prelude;
