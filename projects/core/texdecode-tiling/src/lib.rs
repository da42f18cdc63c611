#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod address;
pub mod dreamcast;
pub mod gamecube;
pub mod n3ds;
pub mod swizzle;
pub mod twiddle;
pub mod xbox;

pub use address::{compute_source_offset, TilingMode};
pub use dreamcast::{
    from_dreamcast_square_twiddled16, from_dreamcast_vq16, mipmap_skip, vq_palette_entries,
    MipmapLayout, VqKind,
};
pub use gamecube::{from_dxt1_gcn, from_gcn16, from_gcn_ci8, from_gcn_i8};
pub use n3ds::{from_n3ds_tiled_rgb565, from_n3ds_tiled_rgb565_a4};
pub use swizzle::{swizzle, unswizzle, SwizzleMasks};
pub use twiddle::{twiddled_index, z_order_index};
pub use xbox::{from_xbox_swizzled, from_xpr0_dxt1};

#[cfg(test)]
pub mod test_prelude;
