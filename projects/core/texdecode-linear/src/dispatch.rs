//! Strategy table that picks a linear unpacker per source bit depth.
//!
//! The table is built once from [`texdecode_common::detect`] and reused by every call. Each
//! entry names its implementation so the choice can be logged and asserted in tests.

use std::sync::OnceLock;
use texdecode_common::pixel_format::{BitDepth, PixelFormat};
use texdecode_common::raster::CanonicalRaster;
use texdecode_common::CapabilitySet;

use crate::portable::unpack_portable;

/// Signature shared by every unpacker strategy.
///
/// `src` must already be validated to hold `raster.height()` rows of `src_stride` bytes.
pub type UnpackFn = fn(PixelFormat, &[u8], usize, &mut CanonicalRaster);

/// One implementation of the linear unpacker.
#[derive(Clone, Copy)]
pub struct Strategy {
    /// Human readable name, e.g. `"portable"` or `"ssse3"`.
    pub name: &'static str,
    /// Capabilities the implementation requires.
    pub requires: CapabilitySet,
    func: UnpackFn,
    accelerates: fn(PixelFormat) -> bool,
}

impl Strategy {
    const fn new(
        name: &'static str,
        requires: CapabilitySet,
        func: UnpackFn,
        accelerates: fn(PixelFormat) -> bool,
    ) -> Self {
        Self {
            name,
            requires,
            func,
            accelerates,
        }
    }

    /// Whether this strategy converts `format` with vector code instead of delegating to the
    /// portable path.
    #[inline]
    pub fn accelerates(&self, format: PixelFormat) -> bool {
        (self.accelerates)(format)
    }

    /// Runs this strategy.
    #[inline]
    pub fn run(&self, format: PixelFormat, src: &[u8], src_stride: usize, raster: &mut CanonicalRaster) {
        (self.func)(format, src, src_stride, raster)
    }
}

impl core::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Strategy")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish()
    }
}

const PORTABLE: Strategy = Strategy::new(
    "portable",
    CapabilitySet::empty(),
    unpack_portable,
    never_accelerated,
);

fn never_accelerated(_: PixelFormat) -> bool {
    false
}

/// The selected strategy for each source bit depth.
#[derive(Debug, Clone, Copy)]
pub struct StrategyTable {
    bits8: Strategy,
    bits16: Strategy,
    bits24: Strategy,
    bits32: Strategy,
}

impl StrategyTable {
    /// A table that only uses the portable implementation.
    pub const fn portable() -> Self {
        Self {
            bits8: PORTABLE,
            bits16: PORTABLE,
            bits24: PORTABLE,
            bits32: PORTABLE,
        }
    }

    /// Builds the fastest table whose requirements are met by `capabilities`.
    ///
    /// `capabilities` is intersected with the running CPU's, so a caller can only ever narrow
    /// the selection; passing [`CapabilitySet::empty`] yields the portable table.
    pub fn for_capabilities(capabilities: CapabilitySet) -> Self {
        #[allow(unused_variables)]
        let available = capabilities.intersection(texdecode_common::detect());
        #[allow(unused_mut)]
        let mut table = Self::portable();

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            use texdecode_common::Capability;
            if available.contains(Capability::Sse2) {
                table.bits16 = x86::SSE2_16;
            }
            if available.contains(Capability::Ssse3) {
                table.bits24 = x86::SSSE3_24;
                table.bits32 = x86::SSSE3_32;
            }
        }

        table
    }

    /// The strategy used for sources of the given depth.
    #[inline]
    pub fn get(&self, depth: BitDepth) -> &Strategy {
        match depth {
            BitDepth::Bits8 => &self.bits8,
            BitDepth::Bits16 => &self.bits16,
            BitDepth::Bits24 => &self.bits24,
            BitDepth::Bits32 => &self.bits32,
        }
    }

    /// The strategy used for `format`.
    #[inline]
    pub fn select(&self, format: PixelFormat) -> &Strategy {
        let strategy = self.get(format.depth());
        log::trace!(
            "Unpacking {format} with the {} strategy (accelerated: {})",
            strategy.name,
            strategy.accelerates(format)
        );
        strategy
    }
}

static STRATEGIES: OnceLock<StrategyTable> = OnceLock::new();

/// The process-wide strategy table, built on first use from the detected CPU capabilities.
pub fn strategies() -> &'static StrategyTable {
    STRATEGIES.get_or_init(|| {
        let table = StrategyTable::for_capabilities(texdecode_common::detect());
        for depth in BitDepth::all_values().iter().copied() {
            log::debug!(
                "Linear unpacker for {}-bit sources: {}",
                depth.bits(),
                table.get(depth).name
            );
        }
        table
    })
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86 {
    use super::*;
    use texdecode_common::Capability;

    const SSE2: CapabilitySet = CapabilitySet::empty().with(Capability::Sse2);
    const SSSE3: CapabilitySet = CapabilitySet::empty()
        .with(Capability::Sse2)
        .with(Capability::Ssse3);

    pub(super) const SSE2_16: Strategy =
        Strategy::new("sse2", SSE2, unpack16_sse2, crate::sse2::is_accelerated);
    pub(super) const SSSE3_24: Strategy =
        Strategy::new("ssse3", SSSE3, unpack24_ssse3, crate::ssse3::is_accelerated);
    pub(super) const SSSE3_32: Strategy =
        Strategy::new("ssse3", SSSE3, unpack32_ssse3, crate::ssse3::is_accelerated);

    // These wrappers are only installed by `for_capabilities` after the CPU reported the
    // required features.
    fn unpack16_sse2(format: PixelFormat, src: &[u8], stride: usize, raster: &mut CanonicalRaster) {
        unsafe { crate::sse2::unpack16_sse2(format, src, stride, raster) }
    }

    fn unpack24_ssse3(format: PixelFormat, src: &[u8], stride: usize, raster: &mut CanonicalRaster) {
        unsafe { crate::ssse3::unpack24_ssse3(format, src, stride, raster) }
    }

    fn unpack32_ssse3(format: PixelFormat, src: &[u8], stride: usize, raster: &mut CanonicalRaster) {
        unsafe { crate::ssse3::unpack32_ssse3(format, src, stride, raster) }
    }
}
