//! Helpers for CPU feature detection.
//!
//! This module provides CPU feature detection for SIMD instruction sets using the
//! `cpufeatures` crate. These functions are used to determine at runtime which accelerated
//! pixel unpackers can be safely executed on the current CPU.
//!
//! Each check has an init that's called once, and every subsequent call simply loads and
//! compares a bool. With the `no-runtime-cpu-detection` feature, the answer is instead the
//! set of target features the crate was compiled with.
//!
//! Most callers should use [`crate::capability::detect`], which combines these checks into
//! a single cached [`crate::capability::CapabilitySet`].

/// Checks if the CPU supports AVX2 (Advanced Vector Extensions 2) instructions.
///
/// AVX2 extends AVX by providing 256-bit integer SIMD instructions.
///
/// # Returns
/// `true` if the CPU supports AVX2 instructions, `false` otherwise.
#[inline]
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
pub fn has_avx2() -> bool {
    #[cfg(not(feature = "no-runtime-cpu-detection"))]
    {
        cpufeatures::new!(cpuid_avx2, "avx2");
        cpuid_avx2::get()
    }

    #[cfg(feature = "no-runtime-cpu-detection")]
    {
        cfg!(target_feature = "avx2")
    }
}

/// Checks if the CPU supports SSE4.1 instructions.
///
/// # Returns
/// `true` if the CPU supports SSE4.1 instructions, `false` otherwise.
#[inline]
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
pub fn has_sse41() -> bool {
    #[cfg(not(feature = "no-runtime-cpu-detection"))]
    {
        cpufeatures::new!(cpuid_sse41, "sse4.1");
        cpuid_sse41::get()
    }

    #[cfg(feature = "no-runtime-cpu-detection")]
    {
        cfg!(target_feature = "sse4.1")
    }
}

/// Checks if the CPU supports SSSE3 (Supplemental SSE3) instructions.
///
/// SSSE3 adds `pshufb`, which the 24-bit and 32-bit unpackers use to reorder the channels of
/// 4 pixels per instruction.
///
/// # Returns
/// `true` if the CPU supports SSSE3 instructions, `false` otherwise.
#[inline]
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
pub fn has_ssse3() -> bool {
    #[cfg(not(feature = "no-runtime-cpu-detection"))]
    {
        cpufeatures::new!(cpuid_ssse3, "ssse3");
        cpuid_ssse3::get()
    }

    #[cfg(feature = "no-runtime-cpu-detection")]
    {
        cfg!(target_feature = "ssse3")
    }
}

/// Checks if the CPU supports SSE2 (Streaming SIMD Extensions 2) instructions.
///
/// SSE2 is available on virtually all x86-64 processors and is the baseline for the
/// 16-bit unpackers.
///
/// # Returns
/// `true` if the CPU supports SSE2 instructions, `false` otherwise.
#[inline]
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
pub fn has_sse2() -> bool {
    #[cfg(not(feature = "no-runtime-cpu-detection"))]
    {
        cpufeatures::new!(cpuid_sse2, "sse2");
        cpuid_sse2::get()
    }

    #[cfg(feature = "no-runtime-cpu-detection")]
    {
        cfg!(target_feature = "sse2")
    }
}
