//! Process-wide CPU capability detection.
//!
//! The capability set is detected once, on first use, and published through a [`OnceLock`].
//! Concurrent first callers block until the single detection finishes and then all observe the
//! same fully written value; later calls are a plain load.
//!
//! Features that cannot be determined are reported as absent, so the portable
//! implementations always remain reachable.

use core::fmt;
use derive_enum_all_values::AllValues;
use std::sync::OnceLock;

/// A single optional instruction-set extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum Capability {
    /// x86 SSE2.
    Sse2,
    /// x86 SSSE3 (`pshufb`).
    Ssse3,
    /// x86 SSE4.1.
    Sse41,
    /// x86 AVX2.
    Avx2,
}

impl Capability {
    #[inline]
    const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Lowercase name, as used by `target_feature`.
    pub const fn name(self) -> &'static str {
        match self {
            Capability::Sse2 => "sse2",
            Capability::Ssse3 => "ssse3",
            Capability::Sse41 => "sse4.1",
            Capability::Avx2 => "avx2",
        }
    }
}

/// An immutable set of [`Capability`] flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapabilitySet {
    bits: u32,
}

impl CapabilitySet {
    /// The empty set; selects portable code everywhere.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Returns a copy of this set with `capability` added.
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self {
            bits: self.bits | capability.bit(),
        }
    }

    /// Whether `capability` is present.
    #[inline]
    pub const fn contains(self, capability: Capability) -> bool {
        self.bits & capability.bit() != 0
    }

    /// Whether every capability in `other` is also present in `self`.
    #[inline]
    pub const fn contains_all(self, other: CapabilitySet) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Capabilities present in both sets.
    #[must_use]
    pub const fn intersection(self, other: CapabilitySet) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Whether the set is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Iterates over the capabilities in this set.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::all_values()
            .iter()
            .copied()
            .filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CapabilitySet::empty(), CapabilitySet::with)
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        for (i, capability) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(capability.name())?;
        }
        Ok(())
    }
}

static CAPABILITIES: OnceLock<CapabilitySet> = OnceLock::new();

/// Returns the capabilities of the running CPU.
///
/// The first call queries the hardware; every later call returns the cached result.
pub fn detect() -> CapabilitySet {
    *CAPABILITIES.get_or_init(query_hardware)
}

fn query_hardware() -> CapabilitySet {
    #[allow(unused_mut)]
    let mut set = CapabilitySet::empty();

    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    {
        use crate::cpu_detect::*;
        if has_sse2() {
            set = set.with(Capability::Sse2);
        }
        if has_ssse3() {
            set = set.with(Capability::Ssse3);
        }
        if has_sse41() {
            set = set.with(Capability::Sse41);
        }
        if has_avx2() {
            set = set.with(Capability::Avx2);
        }
    }

    log::debug!("Detected CPU capabilities: {set}");
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn detect_is_idempotent() {
        init_logging();
        let first = detect();
        for _ in 0..8 {
            assert_eq!(detect(), first);
        }
    }

    #[test]
    fn concurrent_first_use_sees_one_value() {
        let results: Vec<CapabilitySet> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8).map(|_| scope.spawn(detect)).collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect()
        });
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }

    #[rstest]
    #[case(&[], "(none)")]
    #[case(&[Capability::Sse2], "sse2")]
    #[case(&[Capability::Sse2, Capability::Ssse3], "sse2, ssse3")]
    #[case(&[Capability::Avx2, Capability::Sse2], "sse2, avx2")]
    fn display_lists_names_in_declaration_order(
        #[case] caps: &[Capability],
        #[case] expected: &str,
    ) {
        let set: CapabilitySet = caps.iter().copied().collect();
        assert_eq!(set.to_string(), expected);
    }

    #[test]
    fn contains_all_is_subset_test() {
        let sse = CapabilitySet::empty()
            .with(Capability::Sse2)
            .with(Capability::Ssse3);
        assert!(sse.contains_all(CapabilitySet::empty().with(Capability::Sse2)));
        assert!(!sse.contains_all(CapabilitySet::empty().with(Capability::Avx2)));
        assert!(sse.contains_all(CapabilitySet::empty()));
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn x86_64_always_has_sse2() {
        assert!(detect().contains(Capability::Sse2));
    }
}
