//! CPU capability set consumed by dispatch resolution.

use std::fmt;

/// Vector features relevant to backend selection, as a small bitset.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CpuFeatures(u32);

impl CpuFeatures {
    /// No vector features; resolution always picks the generic backend.
    pub const NONE: Self = Self(0);
    pub const SSE2: Self = Self(1 << 0);
    pub const AVX2: Self = Self(1 << 1);
    pub const NEON: Self = Self(1 << 2);

    const NAMES: [(Self, &'static str); 3] =
        [(Self::SSE2, "sse2"), (Self::AVX2, "avx2"), (Self::NEON, "neon")];

    /// Checks that every feature in `required` is present.
    #[inline(always)]
    #[must_use]
    pub const fn has(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Probes the running CPU.
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut caps = Self::NONE;

        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("sse2") {
                caps = caps.union(Self::SSE2);
            }
            if is_x86_feature_detected!("avx2") {
                caps = caps.union(Self::AVX2);
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                caps = caps.union(Self::NEON);
            }
        }

        caps
    }

    /// Feature names present in this set.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(feature, _)| self.has(*feature))
            .map(|(_, name)| name)
    }
}

impl fmt::Debug for CpuFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
