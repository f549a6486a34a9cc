//! Process-wide table of chunk copy functions.
//!
//! Every backend instantiates the same five algorithms. Resolution picks the
//! widest backend the CPU supports (or the one forced by [`ChunkConfig`]),
//! once, and every later call goes through the cached table.

use crate::config::ChunkConfig;
use crate::cpu::CpuFeatures;
use crate::error::ChunkError;
use crate::memchunk;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

type ChunkCopyFn = unsafe fn(*mut u8, *const u8, usize) -> *mut u8;
type ChunkCopySafeFn = unsafe fn(*mut u8, *const u8, usize, *const u8) -> *mut u8;
type ChunkUnrollFn = unsafe fn(*mut u8, usize, usize) -> (*mut u8, usize, usize);
type ChunkMemsetFn = unsafe fn(*mut u8, usize, usize) -> *mut u8;
type ChunkMemsetSafeFn = unsafe fn(*mut u8, usize, usize, usize) -> *mut u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Portable 8-byte chunks.
    Generic,
    /// 16-byte SSE2 registers.
    Sse2,
    /// 32-byte AVX2 registers.
    Avx2,
    /// 16-byte NEON registers.
    Neon,
}

impl Backend {
    /// Selection order, widest first.
    pub const PREFERENCE: [Backend; 4] =
        [Backend::Avx2, Backend::Sse2, Backend::Neon, Backend::Generic];

    pub const fn name(self) -> &'static str {
        match self {
            Backend::Generic => "generic",
            Backend::Sse2 => "sse2",
            Backend::Avx2 => "avx2",
            Backend::Neon => "neon",
        }
    }

    pub const fn required_features(self) -> CpuFeatures {
        match self {
            Backend::Generic => CpuFeatures::NONE,
            Backend::Sse2 => CpuFeatures::SSE2,
            Backend::Avx2 => CpuFeatures::AVX2,
            Backend::Neon => CpuFeatures::NEON,
        }
    }

    /// Whether this backend was built for the current target.
    pub const fn is_compiled(self) -> bool {
        match self {
            Backend::Generic => true,
            Backend::Sse2 | Backend::Avx2 => cfg!(target_arch = "x86_64"),
            Backend::Neon => cfg!(target_arch = "aarch64"),
        }
    }

    pub const fn is_supported(self, caps: CpuFeatures) -> bool {
        self.is_compiled() && caps.has(self.required_features())
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("generic")
            || s.eq_ignore_ascii_case("portable")
            || s.eq_ignore_ascii_case("scalar")
        {
            return Ok(Backend::Generic);
        }
        if s.eq_ignore_ascii_case("sse2") {
            return Ok(Backend::Sse2);
        }
        if s.eq_ignore_ascii_case("avx2") {
            return Ok(Backend::Avx2);
        }
        if s.eq_ignore_ascii_case("neon") {
            return Ok(Backend::Neon);
        }
        Err(ChunkError::UnknownBackend(s.to_string()))
    }
}

/// One backend's instantiation of the chunk copy algorithms.
///
/// The raw entry points are `unsafe`: they take pointers into an output
/// buffer and perform no bounds checks. `copy`, `unroll` and `pattern_fill`
/// may write up to `chunk_width() - 1` bytes past the requested region, so
/// the caller keeps at least [`slack()`](Self::slack) initialised, writable
/// bytes past it, and switches to `copy_safe` / `pattern_fill_safe` once
/// that is no longer true. [`ChunkBuffer`](crate::ChunkBuffer) does this
/// bookkeeping.
#[derive(Clone, Copy)]
pub struct Functable {
    backend: Backend,
    chunk_width: usize,
    chunkcopy: ChunkCopyFn,
    chunkcopy_safe: ChunkCopySafeFn,
    chunkunroll: ChunkUnrollFn,
    chunkmemset: ChunkMemsetFn,
    chunkmemset_safe: ChunkMemsetSafeFn,
}

impl Functable {
    pub(crate) const fn from_parts(
        backend: Backend,
        chunk_width: usize,
        chunkcopy: ChunkCopyFn,
        chunkcopy_safe: ChunkCopySafeFn,
        chunkunroll: ChunkUnrollFn,
        chunkmemset: ChunkMemsetFn,
        chunkmemset_safe: ChunkMemsetSafeFn,
    ) -> Self {
        assert!(chunk_width >= 8 && chunk_width.is_power_of_two());
        Self {
            backend,
            chunk_width,
            chunkcopy,
            chunkcopy_safe,
            chunkunroll,
            chunkmemset,
            chunkmemset_safe,
        }
    }

    /// The table compiled for `backend`, if any. Does not check the CPU.
    pub fn for_backend(backend: Backend) -> Option<&'static Functable> {
        match backend {
            Backend::Generic => Some(&memchunk::generic::GENERIC),
            #[cfg(target_arch = "x86_64")]
            Backend::Sse2 => Some(&memchunk::x86::SSE2),
            #[cfg(target_arch = "x86_64")]
            Backend::Avx2 => Some(&memchunk::x86::AVX2),
            #[cfg(target_arch = "aarch64")]
            Backend::Neon => Some(&memchunk::arm::NEON),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Every table `caps` can run, widest first.
    pub fn supported(caps: CpuFeatures) -> Vec<&'static Functable> {
        Backend::PREFERENCE
            .into_iter()
            .filter(|backend| backend.is_supported(caps))
            .filter_map(Functable::for_backend)
            .collect()
    }

    /// Picks a table for `caps`. Deterministic: the same inputs always give
    /// the same table, and the generic table is always a candidate.
    pub fn resolve(caps: CpuFeatures, requested: Option<Backend>) -> &'static Functable {
        requested
            .filter(|backend| backend.is_supported(caps))
            .into_iter()
            .chain(Backend::PREFERENCE.into_iter().filter(|b| b.is_supported(caps)))
            .find_map(Functable::for_backend)
            .unwrap_or(&memchunk::generic::GENERIC)
    }

    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    #[inline]
    pub fn chunk_width(&self) -> usize {
        self.chunk_width
    }

    /// Bytes of writable slack the overshooting entry points need past the
    /// end of a request.
    #[inline]
    pub fn slack(&self) -> usize {
        2 * self.chunk_width
    }

    /// Copies `len` bytes from `from` to `out`; returns `out + len`.
    ///
    /// # Safety
    ///
    /// `len > 0`. Up to `chunk_width() - 1` bytes past `from + len` are read
    /// and past `out + len` are written, all of which must be valid. `from`
    /// trails `out` by at least `chunk_width()` or by at least `len`, or the
    /// ranges do not overlap.
    #[inline(always)]
    pub unsafe fn copy(&self, out: *mut u8, from: *const u8, len: usize) -> *mut u8 {
        unsafe { (self.chunkcopy)(out, from, len) }
    }

    /// Like [`copy`](Self::copy), but writes nothing at or past `limit`.
    ///
    /// # Safety
    ///
    /// `len > 0`, `out + len <= limit`, both in the same allocation, with
    /// the same overlap rules as `copy`. Reads may still extend up to one
    /// chunk past `from` when `limit - out >= chunk_width()`.
    #[inline(always)]
    pub unsafe fn copy_safe(
        &self,
        out: *mut u8,
        from: *const u8,
        len: usize,
        limit: *const u8,
    ) -> *mut u8 {
        unsafe { (self.chunkcopy_safe)(out, from, len, limit) }
    }

    /// Doubles `dist` until it reaches the chunk width or covers `len`,
    /// materialising the pattern as it goes. Returns the advanced cursor and
    /// the remaining `(dist, len)`.
    ///
    /// # Safety
    ///
    /// `dist > 0`, `out - dist` is valid, and `slack()` bytes past
    /// `out + len` are writable.
    #[inline(always)]
    pub unsafe fn unroll(&self, out: *mut u8, dist: usize, len: usize) -> (*mut u8, usize, usize) {
        unsafe { (self.chunkunroll)(out, dist, len) }
    }

    /// Writes `len` bytes repeating the `dist` bytes behind `out`; returns
    /// `out + len`.
    ///
    /// # Safety
    ///
    /// `dist > 0`, `out - dist` is valid, and `slack()` bytes past
    /// `out + len` are writable.
    #[inline(always)]
    pub unsafe fn pattern_fill(&self, out: *mut u8, dist: usize, len: usize) -> *mut u8 {
        unsafe { (self.chunkmemset)(out, dist, len) }
    }

    /// Like [`pattern_fill`](Self::pattern_fill), but writes only inside the
    /// `left` bytes starting at `out`.
    ///
    /// # Safety
    ///
    /// `dist > 0`, `len <= left`, `out - dist` is valid and `out .. out + left`
    /// is writable.
    #[inline(always)]
    pub unsafe fn pattern_fill_safe(
        &self,
        out: *mut u8,
        dist: usize,
        len: usize,
        left: usize,
    ) -> *mut u8 {
        unsafe { (self.chunkmemset_safe)(out, dist, len, left) }
    }
}

impl fmt::Debug for Functable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Functable")
            .field("backend", &self.backend)
            .field("chunk_width", &self.chunk_width)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Functable {
    fn eq(&self, other: &Self) -> bool {
        self.backend == other.backend
    }
}

impl Eq for Functable {}

/// The table for this process, resolved on first use.
pub fn functable() -> &'static Functable {
    static TABLE: OnceLock<&'static Functable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let caps = CpuFeatures::detect();
        let config = ChunkConfig::from_env();
        let table = Functable::resolve(caps, config.effective(caps));
        log::debug!(
            "chunk copy backend: {} ({} byte chunks, cpu {:?})",
            table.backend(),
            table.chunk_width(),
            caps
        );
        table
    })
}

/// Chunk width of the process-wide table.
#[inline]
pub fn chunk_width() -> usize {
    functable().chunk_width()
}
