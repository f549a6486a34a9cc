//! Chunk backends: fixed-width register-sized byte moves.
//!
//! A backend only knows how to load, store and broadcast one chunk. The copy
//! algorithms in [`template`] are built from those primitives alone and are
//! instantiated once per backend by [`chunk_functable!`].
#![deny(unsafe_op_in_unsafe_fn)]

pub(crate) mod template;

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86;

#[cfg(target_arch = "aarch64")]
pub(crate) mod arm;

use std::ptr;

/// A register-sized unit of bytes.
///
/// `WIDTH` is a power of two and at least 8. None of the primitives check
/// bounds or alignment; callers guarantee every address they pass is valid
/// for the full access.
pub trait MemChunk: Copy {
    const WIDTH: usize;

    /// Reads `WIDTH` bytes from `src`.
    unsafe fn load(src: *const u8) -> Self;

    /// Writes `WIDTH` bytes to `dst`.
    unsafe fn store(self, dst: *mut u8);

    /// Fills a chunk with the byte at `src`, or `None` if the backend has
    /// no such broadcast.
    #[inline(always)]
    unsafe fn broadcast_1(_src: *const u8) -> Option<Self> {
        None
    }

    #[inline(always)]
    unsafe fn broadcast_2(_src: *const u8) -> Option<Self> {
        None
    }

    #[inline(always)]
    unsafe fn broadcast_4(_src: *const u8) -> Option<Self> {
        None
    }

    #[inline(always)]
    unsafe fn broadcast_8(_src: *const u8) -> Option<Self> {
        None
    }
}

/// Portable 8-byte chunk held in a `u64`.
///
/// There is no 2-byte broadcast; distance 2 goes through the unroll path.
#[derive(Clone, Copy, Debug)]
pub struct GenericChunk(u64);

impl MemChunk for GenericChunk {
    const WIDTH: usize = 8;

    #[inline(always)]
    unsafe fn load(src: *const u8) -> Self {
        Self(unsafe { ptr::read_unaligned(src as *const u64) })
    }

    #[inline(always)]
    unsafe fn store(self, dst: *mut u8) {
        unsafe { ptr::write_unaligned(dst as *mut u64, self.0) }
    }

    #[inline(always)]
    unsafe fn broadcast_1(src: *const u8) -> Option<Self> {
        let b = unsafe { *src } as u64;
        Some(Self(b.wrapping_mul(0x0101010101010101)))
    }

    #[inline(always)]
    unsafe fn broadcast_4(src: *const u8) -> Option<Self> {
        // Both halves hold the same native-order word, so byte order is
        // preserved on either endianness.
        let w = unsafe { ptr::read_unaligned(src as *const u32) } as u64;
        Some(Self(w.wrapping_mul(0x0000000100000001)))
    }

    #[inline(always)]
    unsafe fn broadcast_8(src: *const u8) -> Option<Self> {
        Some(unsafe { Self::load(src) })
    }
}

/// Instantiates the template for one chunk type and exposes it as a
/// `static` [`Functable`](crate::functable::Functable).
///
/// With a feature string, each entry point is compiled under
/// `#[target_feature(enable = ...)]` so the template inlines with that ISA.
macro_rules! chunk_functable {
    ($table:ident, $backend:expr, $chunk:ty $(, $feature:literal)?) => {
        mod instance {
            use super::*;
            use $crate::memchunk::template;

            $(#[target_feature(enable = $feature)])?
            pub(super) unsafe fn chunkcopy(out: *mut u8, from: *const u8, len: usize) -> *mut u8 {
                unsafe { template::chunkcopy::<$chunk>(out, from, len) }
            }

            $(#[target_feature(enable = $feature)])?
            pub(super) unsafe fn chunkcopy_safe(
                out: *mut u8,
                from: *const u8,
                len: usize,
                limit: *const u8,
            ) -> *mut u8 {
                unsafe { template::chunkcopy_safe::<$chunk>(out, from, len, limit) }
            }

            $(#[target_feature(enable = $feature)])?
            pub(super) unsafe fn chunkunroll(
                out: *mut u8,
                dist: usize,
                len: usize,
            ) -> (*mut u8, usize, usize) {
                unsafe { template::chunkunroll::<$chunk>(out, dist, len) }
            }

            $(#[target_feature(enable = $feature)])?
            pub(super) unsafe fn chunkmemset(out: *mut u8, dist: usize, len: usize) -> *mut u8 {
                unsafe { template::chunkmemset::<$chunk>(out, dist, len) }
            }

            $(#[target_feature(enable = $feature)])?
            pub(super) unsafe fn chunkmemset_safe(
                out: *mut u8,
                dist: usize,
                len: usize,
                left: usize,
            ) -> *mut u8 {
                unsafe { template::chunkmemset_safe::<$chunk>(out, dist, len, left) }
            }
        }

        pub(crate) static $table: $crate::functable::Functable =
            $crate::functable::Functable::from_parts(
                $backend,
                <$chunk as $crate::memchunk::MemChunk>::WIDTH,
                instance::chunkcopy,
                instance::chunkcopy_safe,
                instance::chunkunroll,
                instance::chunkmemset,
                instance::chunkmemset_safe,
            );
    };
}

pub(crate) use chunk_functable;

pub(crate) mod generic {
    use super::GenericChunk;
    use crate::functable::Backend;

    chunk_functable!(GENERIC, Backend::Generic, GenericChunk);
}
