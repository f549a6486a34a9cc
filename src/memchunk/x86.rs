#![deny(unsafe_op_in_unsafe_fn)]
use super::MemChunk;
use std::arch::x86_64::*;
use std::ptr;

/// 16-byte chunk in an SSE2 register.
#[derive(Clone, Copy, Debug)]
pub struct Sse2Chunk(__m128i);

impl MemChunk for Sse2Chunk {
    const WIDTH: usize = 16;

    #[inline(always)]
    unsafe fn load(src: *const u8) -> Self {
        Self(unsafe { _mm_loadu_si128(src as *const __m128i) })
    }

    #[inline(always)]
    unsafe fn store(self, dst: *mut u8) {
        unsafe { _mm_storeu_si128(dst as *mut __m128i, self.0) }
    }

    #[inline(always)]
    unsafe fn broadcast_1(src: *const u8) -> Option<Self> {
        Some(Self(unsafe { _mm_set1_epi8(*src as i8) }))
    }

    #[inline(always)]
    unsafe fn broadcast_2(src: *const u8) -> Option<Self> {
        let w = unsafe { ptr::read_unaligned(src as *const i16) };
        Some(Self(unsafe { _mm_set1_epi16(w) }))
    }

    #[inline(always)]
    unsafe fn broadcast_4(src: *const u8) -> Option<Self> {
        let d = unsafe { ptr::read_unaligned(src as *const i32) };
        Some(Self(unsafe { _mm_set1_epi32(d) }))
    }

    #[inline(always)]
    unsafe fn broadcast_8(src: *const u8) -> Option<Self> {
        let q = unsafe { ptr::read_unaligned(src as *const i64) };
        Some(Self(unsafe { _mm_set1_epi64x(q) }))
    }
}

/// 32-byte chunk in an AVX2 register.
#[derive(Clone, Copy, Debug)]
pub struct Avx2Chunk(__m256i);

impl MemChunk for Avx2Chunk {
    const WIDTH: usize = 32;

    #[inline(always)]
    unsafe fn load(src: *const u8) -> Self {
        Self(unsafe { _mm256_loadu_si256(src as *const __m256i) })
    }

    #[inline(always)]
    unsafe fn store(self, dst: *mut u8) {
        unsafe { _mm256_storeu_si256(dst as *mut __m256i, self.0) }
    }

    #[inline(always)]
    unsafe fn broadcast_1(src: *const u8) -> Option<Self> {
        Some(Self(unsafe { _mm256_set1_epi8(*src as i8) }))
    }

    #[inline(always)]
    unsafe fn broadcast_2(src: *const u8) -> Option<Self> {
        let w = unsafe { ptr::read_unaligned(src as *const i16) };
        Some(Self(unsafe { _mm256_set1_epi16(w) }))
    }

    #[inline(always)]
    unsafe fn broadcast_4(src: *const u8) -> Option<Self> {
        let d = unsafe { ptr::read_unaligned(src as *const i32) };
        Some(Self(unsafe { _mm256_set1_epi32(d) }))
    }

    #[inline(always)]
    unsafe fn broadcast_8(src: *const u8) -> Option<Self> {
        let q = unsafe { ptr::read_unaligned(src as *const i64) };
        Some(Self(unsafe { _mm256_set1_epi64x(q) }))
    }
}

pub(crate) mod sse2 {
    use super::Sse2Chunk;
    use crate::functable::Backend;
    use crate::memchunk::chunk_functable;

    chunk_functable!(SSE2, Backend::Sse2, Sse2Chunk, "sse2");
}

pub(crate) mod avx2 {
    use super::Avx2Chunk;
    use crate::functable::Backend;
    use crate::memchunk::chunk_functable;

    chunk_functable!(AVX2, Backend::Avx2, Avx2Chunk, "avx2");
}

pub(crate) use avx2::AVX2;
pub(crate) use sse2::SSE2;
