#![deny(unsafe_op_in_unsafe_fn)]
use super::MemChunk;
use std::arch::aarch64::*;
use std::ptr;

/// 16-byte chunk in a NEON register.
#[derive(Clone, Copy, Debug)]
pub struct NeonChunk(uint8x16_t);

impl MemChunk for NeonChunk {
    const WIDTH: usize = 16;

    #[inline(always)]
    unsafe fn load(src: *const u8) -> Self {
        Self(unsafe { vld1q_u8(src) })
    }

    #[inline(always)]
    unsafe fn store(self, dst: *mut u8) {
        unsafe { vst1q_u8(dst, self.0) }
    }

    #[inline(always)]
    unsafe fn broadcast_1(src: *const u8) -> Option<Self> {
        Some(Self(unsafe { vdupq_n_u8(*src) }))
    }

    #[inline(always)]
    unsafe fn broadcast_2(src: *const u8) -> Option<Self> {
        let w = unsafe { ptr::read_unaligned(src as *const u16) };
        Some(Self(unsafe { vreinterpretq_u8_u16(vdupq_n_u16(w)) }))
    }

    #[inline(always)]
    unsafe fn broadcast_4(src: *const u8) -> Option<Self> {
        let d = unsafe { ptr::read_unaligned(src as *const u32) };
        Some(Self(unsafe { vreinterpretq_u8_u32(vdupq_n_u32(d)) }))
    }

    #[inline(always)]
    unsafe fn broadcast_8(src: *const u8) -> Option<Self> {
        let q = unsafe { ptr::read_unaligned(src as *const u64) };
        Some(Self(unsafe { vreinterpretq_u8_u64(vdupq_n_u64(q)) }))
    }
}

pub(crate) mod neon {
    use super::NeonChunk;
    use crate::functable::Backend;
    use crate::memchunk::chunk_functable;

    chunk_functable!(NEON, Backend::Neon, NeonChunk, "neon");
}

pub(crate) use neon::NEON;
