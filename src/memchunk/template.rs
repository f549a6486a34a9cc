//! Copy algorithms shared by every chunk backend.
//!
//! Everything here is written against [`MemChunk`] only, and is
//! `#[inline(always)]` so that each backend's `#[target_feature]` wrapper
//! compiles its own copy of the loop with the right instructions enabled.
//!
//! None of these functions check bounds. The overshoot-permitted ones
//! (`chunkcopy`, `chunkunroll`, `chunkmemset`) may touch up to `W - 1` bytes
//! past the requested region; callers provision at least `2 * W` bytes of
//! initialised slack before using them.
#![deny(unsafe_op_in_unsafe_fn)]

use super::MemChunk;
use std::ptr;

/// Behaves like `memcpy`, but always moves whole chunks.
///
/// The first chunk is copied unconditionally so copies of `W` bytes or
/// fewer never enter the loop. After that both cursors advance by
/// `((len - 1) % W) + 1`, leaving a whole number of chunks.
///
/// `from` must trail `out` by at least `W` bytes, not overlap it at all, or
/// trail it by at least `len`.
#[inline(always)]
pub(crate) unsafe fn chunkcopy<C: MemChunk>(
    mut out: *mut u8,
    mut from: *const u8,
    len: usize,
) -> *mut u8 {
    debug_assert!(len > 0, "chunkcopy requires a non-empty copy");
    let len = len - 1;
    unsafe {
        C::load(from).store(out);
        let head = len % C::WIDTH + 1;
        out = out.add(head);
        from = from.add(head);
        let mut chunks = len / C::WIDTH;
        while chunks > 0 {
            C::load(from).store(out);
            out = out.add(C::WIDTH);
            from = from.add(C::WIDTH);
            chunks -= 1;
        }
    }
    out
}

/// Like [`chunkcopy`], but never writes at or past `limit`.
///
/// When less than one chunk of room is left the copy is assembled from
/// power-of-two moves selected by the bits of `len`, which writes exactly
/// `len` bytes.
#[inline(always)]
pub(crate) unsafe fn chunkcopy_safe<C: MemChunk>(
    mut out: *mut u8,
    mut from: *const u8,
    len: usize,
    limit: *const u8,
) -> *mut u8 {
    debug_assert!(len > 0, "chunkcopy_safe requires a non-empty copy");
    let room = unsafe { limit.offset_from(out as *const u8) };
    debug_assert!(room >= len as isize, "copy of {len} bytes runs past the limit");

    if room < C::WIDTH as isize {
        let mut step = C::WIDTH / 2;
        while step > 0 {
            if len & step != 0 {
                unsafe {
                    ptr::copy_nonoverlapping(from, out, step);
                    out = out.add(step);
                    from = from.add(step);
                }
            }
            step >>= 1;
        }
        return out;
    }
    unsafe { chunkcopy::<C>(out, from, len) }
}

/// Grows a short repeat distance by doubling until it covers a chunk.
///
/// Each step stores one chunk read from `out - dist`, which extends the
/// already-materialised pattern by `dist` bytes. The loop ends once
/// `dist >= W` or `dist >= len`; the caller finishes with [`chunkcopy`].
#[inline(always)]
pub(crate) unsafe fn chunkunroll<C: MemChunk>(
    mut out: *mut u8,
    mut dist: usize,
    mut len: usize,
) -> (*mut u8, usize, usize) {
    debug_assert!(dist > 0, "cannot have a distance 0");
    let from = unsafe { out.sub(dist) } as *const u8;
    while dist < len && dist < C::WIDTH {
        unsafe {
            C::load(from).store(out);
            out = out.add(dist);
        }
        len -= dist;
        dist += dist;
    }
    (out, dist, len)
}

/// Repeats the `dist` bytes behind `out` until `len` bytes are written.
#[inline(always)]
pub(crate) unsafe fn chunkmemset<C: MemChunk>(
    mut out: *mut u8,
    dist: usize,
    len: usize,
) -> *mut u8 {
    debug_assert!(dist > 0, "cannot have a distance 0");

    let from = unsafe { out.sub(dist) } as *const u8;
    if len < C::WIDTH {
        for i in 0..len {
            unsafe { out.add(i).write(from.add(i).read()) };
        }
        return unsafe { out.add(len) };
    }

    let broadcast = unsafe {
        match dist {
            1 => C::broadcast_1(from),
            2 => C::broadcast_2(from),
            4 => C::broadcast_4(from),
            8 => C::broadcast_8(from),
            _ => None,
        }
    };
    let chunk = match broadcast {
        Some(chunk) => chunk,
        None if dist == C::WIDTH => unsafe { C::load(from) },
        None => unsafe {
            let (out, dist, len) = chunkunroll::<C>(out, dist, len);
            return chunkcopy::<C>(out, out.sub(dist), len);
        },
    };

    let rem = len % C::WIDTH;
    let mut full = len - rem;
    unsafe {
        while full > 0 {
            chunk.store(out);
            out = out.add(C::WIDTH);
            full -= C::WIDTH;
        }
        // `out` advanced by a multiple of W, which is a multiple of `dist`,
        // so the tail starts at the beginning of the pattern.
        if rem > 0 {
            ptr::copy_nonoverlapping(from, out, rem);
        }
        out.add(rem)
    }
}

/// Like [`chunkmemset`], but stays within `left` bytes of `out`.
///
/// `chunkmemset` overshoots by at most `W - 1` bytes; it is only used when
/// at least `3 * W` bytes remain past the request. Otherwise the copy runs
/// one byte at a time, front to back, so short distances read the bytes
/// this call already produced.
#[inline(always)]
pub(crate) unsafe fn chunkmemset_safe<C: MemChunk>(
    out: *mut u8,
    dist: usize,
    len: usize,
    left: usize,
) -> *mut u8 {
    debug_assert!(dist > 0, "cannot have a distance 0");
    debug_assert!(len <= left, "fill of {len} bytes exceeds the {left} bytes left");

    if left - len < 3 * C::WIDTH {
        for i in 0..len {
            unsafe {
                let dst = out.add(i);
                dst.write(dst.sub(dist).read());
            }
        }
        return unsafe { out.add(len) };
    }
    unsafe { chunkmemset::<C>(out, dist, len) }
}
