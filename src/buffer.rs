//! Output buffer that owns the slack the overshooting copies rely on.

use crate::error::{ChunkError, Result};
use crate::functable::{Backend, Functable, functable};

/// Decompression output with a logical capacity and a physical slack tail.
///
/// Bytes are only ever appended. Back-references go through the chunk
/// [`Functable`]: the overshooting entry points are used while the physical
/// storage has at least [`Functable::slack`] bytes past the request, the
/// bounded ones after that. Storage is zero-initialised, so overshoot reads
/// never see uninitialised memory.
pub struct ChunkBuffer {
    data: Box<[u8]>,
    len: usize,
    capacity: usize,
    slack: usize,
    table: &'static Functable,
}

impl ChunkBuffer {
    /// A buffer for `capacity` bytes of output, plus slack for the
    /// process-wide table.
    ///
    /// # Panics
    ///
    /// If `capacity` plus slack overflows the address space. Use
    /// [`try_new`](Self::try_new) for sizes taken from untrusted input.
    pub fn new(capacity: usize) -> Self {
        Self::with_table(capacity, functable())
    }

    /// A buffer for `capacity` bytes using `table`.
    ///
    /// # Panics
    ///
    /// Same as [`new`](Self::new).
    pub fn with_table(capacity: usize, table: &'static Functable) -> Self {
        Self::try_with_table(capacity, table).unwrap_or_else(|e| panic!("{e}"))
    }

    /// A buffer with no slack at all; every back-reference takes the
    /// bounded path. Mostly useful to exercise those paths.
    pub fn exact(capacity: usize, table: &'static Functable) -> Self {
        Self::allocate(capacity, 0, table).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(capacity: usize) -> Result<Self> {
        Self::try_with_table(capacity, functable())
    }

    pub fn try_with_table(capacity: usize, table: &'static Functable) -> Result<Self> {
        Self::allocate(capacity, table.slack(), table)
    }

    fn allocate(capacity: usize, slack: usize, table: &'static Functable) -> Result<Self> {
        let physical = physical_size(capacity, slack)?;
        Ok(Self {
            data: vec![0u8; physical].into_boxed_slice(),
            len: 0,
            capacity,
            slack,
            table,
        })
    }

    /// Empties the buffer and sets a new capacity, reusing the storage when
    /// it is already large enough.
    pub fn reset(&mut self, capacity: usize) -> Result<()> {
        let physical = physical_size(capacity, self.slack)?;
        if physical > self.data.len() {
            self.data = vec![0u8; physical].into_boxed_slice();
        }
        self.len = 0;
        self.capacity = capacity;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.len
    }

    #[inline]
    pub fn backend(&self) -> Backend {
        self.table.backend()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn into_vec(self) -> Vec<u8> {
        let mut data = self.data.into_vec();
        data.truncate(self.len);
        data
    }

    /// Forgets the written bytes; capacity and backend are kept.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.len == self.capacity {
            return Err(ChunkError::InsufficientSpace {
                requested: 1,
                available: 0,
            });
        }
        self.data[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(ChunkError::InsufficientSpace {
                requested: bytes.len(),
                available: self.remaining(),
            });
        }
        self.data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Appends `len` bytes copied from `dist` bytes back in the output.
    ///
    /// `dist < len` repeats the last `dist` bytes. A zero `len` is a no-op.
    pub fn push_match(&mut self, dist: usize, len: usize) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        if dist == 0 {
            return Err(ChunkError::ZeroDistance);
        }
        if dist > self.len {
            return Err(ChunkError::DistanceTooFar {
                dist,
                available: self.len,
            });
        }
        if len > self.remaining() {
            return Err(ChunkError::InsufficientSpace {
                requested: len,
                available: self.remaining(),
            });
        }

        let table = self.table;
        let physical_left = self.data.len() - self.len;
        if len > physical_left {
            return Err(ChunkError::InsufficientSpace {
                requested: len,
                available: physical_left,
            });
        }
        let base = self.data.as_mut_ptr();

        // SAFETY: `dist <= self.len` keeps `out - dist` inside `data`, and
        // `len <= physical_left` keeps the request inside it. The overshooting
        // calls are only made when `slack()` bytes past the request exist in
        // `data`; the bounded calls are given the physical end of `data`.
        // All of `data` is initialised.
        let end = unsafe {
            let out = base.add(self.len);
            if physical_left - len >= table.slack() {
                if dist >= len {
                    table.copy(out, out.sub(dist), len)
                } else {
                    table.pattern_fill(out, dist, len)
                }
            } else if dist >= len {
                let limit = base.add(self.data.len()) as *const u8;
                table.copy_safe(out, out.sub(dist), len, limit)
            } else {
                table.pattern_fill_safe(out, dist, len, physical_left)
            }
        };

        debug_assert_eq!(end as usize - base as usize, self.len + len);
        self.len += len;
        Ok(())
    }
}

/// Storage for `capacity` bytes plus `slack`, capped where `Vec` would
/// refuse the allocation.
fn physical_size(capacity: usize, slack: usize) -> Result<usize> {
    capacity
        .checked_add(slack)
        .filter(|&size| size <= isize::MAX as usize)
        .ok_or(ChunkError::CapacityOverflow(capacity))
}

impl AsRef<[u8]> for ChunkBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::fmt::Debug for ChunkBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkBuffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("backend", &self.table.backend())
            .finish()
    }
}
