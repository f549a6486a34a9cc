use crate::buffer::ChunkBuffer;
use crate::error::Result;
use crate::functable::{Functable, functable};
use crate::lz77::{Token, output_len, replay_into};
use rayon::prelude::*;

/// Replays many independent token streams in parallel.
pub struct BatchReplayer {
    table: &'static Functable,
}

impl BatchReplayer {
    pub fn new() -> Self {
        Self::with_table(functable())
    }

    pub fn with_table(table: &'static Functable) -> Self {
        Self { table }
    }

    pub fn replay_batch(&self, streams: &[&[Token]]) -> Vec<Result<Vec<u8>>> {
        streams
            .par_iter()
            .map_init(
                || None::<ChunkBuffer>,
                |scratch, &tokens| {
                    let capacity = output_len(tokens)?;
                    self.replay_one(scratch, tokens, capacity)
                },
            )
            .collect()
    }

    /// Like [`replay_batch`](Self::replay_batch), but each stream may expand
    /// to at most its `max_out_sizes` entry.
    ///
    /// `max_out_sizes` must have one entry per stream.
    pub fn replay_batch_bounded(
        &self,
        streams: &[&[Token]],
        max_out_sizes: &[usize],
    ) -> Vec<Result<Vec<u8>>> {
        debug_assert_eq!(streams.len(), max_out_sizes.len());
        streams
            .par_iter()
            .zip(max_out_sizes.par_iter())
            .map_init(
                || None::<ChunkBuffer>,
                |scratch, (&tokens, &max_size)| self.replay_one(scratch, tokens, max_size),
            )
            .collect()
    }

    /// Replays into the worker's scratch buffer, allocating it on first use.
    fn replay_one(
        &self,
        scratch: &mut Option<ChunkBuffer>,
        tokens: &[Token],
        capacity: usize,
    ) -> Result<Vec<u8>> {
        let buf = match scratch.take() {
            Some(mut buf) => {
                buf.reset(capacity)?;
                buf
            }
            None => ChunkBuffer::try_with_table(capacity, self.table)?,
        };
        let out = scratch.insert(buf);
        replay_into(tokens, out)?;
        Ok(out.as_slice().to_vec())
    }
}

impl Default for BatchReplayer {
    fn default() -> Self {
        Self::new()
    }
}
