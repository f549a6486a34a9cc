//! Materialising LZ77 token streams.
//!
//! This is the consumer side of the chunk table: an already-decoded stream
//! of literals and back-references is written into a [`ChunkBuffer`].

use crate::buffer::ChunkBuffer;
use crate::error::{ChunkError, Result};
use crate::functable::Functable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Literal(u8),
    /// Copy `len` bytes starting `dist` bytes behind the output cursor.
    Match { dist: usize, len: usize },
}

/// Number of bytes `tokens` expand to.
///
/// Fails with [`ChunkError::InsufficientSpace`] when the total does not fit
/// in a `usize`.
pub fn output_len(tokens: &[Token]) -> Result<usize> {
    tokens.iter().try_fold(0usize, |total, token| {
        let len = match *token {
            Token::Literal(_) => 1,
            Token::Match { len, .. } => len,
        };
        total
            .checked_add(len)
            .ok_or(ChunkError::InsufficientSpace {
                requested: len,
                available: usize::MAX - total,
            })
    })
}

/// Appends `tokens` to `out`, returning the number of bytes written.
///
/// On error `out` holds everything produced before the offending token.
pub fn replay_into(tokens: &[Token], out: &mut ChunkBuffer) -> Result<usize> {
    let start = out.len();
    let mut literals = Vec::new();
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        match *token {
            Token::Literal(byte) => {
                // Batch runs of literals into one slice copy.
                literals.clear();
                literals.push(byte);
                while let Some(Token::Literal(next)) = iter.peek() {
                    literals.push(*next);
                    iter.next();
                }
                out.extend_from_slice(&literals)?;
            }
            Token::Match { dist, len } => out.push_match(dist, len)?,
        }
    }
    Ok(out.len() - start)
}

/// Expands `tokens` with the process-wide table.
pub fn replay(tokens: &[Token]) -> Result<Vec<u8>> {
    let mut out = ChunkBuffer::try_new(output_len(tokens)?)?;
    replay_into(tokens, &mut out)?;
    Ok(out.into_vec())
}

/// Expands `tokens` with a specific backend's table.
pub fn replay_with(tokens: &[Token], table: &'static Functable) -> Result<Vec<u8>> {
    let mut out = ChunkBuffer::try_with_table(output_len(tokens)?, table)?;
    replay_into(tokens, &mut out)?;
    Ok(out.into_vec())
}
