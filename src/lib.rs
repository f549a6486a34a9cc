//! Chunked back-reference copies for DEFLATE-family decompressors.
//!
//! The hot path of LZ77 decoding is "copy `len` bytes from `dist` bytes
//! back". This crate implements it with register-sized chunk moves that are
//! allowed to overshoot into caller-provided slack, picks the widest chunk
//! backend the CPU supports once per process, and wraps the raw entry points
//! in [`ChunkBuffer`], which owns that slack and falls back to exact copies
//! near the end of the output.
pub mod batch;
pub mod buffer;
pub mod config;
pub mod cpu;
pub mod error;
pub mod functable;
pub mod lz77;
pub mod memchunk;

pub use buffer::ChunkBuffer;
pub use cpu::CpuFeatures;
pub use error::ChunkError;
pub use functable::{Backend, Functable, chunk_width, functable};
pub use lz77::{Token, replay};
