use std::io;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("Back-reference distance must be non-zero")]
    ZeroDistance,

    #[error("Back-reference distance {dist} reaches before the start of output ({available} bytes written)")]
    DistanceTooFar { dist: usize, available: usize },

    #[error("Insufficient space: {requested} bytes requested, {available} available")]
    InsufficientSpace { requested: usize, available: usize },

    #[error("Output buffer of {0} bytes plus slack cannot be allocated")]
    CapacityOverflow(usize),

    #[error("Unknown chunk backend: {0}")]
    UnknownBackend(String),
}

impl From<ChunkError> for io::Error {
    fn from(err: ChunkError) -> Self {
        let kind = match err {
            ChunkError::InsufficientSpace { .. } => io::ErrorKind::WriteZero,
            ChunkError::CapacityOverflow(_) => io::ErrorKind::OutOfMemory,
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

pub type Result<T> = std::result::Result<T, ChunkError>;
