//! Runtime configuration for backend selection.
//!
//! The only knob is a forced backend, read once from `CHUNKCOPY_FORCE` when
//! the dispatch table resolves. A forced backend is always clamped to what
//! the CPU supports.

use crate::cpu::CpuFeatures;
use crate::functable::Backend;

pub const FORCE_ENV: &str = "CHUNKCOPY_FORCE";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ChunkConfig {
    /// Backend requested by the environment, `None` for automatic selection.
    pub requested: Option<Backend>,
}

impl ChunkConfig {
    pub fn from_env() -> Self {
        Self::parse(std::env::var(FORCE_ENV).ok().as_deref())
    }

    /// Parses a `CHUNKCOPY_FORCE` value. Empty, `auto` and unrecognised
    /// values select automatically.
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::default();
        };
        if value.eq_ignore_ascii_case("auto") {
            return Self::default();
        }
        match value.parse::<Backend>() {
            Ok(backend) => Self {
                requested: Some(backend),
            },
            Err(err) => {
                log::warn!("ignoring {}={:?}: {}", FORCE_ENV, value, err);
                Self::default()
            }
        }
    }

    /// The forced backend if this CPU can run it.
    pub fn effective(&self, caps: CpuFeatures) -> Option<Backend> {
        let backend = self.requested?;
        if backend.is_supported(caps) {
            Some(backend)
        } else {
            log::warn!(
                "{}={} is not supported on this CPU ({:?}), selecting automatically",
                FORCE_ENV,
                backend,
                caps
            );
            None
        }
    }
}
