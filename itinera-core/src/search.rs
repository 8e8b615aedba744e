//! Ordering of place-search responses.
//!
//! Searches run concurrently and may answer out of order. Each request takes
//! a generation from [`SearchSequencer::issue`]; a response is applied only
//! when its generation is newer than the last one applied.

use serde::{Deserialize, Serialize};

use crate::model::Position;

/// Best match for a free-text place query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub position: Position,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct SearchSequencer {
    issued: u64,
    applied: u64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags a new request.
    pub fn issue(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    /// Records a response and reports whether it should be applied.
    pub fn accept(&mut self, generation: Generation) -> bool {
        if generation.0 > self.applied {
            self.applied = generation.0;
            true
        } else {
            log::debug!(
                "Dropping stale search response {} (applied {})",
                generation.0,
                self.applied
            );
            false
        }
    }
}
