//! Ordered stop sequence and its in-memory operations
//!
//! Operations here never touch storage; `ItineraryStore` stages them on a
//! copy and commits the copy once it has been persisted.

use hashbrown::HashSet;
use serde::Serialize;

use crate::Error;
use crate::model::{Stop, synthesize_id};

/// Stops in travel order. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Itinerary {
    stops: Vec<Stop>,
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an itinerary from decoded records.
    ///
    /// Positions are validated; records without an id, or repeating an id
    /// already seen, receive a synthesized one.
    pub fn from_records(records: Vec<Stop>) -> Result<Self, Error> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut stops = Vec::with_capacity(records.len());

        for mut stop in records {
            stop.position.validate()?;
            stop.normalize();
            if stop.id.is_empty() || seen.contains(&stop.id) {
                let fresh = unique_id(|id| seen.contains(id));
                if !stop.id.is_empty() {
                    log::warn!("Duplicate stop id {:?} replaced with {fresh:?}", stop.id);
                }
                stop.id = fresh;
            }
            seen.insert(stop.id.clone());
            stops.push(stop);
        }

        Ok(Self { stops })
    }

    /// Parses the persisted JSON array form.
    ///
    /// Unlike imported records, saved state repeating an id is rejected.
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let records: Vec<Stop> = serde_json::from_str(raw)?;
        {
            let mut seen = HashSet::with_capacity(records.len());
            if let Some(repeated) = records
                .iter()
                .find(|stop| !stop.id.is_empty() && !seen.insert(stop.id.as_str()))
            {
                return Err(Error::InvalidData(format!(
                    "stop id {:?} appears more than once",
                    repeated.id
                )));
            }
        }
        Self::from_records(records)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.stops)?)
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Stop> {
        self.stops.iter().find(|stop| stop.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.stops.iter().position(|stop| stop.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    /// Enabled stops in travel order.
    pub fn enabled(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter().filter(|stop| stop.is_enabled())
    }

    /// Replaces the stop with the same id in place, or appends it.
    pub fn add_or_update(&mut self, mut stop: Stop) -> Result<(), Error> {
        stop.position.validate()?;
        stop.normalize();
        if stop.id.is_empty() {
            return Err(Error::InvalidData("stop id must not be empty".to_string()));
        }

        match self.index_of(&stop.id) {
            Some(idx) => self.stops[idx] = stop,
            None => self.stops.push(stop),
        }
        Ok(())
    }

    /// Id not used by any stop in the sequence.
    pub fn fresh_id(&self) -> String {
        let candidate = crate::model::generate_id();
        if self.contains(&candidate) {
            unique_id(|id| self.contains(id))
        } else {
            candidate
        }
    }

    /// Removes the stop with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.stops.len();
        self.stops.retain(|stop| stop.id != id);
        self.stops.len() != before
    }

    /// Moves the stop at `from` to `to`, with remove-then-insert semantics.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), Error> {
        let len = self.stops.len();
        for index in [from, to] {
            if index >= len {
                return Err(Error::IndexOutOfRange { index, len });
            }
        }
        if from != to {
            let moved = self.stops.remove(from);
            self.stops.insert(to, moved);
        }
        Ok(())
    }

    /// Flips the enabled state of `id` and moves it to the boundary of the
    /// active group.
    ///
    /// A disabled stop goes to the end of the sequence. A re-enabled stop
    /// goes right before the first disabled stop, i.e. to the tail of the
    /// enabled group. Returns the new enabled state, or `None` when `id` is
    /// unknown.
    pub fn toggle_enabled(&mut self, id: &str) -> Option<bool> {
        let idx = self.index_of(id)?;
        let mut stop = self.stops.remove(idx);
        stop.disabled = !stop.disabled;
        let enabled = stop.is_enabled();

        let target = if enabled {
            self.stops
                .iter()
                .position(|other| other.disabled)
                .unwrap_or(self.stops.len())
        } else {
            self.stops.len()
        };
        self.stops.insert(target, stop);
        Some(enabled)
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }
}

fn unique_id(taken: impl Fn(&String) -> bool) -> String {
    loop {
        let id = synthesize_id();
        if !taken(&id) {
            return id;
        }
    }
}
