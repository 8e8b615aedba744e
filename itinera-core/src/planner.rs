//! Command dispatch over the store and derived views.
//!
//! A [`Planner`] owns everything a front end needs: the persisted itinerary,
//! the theme and the current [`Views`]. Every accepted command mutates the
//! store and then rebuilds both views from scratch, bumping the view
//! revision.

use crate::Error;
use crate::interchange::{self, ExportFile, InterchangeFormat};
use crate::model::{Position, Stop, StopId, Theme};
use crate::store::{Itinerary, ItineraryStore, KeyValueStore};
use crate::views::{Viewport, Views};
use crate::weather::WeatherSlot;

/// The closed set of state changes a front end can request.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a draft under a freshly generated id.
    Add(Stop),
    /// Replace the stop with the same id, or append it.
    Update(Stop),
    Remove(StopId),
    Reorder { from: usize, to: usize },
    ToggleEnabled(StopId),
    ReplaceAll(Itinerary),
    Clear,
    SetTheme(Theme),
    ToggleTheme,
}

impl Command {
    fn is_destructive(&self) -> bool {
        matches!(
            self,
            Command::Remove(_) | Command::ReplaceAll(_) | Command::Clear
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(StopId),
    Applied,
    Toggled { enabled: bool },
    /// Valid command that left the state as it was, e.g. an unknown id.
    Unchanged,
    /// The user declined a destructive command.
    Declined,
}

/// Asks the user to confirm a destructive command.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug)]
pub struct Planner<S> {
    store: ItineraryStore<S>,
    views: Views,
    revision: u64,
}

impl<S: KeyValueStore> Planner<S> {
    pub fn new(store: ItineraryStore<S>) -> Self {
        let views = Views::build(store.stops(), store.theme());
        Self {
            store,
            views,
            revision: 0,
        }
    }

    /// Loads saved state from `kv` and builds the initial views.
    pub fn load(kv: S) -> Self {
        Self::new(ItineraryStore::load(kv))
    }

    pub fn store(&self) -> &ItineraryStore<S> {
        &self.store
    }

    pub fn stops(&self) -> &[Stop] {
        self.store.stops()
    }

    pub fn theme(&self) -> Theme {
        self.store.theme()
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    /// Incremented on every view rebuild.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn apply(&mut self, command: Command, confirm: &mut dyn Confirm) -> Result<Outcome, Error> {
        if command.is_destructive() {
            match self.confirmation_prompt(&command) {
                Some(prompt) if !confirm.confirm(&prompt) => {
                    log::info!("Declined: {prompt}");
                    return Ok(Outcome::Declined);
                }
                Some(_) => {}
                None => return Ok(Outcome::Unchanged),
            }
        }

        let outcome = match command {
            Command::Add(draft) => Outcome::Added(self.store.add(draft)?),
            Command::Update(stop) => {
                self.store.add_or_update(stop)?;
                Outcome::Applied
            }
            Command::Remove(id) => {
                if self.store.remove(&id)? {
                    Outcome::Applied
                } else {
                    Outcome::Unchanged
                }
            }
            Command::Reorder { from, to } => {
                self.store.reorder(from, to)?;
                if from == to {
                    Outcome::Unchanged
                } else {
                    Outcome::Applied
                }
            }
            Command::ToggleEnabled(id) => match self.store.toggle_enabled(&id)? {
                Some(enabled) => Outcome::Toggled { enabled },
                None => Outcome::Unchanged,
            },
            Command::ReplaceAll(itinerary) => {
                self.store.replace_all(itinerary)?;
                Outcome::Applied
            }
            Command::Clear => {
                self.store.clear()?;
                Outcome::Applied
            }
            Command::SetTheme(theme) => {
                self.store.set_theme(theme)?;
                Outcome::Applied
            }
            Command::ToggleTheme => {
                self.store.set_theme(self.store.theme().toggled())?;
                Outcome::Applied
            }
        };

        self.rebuild();
        Ok(outcome)
    }

    /// Decodes `text` and, once confirmed, replaces the itinerary with it.
    ///
    /// A file that fails to decode is reported before anything is asked and
    /// leaves the state untouched.
    pub fn import(&mut self, text: &str, confirm: &mut dyn Confirm) -> Result<Outcome, Error> {
        let decoded = interchange::decode(text)?;
        log::info!(
            "Decoded {} stops from {} import",
            decoded.itinerary.len(),
            decoded.format
        );
        self.apply(Command::ReplaceAll(decoded.itinerary), confirm)
    }

    pub fn export(&self, format: InterchangeFormat) -> Result<ExportFile, Error> {
        interchange::encode(self.stops(), format)
    }

    /// Draft stop for a map click, to be completed and then added.
    pub fn draft_at(&self, position: Position) -> Result<Stop, Error> {
        position.validate()?;
        Ok(Stop::new(position))
    }

    /// Viewport centered on `id`, if it exists.
    pub fn focus(&self, id: &str) -> Option<Viewport> {
        self.store.itinerary().get(id).map(Viewport::focus)
    }

    /// Applies a weather lookup result to the card of `id`.
    ///
    /// Results computed against an older revision are dropped, as the card
    /// they belong to has been rebuilt since. Returns whether a card changed.
    pub fn patch_weather(&mut self, revision: u64, id: &str, slot: WeatherSlot) -> bool {
        if revision != self.revision {
            log::debug!(
                "Ignoring weather for {id} from revision {revision} (current {})",
                self.revision
            );
            return false;
        }
        self.views.list.patch_weather(id, slot)
    }

    fn confirmation_prompt(&self, command: &Command) -> Option<String> {
        let count = self.store.itinerary().len();
        match command {
            Command::Remove(id) => self
                .store
                .itinerary()
                .get(id)
                .map(|stop| format!("Remove {}?", stop.name)),
            Command::Clear if count == 0 => None,
            Command::Clear => Some(format!("Remove all {count} stops?")),
            Command::ReplaceAll(replacement) => Some(format!(
                "Replace the current {count} stops with {} imported stops?",
                replacement.len()
            )),
            _ => None,
        }
    }

    fn rebuild(&mut self) {
        self.views = Views::build(self.store.stops(), self.store.theme());
        self.revision += 1;
    }
}
