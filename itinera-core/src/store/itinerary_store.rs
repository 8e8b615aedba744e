use super::itinerary::Itinerary;
use super::persistence::KeyValueStore;
use crate::model::{Stop, StopId, Theme};
use crate::{Error, LOCATIONS_KEY, THEME_KEY};

/// Owns the itinerary and keeps it in sync with its key-value slots.
///
/// Every mutation is applied to a copy, persisted, and only then swapped in,
/// so readers never see a half-applied change and a failed write leaves the
/// previous state in place.
#[derive(Debug)]
pub struct ItineraryStore<S> {
    itinerary: Itinerary,
    theme: Theme,
    kv: S,
}

impl<S: KeyValueStore> ItineraryStore<S> {
    /// Loads the saved itinerary and theme.
    ///
    /// Missing or unreadable slots fall back to an empty itinerary and the
    /// dark theme; they are logged, never fatal.
    pub fn load(kv: S) -> Self {
        let itinerary = match kv.get(LOCATIONS_KEY) {
            Ok(Some(raw)) => Itinerary::from_json(&raw).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable saved itinerary: {e}");
                Itinerary::new()
            }),
            Ok(None) => Itinerary::new(),
            Err(e) => {
                log::warn!("Could not read saved itinerary: {e}");
                Itinerary::new()
            }
        };

        let theme = match kv.get(THEME_KEY) {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
                log::warn!("Unknown saved theme {raw:?}, using default");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                log::warn!("Could not read saved theme: {e}");
                Theme::default()
            }
        };

        log::info!(
            "Loaded itinerary with {} stops ({} theme)",
            itinerary.len(),
            theme
        );
        Self {
            itinerary,
            theme,
            kv,
        }
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    pub fn stops(&self) -> &[Stop] {
        self.itinerary.stops()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn backend(&self) -> &S {
        &self.kv
    }

    /// Appends `stop` under a freshly generated id and returns the id.
    pub fn add(&mut self, mut stop: Stop) -> Result<StopId, Error> {
        stop.id = self.itinerary.fresh_id();
        let id = stop.id.clone();
        self.mutate(|it| it.add_or_update(stop))?;
        Ok(id)
    }

    pub fn add_or_update(&mut self, stop: Stop) -> Result<(), Error> {
        self.mutate(|it| it.add_or_update(stop))
    }

    /// Returns whether a stop was removed.
    pub fn remove(&mut self, id: &str) -> Result<bool, Error> {
        self.mutate(|it| Ok(it.remove(id)))
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), Error> {
        self.mutate(|it| it.reorder(from, to))
    }

    /// Returns the new enabled state, `None` for an unknown id.
    pub fn toggle_enabled(&mut self, id: &str) -> Result<Option<bool>, Error> {
        self.mutate(|it| Ok(it.toggle_enabled(id)))
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        self.mutate(|it| {
            it.clear();
            Ok(())
        })
    }

    /// Wholesale substitution, used by import.
    pub fn replace_all(&mut self, replacement: Itinerary) -> Result<(), Error> {
        self.mutate(|it| {
            *it = replacement;
            Ok(())
        })
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), Error> {
        self.kv.set(THEME_KEY, theme.as_str())?;
        self.theme = theme;
        Ok(())
    }

    fn mutate<T>(
        &mut self,
        apply: impl FnOnce(&mut Itinerary) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut staged = self.itinerary.clone();
        let result = apply(&mut staged)?;
        self.kv.set(LOCATIONS_KEY, &staged.to_json()?)?;
        self.itinerary = staged;
        Ok(result)
    }
}
