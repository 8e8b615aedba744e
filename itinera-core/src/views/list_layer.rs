use serde::Serialize;

use crate::model::{Position, Stop, StopId};
use crate::weather::WeatherSlot;

/// Card background for stops without an image.
pub const DEFAULT_CARD_IMAGE: &str = "https://images.unsplash.com/photo-1476514525535-07fb3b4ae5f1?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListLayer {
    /// Stop count, e.g. "3 Stops"
    pub header: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub stop_id: StopId,
    /// Enabled-only sequence number, shared with the map markers
    pub number: Option<usize>,
    pub disabled: bool,
    pub title: String,
    pub image_url: String,
    pub position: Position,
    pub meta: Vec<CardRow>,
    pub details: Vec<CardRow>,
    pub fun_fact: Option<String>,
    pub weather: WeatherSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRow {
    pub icon: &'static str,
    pub text: String,
}

impl ListLayer {
    pub(super) fn build(stops: &[Stop], numbers: &[Option<usize>]) -> Self {
        let cards = stops
            .iter()
            .zip(numbers)
            .map(|(stop, number)| Card::new(stop, *number))
            .collect();

        Self {
            header: stop_count_label(stops.len()),
            cards,
        }
    }

    /// Whether the list shows its empty-state hint.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, stop_id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.stop_id == stop_id)
    }

    /// Updates the weather badge of one card in place.
    ///
    /// Returns `false` when no card shows `stop_id`.
    pub fn patch_weather(&mut self, stop_id: &str, weather: WeatherSlot) -> bool {
        match self.cards.iter_mut().find(|card| card.stop_id == stop_id) {
            Some(card) => {
                card.weather = weather;
                true
            }
            None => false,
        }
    }
}

impl Card {
    fn new(stop: &Stop, number: Option<usize>) -> Self {
        let activities = &stop.activities;

        let meta = rows([
            ("fa-solid fa-clock", stop.travel_time.clone()),
            ("fa-solid fa-bed", stop.place_to_stay.clone()),
        ]);

        let details = rows([
            ("fa-solid fa-calendar-day", activities.all_day.clone()),
            ("fa-solid fa-sun", activities.morning.clone()),
            ("fa-solid fa-cloud-sun", activities.afternoon.clone()),
            ("fa-solid fa-child-reaching", prefixed("Kids", &stop.kids_activity)),
            ("fa-solid fa-utensils", prefixed("Food", &stop.food_options)),
        ]);

        let image_url = if stop.image_url.is_empty() {
            DEFAULT_CARD_IMAGE.to_string()
        } else {
            stop.image_url.clone()
        };

        Self {
            stop_id: stop.id.clone(),
            number,
            disabled: stop.disabled,
            title: stop.name.clone(),
            image_url,
            position: stop.position,
            meta,
            details,
            fun_fact: (!stop.fun_fact.is_empty()).then(|| stop.fun_fact.clone()),
            weather: WeatherSlot::Pending,
        }
    }
}

fn rows<const N: usize>(candidates: [(&'static str, String); N]) -> Vec<CardRow> {
    candidates
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(icon, text)| CardRow { icon, text })
        .collect()
}

fn prefixed(label: &str, text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("{label}: {text}")
    }
}

fn stop_count_label(count: usize) -> String {
    if count == 1 {
        "1 Stop".to_string()
    } else {
        format!("{count} Stops")
    }
}
