use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use itinera_core::interchange::InterchangeFormat;
use itinera_core::model::{Stop, TravelMode};

#[derive(Parser, Debug)]
#[command(name = "itinera", version)]
#[command(about = "Plan a trip as an ordered list of stops", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, env = "ITINERA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Assume "yes" for every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a stop at a position
    Add {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[command(flatten)]
        fields: StopFields,
    },
    /// Change fields of an existing stop
    Edit {
        id: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
        #[command(flatten)]
        fields: StopFields,
    },
    /// Remove a stop
    Remove { id: String },
    /// Move the stop at position FROM to position TO (1-based)
    Move { from: usize, to: usize },
    /// Enable or disable a stop
    Toggle { id: String },
    /// Remove every stop
    Clear,
    /// Print the stop list
    List {
        /// Print the list layer as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the map layer
    Map {
        /// Print the map layer as a GeoJSON FeatureCollection
        #[arg(long)]
        geojson: bool,
        /// Center the viewport on this stop
        #[arg(long)]
        focus: Option<String>,
    },
    /// Write the itinerary to a file
    Export {
        /// Defaults to the configured export format
        #[arg(short, long)]
        format: Option<FormatArg>,
        /// Defaults to travel_planner_itinerary.<ext>; "-" writes to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the itinerary with the stops of a JSON, GeoJSON or KML file
    Import { path: PathBuf },
    /// Show or change the map theme
    Theme { theme: Option<ThemeArg> },
    /// Show current weather on the stop cards
    Weather,
    /// Look up a place by name
    Search {
        query: Option<String>,
        /// Read queries from stdin, searching after a quiet period
        #[arg(short, long, conflicts_with = "add")]
        interactive: bool,
        /// Add the best match as a new stop
        #[arg(long)]
        add: bool,
    },
}

/// Optional stop fields; an empty value clears the field.
#[derive(Args, Debug, Default, Clone)]
pub struct StopFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
    /// Manual travel time to this stop, e.g. "2h by train"
    #[arg(long)]
    pub travel_time: Option<String>,
    /// walking, biking, car, boat or plane
    #[arg(long)]
    pub mode: Option<String>,
    #[arg(long)]
    pub stay: Option<String>,
    #[arg(long)]
    pub morning: Option<String>,
    #[arg(long)]
    pub afternoon: Option<String>,
    #[arg(long)]
    pub all_day: Option<String>,
    #[arg(long)]
    pub kids: Option<String>,
    #[arg(long)]
    pub food: Option<String>,
    #[arg(long)]
    pub fun_fact: Option<String>,
}

impl StopFields {
    /// Writes the given fields into `stop`.
    pub fn apply(self, stop: &mut Stop) -> Result<()> {
        if let Some(mode) = self.mode {
            let mode = mode.trim().to_ascii_lowercase();
            stop.travel_mode = if mode.is_empty() {
                None
            } else {
                Some(TravelMode::parse(&mode).ok_or_else(|| {
                    anyhow!("Unknown travel mode {mode:?}, expected walking, biking, car, boat or plane")
                })?)
            };
        }

        let targets = [
            (self.name, &mut stop.name),
            (self.image_url, &mut stop.image_url),
            (self.travel_time, &mut stop.travel_time),
            (self.stay, &mut stop.place_to_stay),
            (self.morning, &mut stop.activities.morning),
            (self.afternoon, &mut stop.activities.afternoon),
            (self.all_day, &mut stop.activities.all_day),
            (self.kids, &mut stop.kids_activity),
            (self.food, &mut stop.food_options),
            (self.fun_fact, &mut stop.fun_fact),
        ];
        for (value, field) in targets {
            if let Some(value) = value {
                *field = value;
            }
        }
        Ok(())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Geojson,
    Kml,
}

impl From<FormatArg> for InterchangeFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => InterchangeFormat::Json,
            FormatArg::Geojson => InterchangeFormat::GeoJson,
            FormatArg::Kml => InterchangeFormat::Kml,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Dark,
    Light,
    Toggle,
}
