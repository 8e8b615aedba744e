use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use itinera_core::interchange::InterchangeFormat;
use serde::Deserialize;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "itinera.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage: StorageConfig,
    pub log: LogConfig,
    pub weather: WeatherConfig,
    pub geocoding: GeocodingConfig,
    pub search: SearchConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one file per storage slot
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".itinera"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeocodingConfig {
    pub base_url: String,
    /// Nominatim rejects requests without an identifying agent
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("itinera/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

impl GeocodingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search is sent
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 1500 }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub format: InterchangeFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: InterchangeFormat::GeoJson,
        }
    }
}

impl Config {
    /// Reads the config file.
    ///
    /// An explicitly given path must exist. Without one, `itinera.toml` in
    /// the working directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage.dir, PathBuf::from(".itinera"));
        assert_eq!(config.search.debounce(), Duration::from_millis(1500));
        assert_eq!(config.export.format, InterchangeFormat::GeoJson);
        assert_eq!(config.weather.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [storage]
            dir = "/tmp/trips"

            [search]
            debounce_ms = 300

            [export]
            format = "kml"

            [geocoding]
            user_agent = "trip-planner-test"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.dir, PathBuf::from("/tmp/trips"));
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.export.format, InterchangeFormat::Kml);
        assert_eq!(config.geocoding.user_agent, "trip-planner-test");
        assert_eq!(
            config.geocoding.base_url,
            "https://nominatim.openstreetmap.org"
        );
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::parse("[storage]\npath = \"x\"").is_err());
        assert!(Config::parse("[export]\nformat = \"gpx\"").is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());

        let path = dir.path().join("itinera.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[log]\nfilter = \"debug\"").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log.filter, "debug");
    }
}
