//! # Configuration Management
//!
//! Loads runtime settings from an eclipse-config.toml file: observer
//! location, preview display size, and the eclipse-day search parameters.
//! Any missing or invalid file falls back to the built-in defaults
//! (Corvallis, OR, on the 2017-08-21 path of totality).

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::GeoCoordinate;

/// Application configuration loaded from eclipse-config.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Observer location
    pub location: LocationConfig,
    /// Preview display size
    pub display: DisplayConfig,
    /// Eclipse search and playback parameters
    pub simulation: SimulationConfig,
}

/// Observer location configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct LocationConfig {
    /// Latitude in degrees, north positive
    pub lat: f64,
    /// Longitude in degrees, east positive
    pub lng: f64,
    /// Human-readable place name for reference
    pub name: String,
}

/// ASCII preview dimensions, in character cells
#[derive(Debug, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

/// Eclipse search parameters
#[derive(Debug, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Eclipse day, `YYYY-MM-DD`
    pub eclipse_date: String,
    /// UTC hour to begin the eclipse search from. Must be early enough
    /// that the sun and moon are still approaching for the observer.
    pub search_start_hour_utc: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location: LocationConfig {
                lat: 44.567_353,
                lng: -123.278_622,
                name: "Corvallis, OR".to_string(),
            },
            display: DisplayConfig {
                width: 100,
                height: 34,
            },
            simulation: SimulationConfig {
                eclipse_date: "2017-08-21".to_string(),
                // 16:00 UTC precedes first contact everywhere in the
                // continental US
                search_start_hour_utc: 16,
            },
        }
    }
}

impl Config {
    /// Load configuration from eclipse-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("eclipse-config.toml")
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("loaded configuration for {}", config.location.name);
                    config
                }
                Err(e) => {
                    warn!("invalid config file format: {}", e);
                    warn!("using default configuration (Corvallis, OR)");
                    Self::default()
                }
            },
            Err(_) => {
                info!("no config file found, using default configuration (Corvallis, OR)");
                Self::default()
            }
        }
    }

    /// Save current configuration to eclipse-config.toml
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write("eclipse-config.toml", contents)?;
        info!("configuration saved to eclipse-config.toml");
        Ok(())
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        GeoCoordinate {
            lat: self.location.lat,
            lng: self.location.lng,
        }
    }

    /// Instant to begin the eclipse search from, or `None` if the
    /// configured date or hour doesn't parse.
    pub fn search_seed(&self) -> Option<DateTime<Utc>> {
        let date = NaiveDate::parse_from_str(&self.simulation.eclipse_date, "%Y-%m-%d").ok()?;
        let time = date.and_hms_opt(self.simulation.search_start_hour_utc, 0, 0)?;
        Some(Utc.from_utc_datetime(&time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.location.name, "Corvallis, OR");
        assert!((config.location.lat - 44.567_353).abs() < 1e-9);
        assert!((config.location.lng + 123.278_622).abs() < 1e-9);
        assert_eq!(config.simulation.eclipse_date, "2017-08-21");
        assert_eq!(config.simulation.search_start_hour_utc, 16);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.location.name, parsed.location.name);
        assert_eq!(config.display.width, parsed.display.width);
        assert_eq!(config.simulation.eclipse_date, parsed.simulation.eclipse_date);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config.location.name, "Corvallis, OR");
    }

    #[test]
    fn test_search_seed() {
        let config = Config::default();
        let seed = config.search_seed().unwrap();
        assert_eq!(seed.hour(), 16);
        assert_eq!(
            seed.date_naive(),
            NaiveDate::from_ymd_opt(2017, 8, 21).unwrap()
        );
    }

    #[test]
    fn test_search_seed_rejects_garbage_date() {
        let mut config = Config::default();
        config.simulation.eclipse_date = "soon".to_string();
        assert!(config.search_seed().is_none());
        config.simulation.eclipse_date = "2017-08-21".to_string();
        config.simulation.search_start_hour_utc = 99;
        assert!(config.search_seed().is_none());
    }
}
