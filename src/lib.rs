//! `weatherform` - current weather for a location typed into a web form
//!
//! A lookup resolves free-text input to coordinates, then fetches current
//! conditions for them. Both steps sit behind traits so the flow can run
//! against OpenWeatherMap or against substitutes.

pub mod api;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod pages;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::AppConfig;
pub use error::WeatherError;
pub use location_resolver::LocationResolver;
pub use models::{Location, LocationQuery, Units, WeatherRecord};
pub use weather::open_weather::OpenWeatherClient;
pub use weather::{ConditionsProvider, WeatherLookup};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;

/// Build the lookup flow backed by a single OpenWeatherMap client
pub fn open_weather_lookup(config: &config::ProviderConfig) -> Result<WeatherLookup> {
    let client = std::sync::Arc::new(OpenWeatherClient::new(config)?);
    Ok(WeatherLookup::new(client.clone(), client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_open_weather_lookup_builds_without_key() {
        let config = config::ProviderConfig::default();
        assert!(open_weather_lookup(&config).is_ok());
    }
}
