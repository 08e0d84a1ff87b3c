//! Weather record model and display methods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit system requested from the provider
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius
    #[default]
    Metric,
    /// Fahrenheit
    Imperial,
    /// Kelvin
    Standard,
}

impl Units {
    /// Value of the provider's `units` query parameter
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    #[must_use]
    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => " K",
        }
    }
}

/// Current conditions for one resolved location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherRecord {
    /// Resolved place name
    pub location: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Temperature in the unit system given by `units`
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Condition group, e.g. "Clouds" or "Rain"
    pub condition: String,
    /// Weather condition icon ID from the provider
    pub icon: String,
    /// Time of the observation
    pub observed_at: DateTime<Utc>,
    pub units: Units,
}

impl WeatherRecord {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}{}", self.temperature, self.units.temperature_suffix())
    }

    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{:.0}%", self.humidity)
    }

    /// Format weather description with the first letter capitalized
    #[must_use]
    pub fn format_description(&self) -> String {
        let mut chars = self.description.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// URL of the provider's icon image for this record
    #[must_use]
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}
