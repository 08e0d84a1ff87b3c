//! Location model for geographic coordinates and the free-text query that resolves to them

use serde::{Deserialize, Serialize};

use crate::WeatherError;

/// Resolved place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Location name (city, region, etc.)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: Option<String>,
    /// State or province, when the provider reports one
    pub state: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
            country: None,
            state: None,
        }
    }

    /// Create location with country
    #[must_use]
    pub fn with_country(latitude: f64, longitude: f64, name: String, country: String) -> Self {
        Self {
            country: Some(country),
            ..Self::new(latitude, longitude, name)
        }
    }

    /// Name, state and country joined for display, e.g. "Portland, Oregon, US"
    #[must_use]
    pub fn display_name(&self) -> String {
        [Some(&self.name), self.state.as_ref(), self.country.as_ref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Validated free-text location as typed into the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Parse a single free-text location. Blank input is rejected as not found.
    pub fn parse(input: &str) -> Result<Self, WeatherError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::location_not_found(""));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build a query from separate city and country fields.
    ///
    /// The provider accepts `city,country` in a single query string.
    pub fn from_parts(city: &str, country: Option<&str>) -> Result<Self, WeatherError> {
        let city = Self::parse(city)?;
        match country.map(str::trim).filter(|c| !c.is_empty()) {
            Some(country) => Ok(Self(format!("{},{}", city.0, country))),
            None => Ok(city),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
