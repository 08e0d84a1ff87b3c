//! Error types and handling for the weather lookup flow

use thiserror::Error;

/// Main error type for `weatherform`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// The geocoding step found no place for the query
    #[error("Location not found: {query}")]
    LocationNotFound { query: String },

    /// Network, parsing, credential or status failures from the provider
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl WeatherError {
    /// Create a new location-not-found error
    pub fn location_not_found<S: Into<String>>(query: S) -> Self {
        Self::LocationNotFound {
            query: query.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Stable tag for machine-readable responses
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::LocationNotFound { .. } => "location_not_found",
            WeatherError::Provider { .. } => "provider_error",
            WeatherError::Config { .. } => "config_error",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::LocationNotFound { query } if query.is_empty() => {
                "Please enter a location.".to_string()
            }
            WeatherError::LocationNotFound { query } => {
                format!("We couldn't find a place called \"{query}\". Check the spelling and try again.")
            }
            WeatherError::Provider { .. } => {
                "The weather service is unavailable right now. Please try again later.".to_string()
            }
            WeatherError::Config { message } => {
                format!("Configuration error: {message}")
            }
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key
        let err = err.without_url();
        if err.is_timeout() {
            WeatherError::provider(format!("request timed out: {err}"))
        } else if err.is_decode() {
            WeatherError::provider(format!("malformed response: {err}"))
        } else {
            WeatherError::provider(format!("request failed: {err}"))
        }
    }
}
