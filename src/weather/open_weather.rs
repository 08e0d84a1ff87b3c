//! OpenWeatherMap client
//!
//! Implements both lookup steps against the OpenWeatherMap HTTP API: direct
//! geocoding (`/geo/1.0/direct`) and current weather (`/data/2.5/weather`).
//! Every call is a single attempt; the only timeout is the one configured on
//! the underlying HTTP client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::ConditionsProvider;
use crate::config::ProviderConfig;
use crate::location_resolver::LocationResolver;
use crate::models::{Location, LocationQuery, Units, WeatherRecord};
use crate::{Result, WeatherError};

const USER_AGENT: &str = concat!("weatherform/", env!("CARGO_PKG_VERSION"));

/// HTTP client for OpenWeatherMap
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    units: Units,
}

impl OpenWeatherClient {
    /// Create a new client from explicit provider settings
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherError::provider(format!("Failed to create HTTP client: {e}")))?;

        if config.api_key.is_none() {
            warn!("No OpenWeatherMap API key configured; lookups will fail");
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            units: config.units,
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| WeatherError::provider("No OpenWeatherMap API key configured"))
    }

    /// Send a GET request and return the response if the status is a success.
    ///
    /// Non-success statuses are returned as `Err(status)` in the inner result
    /// so each step can decide what a 404 means.
    #[instrument(skip(self, url), fields(url = %redact(url)))]
    async fn get(&self, url: &str) -> Result<std::result::Result<Response, StatusCode>> {
        let start = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            warn!("Network error after {:.3}s: {}", start.elapsed().as_secs_f64(), e);
            WeatherError::from(e)
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start.elapsed().as_secs_f64()
        );

        if status.is_success() {
            Ok(Ok(response))
        } else {
            Ok(Err(status))
        }
    }

    async fn parse_body<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to parse {} response: {}", what, e);
            WeatherError::provider(format!("Malformed {what} response: {e}"))
        })
    }
}

#[async_trait]
impl LocationResolver for OpenWeatherClient {
    #[instrument(skip(self, query), fields(location = %query))]
    async fn resolve(&self, query: &LocationQuery) -> Result<Location> {
        let api_key = self.api_key()?;
        info!("Geocoding location: '{}'", query);

        let url = format!(
            "{}/geo/1.0/direct?q={}&limit=1&appid={}",
            self.base_url,
            urlencoding::encode(query.as_str()),
            urlencoding::encode(api_key)
        );

        let response = match self.get(&url).await? {
            Ok(response) => response,
            Err(StatusCode::NOT_FOUND) => {
                warn!("Location not found (HTTP 404)");
                return Err(WeatherError::location_not_found(query.as_str()));
            }
            Err(status) => return Err(status_error(status)),
        };

        let results: Vec<GeocodingResult> = Self::parse_body(response, "geocoding").await?;

        match results.into_iter().next() {
            Some(result) => {
                let location = Location::from(result);
                debug!(
                    "Found location: {} ({})",
                    location.display_name(),
                    location.format_coordinates()
                );
                Ok(location)
            }
            None => {
                warn!("No results found for location '{}'", query);
                Err(WeatherError::location_not_found(query.as_str()))
            }
        }
    }
}

#[async_trait]
impl ConditionsProvider for OpenWeatherClient {
    #[instrument(skip(self, location), fields(lat = location.latitude, lon = location.longitude))]
    async fn fetch_conditions(&self, location: &Location) -> Result<WeatherRecord> {
        let api_key = self.api_key()?;
        info!(
            "Getting current weather for coordinates: {}",
            location.format_coordinates()
        );

        let url = format!(
            "{}/data/2.5/weather?lat={}&lon={}&units={}&appid={}",
            self.base_url,
            location.latitude,
            location.longitude,
            self.units.as_param(),
            urlencoding::encode(api_key)
        );

        let response = self.get(&url).await?.map_err(status_error)?;
        let current: CurrentWeatherResponse = Self::parse_body(response, "weather").await?;

        current.into_record(location, self.units)
    }
}

fn status_error(status: StatusCode) -> WeatherError {
    match status {
        StatusCode::UNAUTHORIZED => {
            error!("API authentication failed (HTTP 401)");
            WeatherError::provider("OpenWeatherMap rejected the API key (HTTP 401)")
        }
        StatusCode::TOO_MANY_REQUESTS => {
            warn!("Server rate limit exceeded (HTTP 429)");
            WeatherError::provider("OpenWeatherMap rate limit exceeded (HTTP 429)")
        }
        status => {
            warn!("HTTP error: {}", status);
            WeatherError::provider(format!(
                "API request failed with status: {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            ))
        }
    }
}

/// Strip the credential from a request URL before it is logged
fn redact(url: &str) -> &str {
    url.split("&appid=").next().unwrap_or(url)
}

/// Entry of the direct geocoding response array
#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(geocoding: GeocodingResult) -> Self {
        Location {
            latitude: geocoding.lat,
            longitude: geocoding.lon,
            name: geocoding.name,
            country: geocoding.country,
            state: geocoding.state,
        }
    }
}

/// The subset of `/data/2.5/weather` the record needs. All fields are required.
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    dt: i64,
    weather: Vec<ConditionEntry>,
    main: MainReadings,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

impl CurrentWeatherResponse {
    fn into_record(self, location: &Location, units: Units) -> Result<WeatherRecord> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::provider("Weather response has no conditions"))?;

        let observed_at = DateTime::from_timestamp(self.dt, 0).ok_or_else(|| {
            WeatherError::provider(format!("Weather response has invalid timestamp {}", self.dt))
        })?;

        Ok(WeatherRecord {
            location: location.display_name(),
            latitude: location.latitude,
            longitude: location.longitude,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            description: condition.description,
            condition: condition.main,
            icon: condition.icon,
            observed_at,
            units,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toronto() -> Location {
        Location {
            latitude: 43.6534817,
            longitude: -79.3839347,
            name: "Toronto".to_string(),
            country: Some("CA".to_string()),
            state: Some("Ontario".to_string()),
        }
    }

    #[test]
    fn test_redact_strips_api_key() {
        let url = "https://api.openweathermap.org/geo/1.0/direct?q=Toronto&limit=1&appid=secret";
        assert_eq!(
            redact(url),
            "https://api.openweathermap.org/geo/1.0/direct?q=Toronto&limit=1"
        );
        assert_eq!(redact("http://localhost/healthz"), "http://localhost/healthz");
    }

    #[test]
    fn test_geocoding_result_to_location() {
        let results: Vec<GeocodingResult> = serde_json::from_str(
            r#"[{"name":"Toronto","local_names":{"en":"Toronto"},"lat":43.6534817,"lon":-79.3839347,"country":"CA","state":"Ontario"}]"#,
        )
        .unwrap();

        let location: Location = results.into_iter().next().unwrap().into();
        assert_eq!(location, toronto());
        assert_eq!(location.display_name(), "Toronto, Ontario, CA");
    }

    #[test]
    fn test_current_weather_into_record() {
        let response: CurrentWeatherResponse = serde_json::from_str(
            r#"{
                "coord": {"lon": -79.3839, "lat": 43.6535},
                "weather": [{"id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04d"}],
                "main": {"temp": 12.4, "feels_like": 11.6, "pressure": 1016, "humidity": 71},
                "dt": 1700000000,
                "name": "Toronto"
            }"#,
        )
        .unwrap();

        let record = response.into_record(&toronto(), Units::Metric).unwrap();
        assert_eq!(record.location, "Toronto, Ontario, CA");
        assert_eq!(record.latitude, 43.6534817);
        assert_eq!(record.longitude, -79.3839347);
        assert_eq!(record.temperature, 12.4);
        assert_eq!(record.humidity, 71.0);
        assert_eq!(record.condition, "Clouds");
        assert_eq!(record.description, "overcast clouds");
        assert_eq!(record.icon, "04d");
        assert_eq!(record.observed_at.timestamp(), 1_700_000_000);
        assert_eq!(record.units, Units::Metric);
    }

    #[test]
    fn test_empty_conditions_is_provider_error() {
        let response: CurrentWeatherResponse = serde_json::from_str(
            r#"{"weather": [], "main": {"temp": 1.0, "humidity": 50}, "dt": 1700000000}"#,
        )
        .unwrap();

        let err = response.into_record(&toronto(), Units::Metric).unwrap_err();
        assert!(matches!(err, WeatherError::Provider { .. }));
    }

    #[test]
    fn test_missing_readings_fail_to_parse() {
        let result = serde_json::from_str::<CurrentWeatherResponse>(
            r#"{"weather": [{"main": "Clear", "description": "clear sky", "icon": "01d"}], "dt": 1700000000}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_status_error_mapping() {
        let err = status_error(StatusCode::UNAUTHORIZED);
        assert!(err.to_string().contains("401"));

        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(err, WeatherError::Provider { .. }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let config = ProviderConfig {
            // Nothing listens here; reaching the network would be a different error
            base_url: "http://127.0.0.1:9".to_string(),
            ..ProviderConfig::default()
        };
        let client = OpenWeatherClient::new(&config).unwrap();
        let query = LocationQuery::parse("Toronto").unwrap();

        let err = client.resolve(&query).await.unwrap_err();
        assert_eq!(
            err,
            WeatherError::provider("No OpenWeatherMap API key configured")
        );

        let err = client.fetch_conditions(&toronto()).await.unwrap_err();
        assert_eq!(
            err,
            WeatherError::provider("No OpenWeatherMap API key configured")
        );
    }
}
