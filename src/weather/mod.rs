//! Current-conditions step and the lookup flow that composes it with geocoding

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::location_resolver::LocationResolver;
use crate::models::{Location, LocationQuery, WeatherRecord};

pub mod open_weather;

/// Fetches current conditions for resolved coordinates
#[async_trait]
pub trait ConditionsProvider: Send + Sync {
    /// Returns a fully populated record, or [`crate::WeatherError::Provider`].
    async fn fetch_conditions(&self, location: &Location) -> Result<WeatherRecord>;
}

/// Geocoding followed by a conditions fetch.
///
/// Holds no state of its own, so independent lookups never influence each other.
#[derive(Clone)]
pub struct WeatherLookup {
    resolver: Arc<dyn LocationResolver>,
    conditions: Arc<dyn ConditionsProvider>,
}

impl WeatherLookup {
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        conditions: Arc<dyn ConditionsProvider>,
    ) -> Self {
        Self {
            resolver,
            conditions,
        }
    }

    /// Look up current weather for free-text `location`
    pub async fn lookup(&self, location: &str) -> Result<WeatherRecord> {
        let query = LocationQuery::parse(location)?;
        self.lookup_query(&query).await
    }

    /// Look up current weather for an already validated query
    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn lookup_query(&self, query: &LocationQuery) -> Result<WeatherRecord> {
        let location = self.resolver.resolve(query).await.inspect_err(|e| {
            warn!("Geocoding failed for '{}': {}", query, e);
        })?;

        debug!(
            "Resolved '{}' to {} ({})",
            query,
            location.display_name(),
            location.format_coordinates()
        );

        let record = self
            .conditions
            .fetch_conditions(&location)
            .await
            .inspect_err(|e| {
                warn!("Conditions fetch failed for {}: {}", location.display_name(), e);
            })?;

        info!(
            "Weather for {}: {}, {}",
            record.location,
            record.description,
            record.format_temperature()
        );

        Ok(record)
    }
}
