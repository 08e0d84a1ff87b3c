//! Location Resolution Module
//!
//! The geocoding step: turns a validated free-text query into a structured
//! [`Location`]. Implementations make a single attempt; failures propagate
//! to the caller unchanged.

use async_trait::async_trait;

use crate::Result;
use crate::models::{Location, LocationQuery};

/// Resolves a place name to coordinates
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Resolve `query` to the provider's best match.
    ///
    /// Returns [`crate::WeatherError::LocationNotFound`] when the provider has
    /// no match and [`crate::WeatherError::Provider`] for transport, status or
    /// payload failures.
    async fn resolve(&self, query: &LocationQuery) -> Result<Location>;
}
