//! Data models for `weatherform`
//!
//! - Location: resolved coordinates and the free-text query behind them
//! - Weather: the record produced by a successful lookup

pub mod location;
pub mod weather;

pub use location::{Location, LocationQuery};
pub use weather::{Units, WeatherRecord};
