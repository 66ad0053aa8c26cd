//! Weather Sources
//!
//! Abstraction over where conditions come from. The built-in source is a
//! fixed table; a live service implements the same trait.

mod table;

pub use table::StaticWeather;

use async_trait::async_trait;

use agent_core::Result;

use crate::model::WeatherReport;

/// Weather source trait (Strategy pattern)
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions for a city
    async fn current(&self, city: &str) -> Result<WeatherReport>;

    /// Source name
    fn name(&self) -> &str;
}
