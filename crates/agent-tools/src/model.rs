//! Domain Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions for one city
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// City as requested
    pub city: String,

    /// Air temperature in degrees Celsius
    pub temperature_c: i32,

    /// Short description (e.g., "Sunny", "Rain")
    pub condition: String,

    /// Name of the source that produced the report
    pub source: String,

    pub observed_at: DateTime<Utc>,
}

impl WeatherReport {
    pub fn new(
        city: impl Into<String>,
        temperature_c: i32,
        condition: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            temperature_c,
            condition: condition.into(),
            source: source.into(),
            observed_at: Utc::now(),
        }
    }

    /// Signed temperature, e.g. `+15°C` or `-2°C`
    pub fn temperature(&self) -> String {
        format!("{:+}°C", self.temperature_c)
    }

    /// One-line summary, e.g. `Sunny, +15°C`
    pub fn summary(&self) -> String {
        format!("{}, {}", self.condition, self.temperature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_signed() {
        assert_eq!(WeatherReport::new("Moscow", 15, "Sunny", "t").summary(), "Sunny, +15°C");
        assert_eq!(WeatherReport::new("New York", -2, "Snow", "t").temperature(), "-2°C");
        assert_eq!(WeatherReport::new("X", 0, "Fog", "t").temperature(), "+0°C");
    }
}
