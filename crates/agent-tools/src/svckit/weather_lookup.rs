//! Weather Lookup Tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use agent_core::{Result, Tool, ToolInvocation, ToolResult, ToolSpec};

use crate::kind::ToolKind;
use crate::weather::WeatherSource;

/// Tool for current weather in a city
pub struct WeatherLookupTool {
    source: Arc<dyn WeatherSource>,
}

impl WeatherLookupTool {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for WeatherLookupTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            ToolKind::GetWeather.name(),
            "Get the current weather in a city. Returns temperature in Celsius and conditions.",
        )
        .param("city", "string", "City name, e.g. 'Moscow' or 'Paris'", true)
    }

    async fn execute(&self, call: &ToolInvocation) -> Result<ToolResult> {
        let name = ToolKind::GetWeather.name();
        let city = call.str_arg("city").unwrap_or_default().trim();
        if city.is_empty() {
            return Ok(ToolResult::failure(name, "City must not be empty"));
        }

        let report = self.source.current(city).await?;
        tracing::debug!(city, source = %report.source, "Weather looked up");

        Ok(ToolResult::success(
            name,
            json!({
                "city": report.city,
                "temperature": report.temperature(),
                "temperature_c": report.temperature_c,
                "condition": report.condition,
                "summary": report.summary(),
            }),
        ))
    }
}
