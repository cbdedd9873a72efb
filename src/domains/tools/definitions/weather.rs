//! Weather tool definition.
//!
//! Looks up the current weather for a city. With a configured OpenWeatherMap
//! API key the reading comes from the live API; without one the tool serves
//! a synthetic reading derived from the location so it stays usable offline.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{error, info};

use super::common::error_result;
use crate::core::config::Config;
use crate::domains::tools::ToolError;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Conditions used for synthetic readings.
const CONDITIONS: [&str; 4] = ["clear", "cloudy", "rain", "snow"];

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the weather tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WeatherParams {
    /// The city to look up.
    #[schemars(description = "City name")]
    pub city: String,

    /// Optional country code to disambiguate the city.
    #[schemars(description = "Country code (e.g. JP, US, GB) - optional")]
    pub country: Option<String>,
}

impl WeatherParams {
    /// Human-readable location string: `city` or `city, country`.
    fn location(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.city, country),
            None => self.city.clone(),
        }
    }

    /// Query string for the upstream API: `city` or `city,country`.
    fn query(&self) -> String {
        match &self.country {
            Some(country) => format!("{},{}", self.city, country),
            None => self.city.clone(),
        }
    }
}

// ============================================================================
// Output Structure
// ============================================================================

/// A weather reading, live or synthetic.
#[derive(Debug, Serialize, JsonSchema)]
struct WeatherReading {
    location: String,
    /// Temperature in degrees Celsius.
    temperature: i64,
    condition: String,
    /// Relative humidity in percent.
    humidity: u64,
    /// RFC 3339 timestamp of the reading.
    timestamp: String,
    /// Where the reading came from: "openweathermap" or "synthetic".
    source: String,
}

impl WeatherReading {
    fn into_result(self) -> CallToolResult {
        let summary = format!(
            "Weather for {}:\nTemperature: {}°C\nCondition: {}\nHumidity: {}%\nRetrieved: {}",
            self.location, self.temperature, self.condition, self.humidity, self.timestamp
        );
        CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(serde_json::to_value(&self).unwrap()),
            is_error: Some(false),
            meta: None,
        }
    }
}

// Subset of the OpenWeatherMap response we care about.

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    main: OwmMain,
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: u64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Weather tool - current weather for a city.
pub struct WeatherTool;

impl WeatherTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "weather";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the current weather for a city. Accepts a city name and an optional country code to disambiguate.";

    /// Execute the tool logic.
    pub async fn execute(params: &WeatherParams, config: &Config) -> CallToolResult {
        info!("Weather tool called for '{}'", params.location());

        match &config.credentials.openweather_api_key {
            Some(api_key) => match Self::fetch_reading(params, api_key).await {
                Ok(reading) => reading.into_result(),
                Err(e) => error_result(&e.to_string()),
            },
            None => Self::synthetic_reading(params).into_result(),
        }
    }

    /// Fetch a live reading from OpenWeatherMap.
    async fn fetch_reading(
        params: &WeatherParams,
        api_key: &str,
    ) -> Result<WeatherReading, ToolError> {
        let client = reqwest::Client::new();
        let response = client
            .get(OPENWEATHER_URL)
            .query(&[
                ("q", params.query().as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Weather upstream request failed: {}", e);
                ToolError::upstream(format!("weather lookup failed: {}", e))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ToolError::not_found(format!(
                "city not found: {}",
                params.city
            )));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ToolError::upstream("invalid OpenWeatherMap API credential"));
        }
        if !status.is_success() {
            return Err(ToolError::upstream(format!(
                "weather lookup failed (status: {})",
                status.as_u16()
            )));
        }

        let data: OwmResponse = response.json().await.map_err(|e| {
            error!("Weather upstream returned malformed body: {}", e);
            ToolError::upstream(format!("weather lookup failed: {}", e))
        })?;

        let condition = data
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(WeatherReading {
            location: match &params.country {
                Some(country) => format!("{}, {}", data.name, country),
                None => data.name,
            },
            temperature: data.main.temp.round() as i64,
            condition,
            humidity: data.main.humidity,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: "openweathermap".to_string(),
        })
    }

    /// Deterministic synthetic reading derived from the location.
    ///
    /// Value ranges match the live reading: 5-34 °C, 0-99 % humidity.
    fn synthetic_reading(params: &WeatherParams) -> WeatherReading {
        let location = params.location();
        let mut hasher = DefaultHasher::new();
        location.hash(&mut hasher);
        let seed = hasher.finish();

        WeatherReading {
            temperature: 5 + (seed % 30) as i64,
            humidity: (seed / 31) % 100,
            condition: CONDITIONS[((seed / 7) % 4) as usize].to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: "synthetic".to_string(),
            location,
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let city = arguments
            .get("city")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'city' parameter".to_string())?
            .to_string();

        let country = arguments
            .get("country")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let params = WeatherParams { city, country };
        let result = Self::execute(&params, &config).await;

        serde_json::to_value(&result).map_err(|e| e.to_string())
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<WeatherParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move {
                let params: WeatherParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    fn keyless_config() -> Config {
        let mut config = Config::default();
        config.credentials.openweather_api_key = None;
        config
    }

    #[test]
    fn test_location_with_and_without_country() {
        let params = WeatherParams {
            city: "Tokyo".to_string(),
            country: Some("JP".to_string()),
        };
        assert_eq!(params.location(), "Tokyo, JP");
        assert_eq!(params.query(), "Tokyo,JP");

        let params = WeatherParams {
            city: "Tokyo".to_string(),
            country: None,
        };
        assert_eq!(params.location(), "Tokyo");
        assert_eq!(params.query(), "Tokyo");
    }

    #[test]
    fn test_synthetic_reading_is_deterministic() {
        let params = WeatherParams {
            city: "London".to_string(),
            country: None,
        };
        let a = WeatherTool::synthetic_reading(&params);
        let b = WeatherTool::synthetic_reading(&params);
        assert_eq!(a.temperature, b.temperature);
        assert_eq!(a.condition, b.condition);
        assert_eq!(a.humidity, b.humidity);
    }

    #[test]
    fn test_synthetic_reading_ranges() {
        for city in ["Tokyo", "London", "Paris", "Oslo", "Cairo"] {
            let params = WeatherParams {
                city: city.to_string(),
                country: None,
            };
            let reading = WeatherTool::synthetic_reading(&params);
            assert!((5..35).contains(&reading.temperature));
            assert!(reading.humidity < 100);
            assert!(CONDITIONS.contains(&reading.condition.as_str()));
        }
    }

    #[tokio::test]
    async fn test_execute_without_key_serves_synthetic() {
        let params = WeatherParams {
            city: "Tokyo".to_string(),
            country: Some("JP".to_string()),
        };
        let result = WeatherTool::execute(&params, &keyless_config()).await;
        assert!(!result.is_error.unwrap_or(false));
        assert!(text_of(&result).contains("Weather for Tokyo, JP"));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["source"], "synthetic");
    }

    #[test]
    fn test_params_deserialize_country_optional() {
        let json = r#"{"city": "Tokyo"}"#;
        let params: WeatherParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.city, "Tokyo");
        assert!(params.country.is_none());
    }
}
