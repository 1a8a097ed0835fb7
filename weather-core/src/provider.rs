use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{
    error::Result,
    model::{CurrentConditions, ForecastSeries, Location},
};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// The three upstream endpoints a run talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Geocoding,
    Current,
    Forecast,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Geocoding => "Geocoding",
            EndpointKind::Current => "Weather",
            EndpointKind::Forecast => "Forecast",
        }
    }
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an upstream payload signals success.
///
/// The current-weather endpoint reports `cod` as the number `200`, the forecast
/// endpoint as the string `"200"`. Each endpoint only accepts its own form.
/// The geocoder has no status field: a non-empty list is success.
pub fn is_success(payload: &Value, endpoint: EndpointKind) -> bool {
    match endpoint {
        EndpointKind::Geocoding => payload.as_array().is_some_and(|list| !list.is_empty()),
        EndpointKind::Current => payload.get("cod").and_then(Value::as_f64) == Some(200.0),
        EndpointKind::Forecast => payload.get("cod").and_then(Value::as_str) == Some("200"),
    }
}

/// Source of weather data for one dashboard run.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Resolve a city name to the first matching location.
    async fn geocode(&self, city: &str) -> Result<Location>;

    async fn current(&self, location: &Location) -> Result<CurrentConditions>;

    async fn forecast(&self, location: &Location) -> Result<ForecastSeries>;
}
