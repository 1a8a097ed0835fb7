use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::ApiSettings,
    error::{DashboardError, Result},
    model::{CurrentConditions, ForecastPoint, ForecastSeries, Location},
    provider::{EndpointKind, WeatherSource, is_success},
};

const GEOCODING_PATH: &str = "/geo/1.0/direct";
const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// OpenWeather client covering geocoding, current weather and the 5-day forecast.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    settings: ApiSettings,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(settings: ApiSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("weather-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { settings, http })
    }

    /// GET `path` and return the parsed payload together with the raw body text.
    ///
    /// Transport errors drop their URL: the query string carries the API key.
    async fn get_json(
        &self,
        endpoint: EndpointKind,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(Value, String)> {
        let url = format!("{}{}", self.settings.base_url, path);
        tracing::debug!(%endpoint, %url, "sending request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.settings.api_key.as_str())])
            .send()
            .await
            .map_err(|source| DashboardError::Network {
                endpoint,
                source: source.without_url(),
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| DashboardError::Network {
                endpoint,
                source: source.without_url(),
            })?;

        tracing::debug!(%endpoint, %status, bytes = body.len(), "response received");

        match serde_json::from_str::<Value>(&body) {
            Ok(payload) => Ok((payload, body)),
            Err(err) => {
                tracing::warn!(%endpoint, %status, error = %err, "response body is not JSON");
                Err(DashboardError::Upstream { endpoint, raw: body })
            }
        }
    }

    fn coordinates(location: &Location) -> Vec<(&'static str, String)> {
        vec![
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("units", "metric".to_string()),
        ]
    }
}

/// Decode a success-coded payload; missing fields are an upstream fault.
fn decode<T: DeserializeOwned>(endpoint: EndpointKind, payload: Value, raw: String) -> Result<T> {
    serde_json::from_value(payload).map_err(|err| {
        tracing::warn!(%endpoint, error = %err, "unexpected response shape");
        DashboardError::Upstream { endpoint, raw }
    })
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn geocode(&self, city: &str) -> Result<Location> {
        let endpoint = EndpointKind::Geocoding;
        let query = [("q", city.to_string()), ("limit", "1".to_string())];

        let (payload, raw) = self.get_json(endpoint, GEOCODING_PATH, &query).await?;

        if !is_success(&payload, endpoint) {
            return Err(DashboardError::NotFound {
                query: city.to_string(),
                raw,
            });
        }

        let entries: Vec<OwGeoEntry> = decode(endpoint, payload, raw.clone())?;
        let first = entries
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::NotFound {
                query: city.to_string(),
                raw,
            })?;

        Ok(Location {
            name: city.to_string(),
            latitude: first.lat,
            longitude: first.lon,
        })
    }

    async fn current(&self, location: &Location) -> Result<CurrentConditions> {
        let endpoint = EndpointKind::Current;
        let (payload, raw) = self
            .get_json(endpoint, CURRENT_PATH, &Self::coordinates(location))
            .await?;

        if !is_success(&payload, endpoint) {
            return Err(DashboardError::Upstream { endpoint, raw });
        }

        let parsed: OwCurrentResponse = decode(endpoint, payload, raw)?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(CurrentConditions {
            temperature_c: parsed.main.temp,
            description,
            humidity_pct: parsed.main.humidity,
        })
    }

    async fn forecast(&self, location: &Location) -> Result<ForecastSeries> {
        let endpoint = EndpointKind::Forecast;
        let (payload, raw) = self
            .get_json(endpoint, FORECAST_PATH, &Self::coordinates(location))
            .await?;

        if !is_success(&payload, endpoint) {
            return Err(DashboardError::Upstream { endpoint, raw });
        }

        let parsed: OwForecastResponse = decode(endpoint, payload, raw.clone())?;

        let mut points = Vec::with_capacity(parsed.list.len());
        for entry in parsed.list {
            let timestamp = match NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT) {
                Ok(ts) => ts,
                Err(err) => {
                    tracing::warn!(dt_txt = %entry.dt_txt, error = %err, "unparsable forecast timestamp");
                    return Err(DashboardError::Upstream { endpoint, raw });
                }
            };
            points.push(ForecastPoint {
                timestamp,
                temperature_c: entry.main.temp,
            });
        }

        Ok(ForecastSeries::new(points))
    }
}
