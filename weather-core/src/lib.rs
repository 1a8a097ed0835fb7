//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - The OpenWeather clients (geocoding, current weather, forecast)
//! - The per-submit run pipeline and its outcomes
//! - Presentation: terminal text, HTML page and the forecast chart
//!
//! It is used by `weather-dashboard`, but the pipeline can be driven by any host.

pub mod chart;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod presenter;
pub mod provider;

pub use config::{ApiSettings, Config};
pub use error::DashboardError;
pub use model::{CurrentConditions, Dashboard, ForecastPoint, ForecastSeries, Location};
pub use pipeline::{Halt, Pipeline, RunOutcome, Stage};
pub use provider::{EndpointKind, OpenWeatherClient, WeatherSource, is_success};
