//! One dashboard run: geocode, then current conditions, then forecast.
//!
//! The host calls [`Pipeline::on_submit`] for every city the user submits. Each call
//! is a fresh, strictly linear run that stops at the first failure.

use crate::{
    error::{DashboardError, Result},
    model::{CurrentConditions, Dashboard, Location},
    provider::WeatherSource,
};

/// Where a run was when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geocoding,
    FetchingCurrent,
    FetchingForecast,
}

/// A run that stopped early. `location` and `current` hold whatever had already
/// been fetched, so a forecast failure still shows the current conditions.
#[derive(Debug)]
pub struct Halt {
    pub stage: Stage,
    pub error: DashboardError,
    pub location: Option<Location>,
    pub current: Option<CurrentConditions>,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// Blank input: ask for a city, nothing was fetched.
    Prompting,
    Halted(Halt),
    Rendered(Dashboard),
}

impl RunOutcome {
    pub fn error(&self) -> Option<&DashboardError> {
        match self {
            RunOutcome::Halted(halt) => Some(&halt.error),
            RunOutcome::Prompting | RunOutcome::Rendered(_) => None,
        }
    }
}

/// Trim the query; blank input is not a city.
pub fn validate_query(input: &str) -> Result<&str> {
    let city = input.trim();
    if city.is_empty() {
        return Err(DashboardError::EmptyInput);
    }
    Ok(city)
}

#[derive(Debug)]
pub struct Pipeline<S> {
    source: S,
}

impl<S: WeatherSource> Pipeline<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    #[tracing::instrument(skip_all, fields(query = %input.trim()))]
    pub async fn on_submit(&self, input: &str) -> RunOutcome {
        let city = match validate_query(input) {
            Ok(city) => city,
            Err(_) => {
                tracing::debug!("blank query, prompting");
                return RunOutcome::Prompting;
            }
        };

        let location = match self.source.geocode(city).await {
            Ok(location) => location,
            Err(error) => return halt(Stage::Geocoding, error, None, None),
        };
        tracing::info!(lat = location.latitude, lon = location.longitude, "city geocoded");

        let current = match self.source.current(&location).await {
            Ok(current) => current,
            Err(error) => return halt(Stage::FetchingCurrent, error, Some(location), None),
        };

        let forecast = match self.source.forecast(&location).await {
            Ok(forecast) => forecast,
            Err(error) => {
                return halt(
                    Stage::FetchingForecast,
                    error,
                    Some(location),
                    Some(current),
                );
            }
        };
        tracing::info!(points = forecast.len(), "run complete");

        RunOutcome::Rendered(Dashboard {
            location,
            current,
            forecast,
        })
    }
}

fn halt(
    stage: Stage,
    error: DashboardError,
    location: Option<Location>,
    current: Option<CurrentConditions>,
) -> RunOutcome {
    tracing::warn!(?stage, %error, "run halted");
    RunOutcome::Halted(Halt {
        stage,
        error,
        location,
        current,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForecastPoint, ForecastSeries};
    use crate::provider::EndpointKind;
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::sync::Mutex;

    /// Scripted source that records which endpoints were called.
    #[derive(Debug, Default)]
    struct FakeSource {
        geocode_fails: bool,
        current_fails: bool,
        forecast_fails: bool,
        calls: Mutex<Vec<EndpointKind>>,
    }

    impl FakeSource {
        fn calls(&self) -> Vec<EndpointKind> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, endpoint: EndpointKind) {
            self.calls.lock().unwrap().push(endpoint);
        }
    }

    fn upstream(endpoint: EndpointKind) -> DashboardError {
        DashboardError::Upstream {
            endpoint,
            raw: r#"{"cod":500}"#.to_string(),
        }
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn geocode(&self, city: &str) -> Result<Location> {
            self.record(EndpointKind::Geocoding);
            if self.geocode_fails {
                return Err(DashboardError::NotFound {
                    query: city.to_string(),
                    raw: "[]".to_string(),
                });
            }
            Ok(Location {
                name: city.to_string(),
                latitude: 51.5,
                longitude: -0.12,
            })
        }

        async fn current(&self, _location: &Location) -> Result<CurrentConditions> {
            self.record(EndpointKind::Current);
            if self.current_fails {
                return Err(upstream(EndpointKind::Current));
            }
            Ok(CurrentConditions {
                temperature_c: 15.2,
                description: "clear sky".to_string(),
                humidity_pct: 70,
            })
        }

        async fn forecast(&self, _location: &Location) -> Result<ForecastSeries> {
            self.record(EndpointKind::Forecast);
            if self.forecast_fails {
                return Err(upstream(EndpointKind::Forecast));
            }
            Ok(ForecastSeries::new(vec![ForecastPoint {
                timestamp: NaiveDateTime::parse_from_str("2024-01-01 12:00:00", "%Y-%m-%d %H:%M:%S")
                    .unwrap(),
                temperature_c: 14.0,
            }]))
        }
    }

    fn expect_halt(outcome: RunOutcome) -> Halt {
        match outcome {
            RunOutcome::Halted(halt) => halt,
            other => panic!("expected halt, got {other:?}"),
        }
    }

    #[test]
    fn validate_query_trims_and_rejects_blank() {
        assert_eq!(validate_query("  London ").unwrap(), "London");
        assert!(validate_query("").unwrap_err().is_empty_input());
        assert!(validate_query(" \t\n").unwrap_err().is_empty_input());
    }

    #[tokio::test]
    async fn blank_input_prompts_without_network_calls() {
        let pipeline = Pipeline::new(FakeSource::default());

        for input in ["", "   ", "\t\n"] {
            let outcome = pipeline.on_submit(input).await;
            assert!(matches!(outcome, RunOutcome::Prompting));
        }
        assert!(pipeline.source.calls().is_empty());
    }

    #[tokio::test]
    async fn not_found_stops_after_geocoding() {
        let pipeline = Pipeline::new(FakeSource {
            geocode_fails: true,
            ..FakeSource::default()
        });

        let outcome = pipeline.on_submit("Atlantis").await;

        let halt = expect_halt(outcome);
        assert_eq!(halt.stage, Stage::Geocoding);
        assert!(matches!(halt.error, DashboardError::NotFound { .. }));
        assert!(halt.location.is_none());
        assert_eq!(pipeline.source.calls(), vec![EndpointKind::Geocoding]);
    }

    #[tokio::test]
    async fn current_failure_skips_forecast() {
        let pipeline = Pipeline::new(FakeSource {
            current_fails: true,
            ..FakeSource::default()
        });

        let outcome = pipeline.on_submit("London").await;

        let halt = expect_halt(outcome);
        assert_eq!(halt.stage, Stage::FetchingCurrent);
        assert!(halt.current.is_none());
        assert_eq!(
            pipeline.source.calls(),
            vec![EndpointKind::Geocoding, EndpointKind::Current]
        );
    }

    #[tokio::test]
    async fn forecast_failure_keeps_current_conditions() {
        let pipeline = Pipeline::new(FakeSource {
            forecast_fails: true,
            ..FakeSource::default()
        });

        let outcome = pipeline.on_submit("London").await;

        let halt = expect_halt(outcome);
        assert_eq!(halt.stage, Stage::FetchingForecast);
        assert!(matches!(
            halt.error,
            DashboardError::Upstream {
                endpoint: EndpointKind::Forecast,
                ..
            }
        ));
        assert_eq!(halt.current.map(|c| c.humidity_pct), Some(70));
        assert_eq!(pipeline.source.calls().len(), 3);
    }

    #[tokio::test]
    async fn successful_run_renders_dashboard_for_trimmed_query() {
        let pipeline = Pipeline::new(FakeSource::default());

        let outcome = pipeline.on_submit("  london ").await;
        assert!(outcome.error().is_none());

        let RunOutcome::Rendered(dashboard) = outcome else {
            panic!("expected a rendered dashboard");
        };
        assert_eq!(dashboard.location.name, "london");
        assert_eq!(dashboard.current.temperature_c, 15.2);
        assert_eq!(dashboard.forecast.len(), 1);
    }
}
