use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A geocoded city. `name` is the query as the user typed it (trimmed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: u8,
}

/// One timestamped temperature sample of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
}

/// Forecast samples in the order the API returned them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn new(points: Vec<ForecastPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lowest and highest temperature, or `None` for an empty series.
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.temperature_c;
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (min.min(p.temperature_c), max.max(p.temperature_c))
        }))
    }

    /// Earliest and latest timestamp, or `None` for an empty series.
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.points.first()?.timestamp;
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (min.min(p.timestamp), max.max(p.timestamp))
        }))
    }

    /// Groups samples by calendar date, keeping first-seen date order.
    pub fn daily_summaries(&self) -> Vec<DailySummary> {
        let mut days: Vec<DailySummary> = Vec::new();

        for point in &self.points {
            let date = point.timestamp.date();
            match days.iter_mut().find(|d| d.date == date) {
                Some(day) => {
                    day.min_c = day.min_c.min(point.temperature_c);
                    day.max_c = day.max_c.max(point.temperature_c);
                    day.samples += 1;
                }
                None => days.push(DailySummary {
                    date,
                    min_c: point.temperature_c,
                    max_c: point.temperature_c,
                    samples: 1,
                }),
            }
        }

        days
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub min_c: f64,
    pub max_c: f64,
    pub samples: usize,
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: ForecastSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ts: &str, temp: f64) -> ForecastPoint {
        ForecastPoint {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            temperature_c: temp,
        }
    }

    #[test]
    fn ranges_of_empty_series_are_none() {
        let series = ForecastSeries::default();
        assert!(series.temperature_range().is_none());
        assert!(series.time_range().is_none());
        assert!(series.daily_summaries().is_empty());
    }

    #[test]
    fn temperature_range_covers_all_points() {
        let series = ForecastSeries::new(vec![
            point("2024-01-01 12:00:00", 14.0),
            point("2024-01-01 15:00:00", 9.5),
            point("2024-01-01 18:00:00", 16.25),
        ]);

        assert_eq!(series.temperature_range(), Some((9.5, 16.25)));
    }

    #[test]
    fn daily_summaries_group_by_date() {
        let series = ForecastSeries::new(vec![
            point("2024-01-01 18:00:00", 10.0),
            point("2024-01-01 21:00:00", 8.0),
            point("2024-01-02 00:00:00", 6.5),
            point("2024-01-02 03:00:00", 5.0),
            point("2024-01-02 06:00:00", 7.0),
        ]);

        let days = series.daily_summaries();
        assert_eq!(days.len(), 2);

        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!((days[0].min_c, days[0].max_c, days[0].samples), (8.0, 10.0, 2));

        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!((days[1].min_c, days[1].max_c, days[1].samples), (5.0, 7.0, 3));
    }
}
