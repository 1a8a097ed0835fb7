//! Forecast line chart rendered to SVG with `plotters`.
//!
//! Transparent background, white text, no gridlines.

use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;

use crate::model::ForecastSeries;

pub const FORECAST_CHART_TITLE: &str = "Temperature Forecast (Next 5 Days)";

const WIDTH: u32 = 960;
const HEIGHT: u32 = 420;
const FONT: &str = "sans-serif";

/// Chart model: one (timestamp, temperature) pair per forecast point, in series order.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastChart {
    pub title: String,
    pub points: Vec<(NaiveDateTime, f64)>,
    x_range: Option<(NaiveDateTime, NaiveDateTime)>,
    y_range: Option<(f64, f64)>,
}

impl ForecastChart {
    pub fn from_series(series: &ForecastSeries) -> Self {
        Self {
            title: FORECAST_CHART_TITLE.to_string(),
            points: series
                .points
                .iter()
                .map(|p| (p.timestamp, p.temperature_c))
                .collect(),
            x_range: series.time_range().map(widen_time),
            y_range: series.temperature_range().map(pad_temperature),
        }
    }

    pub fn x_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.x_range
    }

    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.y_range
    }

    pub fn render_svg(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
            root.fill(&TRANSPARENT)?;

            let caption_style = (FONT, 22).into_font().color(&WHITE);

            let (Some((x_min, x_max)), Some((y_min, y_max))) = (self.x_range(), self.y_range())
            else {
                root.titled(&self.title, caption_style)?;
                root.present()?;
                drop(root);
                return Ok(svg);
            };

            let mut chart = ChartBuilder::on(&root)
                .caption(&self.title, caption_style)
                .margin(12)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(RangedDateTime::from(x_min..x_max), y_min..y_max)?;

            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(6)
                .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%b %d %Hh").to_string())
                .y_desc("Temperature (°C)")
                .label_style((FONT, 13).into_font().color(&WHITE))
                .axis_desc_style((FONT, 14).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            chart.draw_series(LineSeries::new(
                self.points.iter().copied(),
                CYAN.stroke_width(2),
            ))?;

            root.present()?;
        }
        Ok(svg)
    }
}

/// A single timestamp is widened so the axis is never degenerate.
fn widen_time((min, max): (NaiveDateTime, NaiveDateTime)) -> (NaiveDateTime, NaiveDateTime) {
    if min == max {
        return (min - Duration::hours(3), max + Duration::hours(3));
    }
    (min, max)
}

/// 10% padding, or one degree when the series is flat.
fn pad_temperature((min, max): (f64, f64)) -> (f64, f64) {
    let padding = if (max - min).abs() > 1e-6 {
        (max - min) * 0.1
    } else {
        1.0
    };
    (min - padding, max + padding)
}
