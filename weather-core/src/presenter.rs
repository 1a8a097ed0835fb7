//! Turns fetched data into what the user sees: a terminal view and an HTML page.
//!
//! Everything here is a pure function of already-fetched values.

use anyhow::Result;
use std::fmt::Write as _;

use crate::{
    chart::{FORECAST_CHART_TITLE, ForecastChart},
    model::{CurrentConditions, Dashboard, ForecastSeries},
};

pub const PAGE_TITLE: &str = "Weather Dashboard";

/// Capitalise the first letter of every alphabetic run and lowercase the rest.
///
/// `"new york"` becomes `"New York"`, `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }

    out
}

/// Temperature as returned by the API, never with fewer than one decimal.
pub fn format_temperature(celsius: f64) -> String {
    if celsius.is_finite() && celsius.fract() == 0.0 {
        format!("{celsius:.1} °C")
    } else {
        format!("{celsius} °C")
    }
}

/// Text lines of the current-conditions card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub heading: String,
    pub temperature: String,
    pub description: String,
    pub humidity: String,
}

impl CurrentView {
    pub fn new(city: &str, current: &CurrentConditions) -> Self {
        Self {
            heading: format!("Current Weather in {}", title_case(city)),
            temperature: format_temperature(current.temperature_c),
            description: title_case(&current.description),
            humidity: format!("Humidity: {}%", current.humidity_pct),
        }
    }
}

/// Current conditions as a boxed text card for the terminal.
pub fn render_current_terminal(city: &str, current: &CurrentConditions) -> String {
    let view = CurrentView::new(city, current);
    let lines = [
        view.heading.as_str(),
        "",
        view.temperature.as_str(),
        view.description.as_str(),
        view.humidity.as_str(),
    ];
    boxed(&lines)
}

/// Per-day min/max of the forecast, one row per date.
pub fn render_forecast_terminal(forecast: &ForecastSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{FORECAST_CHART_TITLE}");

    if forecast.is_empty() {
        let _ = writeln!(out, "  no forecast data");
        return out;
    }

    for day in forecast.daily_summaries() {
        let _ = writeln!(
            out,
            "  {}  min {:>6.1} °C  max {:>6.1} °C  ({} samples)",
            day.date.format("%a %Y-%m-%d"),
            day.min_c,
            day.max_c,
            day.samples,
        );
    }
    out
}

pub fn render_terminal(dashboard: &Dashboard) -> String {
    let mut out = render_current_terminal(&dashboard.location.name, &dashboard.current);
    out.push('\n');
    out.push_str(&render_forecast_terminal(&dashboard.forecast));
    out
}

fn boxed(lines: &[&str]) -> String {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let rule = "─".repeat(width + 2);

    let mut out = String::new();
    let _ = writeln!(out, "╭{rule}╮");
    for line in lines {
        let pad = width - line.chars().count();
        let _ = writeln!(out, "│ {line}{} │", " ".repeat(pad));
    }
    let _ = writeln!(out, "╰{rule}╯");
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Glass card with the current conditions.
pub fn render_current_html(city: &str, current: &CurrentConditions) -> String {
    let view = CurrentView::new(city, current);
    format!(
        r#"<div class="glass-card">
  <h3>🌤 {heading}</h3>
  <h1 class="headline">{temperature}</h1>
  <p class="description">{description}</p>
  <hr>
  <p>💧 {humidity}</p>
</div>
"#,
        heading = escape_html(&view.heading),
        temperature = escape_html(&view.temperature),
        description = escape_html(&view.description),
        humidity = escape_html(&view.humidity),
    )
}

/// Glass card embedding the forecast chart.
pub fn render_forecast_html(forecast: &ForecastSeries) -> Result<String> {
    let svg = ForecastChart::from_series(forecast).render_svg()?;
    Ok(format!(
        r#"<div class="glass-card">
  <h2>📈 Temperature Forecast</h2>
  {svg}
</div>
"#
    ))
}

/// Error card with the raw upstream payload shown verbatim.
pub fn render_error_html(message: &str, raw: Option<&str>) -> String {
    let mut out = format!(
        "<div class=\"glass-card error\">\n  <p>⚠️ {}</p>\n",
        escape_html(message)
    );
    if let Some(raw) = raw {
        let _ = writeln!(out, "  <pre>{}</pre>", escape_html(raw));
    }
    out.push_str("</div>\n");
    out
}

const PAGE_STYLE: &str = r#"
body {
  margin: 0;
  padding: 32px;
  min-height: 100vh;
  font-family: sans-serif;
  color: white;
  background: linear-gradient(rgba(0,0,0,0.7), rgba(0,0,0,0.7)), #1d2b3a;
}
.glass-card {
  background: rgba(255, 255, 255, 0.05);
  backdrop-filter: blur(10px);
  border: 1px solid rgba(255, 255, 255, 0.1);
  border-radius: 20px;
  padding: 25px;
  margin-bottom: 20px;
}
.headline { font-size: 50px; margin: 0; }
.description { font-size: 18px; opacity: 0.8; }
.error { border-color: rgba(255, 99, 71, 0.6); }
hr { opacity: 0.2; }
pre { white-space: pre-wrap; word-break: break-all; }
"#;

/// Wrap card fragments into a standalone HTML page.
pub fn render_page(cards: &[String]) -> String {
    let mut body = String::new();
    for card in cards {
        body.push_str(card);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{PAGE_TITLE}</title>
<style>{PAGE_STYLE}</style>
</head>
<body>
<h1>🌦️ {PAGE_TITLE}</h1>
{body}</body>
</html>
"#
    )
}

/// Full dashboard page for a successful run.
pub fn render_dashboard_page(dashboard: &Dashboard) -> Result<String> {
    let cards = [
        render_current_html(&dashboard.location.name, &dashboard.current),
        render_forecast_html(&dashboard.forecast)?,
    ];
    Ok(render_page(&cards))
}
