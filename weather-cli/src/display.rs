//! Human-friendly rendering of a run outcome for the terminal and the HTML page.

use anyhow::Result;
use std::fmt::Write as _;
use weather_core::{
    RunOutcome,
    presenter::{self, render_current_html, render_current_terminal, render_error_html},
};

const PROMPT: &str = "👆 Please enter a city name";

/// Terminal text for an outcome. Halted runs show what was already rendered,
/// then the error and the raw upstream response.
pub fn terminal(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Prompting => format!("{PROMPT}\n"),
        RunOutcome::Rendered(dashboard) => presenter::render_terminal(dashboard),
        RunOutcome::Halted(halt) => {
            let mut out = String::new();

            if let (Some(location), Some(current)) = (&halt.location, &halt.current) {
                out.push_str(&render_current_terminal(&location.name, current));
                out.push('\n');
            }

            let _ = writeln!(out, "⚠️ {}", halt.error);
            if let Some(raw) = halt.error.raw_response() {
                let _ = writeln!(out, "API response: {raw}");
            }
            out
        }
    }
}

/// HTML dashboard page for an outcome.
pub fn page(outcome: &RunOutcome) -> Result<String> {
    match outcome {
        RunOutcome::Prompting => Ok(presenter::render_page(&[format!(
            "<div class=\"glass-card\">{PROMPT}</div>\n"
        )])),
        RunOutcome::Rendered(dashboard) => presenter::render_dashboard_page(dashboard),
        RunOutcome::Halted(halt) => {
            let mut cards = Vec::new();
            if let (Some(location), Some(current)) = (&halt.location, &halt.current) {
                cards.push(render_current_html(&location.name, current));
            }
            cards.push(render_error_html(&halt.error.to_string(), halt.error.raw_response()));
            Ok(presenter::render_page(&cards))
        }
    }
}
