use thiserror::Error;

use crate::provider::EndpointKind;

/// Everything that can end a dashboard run.
///
/// Each kind is terminal for the current run. `NotFound` and `Upstream` carry the
/// raw upstream payload so the host can show it verbatim.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Blank query. The host shows a prompt instead of an error.
    #[error("Please enter a city name")]
    EmptyInput,

    #[error("City not found or API error")]
    NotFound { query: String, raw: String },

    #[error("{endpoint} API error")]
    Upstream { endpoint: EndpointKind, raw: String },

    #[error("{endpoint} request failed: {source}")]
    Network {
        endpoint: EndpointKind,
        #[source]
        source: reqwest::Error,
    },
}

impl DashboardError {
    /// Raw upstream payload attached to this error, if any.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            DashboardError::NotFound { raw, .. } | DashboardError::Upstream { raw, .. } => {
                Some(raw.as_str())
            }
            DashboardError::EmptyInput | DashboardError::Network { .. } => None,
        }
    }

    pub fn is_empty_input(&self) -> bool {
        matches!(self, DashboardError::EmptyInput)
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
