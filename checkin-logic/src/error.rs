use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::DraftProblem;

/// Failures a front end may want to show, none of them are fatal to a session
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Neither the sensor nor the network fallback produced a coordinate
    #[error("Could not determine your location")]
    LocationUnavailable,
    /// The message service could not be reached or answered with an error
    #[error("Message service unavailable: {0}")]
    ServiceUnavailable(String),
    /// The draft breaks a length rule
    #[error("Message is not valid: {0}")]
    ValidationFailed(DraftProblem),
}

impl ErrorKind {
    pub(crate) fn service(err: &anyhow::Error) -> Self {
        Self::ServiceUnavailable(format!("{err:#}"))
    }
}
