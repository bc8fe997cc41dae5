use loader_core::HandlerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report service unreachable: {0}")]
    Transport(String),

    #[error("Report service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid period: {start} is after {end}")]
    InvalidPeriod { start: String, end: String },
}

impl From<reqwest::Error> for ReportError {
    fn from(e: reqwest::Error) -> Self {
        ReportError::Transport(e.to_string())
    }
}

impl From<ReportError> for HandlerError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Transport(msg) => HandlerError::Connectivity(msg),
            e @ (ReportError::InvalidDate(_) | ReportError::InvalidPeriod { .. }) => {
                HandlerError::InvalidArguments(e.to_string())
            }
            e @ ReportError::Status { .. } => HandlerError::Internal(e.to_string()),
        }
    }
}
