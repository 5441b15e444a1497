use thiserror::Error;

/// Failure of a request to the prediction service
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Server returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Server { status: u16, message: Option<String> },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The `error` field the server sent back, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Why a submission was refused before any request was made
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A request is already in flight")]
    Busy,

    #[error("Sequence is empty")]
    EmptySequence,
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to render report: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
