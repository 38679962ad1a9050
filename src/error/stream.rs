//! Streaming-related error types.
//!
//! Only open and transport faults ever reach the caller. Frames that fail to
//! parse are dropped inside the session and never become a `StreamError`.

use thiserror::Error;

use crate::traits::HttpError;

/// Faults that end a stream session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The open request returned a non-success status.
    #[error("Failed to open stream: HTTP {status}{}", format_detail(.message))]
    HttpStatus { status: u16, message: String },

    /// The open request succeeded but carried no readable body.
    #[error("Stream response has no readable body")]
    MissingBody,

    /// Opening the transport or reading a chunk failed.
    #[error("Stream transport error: {message}")]
    Transport { message: String },

    /// The caller withdrew interest. Never surfaced as an error string.
    #[error("Stream cancelled")]
    Cancelled,
}

fn format_detail(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(" - {}", trimmed)
    }
}

impl StreamError {
    /// Build an open failure from a response status.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        StreamError::HttpStatus {
            status,
            message: message.into(),
        }
    }

    /// True for the suppressed cancellation case.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StreamError::Cancelled)
    }

    /// True when the failure happened before any chunk was read.
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            StreamError::HttpStatus { .. } | StreamError::MissingBody
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::HttpStatus { status, .. } if *status == 401 || *status == 403 => {
                format!("The server refused the stream ({}). Check your access token.", status)
            }
            StreamError::HttpStatus { status, .. } if *status == 404 => {
                "The requested stream no longer exists.".to_string()
            }
            StreamError::HttpStatus { status, .. } => {
                format!("The server could not open the stream ({}).", status)
            }
            StreamError::MissingBody => "The server returned an empty stream.".to_string(),
            StreamError::Transport { message } => {
                format!("Connection to the stream was lost: {}", message)
            }
            StreamError::Cancelled => "Stream cancelled.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::HttpStatus { .. } => "E_STREAM_STATUS",
            StreamError::MissingBody => "E_STREAM_NO_BODY",
            StreamError::Transport { .. } => "E_STREAM_TRANSPORT",
            StreamError::Cancelled => "E_STREAM_CANCELLED",
        }
    }
}

impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Cancelled => StreamError::Cancelled,
            other => StreamError::Transport {
                message: other.to_string(),
            },
        }
    }
}
