//! Event types produced by the stream parser.

use serde::{Deserialize, Serialize};

/// Classified result of parsing one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One log line to append
    Line(String),
    /// Stream finished; the status label is absent when the server omitted it
    Terminal(Option<String>),
    /// Frame without a usable payload; dropped by the session
    Malformed,
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Terminal(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, StreamEvent::Malformed)
    }
}

/// JSON object carried on the payload sub-line of a frame.
///
/// Every field is optional on the wire; classification happens in the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl StreamPayload {
    /// Payload for an incremental line.
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            line: Some(text.into()),
            ..Self::default()
        }
    }

    /// Payload for a terminal frame.
    pub fn done(status: Option<&str>) -> Self {
        Self {
            done: Some(true),
            status: status.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(false)
    }
}
