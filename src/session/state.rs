//! Observable session state.

use serde::Serialize;

/// Lifecycle of one logical stream.
///
/// `Completed`, `Failed` and `Cancelled` are absorbing: only new identifying
/// parameters move the session out of them (back through `Idle`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum SessionState {
    /// No identifying parameters supplied
    Idle,
    /// Transport open in flight
    Opening,
    /// Body is being read
    Streaming,
    /// Terminal frame seen, or the server closed the body
    Completed(Option<String>),
    /// Open or transport fault
    Failed(String),
    /// Caller withdrew interest
    Cancelled,
}

impl SessionState {
    /// True while the transport is open or opening.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Opening | SessionState::Streaming)
    }

    /// True for the absorbing states.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed(_) | SessionState::Failed(_) | SessionState::Cancelled
        )
    }

    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Opening => "opening",
            SessionState::Streaming => "streaming",
            SessionState::Completed(_) => "completed",
            SessionState::Failed(_) => "failed",
            SessionState::Cancelled => "cancelled",
        }
    }

    /// Terminal status label, if the session completed with one.
    pub fn status(&self) -> Option<&str> {
        match self {
            SessionState::Completed(status) => status.as_deref(),
            _ => None,
        }
    }

    /// Error text, if the session failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            SessionState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record exposed to callers of the finite variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub lines: Vec<String>,
    pub is_streaming: bool,
    pub status: Option<String>,
    pub error: Option<String>,
}

impl SessionSnapshot {
    pub fn new(state: &SessionState, lines: Vec<String>) -> Self {
        Self {
            lines,
            is_streaming: state.is_active(),
            status: state.status().map(str::to_string),
            error: state.error().map(str::to_string),
        }
    }
}

/// Record exposed to callers of the tail variant, which has no status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailSnapshot {
    pub lines: Vec<String>,
    pub is_streaming: bool,
    pub error: Option<String>,
}

impl From<SessionSnapshot> for TailSnapshot {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            lines: snapshot.lines,
            is_streaming: snapshot.is_streaming,
            error: snapshot.error,
        }
    }
}

/// Lightweight change notification published on every transition and append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    pub state: SessionState,
    pub line_count: usize,
}
