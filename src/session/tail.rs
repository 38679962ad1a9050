//! Live container log tail.
//!
//! Unbounded: terminal frames are ignored and the session keeps streaming
//! until the caller withdraws interest or the server closes the body.

use std::sync::Arc;

use crate::config::StreamConfig;
use crate::traits::{CredentialsProvider, HttpClient};

use super::state::TailSnapshot;
use super::variant::{encode, VariantSpec};
use super::StreamSession;

/// Identifies what to tail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TailParams {
    pub app_id: String,
    /// Container name; `None` lets the server pick the app's default
    pub container: Option<String>,
    /// History lines requested on open; `None` uses the config default
    pub lines: Option<u32>,
}

impl TailParams {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            container: None,
            lines: None,
        }
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn with_lines(mut self, lines: u32) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Params only when an app id is present. An empty container means none.
    pub fn from_parts(app_id: Option<&str>, container: Option<&str>) -> Option<Self> {
        let app_id = app_id.filter(|id| !id.is_empty())?;
        let mut params = Self::new(app_id);
        params.container = container.filter(|c| !c.is_empty()).map(str::to_string);
        Some(params)
    }
}

fn address(config: &StreamConfig, params: &TailParams) -> String {
    let lines = params.lines.unwrap_or(config.tail_lines);
    let mut url = format!(
        "{}/api/apps/{}/logs/stream?lines={}",
        config.base_url,
        encode(&params.app_id),
        lines
    );
    if let Some(container) = &params.container {
        url.push_str("&container=");
        url.push_str(&encode(container));
    }
    url
}

pub const TAIL: VariantSpec<TailParams> = VariantSpec {
    name: "tail",
    finite: false,
    address,
    statuses: &[],
};

pub type LogTail = StreamSession<TailParams>;

impl StreamSession<TailParams> {
    /// Idle log tail.
    pub fn tail(
        client: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialsProvider>,
        config: StreamConfig,
    ) -> Self {
        Self::new(TAIL, client, credentials, config)
    }

    /// Observable record without the status field.
    pub fn tail_snapshot(&self) -> TailSnapshot {
        self.snapshot().into()
    }
}
