//! Stream client configuration.
//!
//! Use the builder methods to customize, or [`StreamConfig::from_env`] to pick
//! up overrides from the environment.
//!
//! # Example
//!
//! ```ignore
//! use opstream::config::StreamConfig;
//!
//! let config = StreamConfig::default()
//!     .with_base_url("https://panel.example.com")
//!     .with_tail_lines(500);
//! ```

/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "OPSTREAM_BASE_URL";
/// Environment variable holding the bearer token.
pub const ENV_TOKEN: &str = "OPSTREAM_TOKEN";
/// Environment variable overriding the default tail size.
pub const ENV_TAIL_LINES: &str = "OPSTREAM_TAIL_LINES";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TAIL_LINES: u32 = 100;

/// Settings shared by every stream session.
#[derive(Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Bearer token used when no other credentials provider is supplied
    pub auth_token: Option<String>,
    /// Lines of history requested when a tail opens
    pub tail_lines: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: None,
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }
}

impl std::fmt::Debug for StreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("tail_lines", &self.tail_lines)
            .finish()
    }
}

impl StreamConfig {
    /// Create a new StreamConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the bearer token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the default number of history lines for tails.
    pub fn with_tail_lines(mut self, lines: u32) -> Self {
        self.tail_lines = lines;
        self
    }

    /// Create config from `OPSTREAM_*` environment variables.
    ///
    /// Unset or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
            config = config.with_auth_token(token);
        }
        if let Some(raw) = lookup(ENV_TAIL_LINES) {
            match raw.trim().parse::<u32>() {
                Ok(lines) => config = config.with_tail_lines(lines),
                Err(_) => tracing::warn!(
                    "Ignoring invalid {}={:?}, using {}",
                    ENV_TAIL_LINES,
                    raw,
                    config.tail_lines
                ),
            }
        }

        config
    }
}
