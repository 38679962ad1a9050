//! HTTP transport trait abstraction.
//!
//! Provides a trait-based abstraction for opening streaming requests, enabling
//! dependency injection and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Body of an open streaming response.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Response to a streaming request.
///
/// Non-success statuses are returned as-is; the caller decides what they mean.
pub struct StreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Readable body, if the transport produced one
    pub body: Option<ByteStream>,
}

impl StreamResponse {
    /// Create a response with a readable body.
    pub fn new(status: u16, body: ByteStream) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// Create a response that carries no readable body.
    pub fn without_body(status: u16) -> Self {
        Self { status, body: None }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamResponse")
            .field("status", &self.status)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Request was cancelled
    Cancelled,
    /// IO error
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::Cancelled => write!(f, "Request cancelled"),
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for opening streaming HTTP requests.
///
/// Implementations include the production reqwest-based client and a
/// scripted mock for tests.
///
/// # Example
///
/// ```ignore
/// use opstream::traits::{HttpClient, Headers};
///
/// async fn status_of<C: HttpClient>(client: &C, url: &str) -> Option<u16> {
///     client.get_stream(url, &Headers::new()).await.ok().map(|r| r.status)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Open a GET request whose body is consumed incrementally.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `headers` - Request headers (authentication included)
    ///
    /// # Returns
    /// The response status and body stream, or a transport error
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<StreamResponse, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_body() -> ByteStream {
        Box::pin(futures::stream::empty())
    }

    #[test]
    fn test_stream_response_is_success() {
        assert!(StreamResponse::new(200, empty_body()).is_success());
        assert!(StreamResponse::new(204, empty_body()).is_success());
        assert!(!StreamResponse::new(301, empty_body()).is_success());
        assert!(!StreamResponse::without_body(404).is_success());
        assert!(!StreamResponse::without_body(500).is_success());
    }

    #[test]
    fn test_stream_response_body_presence() {
        assert!(StreamResponse::new(200, empty_body()).body.is_some());
        assert!(StreamResponse::without_body(200).body.is_none());
    }

    #[test]
    fn test_stream_response_debug_hides_stream() {
        let debug = format!("{:?}", StreamResponse::without_body(200));
        assert!(debug.contains("has_body: false"));
    }

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            HttpError::Timeout("30s".to_string()).to_string(),
            "Request timeout: 30s"
        );
        assert_eq!(HttpError::Cancelled.to_string(), "Request cancelled");
        assert_eq!(
            HttpError::Io("read failed".to_string()).to_string(),
            "IO error: read failed"
        );
        assert_eq!(
            HttpError::InvalidUrl("bad url".to_string()).to_string(),
            "Invalid URL: bad url"
        );
        assert_eq!(
            HttpError::Other("unknown".to_string()).to_string(),
            "HTTP error: unknown"
        );
    }
}
