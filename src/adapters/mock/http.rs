//! Mock HTTP client for testing.
//!
//! Provides a scripted transport that can return predefined chunk streams,
//! open failures, or a live channel the test feeds by hand.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, StreamResponse};

/// Sender half of a [`MockResponse::Channel`] script.
pub type ChunkSender = mpsc::UnboundedSender<Result<Bytes, HttpError>>;

type ChunkReceiver = mpsc::UnboundedReceiver<Result<Bytes, HttpError>>;

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with the given chunks, then end of data
    Stream(Vec<Bytes>),
    /// 200 with the given chunks, then a read error
    StreamThenError(Vec<Bytes>, HttpError),
    /// 200 with the given chunks, then a read that never completes
    StreamThenPending(Vec<Bytes>),
    /// Given status with an empty body
    Status(u16),
    /// Given status and no readable body at all
    NoBody(u16),
    /// The open itself fails
    Error(HttpError),
    /// The open never completes
    PendingOpen,
    /// 200 whose chunks are pushed through a [`ChunkSender`]; single use
    Channel(Arc<Mutex<Option<ChunkReceiver>>>),
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use opstream::adapters::mock::{MockHttpClient, MockResponse};
/// use bytes::Bytes;
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://test/api/apps/1/logs/stream",
///     MockResponse::Stream(vec![Bytes::from("data: {\"line\":\"a\"}\n\n")]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL. Exact matches win over prefix matches.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses).insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Script a live stream for `url` and return the sender that feeds it.
    ///
    /// Dropping the sender ends the stream.
    pub fn stream_channel(&self, url: &str) -> ChunkSender {
        let (tx, rx) = mpsc::unbounded_channel();
        self.set_response(url, MockResponse::Channel(Arc::new(Mutex::new(Some(rx)))));
        tx
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn record_request(&self, url: &str, headers: &Headers) {
        lock(&self.requests).push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = lock(&self.responses);

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        let prefix_match = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, response)| response.clone());
        if prefix_match.is_some() {
            return prefix_match;
        }

        lock(&self.default_response).clone()
    }
}

fn chunk_stream(chunks: Vec<Bytes>) -> impl futures::Stream<Item = Result<Bytes, HttpError>> {
    futures::stream::iter(chunks.into_iter().map(Ok))
}

fn channel_stream(rx: ChunkReceiver) -> ByteStream {
    Box::pin(futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    }))
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<StreamResponse, HttpError> {
        use futures::StreamExt;

        self.record_request(url, headers);

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(StreamResponse::new(200, Box::pin(chunk_stream(chunks))))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let tail = futures::stream::once(async move { Err(err) });
                Ok(StreamResponse::new(
                    200,
                    Box::pin(chunk_stream(chunks).chain(tail)),
                ))
            }
            Some(MockResponse::StreamThenPending(chunks)) => Ok(StreamResponse::new(
                200,
                Box::pin(chunk_stream(chunks).chain(futures::stream::pending())),
            )),
            Some(MockResponse::Status(status)) => Ok(StreamResponse::new(
                status,
                Box::pin(futures::stream::empty()),
            )),
            Some(MockResponse::NoBody(status)) => Ok(StreamResponse::without_body(status)),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::PendingOpen) => futures::future::pending().await,
            Some(MockResponse::Channel(slot)) => {
                let receiver = lock(&slot).take();
                match receiver {
                    Some(rx) => Ok(StreamResponse::new(200, channel_stream(rx))),
                    None => Err(HttpError::Other(format!(
                        "Mock stream channel already consumed for URL: {}",
                        url
                    ))),
                }
            }
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn collect(response: StreamResponse) -> Vec<Result<Bytes, HttpError>> {
        let mut body = response.body.expect("body");
        let mut items = Vec::new();
        while let Some(item) = body.next().await {
            items.push(item);
        }
        items
    }

    #[tokio::test]
    async fn test_stream_with_chunks() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://test/stream",
            MockResponse::Stream(vec![Bytes::from("chunk1"), Bytes::from("chunk2")]),
        );

        let response = client
            .get_stream("http://test/stream", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let items = collect(response).await;
        assert_eq!(items, vec![Ok(Bytes::from("chunk1")), Ok(Bytes::from("chunk2"))]);
    }

    #[tokio::test]
    async fn test_stream_then_error() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::StreamThenError(
            vec![Bytes::from("a")],
            HttpError::Io("reset".to_string()),
        ));

        let response = client.get_stream("http://any", &Headers::new()).await.unwrap();
        let items = collect(response).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], Err(HttpError::Io("reset".to_string())));
    }

    #[tokio::test]
    async fn test_status_and_no_body() {
        let client = MockHttpClient::new();
        client.set_response("http://test/500", MockResponse::Status(500));
        client.set_response("http://test/nobody", MockResponse::NoBody(200));

        let response = client.get_stream("http://test/500", &Headers::new()).await.unwrap();
        assert_eq!(response.status, 500);
        assert!(response.body.is_some());

        let response = client
            .get_stream("http://test/nobody", &Headers::new())
            .await
            .unwrap();
        assert!(response.is_success());
        assert!(response.body.is_none());
    }

    #[tokio::test]
    async fn test_open_error_and_missing_script() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://test/down",
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );

        let result = client.get_stream("http://test/down", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::ConnectionFailed(_))));

        let result = client.get_stream("http://test/missing", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_channel_stream_single_use() {
        let client = MockHttpClient::new();
        let tx = client.stream_channel("http://test/live");

        let response = client.get_stream("http://test/live", &Headers::new()).await.unwrap();
        tx.send(Ok(Bytes::from("x"))).unwrap();
        drop(tx);
        let items = collect(response).await;
        assert_eq!(items, vec![Ok(Bytes::from("x"))]);

        let second = client.get_stream("http://test/live", &Headers::new()).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn test_longest_prefix_match_and_recording() {
        let client = MockHttpClient::new();
        client.set_response("http://test/api", MockResponse::Status(404));
        client.set_response("http://test/api/apps", MockResponse::Status(200));

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Bearer t".to_string());
        let response = client
            .get_stream("http://test/api/apps/7/logs/stream", &headers)
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://test/api/apps/7/logs/stream");
        assert_eq!(
            requests[0].headers.get("Authorization"),
            Some(&"Bearer t".to_string())
        );

        client.clear_requests();
        assert!(client.get_requests().is_empty());
    }
}
