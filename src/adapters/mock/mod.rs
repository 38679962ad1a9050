//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - scripted streaming transport
//! - [`InMemoryCredentials`] - in-memory, rotatable bearer token

pub mod credentials;
pub mod http;

pub use credentials::InMemoryCredentials;
pub use http::{ChunkSender, MockHttpClient, MockResponse, RecordedRequest};
