//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - opens the streaming transport
//! - [`CredentialsProvider`] - supplies the bearer token for each open

pub mod credentials;
pub mod http;

pub use credentials::{Anonymous, CredentialsProvider};
pub use http::{ByteStream, Headers, HttpClient, HttpError, StreamResponse};
