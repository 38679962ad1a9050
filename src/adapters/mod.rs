//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`StaticToken`] - fixed bearer token
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - scripted chunk streams and open failures
//! - [`mock::InMemoryCredentials`] - rotatable in-memory token

pub mod mock;
pub mod reqwest_http;
pub mod static_token;

pub use mock::{InMemoryCredentials, MockHttpClient, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
pub use static_token::StaticToken;
