//! Credentials provider trait abstraction.
//!
//! The stream core never performs authentication itself. It asks a provider
//! for the current access token right before each transport is opened, so a
//! refreshed token is picked up by the next session.

use crate::traits::Headers;

/// Supplier of the bearer token attached to stream requests.
pub trait CredentialsProvider: Send + Sync {
    /// Current access token, if one is available.
    fn access_token(&self) -> Option<String>;

    /// Headers to attach to an open request.
    fn auth_headers(&self) -> Headers {
        let mut headers = Headers::new();
        if let Some(token) = self.access_token().filter(|t| !t.is_empty()) {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }
}

/// No credentials at all; requests go out unauthenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialsProvider for Anonymous {
    fn access_token(&self) -> Option<String> {
        None
    }
}
