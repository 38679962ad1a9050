//! In-memory credentials provider for testing.

use std::sync::{Arc, Mutex};

use crate::traits::CredentialsProvider;

/// Credentials provider whose token can be swapped while sessions run.
///
/// Clones share the same token, so a test can keep a handle and rotate the
/// token after handing the provider to a session.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    token: Arc<Mutex<Option<String>>>,
}

impl InMemoryCredentials {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.set_token(token);
        provider
    }

    /// Replace the stored token.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = Some(token.into());
    }

    /// Remove the stored token.
    pub fn clear(&self) {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = None;
    }
}

impl CredentialsProvider for InMemoryCredentials {
    fn access_token(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}
