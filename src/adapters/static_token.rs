//! Fixed-token credentials provider.

use crate::traits::CredentialsProvider;

/// Credentials provider that always returns the same token.
///
/// Typically built from [`StreamConfig::auth_token`](crate::config::StreamConfig).
#[derive(Clone, Default)]
pub struct StaticToken {
    token: Option<String>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn from_option(token: Option<String>) -> Self {
        Self { token }
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CredentialsProvider for StaticToken {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}
