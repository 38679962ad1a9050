//! Entry point that hands out stream sessions sharing one transport.

use std::sync::Arc;

use crate::adapters::{ReqwestHttpClient, StaticToken};
use crate::config::StreamConfig;
use crate::session::{DeploymentStream, LogTail, ProvisionStream};
use crate::traits::{CredentialsProvider, HttpClient};

/// Factory for provisioning, deployment and log-tail sessions.
///
/// Every session created here reuses the same HTTP client and credentials.
#[derive(Clone)]
pub struct StreamClient {
    http: Arc<dyn HttpClient>,
    credentials: Arc<dyn CredentialsProvider>,
    config: StreamConfig,
}

impl StreamClient {
    /// Create a StreamClient with explicit collaborators.
    pub fn new(
        http: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialsProvider>,
        config: StreamConfig,
    ) -> Self {
        Self {
            http,
            credentials,
            config,
        }
    }

    /// Create a StreamClient backed by reqwest, authenticating with the
    /// config's token when one is set.
    pub fn from_config(config: StreamConfig) -> Self {
        let credentials = StaticToken::from_option(config.auth_token.clone());
        Self::new(
            Arc::new(ReqwestHttpClient::new()),
            Arc::new(credentials),
            config,
        )
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Idle provisioning session.
    pub fn provision(&self) -> ProvisionStream {
        ProvisionStream::provision(
            Arc::clone(&self.http),
            Arc::clone(&self.credentials),
            self.config.clone(),
        )
    }

    /// Idle deployment session.
    pub fn deployment(&self) -> DeploymentStream {
        DeploymentStream::deployment(
            Arc::clone(&self.http),
            Arc::clone(&self.credentials),
            self.config.clone(),
        )
    }

    /// Idle log tail.
    pub fn tail(&self) -> LogTail {
        LogTail::tail(
            Arc::clone(&self.http),
            Arc::clone(&self.credentials),
            self.config.clone(),
        )
    }
}

impl std::fmt::Debug for StreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
