//! Server provisioning progress stream.

use std::sync::Arc;

use crate::config::StreamConfig;
use crate::traits::{CredentialsProvider, HttpClient};

use super::variant::{encode, VariantSpec};
use super::StreamSession;

/// Outcome labels sent in the provisioning terminal frame.
pub const PROVISION_STATUSES: &[&str] = &["active", "failed"];

/// Identifies one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProvisionParams {
    pub server_id: String,
    /// One-shot correlation token returned when provisioning was triggered
    pub token: String,
}

impl ProvisionParams {
    pub fn new(server_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            token: token.into(),
        }
    }

    /// Params only when both values are present and non-empty.
    pub fn from_parts(server_id: Option<&str>, token: Option<&str>) -> Option<Self> {
        match (server_id, token) {
            (Some(server_id), Some(token)) if !server_id.is_empty() && !token.is_empty() => {
                Some(Self::new(server_id, token))
            }
            _ => None,
        }
    }
}

fn address(config: &StreamConfig, params: &ProvisionParams) -> String {
    format!(
        "{}/api/servers/{}/provision/{}/stream",
        config.base_url,
        encode(&params.server_id),
        encode(&params.token)
    )
}

/// Finite; ends on a terminal frame carrying one of [`PROVISION_STATUSES`].
pub const PROVISION: VariantSpec<ProvisionParams> = VariantSpec {
    name: "provision",
    finite: true,
    address,
    statuses: PROVISION_STATUSES,
};

pub type ProvisionStream = StreamSession<ProvisionParams>;

impl StreamSession<ProvisionParams> {
    /// Idle provisioning session.
    pub fn provision(
        client: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialsProvider>,
        config: StreamConfig,
    ) -> Self {
        Self::new(PROVISION, client, credentials, config)
    }
}
