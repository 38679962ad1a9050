//! Application deployment progress stream.

use std::sync::Arc;

use crate::config::StreamConfig;
use crate::traits::{CredentialsProvider, HttpClient};

use super::variant::{encode, VariantSpec};
use super::StreamSession;

/// Outcome labels sent in the deployment terminal frame.
pub const DEPLOYMENT_STATUSES: &[&str] = &["success", "failed", "cancelled"];

/// Identifies one deployment of one application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentParams {
    pub app_id: String,
    pub deployment_id: String,
}

impl DeploymentParams {
    pub fn new(app_id: impl Into<String>, deployment_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            deployment_id: deployment_id.into(),
        }
    }

    /// Params only when both ids are present and non-empty.
    pub fn from_parts(app_id: Option<&str>, deployment_id: Option<&str>) -> Option<Self> {
        let app_id = app_id.filter(|id| !id.is_empty())?;
        let deployment_id = deployment_id.filter(|id| !id.is_empty())?;
        Some(Self::new(app_id, deployment_id))
    }
}

fn address(config: &StreamConfig, params: &DeploymentParams) -> String {
    format!(
        "{}/api/apps/{}/deployments/{}/stream",
        config.base_url,
        encode(&params.app_id),
        encode(&params.deployment_id)
    )
}

pub const DEPLOYMENT: VariantSpec<DeploymentParams> = VariantSpec {
    name: "deployment",
    finite: true,
    address,
    statuses: DEPLOYMENT_STATUSES,
};

pub type DeploymentStream = StreamSession<DeploymentParams>;

impl StreamSession<DeploymentParams> {
    /// Idle deployment session.
    pub fn deployment(
        client: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialsProvider>,
        config: StreamConfig,
    ) -> Self {
        Self::new(DEPLOYMENT, client, credentials, config)
    }
}
