// Remote agent registration
//
// Thin client over the Vertex AI Agent Engine REST surface: register the
// pipeline as a remotely invokable agent, or delete a previous registration
// by resource id. Cloud auth flows are out of scope; the bearer token is
// taken as given.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 120;

pub const AGENT_NAME: &str = "product_descriptor";
pub const AGENT_DESCRIPTION: &str = "A helpful assistant for product description.";

/// Deployment coordinates resolved from settings and flags.
#[derive(Debug, Clone)]
pub struct DeployTarget {
    pub project: String,
    pub location: String,
    pub bucket: String,
}

pub struct AgentEngineClient {
    client: Client,
    base_url: String,
    target: DeployTarget,
    access_token: String,
}

impl AgentEngineClient {
    pub fn new(target: DeployTarget, access_token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = format!("https://{}-aiplatform.googleapis.com/v1beta1", target.location);
        Ok(Self {
            client,
            base_url,
            target,
            access_token,
        })
    }

    /// Override the API base URL (used by tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn engines_url(&self) -> String {
        format!(
            "{}/projects/{}/locations/{}/reasoningEngines",
            self.base_url, self.target.project, self.target.location
        )
    }

    /// Register the pipeline as a remote agent. Returns the operation name;
    /// the engine resource id appears once the operation completes.
    pub async fn create(&self, display_name: &str, description: &str) -> Result<String> {
        let body = CreateEngineBody {
            display_name: display_name.to_string(),
            description: description.to_string(),
            spec: EngineSpec {
                agent_framework: "custom".to_string(),
                package_spec: PackageSpec {
                    staging_uri: format!("gs://{}/prodscribe", self.target.bucket),
                },
            },
        };

        let response = self
            .client
            .post(self.engines_url())
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .context("Failed to send create request to Agent Engine API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Agent Engine create failed\n\nStatus: {}\nBody: {}",
                status,
                error_body
            );
        }

        let operation: Operation = response
            .json()
            .await
            .context("Failed to parse Agent Engine create response")?;

        tracing::info!(operation = %operation.name, "Agent registration submitted");
        Ok(operation.name)
    }

    /// Delete a previously registered agent by resource id. Accepts either a
    /// bare id or a full `projects/.../reasoningEngines/...` resource name.
    pub async fn delete(&self, resource_id: &str) -> Result<()> {
        let url = if resource_id.contains('/') {
            format!("{}/{}?force=true", self.base_url, resource_id)
        } else {
            format!("{}/{}?force=true", self.engines_url(), resource_id)
        };

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to send delete request to Agent Engine API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Agent Engine delete failed\n\nStatus: {}\nBody: {}",
                status,
                error_body
            );
        }

        Ok(())
    }
}

// Agent Engine API types

#[derive(Debug, Serialize)]
struct CreateEngineBody {
    #[serde(rename = "displayName")]
    display_name: String,
    description: String,
    spec: EngineSpec,
}

#[derive(Debug, Serialize)]
struct EngineSpec {
    #[serde(rename = "agentFramework")]
    agent_framework: String,
    #[serde(rename = "packageSpec")]
    package_spec: PackageSpec,
}

#[derive(Debug, Serialize)]
struct PackageSpec {
    #[serde(rename = "stagingUri")]
    staging_uri: String,
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
}
