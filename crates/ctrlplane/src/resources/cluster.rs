//! Cluster configuration operations
//!
//! Configurations have no resource representation of their own; reloading
//! one is an operation that spawns a job.

use std::time::Duration;

use super::Resource;
use crate::{client::Client, error::Result, types::ConfigType};

/// Default deadline for a configuration reload job.
pub const DEFAULT_RELOAD_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Cluster configuration operations.
#[derive(Clone)]
pub struct ClusterConfigurations {
    client: Client,
}

impl ClusterConfigurations {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Trigger a configuration reload and wait for its job to complete.
    ///
    /// Returns the job id.
    pub async fn reload(&self, config_type: ConfigType) -> Result<String> {
        self.client
            .request_job(&reload_path(config_type), DEFAULT_RELOAD_TIMEOUT)
            .await
    }

    /// Trigger a configuration reload without waiting; returns the job id
    /// to poll through [`Jobs`](crate::resources::Jobs).
    pub async fn start_reload(&self, config_type: ConfigType) -> Result<String> {
        self.client.submit_job(&reload_path(config_type)).await
    }
}

fn reload_path(config_type: ConfigType) -> String {
    format!("configurations/{}/reloads", config_type.as_str())
}

impl Resource for ClusterConfigurations {
    fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_path() {
        assert_eq!(
            reload_path(ConfigType::Cluster),
            "configurations/cluster/reloads"
        );
        assert_eq!(
            reload_path(ConfigType::ArtifactVersionManifest),
            "configurations/artifact_version_manifest/reloads"
        );
    }
}
