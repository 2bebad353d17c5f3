//! App services manifest endpoint

use std::time::Duration;

use ctrlplane_core::retry::{Retry, StillPending};

use super::Resource;
use crate::{
    client::Client,
    error::{Error, Result},
    types::{AppServicesManifestAttributes, ResourceKind, ResourceObject},
};

/// The app services manifest resource.
pub type AppServicesManifest = ResourceObject<AppServicesManifestAttributes>;

/// Time for an apply to register before the first state poll.
pub const DEFAULT_APPLY_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Default interval between rollout state polls.
pub const DEFAULT_APPLY_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default deadline for a rollout to settle.
pub const DEFAULT_APPLY_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// App services manifest API resource.
///
/// The manifest is a singleton: it cannot be deleted and has no per-id
/// detail endpoint, so [`get`](AppServices::get) reads the single element
/// the list endpoint returns.
#[derive(Clone)]
pub struct AppServices {
    client: Client,
}

impl AppServices {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get the manifest.
    pub async fn get(&self) -> Result<AppServicesManifest> {
        let mut manifests = self.list().await?;
        if manifests.is_empty() {
            return Err(Error::NotFound("app services manifest".to_string()));
        }
        Ok(manifests.remove(0))
    }

    /// List the manifest collection (a single element in practice).
    pub async fn list(&self) -> Result<Vec<AppServicesManifest>> {
        let document = self
            .client
            .list(ResourceKind::AppServicesManifest, &[])
            .await?;
        Ok(document.data)
    }

    /// Apply a manifest without waiting for the rollout.
    ///
    /// Returns the manifest as the service reports it right after the
    /// apply was accepted.
    pub async fn apply(
        &self,
        attributes: &AppServicesManifestAttributes,
    ) -> Result<AppServicesManifest> {
        self.client
            .update(ResourceKind::AppServicesManifest, "", attributes, None)
            .await?;
        self.get().await
    }

    /// Apply a manifest and poll until the rollout settles.
    pub async fn apply_and_wait(
        &self,
        attributes: &AppServicesManifestAttributes,
    ) -> Result<AppServicesManifest> {
        self.apply_and_wait_with(
            attributes,
            DEFAULT_APPLY_SETTLE_DELAY,
            DEFAULT_APPLY_POLL_INTERVAL,
            DEFAULT_APPLY_TIMEOUT,
        )
        .await
    }

    /// Apply a manifest and poll until the rollout settles, with explicit
    /// timing.
    ///
    /// `settle_delay` runs once before the first poll, giving the service
    /// time to leave the previous `ready` state.
    pub async fn apply_and_wait_with(
        &self,
        attributes: &AppServicesManifestAttributes,
        settle_delay: Duration,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<AppServicesManifest> {
        self.client
            .update(ResourceKind::AppServicesManifest, "", attributes, None)
            .await?;
        tokio::time::sleep(settle_delay).await;
        self.wait_until_ready_with(poll_interval, timeout).await
    }

    /// Poll the manifest until the rollout settles, with default timing.
    pub async fn wait_until_ready(&self) -> Result<AppServicesManifest> {
        self.wait_until_ready_with(DEFAULT_APPLY_POLL_INTERVAL, DEFAULT_APPLY_TIMEOUT)
            .await
    }

    /// Poll the manifest until its state leaves the transitional set.
    ///
    /// `ready` returns the manifest; `error` fails with
    /// [`Error::ApplyFailed`]; anything else keeps polling until `timeout`,
    /// then fails with [`Error::RetryExhausted`].
    pub async fn wait_until_ready_with(
        &self,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<AppServicesManifest> {
        let retry = Retry::fixed(poll_interval).timeout(timeout).verbose(true);

        let manifest = retry
            .call("wait_for_app_services_ready", || async move {
                let manifest = self.get().await?;
                let state = manifest.attributes.state.as_str();
                if state != "ready" && state != "error" {
                    return Err(Error::JobPending(
                        StillPending::new("waiting for app services apply")
                            .with_field("state", state),
                    ));
                }
                Ok(manifest)
            })
            .await?;

        if manifest.attributes.state != "ready" {
            return Err(Error::ApplyFailed(manifest.attributes.state.clone()));
        }
        Ok(manifest)
    }
}

impl Resource for AppServices {
    fn client(&self) -> &Client {
        &self.client
    }
}
