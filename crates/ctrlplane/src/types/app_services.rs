//! Application services manifest models.
//!
//! The manifest is a single document describing every app service in the
//! tenant. Service specs are kind-discriminated; Jupyter is the one kind
//! this SDK models in full. Sections it does not model are captured in a
//! flattened remainder so a fetched manifest can be applied back without
//! losing them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attributes of the app services manifest resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppServicesManifestAttributes {
    /// Manifest rollout state (`ready`, `error`, or a transitional state).
    pub state: String,
    /// Every app service in the tenant.
    pub app_services: Vec<AppService>,
    /// Last rollout error, if any.
    pub last_error: Option<String>,
    /// Manifest fields this SDK does not model, preserved across
    /// fetch-modify-apply cycles.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One app service entry: desired spec plus observed status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppService {
    /// Desired configuration.
    pub spec: AppServiceSpec,
    /// Labels and annotations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ServiceMeta>,
    /// Observed status, present on responses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
}

/// Desired configuration of one app service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppServiceSpec {
    /// Service instance name.
    pub name: String,
    /// Service kind discriminator (`jupyter`, ...).
    pub kind: String,
    /// Owning username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Human-facing name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Credentials the service runs with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialsSpec>,
    /// Compute resource requests and limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesSpec>,
    /// Autoscaling CPU target percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_cpu: Option<i64>,
    /// Maximum replica count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_replicas: Option<i64>,
    /// Minimum replica count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_replicas: Option<i64>,
    /// Whether the service is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Avatar image reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Request a restart on the next apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_for_restart: Option<bool>,
    /// Mark the spec changed so the next apply picks it up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_as_changed: Option<bool>,
    /// Whether all users can see the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to_all: Option<bool>,
    /// Desired lifecycle state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<String>,
    /// Authentication mode at the service's ingress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_mode: Option<String>,
    /// Persistency mode of the service's storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistency_mode: Option<String>,
    /// Jupyter-specific configuration, present when `kind` is `jupyter`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jupyter: Option<JupyterSpec>,
    /// Kind-specific sections of other service kinds, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AppServiceSpec {
    /// Build a Jupyter service spec; sets the kind discriminator.
    pub fn jupyter(name: impl Into<String>, spec: JupyterSpec) -> Self {
        Self {
            name: name.into(),
            kind: "jupyter".to_string(),
            jupyter: Some(spec),
            ..Default::default()
        }
    }
}

/// Credentials an app service runs with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsSpec {
    /// Username the service authenticates as.
    pub username: String,
}

/// Compute resources of one app service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesSpec {
    /// Upper bounds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<SystemResources>,
    /// Guaranteed allocations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<SystemResources>,
}

/// A cpu/memory/gpu triple.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemResources {
    /// CPU quantity, e.g. `"500m"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    /// Memory quantity, e.g. `"1Gi"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    /// GPU count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nvidia_gpu: Option<String>,
}

/// Jupyter service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JupyterSpec {
    /// Container image to run.
    pub image_name: String,
    /// Linked Spark service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_name: Option<String>,
    /// Linked Presto service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presto_name: Option<String>,
    /// Linked frames service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framesd: Option<String>,
    /// Extra environment variables injected into the container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_environment_vars: Option<BTreeMap<String, String>>,
    /// Demo dataset archive location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demos_datasets_archive_address: Option<String>,
    /// Docker registry service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_registry_name: Option<String>,
    /// Whether SSH access is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_enabled: Option<bool>,
}

/// Labels attached to an app service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceMeta {
    /// Label map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

/// Observed status of one app service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceStatus {
    /// Current rollout state of the service.
    pub state: String,
    /// Deployed version.
    pub version: String,
    /// User-facing URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<ServiceUrl>>,
    /// API URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_urls: Option<Vec<ServiceUrl>>,
    /// Cluster-internal API URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_api_urls: Option<Vec<ServiceUrl>>,
    /// Last rollout error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Human-facing name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Structured details of the last error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_info: Option<StatusErrorInfo>,
}

/// A kind-tagged URL in a service status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceUrl {
    /// URL kind (`http`, `https`, ...).
    pub kind: String,
    /// The URL itself.
    pub url: String,
}

/// Details of a service rollout error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusErrorInfo {
    /// Error description.
    pub description: String,
    /// When the error occurred.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_jupyter_constructor_sets_kind() {
        let spec = AppServiceSpec::jupyter(
            "my-jupyter",
            JupyterSpec {
                image_name: "jupyter-all".to_string(),
                ..Default::default()
            },
        );

        assert_eq!(spec.kind, "jupyter");
        assert_eq!(spec.jupyter.as_ref().unwrap().image_name, "jupyter-all");
    }

    #[test]
    fn test_manifest_parses_state_and_services() {
        let parsed: AppServicesManifestAttributes = serde_json::from_value(json!({
            "state": "ready",
            "app_services": [
                {
                    "spec": {"name": "my-jupyter", "kind": "jupyter",
                             "jupyter": {"image_name": "jupyter-all"}},
                    "status": {"state": "ready", "version": "3.0.0"}
                }
            ]
        }))
        .unwrap();

        assert_eq!(parsed.state, "ready");
        assert_eq!(parsed.app_services.len(), 1);
        assert_eq!(parsed.app_services[0].spec.name, "my-jupyter");
        assert_eq!(
            parsed.app_services[0].status.as_ref().unwrap().state,
            "ready"
        );
    }

    #[test]
    fn test_unknown_service_sections_are_preserved() {
        let parsed: AppServiceSpec = serde_json::from_value(json!({
            "name": "sso",
            "kind": "dex",
            "dex": {"connectors": []}
        }))
        .unwrap();

        assert!(parsed.extra.contains_key("dex"));
        let rendered = serde_json::to_value(&parsed).unwrap();
        assert_eq!(rendered["dex"], json!({"connectors": []}));
    }

    #[test]
    fn test_unset_spec_fields_are_omitted_from_requests() {
        let spec = AppServiceSpec::jupyter("j", JupyterSpec::default());
        let rendered = serde_json::to_value(&spec).unwrap();

        assert!(rendered.get("owner").is_none());
        assert!(rendered.get("resources").is_none());
        assert_eq!(rendered["kind"], "jupyter");
    }
}
