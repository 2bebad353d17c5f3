//! Closed vocabularies used by the control-plane API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The API planes a session or access key can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPlane {
    /// Data-path API.
    Data,
    /// Control-path (management) API.
    Control,
}

impl SessionPlane {
    /// Every plane, the default scope for new access keys.
    pub fn all() -> Vec<SessionPlane> {
        vec![SessionPlane::Data, SessionPlane::Control]
    }
}

/// Tenant-level management roles assignable to users and groups.
///
/// The wire format uses the display names ("IT Admin", not `it_admin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenantManagementRole {
    /// "IT Admin"
    #[serde(rename = "IT Admin")]
    ItAdmin,
    /// "Application Admin"
    #[serde(rename = "Application Admin")]
    ApplicationAdmin,
    /// "Security Admin"
    #[serde(rename = "Security Admin")]
    SecurityAdmin,
    /// "Project Security Admin"
    #[serde(rename = "Project Security Admin")]
    ProjectSecurityAdmin,
    /// "Project Read Only"
    #[serde(rename = "Project Read Only")]
    ProjectReadOnly,
    /// "Application Read Only"
    #[serde(rename = "Application Read Only")]
    ApplicationReadOnly,
    /// "Data"
    Data,
    /// "Tenant Admin"
    #[serde(rename = "Tenant Admin")]
    TenantAdmin,
    /// "Developer"
    Developer,
    /// "Service Admin"
    #[serde(rename = "Service Admin")]
    ServiceAdmin,
    /// "System Admin"
    #[serde(rename = "System Admin")]
    SystemAdmin,
}

/// Cluster configuration kinds that can be reloaded as a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigType {
    /// Artifact version manifest.
    ArtifactVersionManifest,
    /// Event configuration.
    Events,
    /// Cluster-wide configuration.
    Cluster,
    /// Application services configuration.
    AppServices,
}

impl ConfigType {
    /// Path segment used when requesting a reload.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigType::ArtifactVersionManifest => "artifact_version_manifest",
            ConfigType::Events => "events",
            ConfigType::Cluster => "cluster",
            ConfigType::AppServices => "app_services",
        }
    }
}

/// Lifecycle states of an asynchronous job.
///
/// The service owns the state machine; the client only reads it. Polling
/// keeps going for any state outside the terminal set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Accepted but not yet started.
    #[default]
    Created,
    /// Currently executing.
    InProgress,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Stopped before finishing.
    Canceled,
}

impl JobState {
    /// Whether no further transition can occur from this state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Canceled
        )
    }

    /// Wire name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Created => "created",
            JobState::InProgress => "in_progress",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Canceled => "canceled",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The manageable resource types and their URL path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A platform user.
    User,
    /// A group of users.
    UserGroup,
    /// An authentication access key.
    AccessKey,
    /// An asynchronous job.
    Job,
    /// The application services manifest.
    AppServicesManifest,
}

impl ResourceKind {
    /// Singular type name used in request envelopes.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::UserGroup => "user_group",
            ResourceKind::AccessKey => "access_key",
            ResourceKind::Job => "job",
            ResourceKind::AppServicesManifest => "app_services_manifest",
        }
    }

    /// Pluralized URL path segment for the resource collection.
    pub fn path_segment(self) -> &'static str {
        match self {
            ResourceKind::User => "users",
            ResourceKind::UserGroup => "user_groups",
            ResourceKind::AccessKey => "access_keys",
            ResourceKind::Job => "jobs",
            ResourceKind::AppServicesManifest => "app_services_manifests",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Canceled.is_terminal());
        assert!(!JobState::Created.is_terminal());
        assert!(!JobState::InProgress.is_terminal());
    }

    #[test]
    fn test_job_state_wire_names() {
        assert_eq!(
            serde_json::to_value(JobState::InProgress).unwrap(),
            serde_json::json!("in_progress")
        );
        let parsed: JobState = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(parsed, JobState::Canceled);
    }

    #[test]
    fn test_role_wire_names_are_display_names() {
        assert_eq!(
            serde_json::to_value(TenantManagementRole::ApplicationReadOnly).unwrap(),
            serde_json::json!("Application Read Only")
        );
        let parsed: TenantManagementRole = serde_json::from_str("\"IT Admin\"").unwrap();
        assert_eq!(parsed, TenantManagementRole::ItAdmin);
    }

    #[test]
    fn test_resource_kind_pluralization() {
        assert_eq!(ResourceKind::User.path_segment(), "users");
        assert_eq!(ResourceKind::UserGroup.path_segment(), "user_groups");
        assert_eq!(ResourceKind::AccessKey.path_segment(), "access_keys");
        assert_eq!(
            ResourceKind::AppServicesManifest.path_segment(),
            "app_services_manifests"
        );
    }

    #[test]
    fn test_session_plane_all() {
        assert_eq!(
            serde_json::to_value(SessionPlane::all()).unwrap(),
            serde_json::json!(["data", "control"])
        );
    }
}
