//! Attribute models for the managed resource types.
//!
//! Every model deserializes with `#[serde(default)]` so that fields added
//! by newer server versions, or omitted by older ones, never break parsing.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::constants::{JobState, SessionPlane, TenantManagementRole};

/// Ten years, the service-side default lifetime of an access key.
const DEFAULT_ACCESS_KEY_TTL: i64 = 315_360_000;

/// Three hours, the service-side default execution budget of a job.
const DEFAULT_JOB_EXECUTION_TIME: i64 = 3 * 60 * 60;

/// Attributes of a user resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAttributes {
    /// Login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Unix uid assigned by the service.
    pub uid: i64,
    /// Creation timestamp, as the service renders it.
    pub created_at: String,
    /// Data access mode.
    pub data_access_mode: String,
    /// Authentication scheme in effect for the user.
    pub authentication_scheme: String,
    /// Whether the initial password is mailed out on creation.
    pub send_password_on_creation: bool,
    /// Management roles granted to the user.
    pub assigned_policies: Vec<TenantManagementRole>,
    /// Operational status reported by the service.
    pub operational_status: String,
    /// Administrative status reported by the service.
    pub admin_status: String,
    /// Password; never serialized back to the service.
    #[serde(skip_serializing)]
    pub password: Option<SecretString>,
}

/// Attributes of a user group resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroupAttributes {
    /// Group name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Data access mode.
    pub data_access_mode: String,
    /// Unix gid; zero means auto-assign.
    pub gid: i64,
    /// Group kind (`local` or directory-backed).
    pub kind: String,
    /// Management roles granted to group members.
    pub assigned_policies: Vec<TenantManagementRole>,
    /// Whether the group is provided by the system and thus immutable.
    pub system_provided: bool,
}

impl Default for UserGroupAttributes {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            data_access_mode: "enabled".to_string(),
            gid: 0,
            kind: "local".to_string(),
            assigned_policies: Vec::new(),
            system_provided: false,
        }
    }
}

/// Attributes of an access key resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessKeyAttributes {
    /// Owning tenant.
    pub tenant_id: String,
    /// Lifetime in seconds.
    pub ttl: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Groups the key inherits membership from.
    pub group_ids: Vec<String>,
    /// Unix uid of the owner.
    pub uid: i64,
    /// Unix gids of the owner.
    pub gids: Vec<i64>,
    /// Expiry as epoch seconds; zero means the ttl governs.
    pub expires_at: i64,
    /// Interface the key was minted for.
    pub interface_kind: String,
    /// Free-text label.
    pub label: String,
    /// Key kind discriminator.
    pub kind: String,
    /// Planes the key is valid on.
    pub planes: Vec<SessionPlane>,
}

impl Default for AccessKeyAttributes {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            ttl: DEFAULT_ACCESS_KEY_TTL,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            group_ids: Vec::new(),
            uid: 0,
            gids: Vec::new(),
            expires_at: 0,
            interface_kind: "web".to_string(),
            label: String::new(),
            kind: "accessKey".to_string(),
            planes: SessionPlane::all(),
        }
    }
}

/// Attributes of an asynchronous job resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobAttributes {
    /// Job kind discriminator.
    pub kind: String,
    /// Opaque, kind-specific parameters.
    pub params: String,
    /// Total execution budget in seconds.
    pub max_total_execution_time: i64,
    /// Per-worker execution budget in seconds.
    pub max_worker_execution_time: Option<i64>,
    /// Scheduling delay in seconds.
    pub delay: f64,
    /// Current lifecycle state.
    pub state: JobState,
    /// Opaque result payload; for failed jobs often a JSON object with
    /// `message` and an optional `status` code.
    pub result: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Follow-up actions on success.
    pub on_success: Option<Vec<serde_json::Value>>,
    /// Follow-up actions on failure.
    pub on_failure: Option<Vec<serde_json::Value>>,
    /// Handler that executes the job.
    pub handler: String,
    /// Server-side correlation id.
    pub ctx_id: String,
}

impl Default for JobAttributes {
    fn default() -> Self {
        Self {
            kind: String::new(),
            params: String::new(),
            max_total_execution_time: DEFAULT_JOB_EXECUTION_TIME,
            max_worker_execution_time: None,
            delay: 0.0,
            state: JobState::Created,
            result: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            on_success: None,
            on_failure: None,
            handler: String::new(),
            ctx_id: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_attributes_tolerate_unknown_fields() {
        let parsed: UserAttributes = serde_json::from_value(json!({
            "username": "jane",
            "assigned_policies": ["Developer", "Application Read Only"],
            "some_new_field": "from a newer server",
        }))
        .unwrap();

        assert_eq!(parsed.username, "jane");
        assert_eq!(
            parsed.assigned_policies,
            vec![
                TenantManagementRole::Developer,
                TenantManagementRole::ApplicationReadOnly
            ]
        );
    }

    #[test]
    fn test_user_password_is_never_serialized() {
        let user = UserAttributes {
            username: "jane".to_string(),
            password: Some(SecretString::from("hunter2")),
            ..Default::default()
        };

        let rendered = serde_json::to_value(&user).unwrap();
        assert!(rendered.get("password").is_none());
    }

    #[test]
    fn test_job_attributes_defaults() {
        let parsed: JobAttributes = serde_json::from_value(json!({})).unwrap();

        assert_eq!(parsed.state, JobState::Created);
        assert_eq!(parsed.max_total_execution_time, DEFAULT_JOB_EXECUTION_TIME);
        assert_eq!(parsed.result, "");
    }

    #[test]
    fn test_job_attributes_parse_state_and_result() {
        let parsed: JobAttributes = serde_json::from_value(json!({
            "kind": "cluster.reload",
            "state": "in_progress",
            "result": "",
            "ctx_id": "ctx-1",
        }))
        .unwrap();

        assert_eq!(parsed.state, JobState::InProgress);
        assert_eq!(parsed.kind, "cluster.reload");
    }

    #[test]
    fn test_access_key_defaults() {
        let attributes = AccessKeyAttributes::default();

        assert_eq!(attributes.ttl, DEFAULT_ACCESS_KEY_TTL);
        assert_eq!(attributes.interface_kind, "web");
        assert_eq!(attributes.planes, SessionPlane::all());
    }

    #[test]
    fn test_user_group_defaults() {
        let attributes = UserGroupAttributes::default();

        assert_eq!(attributes.data_access_mode, "enabled");
        assert_eq!(attributes.kind, "local");
        assert_eq!(attributes.gid, 0);
    }
}
