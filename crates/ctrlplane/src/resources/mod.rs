//! API resource endpoints
//!
//! One handle per resource type, created lazily by the client. Handles are
//! cheap clones around the shared client and expose the operations the
//! service supports for that type; operations the service rejects (job
//! deletion, manifest deletion) simply do not exist here.

pub mod access_keys;
pub mod app_services;
pub mod cluster;
pub mod jobs;
pub mod user_groups;
pub mod users;

pub use access_keys::{AccessKey, AccessKeys, CreateAccessKeyRequest};
pub use app_services::{AppServices, AppServicesManifest};
pub use cluster::ClusterConfigurations;
pub use jobs::{Job, Jobs};
pub use user_groups::{CreateUserGroupRequest, UserGroup, UserGroups};
pub use users::{CreateUserRequest, User, Users};

use crate::client::Client;

/// Base trait for API resources.
pub trait Resource {
    /// Get a reference to the owning client.
    fn client(&self) -> &Client;
}
