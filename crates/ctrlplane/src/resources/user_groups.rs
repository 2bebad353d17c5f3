//! User groups endpoint

use derive_builder::Builder;
use serde::Serialize;

use super::Resource;
use crate::{
    client::Client,
    error::Result,
    types::{
        Relationship, Relationships, ResourceIdentifier, ResourceKind, ResourceObject,
        TenantManagementRole, UserGroupAttributes,
    },
};

/// A user group resource with parsed attributes.
pub type UserGroup = ResourceObject<UserGroupAttributes>;

/// User groups API resource.
#[derive(Clone)]
pub struct UserGroups {
    client: Client,
}

/// Payload for creating a user group.
#[derive(Debug, Clone, Serialize, Builder)]
#[builder(setter(into, strip_option))]
pub struct CreateUserGroupRequest {
    /// Group name.
    name: String,
    /// Free-text description.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Unix gid; leave unset for auto-assignment.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    gid: Option<i64>,
    /// Management roles; defaults to Data plus Application Admin.
    #[builder(default = "default_assigned_policies()")]
    assigned_policies: Vec<TenantManagementRole>,
    /// Users to enroll; sent as a relationship, not an attribute.
    #[builder(default)]
    #[serde(skip)]
    user_ids: Vec<String>,
}

impl CreateUserGroupRequest {
    /// Create a builder for the payload.
    pub fn builder() -> CreateUserGroupRequestBuilder {
        CreateUserGroupRequestBuilder::default()
    }
}

fn default_assigned_policies() -> Vec<TenantManagementRole> {
    vec![
        TenantManagementRole::Data,
        TenantManagementRole::ApplicationAdmin,
    ]
}

impl UserGroups {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a new user group, enrolling any requested members.
    pub async fn create(&self, request: CreateUserGroupRequest) -> Result<UserGroup> {
        let relationships = if request.user_ids.is_empty() {
            None
        } else {
            let mut relationships = Relationships::new();
            relationships.insert(
                "users".to_string(),
                Relationship {
                    data: request
                        .user_ids
                        .iter()
                        .map(|user_id| ResourceIdentifier::new("user", user_id.as_str()))
                        .collect(),
                },
            );
            Some(relationships)
        };

        let document = self
            .client
            .create(ResourceKind::UserGroup, &request, relationships)
            .await?;
        Ok(document.data)
    }

    /// Get a user group by id.
    pub async fn get(&self, group_id: &str) -> Result<UserGroup> {
        let document = self
            .client
            .detail(ResourceKind::UserGroup, group_id, &[])
            .await?;
        Ok(document.data)
    }

    /// List all user groups.
    pub async fn list(&self) -> Result<Vec<UserGroup>> {
        let document = self.client.list(ResourceKind::UserGroup, &[]).await?;
        Ok(document.data)
    }

    /// Update a user group, returning the freshly fetched resource.
    pub async fn update<A: Serialize>(
        &self,
        group_id: &str,
        attributes: &A,
        relationships: Option<Relationships>,
    ) -> Result<UserGroup> {
        self.client
            .update(ResourceKind::UserGroup, group_id, attributes, relationships)
            .await?;
        self.get(group_id).await
    }

    /// Delete a user group.
    pub async fn delete(&self, group_id: &str, ignore_missing: bool) -> Result<()> {
        self.client
            .delete(ResourceKind::UserGroup, group_id, ignore_missing)
            .await
    }
}

impl Resource for UserGroups {
    fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request = CreateUserGroupRequest::builder()
            .name("devs")
            .build()
            .unwrap();

        let rendered = serde_json::to_value(&request).unwrap();
        assert_eq!(
            rendered["assigned_policies"],
            serde_json::json!(["Data", "Application Admin"])
        );
        // Unset optionals stay off the wire; member ids are not attributes.
        assert!(rendered.get("description").is_none());
        assert!(rendered.get("gid").is_none());
        assert!(rendered.get("user_ids").is_none());
    }

    #[test]
    fn test_create_request_with_members() {
        let request = CreateUserGroupRequest::builder()
            .name("devs")
            .description("developer group")
            .gid(7001i64)
            .user_ids(vec!["u-1".to_string(), "u-2".to_string()])
            .build()
            .unwrap();

        assert_eq!(request.user_ids.len(), 2);
        let rendered = serde_json::to_value(&request).unwrap();
        assert_eq!(rendered["description"], "developer group");
        assert_eq!(rendered["gid"], 7001);
    }
}
