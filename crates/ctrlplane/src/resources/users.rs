//! Users endpoint

use derive_builder::Builder;
use serde::Serialize;

use super::Resource;
use crate::{
    client::Client,
    error::Result,
    types::{
        Document, Relationships, ResourceIdentifier, ResourceKind, ResourceObject,
        TenantManagementRole, UserAttributes,
    },
};

/// A user resource with parsed attributes.
pub type User = ResourceObject<UserAttributes>;

/// Users API resource.
#[derive(Clone)]
pub struct Users {
    client: Client,
}

/// Payload for creating a user.
///
/// # Example
///
/// ```rust,no_run
/// # use ctrlplane::resources::users::CreateUserRequest;
/// let request = CreateUserRequest::builder()
///     .username("jane")
///     .password("initial-secret")
///     .email("jane@example.com")
///     .first_name("Jane")
///     .last_name("Doe")
///     .build()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Serialize, Builder)]
#[builder(setter(into))]
pub struct CreateUserRequest {
    /// Login name.
    username: String,
    /// Initial password.
    password: String,
    /// Contact email.
    email: String,
    /// Given name.
    first_name: String,
    /// Family name.
    last_name: String,
    /// Management roles; defaults to Developer plus Application Read Only.
    #[builder(default = "default_assigned_policies()")]
    assigned_policies: Vec<TenantManagementRole>,
}

impl CreateUserRequest {
    /// Create a builder for the payload.
    pub fn builder() -> CreateUserRequestBuilder {
        CreateUserRequestBuilder::default()
    }
}

fn default_assigned_policies() -> Vec<TenantManagementRole> {
    vec![
        TenantManagementRole::Developer,
        TenantManagementRole::ApplicationReadOnly,
    ]
}

impl Users {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a new user.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User> {
        let document = self.client.create(ResourceKind::User, &request, None).await?;
        Ok(document.data)
    }

    /// Get a user by id.
    pub async fn get(&self, user_id: &str) -> Result<User> {
        self.get_with_include(user_id, &[]).await
    }

    /// Get a user by id, including linked resources (e.g. `user_groups`).
    pub async fn get_with_include(&self, user_id: &str, include: &[&str]) -> Result<User> {
        let mut query = Vec::new();
        if !include.is_empty() {
            query.push(("include".to_string(), include.join(",")));
        }
        let document = self
            .client
            .detail(ResourceKind::User, user_id, &query)
            .await?;
        Ok(document.data)
    }

    /// List all users.
    pub async fn list(&self) -> Result<Vec<User>> {
        self.list_filtered(&[]).await
    }

    /// List users matching attribute filters, e.g. `[("username", "jane")]`.
    pub async fn list_filtered(&self, filter_by: &[(&str, &str)]) -> Result<Vec<User>> {
        let query: Vec<(String, String)> = filter_by
            .iter()
            .map(|(key, value)| (format!("filter[{key}]"), value.to_string()))
            .collect();
        let document = self.client.list(ResourceKind::User, &query).await?;
        Ok(document.data)
    }

    /// Get the user the current credentials belong to.
    pub async fn current(&self) -> Result<User> {
        let document: Document<UserAttributes> = self.client.get_raw("self").await?;
        Ok(document.data)
    }

    /// Update a user, returning the freshly fetched resource.
    ///
    /// The service omits the updated resource from the update response, so
    /// a follow-up fetch is required.
    pub async fn update<A: Serialize>(
        &self,
        user_id: &str,
        attributes: &A,
        relationships: Option<Relationships>,
    ) -> Result<User> {
        self.client
            .update(ResourceKind::User, user_id, attributes, relationships)
            .await?;
        self.get(user_id).await
    }

    /// Delete a user.
    pub async fn delete(&self, user_id: &str, ignore_missing: bool) -> Result<()> {
        self.client
            .delete(ResourceKind::User, user_id, ignore_missing)
            .await
    }

    /// Add a user to a group, keeping existing memberships.
    ///
    /// No-op when the user is already a member.
    pub async fn add_to_group(&self, user_id: &str, group_id: &str) -> Result<()> {
        let mut user = self.get_with_include(user_id, &["user_groups"]).await?;

        let entry = user
            .relationships
            .entry("user_groups".to_string())
            .or_default();
        if entry.data.iter().any(|identifier| identifier.id == group_id) {
            return Ok(());
        }
        entry
            .data
            .push(ResourceIdentifier::new("user_group", group_id));

        self.client
            .update(
                ResourceKind::User,
                user_id,
                &serde_json::Map::new(),
                Some(user.relationships),
            )
            .await
    }

    /// Remove a user from a group.
    pub async fn remove_from_group(&self, user_id: &str, group_id: &str) -> Result<()> {
        let mut user = self.get_with_include(user_id, &["user_groups"]).await?;

        let Some(entry) = user.relationships.get_mut("user_groups") else {
            return Ok(());
        };
        entry.data.retain(|identifier| identifier.id != group_id);

        self.client
            .update(
                ResourceKind::User,
                user_id,
                &serde_json::Map::new(),
                Some(user.relationships),
            )
            .await
    }
}

impl Resource for Users {
    fn client(&self) -> &Client {
        &self.client
    }
}
