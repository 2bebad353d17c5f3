//! Access keys endpoint

use derive_builder::Builder;
use serde::Serialize;

use super::Resource;
use crate::{
    client::Client,
    error::Result,
    types::{AccessKeyAttributes, ResourceKind, ResourceObject, SessionPlane},
};

/// An access key resource with parsed attributes.
pub type AccessKey = ResourceObject<AccessKeyAttributes>;

/// Access keys API resource.
#[derive(Clone)]
pub struct AccessKeys {
    client: Client,
}

/// Payload for creating an access key.
#[derive(Debug, Clone, Serialize, Builder)]
#[builder(setter(into, strip_option))]
pub struct CreateAccessKeyRequest {
    /// Planes the key is valid on; defaults to all of them.
    #[builder(default = "SessionPlane::all()")]
    planes: Vec<SessionPlane>,
    /// Free-text label.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl CreateAccessKeyRequest {
    /// Create a builder for the payload.
    pub fn builder() -> CreateAccessKeyRequestBuilder {
        CreateAccessKeyRequestBuilder::default()
    }
}

impl AccessKeys {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a new access key for the authenticated user.
    pub async fn create(&self, request: CreateAccessKeyRequest) -> Result<AccessKey> {
        let document = self
            .client
            .create(ResourceKind::AccessKey, &request, None)
            .await?;
        Ok(document.data)
    }

    /// Get an access key by id.
    pub async fn get(&self, access_key_id: &str) -> Result<AccessKey> {
        let document = self
            .client
            .detail(ResourceKind::AccessKey, access_key_id, &[])
            .await?;
        Ok(document.data)
    }

    /// List all access keys of the authenticated user.
    pub async fn list(&self) -> Result<Vec<AccessKey>> {
        let document = self.client.list(ResourceKind::AccessKey, &[]).await?;
        Ok(document.data)
    }

    /// Delete an access key.
    pub async fn delete(&self, access_key_id: &str, ignore_missing: bool) -> Result<()> {
        self.client
            .delete(ResourceKind::AccessKey, access_key_id, ignore_missing)
            .await
    }
}

impl Resource for AccessKeys {
    fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_to_all_planes() {
        let request = CreateAccessKeyRequest::builder().build().unwrap();

        let rendered = serde_json::to_value(&request).unwrap();
        assert_eq!(rendered["planes"], serde_json::json!(["data", "control"]));
        assert!(rendered.get("label").is_none());
    }

    #[test]
    fn test_create_request_with_label_and_planes() {
        let request = CreateAccessKeyRequest::builder()
            .planes(vec![SessionPlane::Control])
            .label("ci key")
            .build()
            .unwrap();

        let rendered = serde_json::to_value(&request).unwrap();
        assert_eq!(rendered["planes"], serde_json::json!(["control"]));
        assert_eq!(rendered["label"], "ci key");
    }
}
