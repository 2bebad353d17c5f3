//! JSON:API envelope types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single-resource response document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<A = serde_json::Value> {
    /// The enclosed resource.
    pub data: ResourceObject<A>,
    /// Response metadata (correlation id and friends).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// A list response document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDocument<A = serde_json::Value> {
    /// The enclosed resources.
    pub data: Vec<ResourceObject<A>>,
    /// Response metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// One resource inside a document: type, id, attributes, relationships.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceObject<A = serde_json::Value> {
    /// Resource type name, e.g. `"user"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Server-assigned identifier. Absent on resources that have no
    /// per-instance identity (the app services manifest).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    /// Typed attribute payload.
    pub attributes: A,
    /// Named links to other resources.
    #[serde(default, skip_serializing_if = "Relationships::is_empty")]
    pub relationships: Relationships,
}

/// A resource identifier, which the service emits as either a string or an
/// integer depending on the resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// String-form id (jobs, users, ...).
    String(String),
    /// Integer-form id (uids, gids).
    Number(i64),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::String(id) => f.write_str(id),
            ResourceId::Number(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId::String(id.to_string())
    }
}

/// Named relationship map of a resource.
pub type Relationships = BTreeMap<String, Relationship>;

/// One relationship entry: the linked resource identifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationship {
    /// Identifiers of the linked resources.
    pub data: Vec<ResourceIdentifier>,
}

/// A `{type, id}` pair linking to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// Linked resource type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Linked resource id.
    pub id: String,
}

impl ResourceIdentifier {
    /// Create an identifier from a type name and id.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Response metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Server-side correlation id for the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctx: Option<serde_json::Value>,
}

/// The request-side envelope: `{"data": {"type", "attributes",
/// "relationships"}}`.
///
/// Relationships are always serialized, as an empty object when none are
/// given, which is what the service expects.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope<A> {
    data: RequestResource<A>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestResource<A> {
    #[serde(rename = "type")]
    kind: String,
    attributes: A,
    relationships: Relationships,
}

impl<A: Serialize> RequestEnvelope<A> {
    /// Compile a request for `kind` with the given attributes.
    pub fn new(kind: impl Into<String>, attributes: A) -> Self {
        Self {
            data: RequestResource {
                kind: kind.into(),
                attributes,
                relationships: Relationships::new(),
            },
        }
    }

    /// Attach relationships to the request.
    pub fn with_relationships(mut self, relationships: Relationships) -> Self {
        self.data.relationships = relationships;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope_always_includes_relationships() {
        let envelope = RequestEnvelope::new("user", json!({"username": "jane"}));
        let rendered = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            rendered,
            json!({
                "data": {
                    "type": "user",
                    "attributes": {"username": "jane"},
                    "relationships": {},
                }
            })
        );
    }

    #[test]
    fn test_request_envelope_with_relationships() {
        let mut relationships = Relationships::new();
        relationships.insert(
            "users".to_string(),
            Relationship {
                data: vec![ResourceIdentifier::new("user", "u-1")],
            },
        );

        let envelope =
            RequestEnvelope::new("user_group", json!({"name": "devs"})).with_relationships(relationships);
        let rendered = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            rendered["data"]["relationships"]["users"]["data"][0],
            json!({"type": "user", "id": "u-1"})
        );
    }

    #[test]
    fn test_document_parses_string_and_numeric_ids() {
        let with_string: Document = serde_json::from_value(json!({
            "data": {"type": "job", "id": "j-1", "attributes": {}}
        }))
        .unwrap();
        assert_eq!(with_string.data.id, Some(ResourceId::String("j-1".into())));

        let with_number: Document = serde_json::from_value(json!({
            "data": {"type": "user", "id": 42, "attributes": {}}
        }))
        .unwrap();
        assert_eq!(with_number.data.id, Some(ResourceId::Number(42)));
        assert_eq!(with_number.data.id.unwrap().to_string(), "42");
    }

    #[test]
    fn test_document_tolerates_missing_relationships_and_meta() {
        let document: Document = serde_json::from_value(json!({
            "data": {"type": "user", "id": "u-1", "attributes": {"username": "jane"}}
        }))
        .unwrap();

        assert!(document.data.relationships.is_empty());
        assert!(document.meta.is_none());
    }

    #[test]
    fn test_list_document_parses_items() {
        let document: ListDocument = serde_json::from_value(json!({
            "data": [
                {"type": "user", "id": "u-1", "attributes": {}},
                {"type": "user", "id": "u-2", "attributes": {}}
            ],
            "meta": {"ctx": 123}
        }))
        .unwrap();

        assert_eq!(document.data.len(), 2);
        assert_eq!(document.meta.unwrap().ctx, Some(json!(123)));
    }
}
