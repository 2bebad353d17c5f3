//! Shared helpers for wiremock-backed integration tests.
#![allow(dead_code)] // not every test binary uses every helper

use ctrlplane::Client;
use serde_json::{Value, json};

/// Username used by the test clients.
pub const TEST_USERNAME: &str = "admin";

/// Access key used by the access-key-authenticated test client.
pub const TEST_ACCESS_KEY: &str = "test-key";

/// A client authenticated with an access key, pointed at the mock server.
pub fn test_client(uri: &str) -> Client {
    Client::builder()
        .endpoint(uri)
        .username(TEST_USERNAME)
        .access_key(TEST_ACCESS_KEY)
        .build()
        .expect("Failed to build client")
}

/// A client with password credentials (for login tests), pointed at the
/// mock server.
pub fn password_client(uri: &str, password: &str) -> Client {
    Client::builder()
        .endpoint(uri)
        .username(TEST_USERNAME)
        .password(password)
        .build()
        .expect("Failed to build client")
}

/// A job document in the service's envelope.
pub fn job_document(job_id: &str, state: &str, result: &str) -> Value {
    json!({
        "data": {
            "type": "job",
            "id": job_id,
            "attributes": {
                "kind": "cluster.reload",
                "state": state,
                "result": result,
            }
        }
    })
}

/// A user document in the service's envelope.
pub fn user_document(user_id: &str, username: &str) -> Value {
    json!({
        "data": {
            "type": "user",
            "id": user_id,
            "attributes": {
                "username": username,
                "first_name": "Jane",
                "last_name": "Doe",
                "email": format!("{username}@example.com"),
                "uid": 1000,
                "assigned_policies": ["Developer", "Application Read Only"],
            }
        }
    })
}

/// Manifest attributes to send in apply requests.
pub fn manifest_attributes() -> ctrlplane::AppServicesManifestAttributes {
    ctrlplane::AppServicesManifestAttributes {
        app_services: vec![ctrlplane::AppService {
            spec: ctrlplane::AppServiceSpec::jupyter(
                "my-jupyter",
                ctrlplane::JupyterSpec {
                    image_name: "jupyter-all".to_string(),
                    ..Default::default()
                },
            ),
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// An app services manifest document with the given rollout state.
pub fn manifest_document(state: &str) -> Value {
    json!({
        "data": [
            {
                "type": "app_services_manifest",
                "attributes": {
                    "state": state,
                    "app_services": [
                        {
                            "spec": {
                                "name": "my-jupyter",
                                "kind": "jupyter",
                                "jupyter": {"image_name": "jupyter-all"}
                            },
                            "status": {"state": state, "version": "3.0.0"}
                        }
                    ]
                }
            }
        ]
    })
}
