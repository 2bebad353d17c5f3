//! # ctrlplane SDK
//!
//! Async Rust client for the control-plane REST API, covering:
//! - Users, user groups, and access keys (full CRUD)
//! - Asynchronous jobs, with a completion-polling helper
//! - The application services manifest, with apply-and-wait
//! - Session (username/password) and access-key authentication
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ctrlplane::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .endpoint("https://control-plane.example.com")
//!         .username("admin")
//!         .password("secret")
//!         .build()?;
//!
//!     client.login().await?;
//!
//!     for user in client.users().list().await? {
//!         println!("{}", user.attributes.username);
//!     }
//!
//!     // Kick off a cluster reload and wait for its job to finish.
//!     client
//!         .cluster_configurations()
//!         .reload(ctrlplane::ConfigType::Cluster)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use types::*;

// Retry primitives come from the core crate; re-exported so callers can
// drive their own operations through the same machinery.
pub use ctrlplane_core::retry::{LinearBackoff, Retry, RetryExhausted, StillPending};

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod types;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use ctrlplane::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Client, ClientConfig, Error, Result,
        resources::{
            CreateAccessKeyRequest, CreateUserGroupRequest, CreateUserRequest, Job, User,
            UserGroup,
        },
        types::{ConfigType, JobState, SessionPlane, TenantManagementRole},
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
