//! Types used across the SDK.
//!
//! The control-plane API speaks a JSON:API dialect: every request and
//! response wraps the resource in a `data` envelope with `type`,
//! `attributes`, and `relationships` members. The envelope types live in
//! [`document`], the per-resource attribute models in [`attributes`] and
//! [`app_services`], and the closed vocabularies (roles, planes, job
//! states) in [`constants`].

pub mod app_services;
pub mod attributes;
pub mod constants;
pub mod document;

pub use app_services::{
    AppService, AppServiceSpec, AppServicesManifestAttributes, CredentialsSpec, JupyterSpec,
    ResourcesSpec, ServiceMeta, ServiceStatus, ServiceUrl, StatusErrorInfo, SystemResources,
};
pub use attributes::{
    AccessKeyAttributes, JobAttributes, UserAttributes, UserGroupAttributes,
};
pub use constants::{ConfigType, JobState, ResourceKind, SessionPlane, TenantManagementRole};
pub use document::{
    Document, ListDocument, Meta, Relationship, Relationships, RequestEnvelope, ResourceId,
    ResourceIdentifier, ResourceObject,
};
