//! Client configuration.

use std::time::Duration;

use http::HeaderMap;
use secrecy::SecretString;
use url::Url;

use crate::error::{Error, Result};

/// Environment variable naming the API endpoint.
pub const ENV_API: &str = "CTRLPLANE_API";
/// Environment variable naming the default username.
pub const ENV_USERNAME: &str = "CTRLPLANE_USERNAME";
/// Environment variable naming the default access key.
pub const ENV_ACCESS_KEY: &str = "CTRLPLANE_ACCESS_KEY";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Default number of transport-level retries.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for building a [`Client`](crate::Client).
///
/// Prefer [`Client::builder()`](crate::Client::builder) for one-off
/// construction; this type exists for programmatic and environment-driven
/// setups.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API endpoint, with or without a scheme (`https` is assumed).
    pub endpoint: Option<String>,
    /// Username for session or access-key authentication.
    pub username: Option<String>,
    /// Password for session authentication.
    pub password: Option<SecretString>,
    /// Access key for header-based authentication.
    pub access_key: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Transport-level retry budget for transient failures.
    pub max_retries: u32,
    /// Whether to accept self-signed TLS certificates.
    ///
    /// On by default; control-plane appliances commonly serve them.
    pub accept_invalid_certs: bool,
    /// Extra headers sent with every request.
    pub default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            username: None,
            password: None,
            access_key: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            accept_invalid_certs: true,
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment.
    ///
    /// Reads `CTRLPLANE_API`, `CTRLPLANE_USERNAME`, and
    /// `CTRLPLANE_ACCESS_KEY`. With the `env` feature a `.env` file is
    /// loaded first.
    pub fn from_env() -> Result<Self> {
        #[cfg(feature = "env")]
        {
            let _ = dotenvy::dotenv();
        }

        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var(ENV_API) {
            config.endpoint = Some(endpoint);
        }
        if let Ok(username) = std::env::var(ENV_USERNAME) {
            config.username = Some(username);
        }
        if let Ok(access_key) = std::env::var(ENV_ACCESS_KEY) {
            config.access_key = Some(SecretString::from(access_key));
        }
        Ok(config)
    }

    /// Validate credential combinations.
    ///
    /// A password and an access key are mutually exclusive, and either one
    /// requires a username. Called by the client builder before any request
    /// is made; invalid combinations are never retried.
    pub fn validate(&self) -> Result<()> {
        if self.password.is_some() && self.access_key.is_some() {
            return Err(Error::InvalidRequest(
                "must provide either password or access key, not both".to_string(),
            ));
        }
        if (self.password.is_some() || self.access_key.is_some()) && self.username.is_none() {
            return Err(Error::InvalidRequest(
                "must provide username when providing password or access key".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the endpoint into a base URL.
    ///
    /// Falls back to `CTRLPLANE_API` when unset; prepends `https://` when
    /// no scheme is given; guarantees a trailing slash so path joins keep
    /// any path prefix.
    pub(crate) fn resolved_endpoint(&self) -> Result<Url> {
        let endpoint = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => std::env::var(ENV_API).map_err(|_| {
                Error::MissingConfig(format!(
                    "endpoint must be passed to the client or specified in {ENV_API}"
                ))
            })?,
        };

        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::InvalidUrl("endpoint is empty".to_string()));
        }

        let mut endpoint = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("https://{endpoint}")
        };
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }

        Url::parse(&endpoint).map_err(|err| Error::InvalidUrl(format!("{endpoint}: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();

        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_validate_rejects_password_and_access_key() {
        let config = ClientConfig {
            username: Some("admin".to_string()),
            password: Some(SecretString::from("secret")),
            access_key: Some(SecretString::from("key")),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_username_with_credentials() {
        let config = ClientConfig {
            password: Some(SecretString::from("secret")),
            ..Default::default()
        };

        assert!(config.validate().is_err());

        let config = ClientConfig {
            username: Some("admin".to_string()),
            password: Some(SecretString::from("secret")),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_gets_default_scheme() {
        let config = ClientConfig {
            endpoint: Some("control-plane.example.com".to_string()),
            ..Default::default()
        };

        let url = config.resolved_endpoint().unwrap();
        assert_eq!(url.as_str(), "https://control-plane.example.com/");
    }

    #[test]
    fn test_endpoint_keeps_explicit_scheme_and_gains_slash() {
        let config = ClientConfig {
            endpoint: Some("http://10.0.0.1:8001".to_string()),
            ..Default::default()
        };

        let url = config.resolved_endpoint().unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.1:8001/");
    }

    #[test]
    fn test_empty_endpoint_is_invalid() {
        let config = ClientConfig {
            endpoint: Some("   ".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            config.resolved_endpoint(),
            Err(Error::InvalidUrl(_))
        ));
    }
}
