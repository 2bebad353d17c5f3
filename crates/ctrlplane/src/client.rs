//! Main client implementation for the control-plane API

use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{
    config::ClientConfig,
    error::{Error, Result},
    http::{HttpClient, Method},
    resources::{
        AccessKeys, AppServices, ClusterConfigurations, Jobs, UserGroups, Users,
        jobs::DEFAULT_POLL_INTERVAL,
    },
    types::{
        Document, JobAttributes, ListDocument, Relationships, RequestEnvelope, ResourceKind,
        SessionPlane,
    },
};

/// Main client for the control-plane API.
///
/// Provides access to the typed resource endpoints and handles
/// authentication, the JSON:API envelope, and transport retries.
///
/// # Example
///
/// ```rust,no_run
/// use ctrlplane::Client;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::builder()
///     .endpoint("https://control-plane.example.com")
///     .username("admin")
///     .password("secret")
///     .build()?;
///
/// client.login().await?;
/// let users = client.users().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    /// HTTP collaborator shared by every resource handle.
    http: HttpClient,

    /// Credentials retained for `login()` and access-key switching.
    credentials: RwLock<Credentials>,

    // Lazy-initialized resource handles
    users: OnceLock<Users>,
    user_groups: OnceLock<UserGroups>,
    access_keys: OnceLock<AccessKeys>,
    jobs: OnceLock<Jobs>,
    app_services: OnceLock<AppServices>,
    cluster_configurations: OnceLock<ClusterConfigurations>,
}

#[derive(Default)]
struct Credentials {
    username: Option<String>,
    password: Option<SecretString>,
}

#[derive(Serialize)]
struct SessionAttributes<'a> {
    username: &'a str,
    password: &'a str,
    plane: SessionPlane,
}

impl Client {
    /// Create a client for the given endpoint with no credentials set.
    ///
    /// # Panics
    ///
    /// Panics if the endpoint is not a valid URL. For fallible
    /// construction use [`Client::builder()`].
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::builder()
            .endpoint(endpoint)
            .build()
            .expect("Failed to build client for the provided endpoint")
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.resolved_endpoint()?;

        let http = HttpClient::new(
            base_url,
            config.timeout,
            config.max_retries,
            config.accept_invalid_certs,
            config.default_headers,
        )?;

        let client = Self {
            inner: Arc::new(ClientInner {
                http,
                credentials: RwLock::new(Credentials {
                    username: config.username.clone(),
                    password: config.password,
                }),
                users: OnceLock::new(),
                user_groups: OnceLock::new(),
                access_keys: OnceLock::new(),
                jobs: OnceLock::new(),
                app_services: OnceLock::new(),
                cluster_configurations: OnceLock::new(),
            }),
        };

        // A username plus access key authenticates immediately, no login
        // round-trip needed.
        if let (Some(username), Some(access_key)) = (&config.username, &config.access_key) {
            client
                .inner
                .http
                .set_access_key_auth(username, access_key.expose_secret());
        }

        Ok(client)
    }

    /// Create a client from `CTRLPLANE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Authenticate with the stored username and password.
    ///
    /// The session cookie from the response is used for all subsequent
    /// requests.
    pub async fn login(&self) -> Result<()> {
        let (username, password) = {
            let credentials = self
                .inner
                .credentials
                .read()
                .expect("credentials lock poisoned");
            (credentials.username.clone(), credentials.password.clone())
        };

        match (username, password) {
            (Some(username), Some(password)) => {
                self.perform_login(&username, password.expose_secret()).await
            }
            _ => Err(Error::InvalidRequest(
                "username and password must be provided".to_string(),
            )),
        }
    }

    /// Authenticate with an explicit username and password, storing them
    /// for later [`login()`](Self::login) calls.
    pub async fn login_with(&self, username: &str, password: &str) -> Result<()> {
        self.perform_login(username, password).await?;

        let mut credentials = self
            .inner
            .credentials
            .write()
            .expect("credentials lock poisoned");
        credentials.username = Some(username.to_string());
        credentials.password = Some(SecretString::from(password.to_string()));
        Ok(())
    }

    /// Switch to access-key authentication for all subsequent requests.
    ///
    /// Requires a username, from the builder or a prior login.
    pub fn set_access_key(&self, access_key: &str) -> Result<()> {
        let username = {
            let credentials = self
                .inner
                .credentials
                .read()
                .expect("credentials lock poisoned");
            credentials.username.clone()
        };
        let username = username.ok_or_else(|| {
            Error::InvalidRequest(
                "must provide username when providing password or access key".to_string(),
            )
        })?;

        self.inner.http.set_access_key_auth(&username, access_key);
        Ok(())
    }

    async fn perform_login(&self, username: &str, password: &str) -> Result<()> {
        tracing::debug!(username, "authenticating");

        let envelope = RequestEnvelope::new(
            "session",
            SessionAttributes {
                username,
                password,
                plane: SessionPlane::Control,
            },
        );
        let response = self
            .inner
            .http
            .post("sessions", Some(&envelope), "Authentication failed")
            .await?;

        let session = response.cookie("session").ok_or_else(|| {
            Error::Authentication("login response did not set a session cookie".to_string())
        })?;
        self.inner.http.set_session_cookie(&session);

        tracing::info!("successfully logged in");
        Ok(())
    }

    /// Access the users endpoint.
    pub fn users(&self) -> &Users {
        self.inner.users.get_or_init(|| Users::new(self.clone()))
    }

    /// Access the user groups endpoint.
    pub fn user_groups(&self) -> &UserGroups {
        self.inner
            .user_groups
            .get_or_init(|| UserGroups::new(self.clone()))
    }

    /// Access the access keys endpoint.
    pub fn access_keys(&self) -> &AccessKeys {
        self.inner
            .access_keys
            .get_or_init(|| AccessKeys::new(self.clone()))
    }

    /// Access the jobs endpoint.
    pub fn jobs(&self) -> &Jobs {
        self.inner.jobs.get_or_init(|| Jobs::new(self.clone()))
    }

    /// Access the app services manifest endpoint.
    pub fn app_services(&self) -> &AppServices {
        self.inner
            .app_services
            .get_or_init(|| AppServices::new(self.clone()))
    }

    /// Access the cluster configurations operations.
    pub fn cluster_configurations(&self) -> &ClusterConfigurations {
        self.inner
            .cluster_configurations
            .get_or_init(|| ClusterConfigurations::new(self.clone()))
    }

    /// Create a resource.
    pub async fn create<A, T>(
        &self,
        kind: ResourceKind,
        attributes: &A,
        relationships: Option<Relationships>,
    ) -> Result<Document<T>>
    where
        A: Serialize,
        T: DeserializeOwned,
    {
        let mut envelope = RequestEnvelope::new(kind.as_str(), attributes);
        if let Some(relationships) = relationships {
            envelope = envelope.with_relationships(relationships);
        }

        let response = self
            .inner
            .http
            .post(
                kind.path_segment(),
                Some(&envelope),
                &format!("Failed to create {kind}"),
            )
            .await?;
        response.parse()
    }

    /// Update a resource in place.
    ///
    /// The service does not return the updated resource; callers that need
    /// it fetch it again afterwards.
    pub async fn update<A>(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        attributes: &A,
        relationships: Option<Relationships>,
    ) -> Result<()>
    where
        A: Serialize,
    {
        let mut envelope = RequestEnvelope::new(kind.as_str(), attributes);
        if let Some(relationships) = relationships {
            envelope = envelope.with_relationships(relationships);
        }

        let path = format!("{}/{}", kind.path_segment(), resource_id);
        self.inner
            .http
            .put(
                &path,
                &envelope,
                &format!("Failed to update {kind} {resource_id}"),
            )
            .await?;
        Ok(())
    }

    /// Delete a resource; with `ignore_missing`, deleting an absent
    /// resource succeeds.
    pub async fn delete(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        ignore_missing: bool,
    ) -> Result<()> {
        let path = format!("{}/{}", kind.path_segment(), resource_id);
        self.inner
            .http
            .delete(
                &path,
                ignore_missing,
                &format!("Failed to delete {kind} {resource_id}"),
            )
            .await?;
        Ok(())
    }

    /// Get a single resource.
    pub async fn detail<T>(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        query: &[(String, String)],
    ) -> Result<Document<T>>
    where
        T: DeserializeOwned,
    {
        let path = format!("{}/{}", kind.path_segment(), resource_id);
        let response = self
            .inner
            .http
            .get(&path, query, &format!("Failed to get {kind} {resource_id}"))
            .await?;
        response.parse()
    }

    /// List a resource collection.
    pub async fn list<T>(
        &self,
        kind: ResourceKind,
        query: &[(String, String)],
    ) -> Result<ListDocument<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .http
            .get(
                kind.path_segment(),
                query,
                &format!("Failed to list {}", kind.path_segment()),
            )
            .await?;
        response.parse()
    }

    /// Execute a raw request against an arbitrary API path.
    pub async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .http
            .request(method, path, body, "Failed to execute request")
            .await?;
        response.parse()
    }

    /// Execute a raw GET against an arbitrary API path.
    pub async fn get_raw<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request::<(), T>(Method::GET, path, None).await
    }

    /// POST to a job-producing endpoint and return the job id without
    /// waiting for it.
    pub async fn submit_job(&self, path: &str) -> Result<String> {
        let response = self
            .inner
            .http
            .post::<()>(path, None, "Failed to execute request")
            .await?;
        let document: Document<JobAttributes> = response.parse()?;

        let job_id = document
            .data
            .id
            .ok_or_else(|| Error::ResponseValidation("job response carries no id".to_string()))?;
        Ok(job_id.to_string())
    }

    /// POST to a job-producing endpoint and wait for the job to complete.
    ///
    /// Returns the job id on success; fails like
    /// [`Jobs::wait_for_completion`](crate::resources::Jobs::wait_for_completion)
    /// otherwise.
    pub async fn request_job(&self, path: &str, timeout: Duration) -> Result<String> {
        let job_id = self.submit_job(path).await?;
        self.jobs()
            .wait_for_completion_with(&job_id, DEFAULT_POLL_INTERVAL, timeout)
            .await?;
        Ok(job_id)
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        self.inner.http.base_url().as_str()
    }
}

/// Builder for creating a configured [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Set the API endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    /// Set the username used for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    /// Set the password for session authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set the access key for header-based authentication.
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.config.access_key = Some(SecretString::from(access_key.into()));
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the transport-level retry budget.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Control acceptance of self-signed TLS certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    /// Add a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidRequest(format!("invalid header name '{key_str}'")))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidRequest(format!("invalid header value '{value_str}'")))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}
