//! HTTP client wrapper around reqwest.

use std::sync::RwLock;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use url::Url;

use super::Response;
use crate::error::{Error, Result};

/// HTTP client for the control-plane API.
///
/// Owns the underlying `reqwest::Client` plus the pieces every request
/// shares: the endpoint base URL, the `api/` path prefix, default headers,
/// and the authentication state (session cookie and optional basic-auth
/// header). Cheap to share behind the SDK's `Client`.
///
/// Transient transport failures (timeouts, 5xx, 429) are retried a bounded
/// number of times with exponentially growing waits before an error is
/// returned.
#[derive(Debug)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    request_timeout: Duration,
    max_retries: u32,
    auth: RwLock<AuthState>,
}

#[derive(Debug, Default)]
struct AuthState {
    cookie: Option<String>,
    authorization: Option<String>,
}

impl HttpClient {
    pub(crate) fn new(
        base_url: Url,
        request_timeout: Duration,
        max_retries: u32,
        accept_invalid_certs: bool,
        extra_headers: HeaderMap,
    ) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        default_headers.extend(extra_headers);

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if accept_invalid_certs {
            // Control-plane appliances commonly serve self-signed certs.
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder
            .build()
            .map_err(|err| Error::Connection(err.to_string()))?;

        Ok(Self {
            http,
            base_url,
            request_timeout,
            max_retries,
            auth: RwLock::new(AuthState::default()),
        })
    }

    /// The endpoint this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a GET request.
    pub async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
        error_message: &str,
    ) -> Result<Response> {
        self.send_request(Method::GET, path, query, None, &[], error_message)
            .await
    }

    /// Issue a POST request with an optional JSON body.
    pub async fn post<B>(
        &self,
        path: &str,
        body: Option<&B>,
        error_message: &str,
    ) -> Result<Response>
    where
        B: serde::Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_vec).transpose()?;
        self.send_request(Method::POST, path, &[], body, &[], error_message)
            .await
    }

    /// Issue a PUT request with a JSON body.
    pub async fn put<B>(&self, path: &str, body: &B, error_message: &str) -> Result<Response>
    where
        B: serde::Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.send_request(Method::PUT, path, &[], Some(body), &[], error_message)
            .await
    }

    /// Issue a request with an arbitrary method and optional JSON body.
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        error_message: &str,
    ) -> Result<Response>
    where
        B: serde::Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_vec).transpose()?;
        self.send_request(method, path, &[], body, &[], error_message)
            .await
    }

    /// Issue a DELETE request; with `ignore_missing`, a 404 is a success.
    pub async fn delete(
        &self,
        path: &str,
        ignore_missing: bool,
        error_message: &str,
    ) -> Result<Response> {
        let ignore_status_codes: &[StatusCode] = if ignore_missing {
            &[StatusCode::NOT_FOUND]
        } else {
            &[]
        };
        self.send_request(Method::DELETE, path, &[], None, ignore_status_codes, error_message)
            .await
    }

    /// Use the session cookie obtained from a login response.
    pub(crate) fn set_session_cookie(&self, session: &str) {
        let mut auth = self.auth.write().expect("auth state lock poisoned");
        auth.cookie = Some(format!("session={session}"));
        auth.authorization = None;
    }

    /// Authenticate every request with an access key.
    ///
    /// Sets the basic-auth header and the cookie form of the key the
    /// service expects.
    pub(crate) fn set_access_key_auth(&self, username: &str, access_key: &str) {
        let encoded = BASE64.encode(format!("{username}:{access_key}"));
        let mut auth = self.auth.write().expect("auth state lock poisoned");
        auth.cookie = Some(format!(
            "session=j%3A%7B%22sid%22%3A%20%22{access_key}%22%7D"
        ));
        auth.authorization = Some(format!("Basic {encoded}"));
    }

    async fn send_request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Vec<u8>>,
        ignore_status_codes: &[StatusCode],
        error_message: &str,
    ) -> Result<Response> {
        let endpoint = format!("api/{}", path.trim_start_matches('/'));
        let url = self
            .base_url
            .join(&endpoint)
            .map_err(|err| Error::InvalidUrl(format!("{endpoint}: {err}")))?;

        tracing::debug!(method = %method, endpoint = %endpoint, "sending request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .timeout(self.request_timeout);
        if !query.is_empty() {
            request = request.query(query);
        }
        {
            let auth = self.auth.read().expect("auth state lock poisoned");
            if let Some(cookie) = &auth.cookie {
                request = request.header(http::header::COOKIE, cookie.as_str());
            }
            if let Some(authorization) = &auth.authorization {
                request = request.header(http::header::AUTHORIZATION, authorization.as_str());
            }
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let mut attempt = 0;
        loop {
            let cloned = request
                .try_clone()
                .ok_or_else(|| Error::Connection("could not clone request".to_string()))?;

            match cloned.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let headers = resp.headers().clone();
                    let body = resp
                        .bytes()
                        .await
                        .map_err(|err| Error::Connection(err.to_string()))?
                        .to_vec();

                    let response = Response::new(status, headers, body);
                    tracing::debug!(status = status.as_u16(), "received response");

                    if response.is_error() && !ignore_status_codes.contains(&status) {
                        let error = Error::from_response(status.as_u16(), &response.text());

                        if error.is_retryable() && attempt < self.max_retries {
                            attempt += 1;
                            let delay = Duration::from_secs(2u64.pow(attempt - 1));
                            tracing::debug!(
                                status = status.as_u16(),
                                retry_in = ?delay,
                                "retrying request"
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        }

                        tracing::warn!(
                            method = %method,
                            path,
                            error = %error,
                            "{error_message}"
                        );
                        return Err(error);
                    }

                    return Ok(response);
                }
                Err(err) if err.is_timeout() => {
                    if attempt >= self.max_retries {
                        return Err(Error::Timeout(self.request_timeout));
                    }
                    attempt += 1;
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt - 1))).await;
                }
                Err(err) => {
                    return Err(Error::Connection(err.to_string()));
                }
            }
        }
    }

    #[cfg(test)]
    fn auth_snapshot(&self) -> (Option<String>, Option<String>) {
        let auth = self.auth.read().unwrap();
        (auth.cookie.clone(), auth.authorization.clone())
    }
}
