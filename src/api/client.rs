//
//  bitbucket-cloud
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Bitbucket API
//!
//! This module provides the core HTTP client the resource layer issues
//! requests through. It holds the base URL, the authenticated username,
//! and the credential, and exposes raw verb methods plus the
//! expected-status contract.
//!
//! ## Design
//!
//! - Verb methods (`get`, `post_json`, `post_form`, ...) return the raw
//!   [`reqwest::Response`]; the *caller* decides which status is
//!   acceptable via [`Client::expect_status`]. This keeps per-endpoint
//!   contracts (200 vs 204, 404-as-absent) out of the transport layer.
//! - The client is an explicit, injectable dependency: every resource
//!   operation takes `&Client`. There is no process-wide default.
//! - Cloning is cheap; the underlying `reqwest::Client` and the resource
//!   registry are reference-counted, so bound resources each hold their
//!   own handle on the shared state.
//! - No automatic retries: callers retry if they want to.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_cloud::api::Client;
//! use bitbucket_cloud::auth::AuthCredential;
//!
//! let client = Client::cloud()?
//!     .with_auth(AuthCredential::app_password("evzijst", "app-password"));
//! assert_eq!(client.base_url(), "https://api.bitbucket.org");
//! # Ok::<(), bitbucket_cloud::api::common::ApiError>(())
//! ```

use std::sync::Arc;

use reqwest::{multipart, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::auth::AuthCredential;
use crate::config::Config;

use super::common::ApiError;
use super::resource::Registry;
use super::template::TemplateVars;

/// Base URL of the public Bitbucket Cloud API.
pub const DEFAULT_BITBUCKET_URL: &str = "https://api.bitbucket.org";

/// The HTTP client shared by every bound resource.
///
/// Holds the base URL, the authenticated username, optional credentials,
/// and the resource [`Registry`] used to classify traversal results.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use bitbucket_cloud::api::Client;
///
/// // Against the public API
/// let client = Client::cloud()?;
///
/// // Against a staging deployment or a mock server
/// let staging = Client::at("https://staging.bitbucket.example")?;
/// # Ok::<(), bitbucket_cloud::api::common::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client.
    http: reqwest::Client,
    /// Scheme + host of the API, no trailing slash.
    bitbucket_url: String,
    /// The authenticated username, used for template expansion.
    username: Option<String>,
    /// Optional authentication credentials.
    auth: Option<AuthCredential>,
    /// Dispatch table for classifying traversal results.
    registry: Arc<Registry>,
}

impl Client {
    /// Creates a client for the public Bitbucket Cloud API.
    pub fn cloud() -> Result<Self, ApiError> {
        Self::at(DEFAULT_BITBUCKET_URL)
    }

    /// Creates a client against an arbitrary base URL.
    ///
    /// Useful for staging deployments and for tests running against a
    /// local mock server.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidArgument`] when `base_url` is not an absolute
    /// URL.
    pub fn at(base_url: &str) -> Result<Self, ApiError> {
        url::Url::parse(base_url)
            .map_err(|e| ApiError::InvalidArgument(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
                .build()?,
            bitbucket_url: base_url.trim_end_matches('/').to_string(),
            username: None,
            auth: None,
            registry: Arc::new(Registry::standard()),
        })
    }

    /// Creates a client from a loaded [`Config`].
    ///
    /// Applies the configured base URL, username, and app password.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let mut client = match config.bitbucket_url.as_deref() {
            Some(base) => Self::at(base)?,
            None => Self::cloud()?,
        };
        client.username = config.auth.username.clone();
        if let (Some(username), Some(password)) =
            (&config.auth.username, &config.auth.app_password)
        {
            client.auth = Some(AuthCredential::app_password(username, password));
        }
        Ok(client)
    }

    /// Sets the authentication credentials, builder-style.
    ///
    /// When the credential carries a username (app password, basic) and
    /// none was set explicitly, it becomes the client's username for
    /// template expansion.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        if self.username.is_none() {
            self.username = auth.username().map(str::to_string);
        }
        self.auth = Some(auth);
        self
    }

    /// Sets the authenticated username, builder-style.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Replaces the resource registry, builder-style.
    ///
    /// The standard registry covers every kind the library models; tests
    /// and extensions can swap in their own table.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// The base URL requests are issued against (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.bitbucket_url
    }

    /// The authenticated username, when known.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The registry used to classify traversal results.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The client-level template variables: `bitbucket_url` and, when
    /// known, `username`.
    ///
    /// Resource binders merge caller identifiers over these.
    pub fn template_vars(&self) -> TemplateVars {
        TemplateVars::new()
            .set("bitbucket_url", self.bitbucket_url.clone())
            .set_opt("username", self.username.clone())
    }

    /// Issues a GET against an absolute URL.
    ///
    /// Returns the raw response; validate the status with
    /// [`Client::expect_status`].
    pub async fn get(&self, url: &str) -> Result<Response, ApiError> {
        debug!(method = "GET", url, "issuing request");
        let request = self.http.get(url);
        Ok(self.apply_auth(request).send().await?)
    }

    /// Issues a POST with a JSON body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        debug!(method = "POST", url, "issuing request");
        let request = self.http.post(url).json(body);
        Ok(self.apply_auth(request).send().await?)
    }

    /// Issues a POST with a URL-encoded form body.
    ///
    /// The 1.0 consumer endpoints require form encoding rather than
    /// JSON; this is a per-endpoint contract, not a global default.
    pub async fn post_form<B: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &B,
    ) -> Result<Response, ApiError> {
        debug!(method = "POST", url, "issuing form request");
        let request = self.http.post(url).form(form);
        Ok(self.apply_auth(request).send().await?)
    }

    /// Issues a POST with a multipart body (snippet file uploads).
    pub async fn post_multipart(
        &self,
        url: &str,
        form: multipart::Form,
    ) -> Result<Response, ApiError> {
        debug!(method = "POST", url, "issuing multipart request");
        let request = self.http.post(url).multipart(form);
        Ok(self.apply_auth(request).send().await?)
    }

    /// Issues a PUT with a JSON body.
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        debug!(method = "PUT", url, "issuing request");
        let request = self.http.put(url).json(body);
        Ok(self.apply_auth(request).send().await?)
    }

    /// Issues a PUT with a URL-encoded form body.
    pub async fn put_form<B: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &B,
    ) -> Result<Response, ApiError> {
        debug!(method = "PUT", url, "issuing form request");
        let request = self.http.put(url).form(form);
        Ok(self.apply_auth(request).send().await?)
    }

    /// Issues a PUT with a multipart body.
    pub async fn put_multipart(
        &self,
        url: &str,
        form: multipart::Form,
    ) -> Result<Response, ApiError> {
        debug!(method = "PUT", url, "issuing multipart request");
        let request = self.http.put(url).multipart(form);
        Ok(self.apply_auth(request).send().await?)
    }

    /// Issues a DELETE.
    pub async fn delete(&self, url: &str) -> Result<Response, ApiError> {
        debug!(method = "DELETE", url, "issuing request");
        let request = self.http.delete(url);
        Ok(self.apply_auth(request).send().await?)
    }

    /// Enforces an expected-status contract on a response.
    ///
    /// Returns the response untouched when the status matches. On a
    /// mismatch the body is drained into an
    /// [`ApiError::UnexpectedStatus`] carrying the URL, the actual
    /// status, and the body verbatim.
    pub async fn expect_status(
        response: Response,
        expected: StatusCode,
    ) -> Result<Response, ApiError> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::UnexpectedStatus {
            url,
            status: status.as_u16(),
            body,
        })
    }

    /// Shorthand for [`Client::expect_status`] with 200.
    pub async fn expect_ok(response: Response) -> Result<Response, ApiError> {
        Self::expect_status(response, StatusCode::OK).await
    }

    /// GETs a URL and decodes the 200 body as JSON.
    pub(crate) async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let response = self.get(url).await?;
        let response = Self::expect_ok(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GETs a URL, treating 404 as a valid absent result.
    ///
    /// Single-resource lookups route through here: `Ok(None)` means the
    /// resource does not exist, which is distinct from every error case.
    pub(crate) async fn get_optional(&self, url: &str) -> Result<Option<Value>, ApiError> {
        let response = self.get(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::expect_ok(response).await?;
        let body = response.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(auth) => auth.apply_to_request(request),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = Client::at("https://staging.example.test/").unwrap();
        assert_eq!(client.base_url(), "https://staging.example.test");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            Client::at("not a url"),
            Err(ApiError::InvalidArgument(_)),
        ));
    }

    #[test]
    fn test_template_vars_include_username_when_set() {
        let client = Client::cloud().unwrap();
        assert_eq!(client.template_vars().get("username"), None);

        let client = client.with_username("evzijst");
        let vars = client.template_vars();
        assert_eq!(vars.get("bitbucket_url"), Some(DEFAULT_BITBUCKET_URL));
        assert_eq!(vars.get("username"), Some("evzijst"));
    }

    #[test]
    fn test_auth_credential_supplies_username() {
        let client = Client::cloud()
            .unwrap()
            .with_auth(AuthCredential::app_password("evzijst", "secret"));
        assert_eq!(client.username(), Some("evzijst"));

        // An explicit username wins over the credential's.
        let client = Client::cloud()
            .unwrap()
            .with_username("tutorials")
            .with_auth(AuthCredential::app_password("evzijst", "secret"));
        assert_eq!(client.username(), Some("tutorials"));
    }
}
