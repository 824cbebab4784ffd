//
//  bitbucket-cloud
//  api/v1/consumers.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! OAuth consumers (API keys), v1.0 API.
//!
//! Consumers are the OAuth keys an account hands out to integrations.
//! They live on the 1.0 API, which has two quirks the rest of the library
//! never sees:
//!
//! - consumer payloads carry no links section, so the relationship
//!   catalog ships with the library and is expanded per-instance;
//! - write endpoints expect a urlencoded form, not JSON.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_cloud::api::Client;
//! use bitbucket_cloud::api::v1::consumers::{Consumer, ConsumerPayload, PermissionScope};
//!
//! # async fn example() -> Result<(), bitbucket_cloud::api::common::ApiError> {
//! let client = Client::cloud()?;
//!
//! let payload = ConsumerPayload::new()
//!     .name("autopilot")
//!     .scope(PermissionScope::RepositoryRead)
//!     .scope(PermissionScope::Webhook)
//!     .description("deployment robot");
//! let consumer = Consumer::create(&payload, &client).await?;
//!
//! // The self link came from the shipped catalog, already expanded.
//! println!("{:?}", consumer.resource().self_url());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::api::client::Client;
use crate::api::common::ApiError;
use crate::api::resource::{BoundResource, ResourceDescriptor, ResourceKind};
use crate::api::template::{expand, TemplateVars};

const SELF_TEMPLATE: &str = "{+bitbucket_url}/1.0/users{/username}/consumers{/consumer_id}";
const OWNER_TEMPLATE: &str = "{+bitbucket_url}/1.0/users{/username}";
const CONSUMERS_TEMPLATE: &str = "{+bitbucket_url}/1.0/users{/username}/consumers";

/// Relationship catalog for consumers.
///
/// The 1.0 API returns no links section; these templates stand in for it
/// and are expanded with the client's context plus the consumer id.
static LINKS_CATALOG: Lazy<Value> = Lazy::new(|| {
    json!({
        "_links": {
            "self": {"href": SELF_TEMPLATE},
            "owner": {"href": OWNER_TEMPLATE},
            "consumers": {"href": CONSUMERS_TEMPLATE}
        }
    })
});

/// The permission scopes a consumer can be granted.
///
/// Scopes are matched exhaustively at compile time; parsing an unknown
/// scope string fails with [`ApiError::InvalidArgument`] before any
/// network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionScope {
    /// Read the account's primary email address.
    Email,
    /// Read account information.
    AccountRead,
    /// Update account information.
    AccountWrite,
    /// Read team membership.
    TeamRead,
    /// Administer teams.
    TeamWrite,
    /// Read repositories.
    RepositoryRead,
    /// Push to repositories.
    RepositoryWrite,
    /// Administer repositories.
    RepositoryAdmin,
    /// Read pull requests.
    PullrequestRead,
    /// Create and resolve pull requests.
    PullrequestWrite,
    /// Read issues.
    IssueRead,
    /// Create and update issues.
    IssueWrite,
    /// Read and write wikis.
    Wiki,
    /// Read snippets.
    SnippetRead,
    /// Create and update snippets.
    SnippetWrite,
    /// Register and trigger webhooks.
    Webhook,
}

impl PermissionScope {
    /// The wire value of this scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::AccountRead => "account",
            Self::AccountWrite => "account:write",
            Self::TeamRead => "team",
            Self::TeamWrite => "team:write",
            Self::RepositoryRead => "repository",
            Self::RepositoryWrite => "repository:write",
            Self::RepositoryAdmin => "repository:admin",
            Self::PullrequestRead => "pullrequest",
            Self::PullrequestWrite => "pullrequest:write",
            Self::IssueRead => "issue",
            Self::IssueWrite => "issue:write",
            Self::Wiki => "wiki",
            Self::SnippetRead => "snippet",
            Self::SnippetWrite => "snippet:write",
            Self::Webhook => "webhook",
        }
    }
}

impl fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionScope {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "account" => Ok(Self::AccountRead),
            "account:write" => Ok(Self::AccountWrite),
            "team" => Ok(Self::TeamRead),
            "team:write" => Ok(Self::TeamWrite),
            "repository" => Ok(Self::RepositoryRead),
            "repository:write" => Ok(Self::RepositoryWrite),
            "repository:admin" => Ok(Self::RepositoryAdmin),
            "pullrequest" => Ok(Self::PullrequestRead),
            "pullrequest:write" => Ok(Self::PullrequestWrite),
            "issue" => Ok(Self::IssueRead),
            "issue:write" => Ok(Self::IssueWrite),
            "wiki" => Ok(Self::Wiki),
            "snippet" => Ok(Self::SnippetRead),
            "snippet:write" => Ok(Self::SnippetWrite),
            "webhook" => Ok(Self::Webhook),
            other => Err(ApiError::InvalidArgument(format!(
                "'{other}' is not a recognized permission scope",
            ))),
        }
    }
}

/// Builder for consumer create/update bodies.
///
/// Server defaults may change, so unset fields are simply not sent and
/// the server decides. Scopes serialize as one repeated `scope` form
/// field per entry.
#[derive(Debug, Clone, Default)]
pub struct ConsumerPayload {
    name: Option<String>,
    scopes: Vec<PermissionScope>,
    description: Option<String>,
    url: Option<String>,
    callback_url: Option<String>,
}

impl ConsumerPayload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// The display name of the consumer.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Grants one scope; may be called repeatedly.
    pub fn scope(mut self, scope: PermissionScope) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Grants a set of scopes at once.
    pub fn scopes(mut self, scopes: impl IntoIterator<Item = PermissionScope>) -> Self {
        self.scopes.extend(scopes);
        self
    }

    /// Free-form description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The consumer's homepage URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The OAuth callback URL.
    pub fn callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    pub(crate) fn to_form(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        for scope in &self.scopes {
            pairs.push(("scope", scope.as_str().to_string()));
        }
        if let Some(description) = &self.description {
            pairs.push(("description", description.clone()));
        }
        if let Some(url) = &self.url {
            pairs.push(("url", url.clone()));
        }
        if let Some(callback_url) = &self.callback_url {
            pairs.push(("callback_url", callback_url.clone()));
        }
        pairs
    }
}

pub(crate) fn is_type(data: &Value) -> bool {
    ["id", "name", "secret", "key"]
        .iter()
        .all(|field| data.get(*field).is_some_and(|v| !v.is_null()))
}

pub(crate) fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new(ResourceKind::Consumer, Some("id"), is_type)
}

/// An OAuth consumer bound from a 1.0 payload.
#[derive(Debug, Clone)]
pub struct Consumer {
    inner: BoundResource,
}

impl Consumer {
    /// Binds a raw consumer payload.
    ///
    /// The consumer id recovered from the payload feeds the catalog's
    /// `self` template, so the bound instance knows its own URL even
    /// though the server never sent one.
    pub(crate) fn bind(data: Value, client: &Client) -> Result<Self, ApiError> {
        let consumer_id = match data.get("id") {
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        };
        let context = TemplateVars::new().set_opt("consumer_id", consumer_id);
        let descriptor = descriptor();
        let mut inner = BoundResource::bind(&descriptor, data, client, &context)?;
        inner.merge_catalog(&LINKS_CATALOG, &context);
        Ok(Self { inner })
    }

    /// The underlying bound resource.
    pub fn resource(&self) -> &BoundResource {
        &self.inner
    }

    /// The consumer's numeric id.
    pub fn id(&self) -> Option<i64> {
        self.inner.field("id").and_then(Value::as_i64)
    }

    /// The consumer's display name.
    pub fn name(&self) -> Option<&str> {
        self.inner.string_field("name")
    }

    /// The OAuth key.
    pub fn key(&self) -> Option<&str> {
        self.inner.string_field("key")
    }

    /// The OAuth secret.
    pub fn secret(&self) -> Option<&str> {
        self.inner.string_field("secret")
    }

    /// Registers a new consumer for the authenticated user.
    ///
    /// Expects 200 with the created consumer; any other status surfaces
    /// as [`ApiError::UnexpectedStatus`].
    pub async fn create(payload: &ConsumerPayload, client: &Client) -> Result<Self, ApiError> {
        let url = expand(CONSUMERS_TEMPLATE, &client.template_vars());
        // The 1.0 API expects a urlencoded form here, not JSON.
        let response = client.post_form(&url, &payload.to_form()).await?;
        let response = Client::expect_ok(response).await?;
        let body = response.text().await?;
        Self::bind(serde_json::from_str(&body)?, client)
    }

    /// Replaces this consumer's attributes, returning the new state.
    pub async fn update(&self, payload: &ConsumerPayload) -> Result<Self, ApiError> {
        let client = self.inner.client().clone();
        let url = self.require_self_url()?;
        let response = client.put_form(&url, &payload.to_form()).await?;
        let response = Client::expect_ok(response).await?;
        let body = response.text().await?;
        Self::bind(serde_json::from_str(&body)?, &client)
    }

    /// Revokes this consumer. The server answers 204.
    pub async fn delete(self) -> Result<(), ApiError> {
        let url = self.require_self_url()?;
        let response = self.inner.client().delete(&url).await?;
        Client::expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    /// Lists every consumer of the authenticated user.
    ///
    /// The 1.0 API answers with a bare JSON array rather than a page
    /// envelope, so this returns a complete vector instead of a cursor.
    /// Each element must bind as a consumer; anything else is a
    /// [`ApiError::TypeMismatch`].
    pub async fn find_consumers(client: &Client) -> Result<Vec<Self>, ApiError> {
        let url = expand(CONSUMERS_TEMPLATE, &client.template_vars());
        let response = client.get(&url).await?;
        let response = Client::expect_ok(response).await?;
        let body = response.text().await?;
        let items: Vec<Value> = serde_json::from_str(&body)?;
        items
            .into_iter()
            .map(|item| Self::bind(item, client))
            .collect()
    }

    /// Finds one consumer of the authenticated user by id.
    ///
    /// A 404 is a valid absent result, not an error.
    pub async fn find_consumer_by_id(
        consumer_id: i64,
        client: &Client,
    ) -> Result<Option<Self>, ApiError> {
        let vars = client
            .template_vars()
            .set("consumer_id", consumer_id.to_string());
        let url = expand(SELF_TEMPLATE, &vars);
        match client.get_optional(&url).await? {
            Some(data) => Ok(Some(Self::bind(data, client)?)),
            None => Ok(None),
        }
    }

    fn require_self_url(&self) -> Result<String, ApiError> {
        self.inner
            .self_url()
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidArgument("consumer has no self link".to_string()))
    }
}
