//
//  bitbucket-cloud
//  api/cloud/hooks.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Repository webhooks, v2.0 API.
//!
//! Webhooks let external services receive notifications about repository
//! events. Create and update bodies are JSON; unset fields are not sent
//! so the server keeps its own defaults.

use serde::Serialize;
use serde_json::Value;

use crate::api::client::Client;
use crate::api::common::{ApiError, PagedCursor};
use crate::api::resource::{BoundResource, ResourceDescriptor, ResourceKind};
use crate::api::template::{expand, TemplateVars};

const HOOKS_TEMPLATE: &str =
    "{+bitbucket_url}/2.0/repositories{/username}{/repository_name}/hooks";
const HOOK_SELF_TEMPLATE: &str =
    "{+bitbucket_url}/2.0/repositories{/username}{/repository_name}/hooks{/uuid}";

/// Builder for webhook create/update bodies.
///
/// Server defaults may change, so unset fields are omitted from the
/// serialized body and the server decides.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<String>>,
}

impl HookPayload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Human-readable description of the hook.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The URL events are delivered to.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Whether deliveries are enabled.
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// The event keys to subscribe to (e.g. `repo:push`).
    pub fn events(mut self, events: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.events = Some(events.into_iter().map(Into::into).collect());
        self
    }
}

pub(crate) fn is_type(data: &Value) -> bool {
    ["uuid", "events", "active"]
        .iter()
        .all(|field| data.get(*field).is_some_and(|v| !v.is_null()))
}

pub(crate) fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new(ResourceKind::Hook, Some("uuid"), is_type)
}

/// A repository webhook bound from a 2.0 payload.
#[derive(Debug, Clone)]
pub struct Hook {
    inner: BoundResource,
}

impl Hook {
    pub(crate) fn bind(data: Value, client: &Client) -> Result<Self, ApiError> {
        let descriptor = descriptor();
        let inner = BoundResource::bind(&descriptor, data, client, &TemplateVars::new())?;
        Ok(Self { inner })
    }

    /// The underlying bound resource.
    pub fn resource(&self) -> &BoundResource {
        &self.inner
    }

    /// The hook's uuid, curly braces included.
    pub fn uuid(&self) -> Option<&str> {
        self.inner.string_field("uuid")
    }

    /// The hook's description.
    pub fn description(&self) -> Option<&str> {
        self.inner.string_field("description")
    }

    /// Whether deliveries are enabled.
    pub fn is_active(&self) -> Option<bool> {
        self.inner.field("active").and_then(Value::as_bool)
    }

    /// The subscribed event keys.
    pub fn events(&self) -> Vec<&str> {
        self.inner
            .field("events")
            .and_then(Value::as_array)
            .map(|events| events.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Registers a webhook on a repository of the authenticated user.
    pub async fn create(
        repository_name: &str,
        payload: &HookPayload,
        client: &Client,
    ) -> Result<Self, ApiError> {
        let vars = client
            .template_vars()
            .set("repository_name", repository_name);
        let url = expand(HOOKS_TEMPLATE, &vars);
        let response = client.post_json(&url, payload).await?;
        let response = Client::expect_ok(response).await?;
        let body = response.text().await?;
        Self::bind(serde_json::from_str(&body)?, client)
    }

    /// Lists the webhooks of a repository as a lazy cursor.
    pub fn list(repository_name: &str, client: &Client) -> PagedCursor {
        let vars = client
            .template_vars()
            .set("repository_name", repository_name);
        PagedCursor::new(expand(HOOKS_TEMPLATE, &vars), client.clone())
    }

    /// Finds a webhook by uuid. A 404 is a valid absent result.
    pub async fn find_by_uuid(
        repository_name: &str,
        uuid: &str,
        client: &Client,
    ) -> Result<Option<Self>, ApiError> {
        let vars = client
            .template_vars()
            .set("repository_name", repository_name)
            .set("uuid", uuid);
        let url = expand(HOOK_SELF_TEMPLATE, &vars);
        match client.get_optional(&url).await? {
            Some(data) => Ok(Some(Self::bind(data, client)?)),
            None => Ok(None),
        }
    }

    /// Replaces this hook's attributes, returning the new state.
    pub async fn update(&self, payload: &HookPayload) -> Result<Self, ApiError> {
        let client = self.inner.client().clone();
        let url = self.require_self_url()?;
        let response = client.put_json(&url, payload).await?;
        let response = Client::expect_ok(response).await?;
        let body = response.text().await?;
        Self::bind(serde_json::from_str(&body)?, &client)
    }

    /// Removes this hook. The server answers 204.
    pub async fn delete(self) -> Result<(), ApiError> {
        let url = self.require_self_url()?;
        let response = self.inner.client().delete(&url).await?;
        Client::expect_status(response, reqwest::StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    fn require_self_url(&self) -> Result<String, ApiError> {
        self.inner
            .self_url()
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidArgument("hook has no self link".to_string()))
    }
}
