//
//  bitbucket-cloud
//  api/cloud/snippets.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Snippets, v2.0 API.
//!
//! Snippets are small file collections owned by a user or team. They are
//! the one resource whose writes are multipart: metadata fields travel as
//! form parts next to one part per file.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_cloud::api::Client;
//! use bitbucket_cloud::api::cloud::snippets::{Snippet, SnippetFile, SnippetPayload, SnippetRole};
//!
//! # async fn example() -> Result<(), bitbucket_cloud::api::common::ApiError> {
//! let client = Client::cloud()?;
//!
//! let files = vec![SnippetFile::new("notes.md", b"# scratch".to_vec())];
//! let payload = SnippetPayload::new().title("scratch notes").is_private(true);
//! let snippet = Snippet::create(files, &payload, &client).await?;
//!
//! // Walk everything the authenticated user owns.
//! let mut owned = Snippet::list_for_role(SnippetRole::Owner, &client);
//! while let Some(item) = owned.try_next().await? {
//!     println!("{:?}", item.kind());
//! }
//! # snippet.delete().await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;

use crate::api::client::Client;
use crate::api::common::{ApiError, PagedCursor};
use crate::api::resource::{BoundResource, ResourceDescriptor, ResourceKind};
use crate::api::template::{expand, TemplateVars};

const SNIPPETS_ROLE_TEMPLATE: &str = "{+bitbucket_url}/2.0/snippets{?role}";
const SNIPPETS_TEMPLATE: &str = "{+bitbucket_url}/2.0/snippets{/username}";
const SNIPPET_SELF_TEMPLATE: &str = "{+bitbucket_url}/2.0/snippets{/username}{/snippet_id}";

/// The relationship between the authenticated user and a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnippetRole {
    /// Snippets the user owns.
    Owner,
    /// Snippets the user has contributed to.
    Contributor,
    /// Snippets the user can see as a member.
    Member,
}

impl SnippetRole {
    /// The wire value of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Contributor => "contributor",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for SnippetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnippetRole {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "contributor" => Ok(Self::Contributor),
            "member" => Ok(Self::Member),
            other => Err(ApiError::InvalidArgument(format!(
                "role '{other}' is not one of [owner|contributor|member]",
            ))),
        }
    }
}

/// One file to upload with a snippet.
#[derive(Debug, Clone)]
pub struct SnippetFile {
    filename: String,
    contents: Vec<u8>,
}

impl SnippetFile {
    /// A file from an in-memory buffer.
    pub fn new(filename: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            contents,
        }
    }

    /// Reads a file from disk, using its file name as the snippet
    /// file name.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            filename,
            contents: std::fs::read(path)?,
        })
    }

    /// The name the file is stored under.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Builder for snippet create/modify metadata.
///
/// Server defaults may change, so unset fields are not sent and the
/// server decides.
#[derive(Debug, Clone, Default)]
pub struct SnippetPayload {
    is_private: Option<bool>,
    is_unlisted: Option<bool>,
    title: Option<String>,
    scm: Option<String>,
}

impl SnippetPayload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the snippet is private.
    pub fn is_private(mut self, is_private: bool) -> Self {
        self.is_private = Some(is_private);
        self
    }

    /// Whether the snippet is hidden from listings.
    pub fn is_unlisted(mut self, is_unlisted: bool) -> Self {
        self.is_unlisted = Some(is_unlisted);
        self
    }

    /// The snippet title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The SCM backing the snippet (`git`).
    pub fn scm(mut self, scm: impl Into<String>) -> Self {
        self.scm = Some(scm.into());
        self
    }

    fn apply_to(&self, mut form: Form) -> Form {
        if let Some(is_private) = self.is_private {
            form = form.text("is_private", bool_field(is_private));
        }
        if let Some(is_unlisted) = self.is_unlisted {
            form = form.text("is_unlisted", bool_field(is_unlisted));
        }
        if let Some(title) = &self.title {
            form = form.text("title", title.clone());
        }
        if let Some(scm) = &self.scm {
            form = form.text("scm", scm.clone());
        }
        form
    }
}

/// Boolean form fields travel as capitalized strings on this endpoint;
/// binding coerces them back on the way in.
fn bool_field(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn multipart_body(payload: &SnippetPayload, files: Vec<SnippetFile>) -> Form {
    let mut form = payload.apply_to(Form::new());
    for file in files {
        form = form.part(
            "file",
            Part::bytes(file.contents).file_name(file.filename),
        );
    }
    form
}

pub(crate) fn is_type(data: &Value) -> bool {
    data.get("id").is_some_and(|v| !v.is_null())
        && !data.get("destination").is_some_and(|v| !v.is_null())
}

pub(crate) fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new(ResourceKind::Snippet, Some("id"), is_type)
}

/// A snippet bound from a 2.0 payload.
#[derive(Debug, Clone)]
pub struct Snippet {
    inner: BoundResource,
}

impl Snippet {
    pub(crate) fn bind(data: Value, client: &Client) -> Result<Self, ApiError> {
        let descriptor = descriptor();
        let inner = BoundResource::bind(&descriptor, data, client, &TemplateVars::new())?;
        Ok(Self { inner })
    }

    /// The underlying bound resource.
    pub fn resource(&self) -> &BoundResource {
        &self.inner
    }

    /// The snippet's id.
    pub fn id(&self) -> Option<i64> {
        self.inner.field("id").and_then(Value::as_i64)
    }

    /// The snippet title.
    pub fn title(&self) -> Option<&str> {
        self.inner.string_field("title")
    }

    /// Whether the snippet is private (coerced at bind time).
    pub fn is_private(&self) -> Option<bool> {
        self.inner.bool_field("is_private")
    }

    /// Whether the snippet is unlisted (coerced at bind time).
    pub fn is_unlisted(&self) -> Option<bool> {
        self.inner.bool_field("is_unlisted")
    }

    /// The names of the files the snippet holds.
    pub fn filenames(&self) -> Vec<String> {
        self.inner
            .field("files")
            .and_then(Value::as_object)
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Creates a snippet from one or more files.
    ///
    /// Metadata and files travel together in one multipart body.
    pub async fn create(
        files: Vec<SnippetFile>,
        payload: &SnippetPayload,
        client: &Client,
    ) -> Result<Self, ApiError> {
        let url = expand(SNIPPETS_TEMPLATE, &client.template_vars());
        let response = client
            .post_multipart(&url, multipart_body(payload, files))
            .await?;
        let response = Client::expect_ok(response).await?;
        let body = response.text().await?;
        Self::bind(serde_json::from_str(&body)?, client)
    }

    /// Lists snippets visible to the authenticated user under a role,
    /// as a lazy cursor.
    pub fn list_for_role(role: SnippetRole, client: &Client) -> PagedCursor {
        let vars = client.template_vars().set("role", role.as_str());
        PagedCursor::new(expand(SNIPPETS_ROLE_TEMPLATE, &vars), client.clone())
    }

    /// Finds one snippet of the authenticated user by id.
    ///
    /// A 404 is a valid absent result, not an error.
    pub async fn find_by_id(snippet_id: &str, client: &Client) -> Result<Option<Self>, ApiError> {
        let vars = client.template_vars().set("snippet_id", snippet_id);
        let url = expand(SNIPPET_SELF_TEMPLATE, &vars);
        match client.get_optional(&url).await? {
            Some(data) => Ok(Some(Self::bind(data, client)?)),
            None => Ok(None),
        }
    }

    /// Replaces this snippet's metadata and/or files, returning the new
    /// state.
    pub async fn modify(
        &self,
        payload: &SnippetPayload,
        files: Vec<SnippetFile>,
    ) -> Result<Self, ApiError> {
        let client = self.inner.client().clone();
        let url = self.require_self_url()?;
        let response = client
            .put_multipart(&url, multipart_body(payload, files))
            .await?;
        let response = Client::expect_ok(response).await?;
        let body = response.text().await?;
        Self::bind(serde_json::from_str(&body)?, &client)
    }

    /// Deletes this snippet. The server answers 204.
    pub async fn delete(self) -> Result<(), ApiError> {
        let url = self.require_self_url()?;
        let response = self.inner.client().delete(&url).await?;
        Client::expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    /// Fetches the raw contents of one of the snippet's files.
    ///
    /// Returns `Ok(None)` when the snippet holds no file under that
    /// name; the lookup never touches the network in that case.
    pub async fn content(&self, filename: &str) -> Result<Option<Vec<u8>>, ApiError> {
        let url = self
            .inner
            .field("files")
            .and_then(|files| files.get(filename))
            .and_then(|file| file.get("links"))
            .and_then(|links| links.get("self"))
            .and_then(|link| link.get("href"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let Some(url) = url else {
            return Ok(None);
        };

        let response = self.inner.client().get(&url).await?;
        let response = Client::expect_ok(response).await?;
        Ok(Some(response.bytes().await?.to_vec()))
    }

    fn require_self_url(&self) -> Result<String, ApiError> {
        self.inner
            .self_url()
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidArgument("snippet has no self link".to_string()))
    }
}
