//
//  bitbucket-cloud
//  api/cloud/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Repositories, v2.0 API.
//!
//! Repository payloads carry the richest link set in the API — watchers,
//! commits, forks, pull requests, and the reserved `clone` relation with
//! its per-protocol remotes.

use serde_json::Value;

use crate::api::client::Client;
use crate::api::common::{ApiError, PagedCursor};
use crate::api::resource::{BoundResource, ResourceDescriptor, ResourceKind};
use crate::api::template::{expand, TemplateVars};

const REPOSITORY_SELF_TEMPLATE: &str = "{+bitbucket_url}/2.0/repositories/{+full_name}";
const REPOSITORIES_FOR_OWNER_TEMPLATE: &str = "{+bitbucket_url}/2.0/repositories{/owner}";

pub(crate) fn is_type(data: &Value) -> bool {
    data.get("type").and_then(Value::as_str) == Some("repository")
}

pub(crate) fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new(ResourceKind::Repository, Some("full_name"), is_type)
}

/// A repository bound from a 2.0 payload.
#[derive(Debug, Clone)]
pub struct Repository {
    inner: BoundResource,
}

impl Repository {
    pub(crate) fn bind(data: Value, client: &Client) -> Result<Self, ApiError> {
        let descriptor = descriptor();
        let inner = BoundResource::bind(&descriptor, data, client, &TemplateVars::new())?;
        Ok(Self { inner })
    }

    /// The underlying bound resource.
    pub fn resource(&self) -> &BoundResource {
        &self.inner
    }

    /// The `owner/slug` full name.
    pub fn full_name(&self) -> Option<&str> {
        self.inner.string_field("full_name")
    }

    /// The repository name.
    pub fn name(&self) -> Option<&str> {
        self.inner.string_field("name")
    }

    /// The SCM backing the repository (`git`).
    pub fn scm(&self) -> Option<&str> {
        self.inner.string_field("scm")
    }

    /// Whether the repository is private (coerced at bind time).
    pub fn is_private(&self) -> Option<bool> {
        self.inner.bool_field("is_private")
    }

    /// The clone URL for a protocol (`https`, `ssh`), when the payload
    /// carried one.
    pub fn clone_url(&self, protocol: &str) -> Option<&str> {
        self.inner.clone_url(protocol)
    }

    /// Walks the accounts watching this repository.
    pub fn watchers(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("watchers")
    }

    /// Walks this repository's forks.
    pub fn forks(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("forks")
    }

    /// Walks this repository's commits.
    pub fn commits(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("commits")
    }

    /// Walks this repository's pull requests.
    pub fn pullrequests(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("pullrequests")
    }

    /// Finds a repository by its `owner/slug` full name.
    ///
    /// A 404 is a valid absent result, not an error.
    pub async fn find_by_full_name(
        full_name: &str,
        client: &Client,
    ) -> Result<Option<Self>, ApiError> {
        let vars = client.template_vars().set("full_name", full_name);
        let url = expand(REPOSITORY_SELF_TEMPLATE, &vars);
        match client.get_optional(&url).await? {
            Some(data) => Ok(Some(Self::bind(data, client)?)),
            None => Ok(None),
        }
    }

    /// Lists the repositories of an owner as a lazy cursor.
    pub fn list_for_owner(owner: &str, client: &Client) -> PagedCursor {
        let vars = client.template_vars().set("owner", owner);
        PagedCursor::new(
            expand(REPOSITORIES_FOR_OWNER_TEMPLATE, &vars),
            client.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_repository() -> Value {
        serde_json::from_str(include_str!(
            "../../../tests/fixtures/example_single_repository.json"
        ))
        .unwrap()
    }

    #[test]
    fn test_is_type() {
        assert!(is_type(&example_repository()));
        assert!(!is_type(&serde_json::json!({"full_name": "a/b"})));
        assert!(!is_type(&serde_json::json!({})));
    }

    #[test]
    fn test_binding_the_fixture() {
        let client = Client::at("https://api.example.test").unwrap();
        let repository = Repository::bind(example_repository(), &client).unwrap();

        assert_eq!(
            repository.full_name(),
            Some("teamsinspace/teamsinspace.bitbucket.org"),
        );
        assert_eq!(repository.scm(), Some("git"));
        assert_eq!(repository.is_private(), Some(false));
        assert!(repository.watchers().is_ok());
        assert!(repository.pullrequests().is_ok());
        assert_eq!(
            repository.clone_url("ssh"),
            Some("ssh://git@bitbucket.org/teamsinspace/teamsinspace.bitbucket.org.git"),
        );
        // Clone is a lookup, not a relationship.
        assert!(repository.resource().follow("clone").is_err());
    }

    #[test]
    fn test_full_name_survives_expansion() {
        let client = Client::at("https://api.example.test").unwrap();
        let vars = client.template_vars().set("full_name", "team/repo.name");
        assert_eq!(
            expand(REPOSITORY_SELF_TEMPLATE, &vars),
            "https://api.example.test/2.0/repositories/team/repo.name",
        );
    }
}
