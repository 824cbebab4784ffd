//
//  bitbucket-cloud
//  api/cloud/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! User accounts, v2.0 API.

use serde_json::Value;

use crate::api::client::Client;
use crate::api::common::{ApiError, PagedCursor};
use crate::api::resource::{BoundResource, ResourceDescriptor, ResourceKind};
use crate::api::template::{expand, TemplateVars};

const USER_SELF_TEMPLATE: &str = "{+bitbucket_url}/2.0/users{/username}";
const CURRENT_USER_TEMPLATE: &str = "{+bitbucket_url}/2.0/user";

pub(crate) fn is_type(data: &Value) -> bool {
    data.get("type").and_then(Value::as_str) == Some("user")
}

pub(crate) fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new(ResourceKind::User, Some("username"), is_type)
}

/// A user account bound from a 2.0 payload.
#[derive(Debug, Clone)]
pub struct User {
    inner: BoundResource,
}

impl User {
    pub(crate) fn bind(data: Value, client: &Client) -> Result<Self, ApiError> {
        let descriptor = descriptor();
        let inner = BoundResource::bind(&descriptor, data, client, &TemplateVars::new())?;
        Ok(Self { inner })
    }

    /// The underlying bound resource.
    pub fn resource(&self) -> &BoundResource {
        &self.inner
    }

    /// The user's username.
    pub fn username(&self) -> Option<&str> {
        self.inner.string_field("username")
    }

    /// The user's display name.
    pub fn display_name(&self) -> Option<&str> {
        self.inner.string_field("display_name")
    }

    /// Walks the accounts following this user.
    pub fn followers(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("followers")
    }

    /// Walks the accounts this user follows.
    pub fn following(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("following")
    }

    /// Walks the user's repositories.
    pub fn repositories(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("repositories")
    }

    /// Finds a user by username. A 404 is a valid absent result.
    pub async fn find_by_username(
        username: &str,
        client: &Client,
    ) -> Result<Option<Self>, ApiError> {
        // The searched username overrides the client's own.
        let vars = client
            .template_vars()
            .merge(&TemplateVars::new().set("username", username));
        let url = expand(USER_SELF_TEMPLATE, &vars);
        match client.get_optional(&url).await? {
            Some(data) => Ok(Some(Self::bind(data, client)?)),
            None => Ok(None),
        }
    }

    /// Fetches the authenticated user.
    ///
    /// Unlike the finders, this expects the account to exist: any
    /// non-200 (including 401 for missing credentials) surfaces as
    /// [`ApiError::UnexpectedStatus`].
    pub async fn current(client: &Client) -> Result<Self, ApiError> {
        let url = expand(CURRENT_USER_TEMPLATE, &client.template_vars());
        let data = client.get_json(&url).await?;
        Self::bind(data, client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_type_keys_off_type_field() {
        assert!(is_type(&json!({"type": "user", "username": "evzijst"})));
        assert!(!is_type(&json!({"type": "team"})));
        assert!(!is_type(&json!({"username": "evzijst"})));
        assert!(!is_type(&json!({})));
    }

    #[test]
    fn test_accessors() {
        let client = Client::at("https://api.example.test").unwrap();
        let user = User::bind(
            json!({
                "type": "user",
                "username": "evzijst",
                "display_name": "Erik van Zijst",
                "links": {
                    "followers": {"href": "https://api.example.test/2.0/users/evzijst/followers"}
                }
            }),
            &client,
        )
        .unwrap();

        assert_eq!(user.username(), Some("evzijst"));
        assert_eq!(user.display_name(), Some("Erik van Zijst"));
        assert!(user.followers().is_ok());
        assert!(user.repositories().is_err());
    }
}
