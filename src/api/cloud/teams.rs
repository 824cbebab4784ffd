//
//  bitbucket-cloud
//  api/cloud/teams.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Team accounts, v2.0 API.
//!
//! A team payload's links section points at its members, followers, and
//! repositories; following any of those walks a paginated result where
//! every item is re-classified through the registry — members come back
//! as [`User`](super::users::User)s, repositories as
//! [`Repository`](super::repositories::Repository)s.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_cloud::api::Client;
//! use bitbucket_cloud::api::cloud::teams::{Team, TeamRole};
//!
//! # async fn example() -> Result<(), bitbucket_cloud::api::common::ApiError> {
//! let client = Client::cloud()?;
//! let mut teams = Team::list_for_role(TeamRole::Admin, &client);
//! while let Some(team) = teams.try_next().await? {
//!     println!("{:?}", team.kind());
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::api::client::Client;
use crate::api::common::{ApiError, PagedCursor};
use crate::api::resource::{BoundResource, ResourceDescriptor, ResourceKind};
use crate::api::template::{expand, TemplateVars};

const TEAMS_ROLE_TEMPLATE: &str = "{+bitbucket_url}/2.0/teams{?role}";
const TEAM_SELF_TEMPLATE: &str = "{+bitbucket_url}/2.0/teams{/username}";

/// The relationship between the authenticated user and a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamRole {
    /// Teams the user administers.
    Admin,
    /// Teams the user has contributed to.
    Contributor,
    /// Teams the user belongs to.
    Member,
}

impl TeamRole {
    /// The wire value of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Contributor => "contributor",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamRole {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "contributor" => Ok(Self::Contributor),
            "member" => Ok(Self::Member),
            other => Err(ApiError::InvalidArgument(format!(
                "role '{other}' is not one of [admin|contributor|member]",
            ))),
        }
    }
}

pub(crate) fn is_type(data: &Value) -> bool {
    data.get("type").and_then(Value::as_str) == Some("team")
}

pub(crate) fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new(ResourceKind::Team, Some("username"), is_type)
}

/// A team account bound from a 2.0 payload.
#[derive(Debug, Clone)]
pub struct Team {
    inner: BoundResource,
}

impl Team {
    pub(crate) fn bind(data: Value, client: &Client) -> Result<Self, ApiError> {
        let descriptor = descriptor();
        let inner = BoundResource::bind(&descriptor, data, client, &TemplateVars::new())?;
        Ok(Self { inner })
    }

    /// The underlying bound resource.
    pub fn resource(&self) -> &BoundResource {
        &self.inner
    }

    /// The team's username.
    pub fn username(&self) -> Option<&str> {
        self.inner.string_field("username")
    }

    /// The team's display name.
    pub fn display_name(&self) -> Option<&str> {
        self.inner.string_field("display_name")
    }

    /// Walks the team's members; items classify as users.
    pub fn members(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("members")
    }

    /// Walks the accounts following this team.
    pub fn followers(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("followers")
    }

    /// Walks the accounts this team follows.
    pub fn following(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("following")
    }

    /// Walks the team's repositories.
    pub fn repositories(&self) -> Result<PagedCursor, ApiError> {
        self.inner.follow("repositories")
    }

    /// Lists teams visible to the authenticated user under a role, as a
    /// lazy cursor.
    pub fn list_for_role(role: TeamRole, client: &Client) -> PagedCursor {
        let vars = client.template_vars().set("role", role.as_str());
        PagedCursor::new(expand(TEAMS_ROLE_TEMPLATE, &vars), client.clone())
    }

    /// Finds a team by username. A 404 is a valid absent result.
    pub async fn find_by_username(
        username: &str,
        client: &Client,
    ) -> Result<Option<Self>, ApiError> {
        // The searched username overrides the client's own.
        let vars = client
            .template_vars()
            .merge(&TemplateVars::new().set("username", username));
        let url = expand(TEAM_SELF_TEMPLATE, &vars);
        match client.get_optional(&url).await? {
            Some(data) => Ok(Some(Self::bind(data, client)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_type_keys_off_type_field() {
        assert!(is_type(&json!({"type": "team", "username": "teamsinspace"})));
        assert!(!is_type(&json!({"type": "user", "username": "evzijst"})));
        assert!(!is_type(&json!({"username": "teamsinspace"})));
        assert!(!is_type(&json!({})));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<TeamRole>().unwrap(), TeamRole::Admin);
        assert!(matches!(
            "owner".parse::<TeamRole>(),
            Err(ApiError::InvalidArgument(_)),
        ));
    }

    #[test]
    fn test_relationships_come_from_payload_links() {
        let client = Client::at("https://api.example.test").unwrap();
        let team = Team::bind(
            json!({
                "type": "team",
                "username": "teamsinspace",
                "display_name": "Teams In Space",
                "links": {
                    "members": {"href": "https://api.example.test/2.0/teams/teamsinspace/members"},
                    "repositories": {"href": "https://api.example.test/2.0/repositories/teamsinspace"}
                }
            }),
            &client,
        )
        .unwrap();

        assert!(team.members().is_ok());
        assert!(team.repositories().is_ok());
        // The payload carried no followers link, so the traversal is
        // rejected before any request is made.
        assert!(matches!(
            team.followers(),
            Err(ApiError::InvalidArgument(_)),
        ));
    }
}
