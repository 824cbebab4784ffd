//
//  bitbucket-cloud
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Pagination for Bitbucket API Responses
//!
//! Bitbucket Cloud list endpoints answer with a page envelope:
//!
//! ```json
//! { "values": [ ... ], "next": "<url of the next page, or absent>" }
//! ```
//!
//! [`Page`] models the envelope; [`PagedCursor`] walks a whole result set
//! lazily, one page at a time, classifying every item through the
//! resource registry as it goes.
//!
//! # Laziness
//!
//! Nothing is fetched until the consumer pulls. Each
//! [`try_next`](PagedCursor::try_next) performs at most one HTTP request
//! (when the buffered page is exhausted), so an unbounded result set
//! never forces unbounded memory or eager requests. The cursor is
//! forward-only; construct a new one from the same URL to walk again.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_cloud::api::Client;
//! use bitbucket_cloud::api::cloud::teams::{Team, TeamRole};
//!
//! # async fn example() -> Result<(), bitbucket_cloud::api::common::ApiError> {
//! let client = Client::cloud()?;
//! let mut teams = Team::list_for_role(TeamRole::Member, &client);
//! while let Some(team) = teams.try_next().await? {
//!     println!("{:?}", team.kind());
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::api::client::Client;
use crate::api::resource::{dispatch, Resource};

use super::ApiError;

/// One page of a Bitbucket Cloud list response.
///
/// # Type Parameters
///
/// - `T` - The type of items in the `values` array.
///
/// # Notes
///
/// - The `values` field is always present, even if empty.
/// - `size` may be omitted by the server for performance on large sets.
/// - `next` absent means this is the last page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in the current page. May be empty.
    pub values: Vec<T>,

    /// Current page number (1-indexed), when the server reports one.
    #[serde(default)]
    pub page: Option<u32>,

    /// Requested page size.
    #[serde(default)]
    pub pagelen: Option<u32>,

    /// Total number of items across all pages, when reported.
    #[serde(default)]
    pub size: Option<u32>,

    /// Complete URL of the next page. `None` on the last page.
    #[serde(default)]
    pub next: Option<String>,

    /// Complete URL of the previous page. `None` on the first page.
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> Page<T> {
    /// Whether more pages are available.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// The URL of the next page, borrowed.
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }
}

/// A lazy, forward-only cursor over a paginated result set.
///
/// Fetches pages one at a time as the consumer advances and dispatches
/// every item through the resource registry: recognized payloads come
/// back as typed resources, everything else as [`Resource::Raw`].
///
/// A failed page request surfaces immediately as
/// [`ApiError::UnexpectedStatus`]; items already yielded remain valid,
/// but no further pages are fetched.
#[derive(Debug)]
pub struct PagedCursor {
    client: Client,
    next_url: Option<String>,
    buffer: VecDeque<Value>,
}

impl PagedCursor {
    /// Creates a cursor starting at `url`.
    ///
    /// No request is issued until the first
    /// [`try_next`](Self::try_next).
    pub fn new(url: String, client: Client) -> Self {
        Self {
            client,
            next_url: Some(url),
            buffer: VecDeque::new(),
        }
    }

    /// Advances the cursor by one item.
    ///
    /// Returns `Ok(None)` once the last page is exhausted. A page with
    /// an empty `values` array yields nothing but its `next` link is
    /// still followed.
    ///
    /// # Errors
    ///
    /// - [`ApiError::UnexpectedStatus`] when a page request answers
    ///   anything but 200. The cursor yields no further pages after a
    ///   failure.
    /// - [`ApiError::Network`] / [`ApiError::Decode`] for transport and
    ///   body-shape failures.
    pub async fn try_next(&mut self) -> Result<Option<Resource>, ApiError> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return dispatch(item, &self.client).map(Some);
            }

            let Some(url) = self.next_url.take() else {
                return Ok(None);
            };

            trace!(url = url.as_str(), "fetching page");
            let response = self.client.get(&url).await?;
            let response = Client::expect_ok(response).await?;
            let body = response.text().await?;
            let page: Page<Value> = serde_json::from_str(&body)?;

            self.next_url = page.next;
            self.buffer.extend(page.values);
        }
    }

    /// Drains the cursor into a vector.
    ///
    /// Convenience for small result sets; prefer
    /// [`try_next`](Self::try_next) when the set may be large.
    pub async fn collect_all(mut self) -> Result<Vec<Resource>, ApiError> {
        let mut items = Vec::new();
        while let Some(item) = self.try_next().await? {
            items.push(item);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_envelope_with_next() {
        let page: Page<Value> = serde_json::from_value(json!({
            "values": [{"type": "user", "username": "evzijst"}],
            "page": 1,
            "pagelen": 10,
            "size": 25,
            "next": "https://api.bitbucket.org/2.0/teams?role=member&page=2"
        }))
        .unwrap();

        assert_eq!(page.values.len(), 1);
        assert!(page.has_next());
        assert_eq!(
            page.next_url(),
            Some("https://api.bitbucket.org/2.0/teams?role=member&page=2"),
        );
    }

    #[test]
    fn test_page_envelope_minimal() {
        let page: Page<Value> = serde_json::from_value(json!({"values": []})).unwrap();
        assert!(page.values.is_empty());
        assert!(!page.has_next());
        assert_eq!(page.size, None);
    }
}
