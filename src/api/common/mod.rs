//
//  bitbucket-cloud
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! This module provides the shared pieces the rest of the API layer builds
//! on: the [`ApiError`] taxonomy and the pagination types (re-exported from
//! the [`pagination`] submodule).
//!
//! # Error Handling
//!
//! Every operation surfaces one of a small set of typed failures:
//!
//! - [`ApiError::TypeMismatch`] - a payload did not match the resource kind
//!   the caller expected
//! - [`ApiError::UnexpectedStatus`] - the response status was outside the
//!   operation's expected set (200 for most operations, 204 for deletes)
//! - [`ApiError::InvalidArgument`] - a caller-supplied value (role, scope,
//!   relationship name) is not among the recognized set; fails before any
//!   network call
//! - [`ApiError::Network`] - transport-level failure from `reqwest`
//! - [`ApiError::Decode`] - the body was not the JSON the caller required
//! - [`ApiError::Config`] - the configuration file is missing or invalid
//!
//! A 404 on a single-resource lookup is *not* an error: finders return
//! `Ok(None)` so callers can distinguish "absent" from "failed".
//!
//! # Example
//!
//! ```rust
//! use bitbucket_cloud::api::common::ApiError;
//!
//! fn describe(error: &ApiError) -> String {
//!     match error {
//!         ApiError::UnexpectedStatus { url, status, .. } => {
//!             format!("{} answered {}", url, status)
//!         }
//!         other => other.to_string(),
//!     }
//! }
//! ```

use thiserror::Error;

use super::resource::ResourceKind;

mod pagination;

pub use pagination::*;

/// Unified error type for all Bitbucket API operations.
///
/// Errors propagate to the immediate caller; the library performs no
/// automatic retries and no partial-success aggregation. Each variant
/// carries enough context (URL attempted, status code, expected resource
/// kind) to diagnose a failure without re-running with verbose logging.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A payload was expected to match a resource kind's predicate and
    /// did not.
    ///
    /// This is a hard error rather than a skip: callers rely on knowing
    /// what kind of object a binding produced.
    #[error("payload does not represent a {expected} resource")]
    TypeMismatch {
        /// The resource kind the caller expected.
        expected: ResourceKind,
    },

    /// A response status differed from the operation's expected status.
    ///
    /// Most reads and writes expect 200; deletes expect 204. The body is
    /// captured verbatim for diagnosis.
    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        /// The URL the request was issued against.
        url: String,
        /// The actual HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// A caller-supplied value is not among the recognized set.
    ///
    /// Raised before any network call, e.g. for an unknown role string or
    /// a relationship name the bound resource does not carry.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A network-level error occurred during the request.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body could not be decoded as the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Returns the HTTP status code carried by this error, when present.
    ///
    /// Only [`ApiError::UnexpectedStatus`] carries one; every other
    /// variant returns `None`.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_carries_context() {
        let error = ApiError::UnexpectedStatus {
            url: "https://api.bitbucket.org/2.0/snippets/evzijst/kypj".to_string(),
            status: 403,
            body: r#"{"error": {"message": "Access denied"}}"#.to_string(),
        };
        let message = error.to_string();

        assert!(message.contains("403"));
        assert!(message.contains("/2.0/snippets/evzijst/kypj"));
        assert!(message.contains("Access denied"));
        assert_eq!(error.status(), Some(403));
    }

    #[test]
    fn test_type_mismatch_names_expected_kind() {
        let error = ApiError::TypeMismatch {
            expected: ResourceKind::Consumer,
        };
        assert!(error.to_string().contains("consumer"));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_invalid_argument_message() {
        let error = ApiError::InvalidArgument("role 'owner2' is not a team role".to_string());
        assert!(error.to_string().contains("owner2"));
    }
}
