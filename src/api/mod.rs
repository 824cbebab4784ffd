//
//  bitbucket-cloud
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # API Layer
//!
//! Everything needed to talk to the Bitbucket Cloud REST APIs.
//!
//! ## Architecture
//!
//! The layer is organized leaf to root:
//!
//! - [`template`]: RFC 6570 URI template expansion (pure, deterministic)
//! - [`links`]: extraction of `(name, template)` pairs from payload link
//!   sections, with the reserved `clone` relation handled separately
//! - [`client`]: the HTTP session wrapper — base URL, credentials, raw
//!   verb methods, expected-status contracts
//! - [`resource`]: the registry of resource kinds, the binder that turns
//!   raw JSON into live objects, and the classified [`resource::Resource`]
//!   item type
//! - [`common`]: the [`common::ApiError`] taxonomy and the pagination
//!   walker
//! - [`cloud`] / [`v1`]: typed resources over the 2.0 and 1.0 APIs
//!
//! ## Data Flow
//!
//! A finder expands a URI template and issues a request through the
//! [`Client`]; the response payload passes through the binder, which
//! expands its links and attaches the relationship table; following a
//! relationship returns a [`common::PagedCursor`] that fetches pages
//! lazily and re-classifies every item through the registry.

/// HTTP client wrapper: base URL, credentials, verb methods, expected
/// status contracts.
pub mod client;

/// Bitbucket Cloud API v2.0 resources (hooks, snippets, teams, users,
/// repositories).
pub mod cloud;

/// Shared types: the error taxonomy and pagination.
pub mod common;

/// Link extraction from payload link sections.
pub mod links;

/// Resource kind registry and the JSON-to-object binder.
pub mod resource;

/// URI template expansion.
pub mod template;

/// Bitbucket Cloud API v1.0 resources (consumers).
pub mod v1;

pub use client::Client;
pub use common::{ApiError, Page, PagedCursor};
pub use resource::{BoundResource, Registry, Resource, ResourceDescriptor, ResourceKind};
