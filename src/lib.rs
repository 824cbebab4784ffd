//
//  bitbucket-cloud
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Bitbucket Cloud Client Library
//!
//! A client library for the Bitbucket Cloud REST API, versions 1.0
//! (consumers) and 2.0 (everything else).
//!
//! ## Overview
//!
//! Remote resources — consumers, webhooks, snippets, teams, users,
//! repositories — are modeled as local objects whose attributes come from
//! JSON responses and whose relationships are the hyperlinks embedded in
//! those responses. The library discovers what it can do from the
//! payloads themselves: link templates are expanded with runtime context,
//! attached to the bound object by relationship name, and followed
//! lazily with transparent pagination.
//!
//! ## Module Structure
//!
//! - [`api`]: the client, the binding machinery, and the typed resources
//! - [`auth`]: credential types and how they apply to requests
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_cloud::api::cloud::repositories::Repository;
//! use bitbucket_cloud::api::Client;
//! use bitbucket_cloud::auth::AuthCredential;
//!
//! # async fn example() -> Result<(), bitbucket_cloud::api::common::ApiError> {
//! let client = Client::cloud()?
//!     .with_auth(AuthCredential::app_password("evzijst", "app-password"));
//!
//! let repo = Repository::find_by_full_name("teamsinspace/ui", &client).await?;
//! if let Some(repo) = repo {
//!     // Relationships were discovered from the payload's links section.
//!     let mut watchers = repo.watchers()?;
//!     while let Some(watcher) = watchers.try_next().await? {
//!         println!("{:?}", watcher.kind());
//!     }
//! } else {
//!     println!("no such repository");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Operations return [`api::common::ApiError`]; a 404 on a single-resource
//! lookup is `Ok(None)`, not an error. There are no automatic retries.

/// API clients, resource binding, and typed resources.
pub mod api;

/// Authentication credential types.
pub mod auth;

/// Configuration file management.
pub mod config;

pub use api::{ApiError, Client, Page, PagedCursor, Resource, ResourceKind};
pub use auth::AuthCredential;
pub use config::Config;

/// Library name, used for the User-Agent header and config paths.
pub const APP_NAME: &str = "bitbucket-cloud";

/// Library version, derived from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
