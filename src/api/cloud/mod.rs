//
//  bitbucket-cloud
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Bitbucket Cloud API v2.0 resources.
//!
//! Every 2.0 payload embeds the URLs of its related resources in a
//! `links` section; the modules here are thin typed layers over the
//! generic binder in [`crate::api::resource`].
//!
//! # Module Organization
//!
//! - [`hooks`] - repository webhooks
//! - [`snippets`] - snippets and their files
//! - [`teams`] - team accounts and memberships
//! - [`users`] - user accounts
//! - [`repositories`] - repositories
//!
//! # Notes
//!
//! - All timestamps are ISO 8601 strings
//! - UUIDs are returned with curly braces (e.g. `{123e4567-...}`)
//! - List endpoints answer with the `{values, next}` page envelope

pub mod hooks;
pub mod repositories;
pub mod snippets;
pub mod teams;
pub mod users;

pub use hooks::Hook;
pub use repositories::Repository;
pub use snippets::Snippet;
pub use teams::Team;
pub use users::User;
