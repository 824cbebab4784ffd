//
//  bitbucket-cloud
//  api/links.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Link Extraction
//!
//! Bitbucket payloads embed the URLs of related resources in a links
//! section: a JSON object mapping relationship names to `{"href": ...}`
//! entries. This module pulls those `(name, template)` pairs out of a raw
//! payload so the binder can expand and attach them.
//!
//! Two spellings exist in the wild: static link catalogs (the 1.0 consumer
//! endpoints) use `_links`, while live 2.0 payloads use `links`. The
//! extractor accepts either, preferring `_links` when both are present.
//!
//! The reserved `clone` relation is shaped differently — an array of
//! `{name, href}` variants rather than a single object — and is excluded
//! from the generic sequence. Callers that need clone URLs use
//! [`clone_links_from`] explicitly.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use bitbucket_cloud::api::links::links_from;
//!
//! let payload = json!({
//!     "links": {
//!         "self": {"href": "https://api.bitbucket.org/2.0/snippets/evzijst/kypj"},
//!         "comments": {"href": "https://api.bitbucket.org/2.0/snippets/evzijst/kypj/comments"}
//!     }
//! });
//!
//! let links: Vec<_> = links_from(&payload).collect();
//! assert_eq!(links[0].0, "self");
//! assert_eq!(links.len(), 2);
//! ```

use std::collections::HashMap;

use serde_json::{Map, Value};

/// The reserved relation carrying protocol-named clone URL variants.
pub const CLONE_RELATION: &str = "clone";

/// Extracts `(name, href)` pairs from a payload's links section.
///
/// Yields relationship names in the order they appear in the source
/// document. Entries without a string `href` are skipped silently, as is
/// the reserved `clone` relation. A payload with no links section (or a
/// links section that is not an object) yields an empty sequence — never
/// an error.
///
/// The `href` values are URI templates, not necessarily concrete URLs;
/// expansion happens in the binder.
pub fn links_from(data: &Value) -> impl Iterator<Item = (&str, &str)> + '_ {
    link_section(data)
        .into_iter()
        .flat_map(|section| section.iter())
        .filter(|(name, _)| name.as_str() != CLONE_RELATION)
        .filter_map(|(name, body)| {
            body.get("href")
                .and_then(Value::as_str)
                .map(|href| (name.as_str(), href))
        })
}

/// Extracts the clone-protocol map from a payload's links section.
///
/// The `clone` relation is a list of `{name, href}` pairs naming one URL
/// per protocol (`https`, `ssh`). Returns an empty map when the relation
/// is absent or malformed; entries missing either field are skipped.
pub fn clone_links_from(data: &Value) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let variants = link_section(data)
        .and_then(|section| section.get(CLONE_RELATION))
        .and_then(Value::as_array);

    if let Some(variants) = variants {
        for variant in variants {
            let name = variant.get("name").and_then(Value::as_str);
            let href = variant.get("href").and_then(Value::as_str);
            if let (Some(name), Some(href)) = (name, href) {
                out.insert(name.to_string(), href.to_string());
            }
        }
    }
    out
}

fn link_section(data: &Value) -> Option<&Map<String, Value>> {
    data.get("_links")
        .or_else(|| data.get("links"))
        .and_then(Value::as_object)
}
