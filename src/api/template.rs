//
//  bitbucket-cloud
//  api/template.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # URI Template Expansion
//!
//! This module implements the subset of RFC 6570 URI templates that the
//! Bitbucket APIs actually embed in their link sections. Templates are
//! expanded against a [`TemplateVars`] mapping; variables that are not set
//! are simply omitted from the output.
//!
//! ## Supported Operators
//!
//! | Expression | Behavior |
//! |------------|----------|
//! | `{var}` | Simple substitution, reserved characters percent-encoded |
//! | `{+var}` | Substitution with reserved-character passthrough |
//! | `{/var}` | Path segment expansion (`/value`) |
//! | `{?var,other}` | Query expansion (`?var=value&other=value`) |
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_cloud::api::template::{expand, TemplateVars};
//!
//! let vars = TemplateVars::new()
//!     .set("bitbucket_url", "https://api.bitbucket.org")
//!     .set("username", "evzijst");
//!
//! let url = expand("{+bitbucket_url}/1.0/users{/username}/consumers", &vars);
//! assert_eq!(url, "https://api.bitbucket.org/1.0/users/evzijst/consumers");
//! ```
//!
//! # Notes
//!
//! - Expansion is deterministic: the same template and variables always
//!   produce a byte-identical URL.
//! - No network access, no caching, no hidden state.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Matches a template expression: an optional operator followed by a
/// comma-separated variable list.
static EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([+/?])?([A-Za-z0-9_.%]+(?:,[A-Za-z0-9_.%]+)*)\}").unwrap());

/// Variable bindings for URI template expansion.
///
/// A thin builder over a name → value map. Values are plain strings;
/// percent-encoding is applied during expansion, per operator.
///
/// # Example
///
/// ```rust
/// use bitbucket_cloud::api::template::TemplateVars;
///
/// let vars = TemplateVars::new()
///     .set("role", "owner")
///     .set("username", "evzijst");
///
/// assert_eq!(vars.get("role"), Some("owner"));
/// assert_eq!(vars.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: HashMap<String, String>,
}

impl TemplateVars {
    /// Creates an empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable, replacing any previous binding of the same name.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Binds a variable only when a value is present.
    ///
    /// Convenient for caller-supplied identifiers that may be absent;
    /// unset variables are omitted from expansion output.
    pub fn set_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    /// Looks up a variable by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Merges every binding from `other` into this set, with `other`
    /// winning on conflicts.
    pub fn merge(mut self, other: &TemplateVars) -> Self {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
        self
    }
}

/// Expands a URI template against a set of variable bindings.
///
/// Every `{...}` expression in the template is replaced according to its
/// operator. Variables without a binding are omitted; an expression in
/// which no variable is bound contributes nothing to the output.
///
/// # Parameters
///
/// * `template` - The URI template string.
/// * `vars` - Variable bindings to substitute.
///
/// # Returns
///
/// The concrete URL. Expansion never fails; unknown text outside of
/// expressions is copied through verbatim.
///
/// # Example
///
/// ```rust
/// use bitbucket_cloud::api::template::{expand, TemplateVars};
///
/// let vars = TemplateVars::new().set("role", "member");
/// assert_eq!(
///     expand("https://api.bitbucket.org/2.0/snippets{?role}", &vars),
///     "https://api.bitbucket.org/2.0/snippets?role=member",
/// );
///
/// // Unset variables are omitted, not an error.
/// assert_eq!(
///     expand("https://api.bitbucket.org/2.0/snippets{?role}", &TemplateVars::new()),
///     "https://api.bitbucket.org/2.0/snippets",
/// );
/// ```
pub fn expand(template: &str, vars: &TemplateVars) -> String {
    EXPRESSION
        .replace_all(template, |caps: &Captures<'_>| {
            let operator = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let names = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            expand_expression(operator, names, vars)
        })
        .into_owned()
}

fn expand_expression(operator: &str, names: &str, vars: &TemplateVars) -> String {
    let bound: Vec<(&str, &str)> = names
        .split(',')
        .filter_map(|name| vars.get(name).map(|value| (name, value)))
        .collect();

    if bound.is_empty() {
        return String::new();
    }

    match operator {
        "+" => bound
            .iter()
            .map(|(_, value)| encode(value, true))
            .collect::<Vec<_>>()
            .join(","),
        "/" => bound
            .iter()
            .map(|(_, value)| format!("/{}", encode(value, false)))
            .collect(),
        "?" => {
            let pairs: Vec<String> = bound
                .iter()
                .map(|(name, value)| format!("{}={}", name, encode(value, false)))
                .collect();
            format!("?{}", pairs.join("&"))
        }
        _ => bound
            .iter()
            .map(|(_, value)| encode(value, false))
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Percent-encodes a value for substitution.
///
/// Unreserved characters always pass through. With `allow_reserved` the
/// RFC 3986 reserved set (and existing percent-escapes) also pass through,
/// which is what the `{+var}` operator requires for base URLs.
fn encode(value: &str, allow_reserved: bool) -> String {
    const RESERVED: &str = ":/?#[]@!$&'()*+,;=%";

    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        let ch = byte as char;
        let unreserved =
            ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~');
        if unreserved || (allow_reserved && RESERVED.contains(ch)) {
            out.push(ch);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}
