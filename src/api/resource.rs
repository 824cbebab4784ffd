//
//  bitbucket-cloud
//  api/resource.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Resource Binding
//!
//! The heart of the library: the machinery that turns an opaque JSON
//! payload into a live object whose relationships can be followed.
//!
//! ## How Binding Works
//!
//! 1. A [`Registry`] of [`ResourceDescriptor`]s classifies the payload:
//!    each descriptor carries a predicate over raw JSON, evaluated in
//!    registration order, first match wins.
//! 2. [`BoundResource::bind`] expands every URI template found in the
//!    payload's links section against the client's base URL, the
//!    authenticated username, and any caller-supplied identifiers.
//! 3. The expanded URLs form the resource's relationship table. Following
//!    a relationship by name ([`BoundResource::follow`]) issues a GET and
//!    returns a [`PagedCursor`](super::common::PagedCursor) that walks the
//!    paginated result, re-classifying every item through the registry.
//!
//! Binding itself performs no I/O: the GET happens only when a
//! relationship is actually followed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_cloud::api::Client;
//! use bitbucket_cloud::api::cloud::teams::Team;
//!
//! # async fn example() -> Result<(), bitbucket_cloud::api::common::ApiError> {
//! let client = Client::cloud()?;
//! if let Some(team) = Team::find_by_username("teamsinspace", &client).await? {
//!     // "members" was discovered from the team payload's links section.
//!     let mut members = team.resource().follow("members")?;
//!     while let Some(member) = members.try_next().await? {
//!         println!("{:?}", member.kind());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use super::client::Client;
use super::common::{ApiError, PagedCursor};
use super::links::{clone_links_from, links_from};
use super::template::{expand, TemplateVars};
use super::{cloud, v1};

/// Field-name prefix marking boolean-like attributes.
///
/// Some endpoints return `"true"`/`"True"` strings where booleans belong;
/// binding coerces such fields to real booleans.
const BOOLEAN_PREFIX: &str = "is_";

/// The closed set of resource kinds this library recognizes.
///
/// Classification dispatches over this enum rather than an open-ended
/// collection of types, so every dispatch site is compiler-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// An OAuth consumer (API key), v1.0 API.
    Consumer,
    /// A repository webhook, v2.0 API.
    Hook,
    /// A snippet, v2.0 API.
    Snippet,
    /// A team account, v2.0 API.
    Team,
    /// A user account, v2.0 API.
    User,
    /// A repository, v2.0 API.
    Repository,
}

impl ResourceKind {
    /// The lowercase wire-style name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::Hook => "hook",
            Self::Snippet => "snippet",
            Self::Team => "team",
            Self::User => "user",
            Self::Repository => "repository",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered resource kind: recognition predicate plus identity.
///
/// Descriptors are constructed once, at registry construction, and never
/// mutated or removed. The predicate must be pure and must never panic;
/// missing keys mean "doesn't match", not an error.
#[derive(Clone)]
pub struct ResourceDescriptor {
    kind: ResourceKind,
    id_attribute: Option<&'static str>,
    is_type: fn(&Value) -> bool,
}

impl ResourceDescriptor {
    /// Creates a descriptor for `kind`.
    ///
    /// `id_attribute` names the payload field used for identity (`id`,
    /// `uuid`, `username`, ...), when the kind has one.
    pub const fn new(
        kind: ResourceKind,
        id_attribute: Option<&'static str>,
        is_type: fn(&Value) -> bool,
    ) -> Self {
        Self {
            kind,
            id_attribute,
            is_type,
        }
    }

    /// The kind this descriptor recognizes.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The payload field carrying this kind's identity, if any.
    pub fn id_attribute(&self) -> Option<&'static str> {
        self.id_attribute
    }

    /// Evaluates the recognition predicate against a raw payload.
    pub fn matches(&self, data: &Value) -> bool {
        (self.is_type)(data)
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("kind", &self.kind)
            .field("id_attribute", &self.id_attribute)
            .finish()
    }
}

/// Ordered dispatch table of resource descriptors.
///
/// Populated once at startup ([`Registry::standard`]); classification
/// evaluates predicates in registration order and returns the first
/// match. Order matters: the consumer predicate, for example, must run
/// before the snippet predicate since both key off an `id` field.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<ResourceDescriptor>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table covering every kind this library models, in
    /// fixed registration order.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(v1::consumers::descriptor());
        registry.register(cloud::hooks::descriptor());
        registry.register(cloud::snippets::descriptor());
        registry.register(cloud::teams::descriptor());
        registry.register(cloud::users::descriptor());
        registry.register(cloud::repositories::descriptor());
        registry
    }

    /// Appends a descriptor to the dispatch table.
    pub fn register(&mut self, descriptor: ResourceDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// Classifies a raw payload.
    ///
    /// Returns the first registered descriptor whose predicate accepts
    /// the payload, or `None` when nothing matches. Never panics: an
    /// empty object simply matches nothing, and callers fall back to
    /// treating the payload as raw JSON.
    pub fn classify(&self, data: &Value) -> Option<&ResourceDescriptor> {
        self.descriptors.iter().find(|d| d.matches(data))
    }

    /// Looks up the descriptor registered for `kind`.
    pub fn descriptor(&self, kind: ResourceKind) -> Option<&ResourceDescriptor> {
        self.descriptors.iter().find(|d| d.kind == kind)
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the registry has no descriptors.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// A classified item yielded by pagination or relationship traversal.
///
/// Items the registry cannot classify are passed through unmodified as
/// [`Resource::Raw`] rather than dropped or rejected.
#[derive(Debug)]
pub enum Resource {
    /// An OAuth consumer.
    Consumer(v1::consumers::Consumer),
    /// A repository webhook.
    Hook(cloud::hooks::Hook),
    /// A snippet.
    Snippet(cloud::snippets::Snippet),
    /// A team account.
    Team(cloud::teams::Team),
    /// A user account.
    User(cloud::users::User),
    /// A repository.
    Repository(cloud::repositories::Repository),
    /// A payload no registered predicate recognized.
    Raw(Value),
}

impl Resource {
    /// The classified kind, or `None` for raw payloads.
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Self::Consumer(_) => Some(ResourceKind::Consumer),
            Self::Hook(_) => Some(ResourceKind::Hook),
            Self::Snippet(_) => Some(ResourceKind::Snippet),
            Self::Team(_) => Some(ResourceKind::Team),
            Self::User(_) => Some(ResourceKind::User),
            Self::Repository(_) => Some(ResourceKind::Repository),
            Self::Raw(_) => None,
        }
    }

    /// Unwraps a user, if that is what was classified.
    pub fn into_user(self) -> Option<cloud::users::User> {
        match self {
            Self::User(user) => Some(user),
            _ => None,
        }
    }

    /// Unwraps a raw payload, if classification found no match.
    pub fn into_raw(self) -> Option<Value> {
        match self {
            Self::Raw(value) => Some(value),
            _ => None,
        }
    }
}

/// Classifies a payload and binds it to its typed resource.
///
/// Used by the pagination walker for every item it yields. Identifiers
/// the binder needs (a consumer id, a repository full name) are recovered
/// from the element itself by each kind's constructor.
pub(crate) fn dispatch(data: Value, client: &Client) -> Result<Resource, ApiError> {
    let Some(descriptor) = client.registry().classify(&data) else {
        return Ok(Resource::Raw(data));
    };
    match descriptor.kind() {
        ResourceKind::Consumer => {
            v1::consumers::Consumer::bind(data, client).map(Resource::Consumer)
        }
        ResourceKind::Hook => cloud::hooks::Hook::bind(data, client).map(Resource::Hook),
        ResourceKind::Snippet => {
            cloud::snippets::Snippet::bind(data, client).map(Resource::Snippet)
        }
        ResourceKind::Team => cloud::teams::Team::bind(data, client).map(Resource::Team),
        ResourceKind::User => cloud::users::User::bind(data, client).map(Resource::User),
        ResourceKind::Repository => {
            cloud::repositories::Repository::bind(data, client).map(Resource::Repository)
        }
    }
}

/// A JSON payload bound to a resource kind.
///
/// Holds the coerced attributes, the expanded relationship table, the
/// clone-protocol map (when the payload carries one), and a handle on the
/// shared [`Client`]. Structurally immutable: update-style operations
/// return a new `BoundResource` rather than mutating in place.
#[derive(Debug, Clone)]
pub struct BoundResource {
    kind: ResourceKind,
    id_attribute: Option<&'static str>,
    data: Map<String, Value>,
    links: Vec<(String, String)>,
    clone_links: HashMap<String, String>,
    client: Client,
}

impl BoundResource {
    /// Binds a raw payload to a resource kind.
    ///
    /// # Parameters
    ///
    /// * `descriptor` - The kind the payload is expected to represent.
    /// * `data` - The raw JSON payload.
    /// * `client` - The client future traversals will be issued through.
    /// * `context` - Caller-supplied identifiers for template expansion,
    ///   merged over the client's own variables (base URL, username).
    ///
    /// # Errors
    ///
    /// [`ApiError::TypeMismatch`] when the payload fails the descriptor's
    /// predicate. Malformed link entries are skipped silently; a failed
    /// predicate is not, because callers rely on knowing what kind of
    /// object they received.
    ///
    /// No network I/O happens here; relationship URLs are expanded but
    /// not fetched.
    pub fn bind(
        descriptor: &ResourceDescriptor,
        data: Value,
        client: &Client,
        context: &TemplateVars,
    ) -> Result<Self, ApiError> {
        if !descriptor.matches(&data) {
            return Err(ApiError::TypeMismatch {
                expected: descriptor.kind(),
            });
        }

        let vars = client.template_vars().merge(context);
        let links = links_from(&data)
            .map(|(name, template)| (name.to_string(), expand(template, &vars)))
            .collect();
        let clone_links = clone_links_from(&data);

        let fields = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(Self {
            kind: descriptor.kind(),
            id_attribute: descriptor.id_attribute(),
            data: coerce_boolean_fields(fields),
            links,
            clone_links,
            client: client.clone(),
        })
    }

    /// Expands a static link catalog and appends its relationships.
    ///
    /// The 1.0 consumer endpoints return payloads without any links
    /// section; their link templates live in a catalog shipped with the
    /// library instead. Catalog entries do not displace relationships
    /// already discovered in the payload.
    pub(crate) fn merge_catalog(&mut self, catalog: &Value, context: &TemplateVars) {
        let vars = self.client.template_vars().merge(context);
        for (name, template) in links_from(catalog) {
            if self.link(name).is_none() {
                self.links.push((name.to_string(), expand(template, &vars)));
            }
        }
    }

    /// The kind this payload was bound as.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The resource's identity, per its kind's id attribute.
    ///
    /// Numeric ids are rendered in decimal; string ids (uuids, usernames)
    /// are returned as-is.
    pub fn id(&self) -> Option<String> {
        let attribute = self.id_attribute?;
        match self.data.get(attribute)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Looks up an attribute by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// A string attribute by name, when present and a string.
    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// A boolean attribute by name.
    ///
    /// Fields prefixed `is_` were coerced at bind time, so string-typed
    /// `"true"`/`"True"` values read as `true` here.
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(Value::as_bool)
    }

    /// The full coerced attribute map.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// The expanded URL of a relationship, by name.
    pub fn link(&self, name: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|(link_name, _)| link_name == name)
            .map(|(_, url)| url.as_str())
    }

    /// Every relationship in document order.
    pub fn links(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()))
    }

    /// The expanded URL of this resource itself, when the payload
    /// carried a `self` relationship.
    pub fn self_url(&self) -> Option<&str> {
        self.link("self")
    }

    /// Follows a relationship by name.
    ///
    /// Returns a lazy cursor; the GET is issued on the first
    /// [`try_next`](PagedCursor::try_next), not here.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidArgument`] when the resource carries no
    /// relationship under `name`.
    pub fn follow(&self, name: &str) -> Result<PagedCursor, ApiError> {
        let url = self.link(name).ok_or_else(|| {
            ApiError::InvalidArgument(format!(
                "no relationship named '{}' on this {}",
                name, self.kind,
            ))
        })?;
        Ok(PagedCursor::new(url.to_string(), self.client.clone()))
    }

    /// The clone URL for a protocol (`https`, `ssh`), when present.
    ///
    /// Clone links are a plain lookup, not a relationship: they point at
    /// SCM remotes, not API resources.
    pub fn clone_url(&self, protocol: &str) -> Option<&str> {
        self.clone_links.get(protocol).map(String::as_str)
    }

    /// Every clone protocol the payload named.
    pub fn clone_protocols(&self) -> impl Iterator<Item = &str> {
        self.clone_links.keys().map(String::as_str)
    }

    /// The client this resource was bound through.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Coerces boolean-marked fields to real booleans.
///
/// For fields whose name starts with `is_`: string `"true"`/`"True"`
/// becomes `true`, genuine booleans pass through, anything else becomes
/// `false`. Other fields are copied verbatim.
fn coerce_boolean_fields(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(name, value)| {
            if !name.starts_with(BOOLEAN_PREFIX) {
                return (name, value);
            }
            let coerced = match value {
                Value::String(s) => Value::Bool(s == "true" || s == "True"),
                Value::Bool(b) => Value::Bool(b),
                _ => Value::Bool(false),
            };
            (name, coerced)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client() -> Client {
        Client::at("https://api.example.test")
            .unwrap()
            .with_username("evzijst")
    }

    fn snippet_descriptor() -> ResourceDescriptor {
        cloud::snippets::descriptor()
    }

    #[test]
    fn test_classify_empty_object_matches_nothing() {
        let registry = Registry::standard();
        assert!(registry.classify(&json!({})).is_none());
    }

    #[test]
    fn test_classify_is_ordered() {
        let registry = Registry::standard();
        // Consumers carry an `id` too; registration order keeps them from
        // classifying as snippets.
        let consumer = json!({
            "id": 302,
            "name": "autopilot",
            "secret": "shhh",
            "key": "abcdef"
        });
        assert_eq!(
            registry.classify(&consumer).map(ResourceDescriptor::kind),
            Some(ResourceKind::Consumer),
        );

        let snippet = json!({"id": 1, "title": "notes"});
        assert_eq!(
            registry.classify(&snippet).map(ResourceDescriptor::kind),
            Some(ResourceKind::Snippet),
        );
    }

    #[test]
    fn test_predicates_tolerate_missing_fields() {
        let registry = Registry::standard();
        for payload in [
            json!({}),
            json!({"unrelated": true}),
            json!({"links": {}}),
            json!(null),
            json!([1, 2, 3]),
        ] {
            // Must not panic, must simply not match anything meaningful.
            let _ = registry.classify(&payload);
        }
    }

    #[test]
    fn test_bind_rejects_mismatched_payload() {
        let client = test_client();
        let result = BoundResource::bind(
            &snippet_descriptor(),
            json!({"destination": {}, "id": 9}),
            &client,
            &TemplateVars::new(),
        );
        assert!(matches!(
            result,
            Err(ApiError::TypeMismatch {
                expected: ResourceKind::Snippet,
            }),
        ));
    }

    #[test]
    fn test_bind_coerces_boolean_strings() {
        let client = test_client();
        let bound = BoundResource::bind(
            &snippet_descriptor(),
            json!({
                "id": 1,
                "is_private": "True",
                "is_unlisted": "true",
                "is_spam": "false",
                "is_empty": null,
                "is_archived": true,
                "issue_count": "true"
            }),
            &client,
            &TemplateVars::new(),
        )
        .unwrap();

        assert_eq!(bound.bool_field("is_private"), Some(true));
        assert_eq!(bound.bool_field("is_unlisted"), Some(true));
        assert_eq!(bound.bool_field("is_spam"), Some(false));
        assert_eq!(bound.bool_field("is_empty"), Some(false));
        assert_eq!(bound.bool_field("is_archived"), Some(true));
        // Not a boolean-marked field; the prefix is "is_", not "is".
        assert_eq!(bound.string_field("issue_count"), Some("true"));
    }

    #[test]
    fn test_bind_expands_links_with_context() {
        let client = test_client();
        let bound = BoundResource::bind(
            &snippet_descriptor(),
            json!({
                "id": 1,
                "links": {
                    "self": {"href": "{+bitbucket_url}/2.0/snippets{/username}/kypj"},
                    "comments": {"href": "{+bitbucket_url}/2.0/snippets{/username}/kypj/comments"}
                }
            }),
            &client,
            &TemplateVars::new(),
        )
        .unwrap();

        assert_eq!(
            bound.self_url(),
            Some("https://api.example.test/2.0/snippets/evzijst/kypj"),
        );
        assert_eq!(bound.links().count(), 2);
    }

    #[test]
    fn test_bind_is_lazy_and_follow_checks_names() {
        let client = test_client();
        let bound = BoundResource::bind(
            &snippet_descriptor(),
            json!({
                "id": 1,
                "links": {"comments": {"href": "{+bitbucket_url}/comments"}}
            }),
            &client,
            &TemplateVars::new(),
        )
        .unwrap();

        // Following a known name succeeds without any I/O.
        assert!(bound.follow("comments").is_ok());
        // Unknown names fail fast.
        assert!(matches!(
            bound.follow("watchers"),
            Err(ApiError::InvalidArgument(_)),
        ));
    }

    #[test]
    fn test_clone_links_are_not_relationships() {
        let client = test_client();
        let bound = BoundResource::bind(
            &snippet_descriptor(),
            json!({
                "id": 1,
                "links": {
                    "self": {"href": "https://api.example.test/self"},
                    "clone": [
                        {"name": "https", "href": "https://example.test/kypj.git"},
                        {"name": "ssh", "href": "ssh://git@example.test/kypj.git"}
                    ]
                }
            }),
            &client,
            &TemplateVars::new(),
        )
        .unwrap();

        assert_eq!(bound.links().count(), 1);
        assert_eq!(bound.clone_url("https"), Some("https://example.test/kypj.git"));
        assert_eq!(bound.clone_url("git"), None);
        assert!(bound.follow("clone").is_err());
    }

    #[test]
    fn test_id_renders_numbers_and_strings() {
        let client = test_client();
        let bound = BoundResource::bind(
            &snippet_descriptor(),
            json!({"id": 42}),
            &client,
            &TemplateVars::new(),
        )
        .unwrap();
        assert_eq!(bound.id(), Some("42".to_string()));
    }
}
