//
//  bitbucket-cloud
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Authentication
//!
//! Credential types for the Bitbucket Cloud API. This module holds and
//! applies credentials; acquiring them (the OAuth dance, app password
//! creation) is outside the library's scope.
//!
//! ## Supported Methods
//!
//! - **OAuth 2.0 access token**: bearer authentication, with optional
//!   refresh token and expiry tracking.
//! - **App Password**: HTTP Basic with username and app password.
//! - **Basic**: HTTP Basic with username and account password, for
//!   backward compatibility.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_cloud::auth::AuthCredential;
//!
//! let credential = AuthCredential::app_password("evzijst", "app-password");
//! assert_eq!(credential.username(), Some("evzijst"));
//! assert!(!credential.is_expired());
//! ```

use reqwest::RequestBuilder;

/// An authentication credential for the Bitbucket Cloud API.
///
/// # Variants
///
/// - `OAuth`: access token with optional refresh token and expiry.
/// - `AppPassword`: username plus app password (HTTP Basic).
/// - `Basic`: username plus account password (HTTP Basic).
#[derive(Debug, Clone)]
pub enum AuthCredential {
    /// OAuth 2.0 token authentication.
    OAuth {
        /// The access token sent as a bearer token.
        access_token: String,
        /// Optional refresh token for obtaining new access tokens.
        refresh_token: Option<String>,
        /// Optional expiration timestamp of the access token.
        expires_at: Option<chrono::DateTime<chrono::Utc>>,
    },
    /// App password authentication (HTTP Basic).
    AppPassword {
        /// The Bitbucket username.
        username: String,
        /// The app password generated in Bitbucket settings.
        password: String,
    },
    /// Account password authentication (HTTP Basic).
    Basic {
        /// The Bitbucket username.
        username: String,
        /// The account password.
        password: String,
    },
}

impl AuthCredential {
    /// A bearer credential from an OAuth access token.
    pub fn oauth(access_token: impl Into<String>) -> Self {
        Self::OAuth {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// An app password credential.
    pub fn app_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::AppPassword {
            username: username.into(),
            password: password.into(),
        }
    }

    /// A basic username/password credential.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The username carried by this credential, when it has one.
    ///
    /// OAuth tokens identify the account server-side and carry no
    /// username locally.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::OAuth { .. } => None,
            Self::AppPassword { username, .. } | Self::Basic { username, .. } => Some(username),
        }
    }

    /// Applies this credential to an HTTP request.
    ///
    /// OAuth uses bearer authentication; app password and basic use
    /// HTTP Basic.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::OAuth { access_token, .. } => request.bearer_auth(access_token),
            Self::AppPassword { username, password } | Self::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }

    /// Whether the credential has expired.
    ///
    /// Only OAuth credentials with an explicit `expires_at` can expire;
    /// everything else answers `false`. Server-side revocation is not
    /// detected here.
    pub fn is_expired(&self) -> bool {
        match self {
            Self::OAuth {
                expires_at: Some(expires_at),
                ..
            } => *expires_at < chrono::Utc::now(),
            _ => false,
        }
    }

    /// Whether this credential supports token refresh.
    ///
    /// Only OAuth credentials holding a refresh token do; the refresh
    /// itself is up to the caller.
    pub fn can_refresh(&self) -> bool {
        matches!(
            self,
            Self::OAuth {
                refresh_token: Some(_),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_username_comes_from_basic_credentials_only() {
        assert_eq!(AuthCredential::oauth("token").username(), None);
        assert_eq!(
            AuthCredential::app_password("evzijst", "secret").username(),
            Some("evzijst"),
        );
        assert_eq!(
            AuthCredential::basic("evzijst", "secret").username(),
            Some("evzijst"),
        );
    }

    #[test]
    fn test_expiry() {
        let expired = AuthCredential::OAuth {
            access_token: "token".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some(Utc::now() - Duration::hours(1)),
        };
        assert!(expired.is_expired());
        assert!(expired.can_refresh());

        assert!(!AuthCredential::oauth("token").is_expired());
        assert!(!AuthCredential::oauth("token").can_refresh());
        assert!(!AuthCredential::app_password("u", "p").is_expired());
    }
}
