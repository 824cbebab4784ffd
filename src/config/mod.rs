//
//  bitbucket-cloud
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Configuration
//!
//! Loads library configuration from a TOML file in the platform config
//! directory, with environment-variable overrides on top.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bitbucket-cloud/config.toml`
//! - **macOS**: `~/Library/Application Support/bitbucket-cloud/config.toml`
//! - **Windows**: `%APPDATA%\bitbucket-cloud\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! bitbucket_url = "https://api.bitbucket.org"
//!
//! [auth]
//! username = "evzijst"
//! app_password = "app-password-here"
//! email = "erik@example.test"
//! ```
//!
//! ## Environment Overrides
//!
//! `BITBUCKET_URL`, `BITBUCKET_USERNAME`, `BITBUCKET_APP_PASSWORD`, and
//! `BITBUCKET_EMAIL` override the corresponding file values.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_cloud::api::Client;
//! use bitbucket_cloud::config::Config;
//!
//! let config = Config::load()?.apply_env();
//! let client = Client::from_config(&config)?;
//! # Ok::<(), bitbucket_cloud::api::common::ApiError>(())
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::common::ApiError;

/// Library configuration.
///
/// All fields are optional; missing values fall back to library
/// defaults (the public API URL, no credentials).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL override, e.g. for a staging deployment.
    #[serde(default)]
    pub bitbucket_url: Option<String>,

    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// The `[auth]` section of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The Bitbucket username.
    #[serde(default)]
    pub username: Option<String>,

    /// An app password for HTTP Basic authentication.
    #[serde(default)]
    pub app_password: Option<String>,

    /// The account email, used by operations that identify the account
    /// by address.
    #[serde(default)]
    pub email: Option<String>,
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing file is not an error; it yields the default (empty)
    /// configuration. An unreadable or unparseable file is an
    /// [`ApiError::Config`].
    pub fn load() -> Result<Self, ApiError> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ApiError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&contents)
            .map_err(|e| ApiError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Applies environment-variable overrides on top of the loaded
    /// values.
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var("BITBUCKET_URL") {
            self.bitbucket_url = Some(url);
        }
        if let Ok(username) = std::env::var("BITBUCKET_USERNAME") {
            self.auth.username = Some(username);
        }
        if let Ok(password) = std::env::var("BITBUCKET_APP_PASSWORD") {
            self.auth.app_password = Some(password);
        }
        if let Ok(email) = std::env::var("BITBUCKET_EMAIL") {
            self.auth.email = Some(email);
        }
        self
    }

    /// The default configuration file path for this platform.
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            bitbucket_url = "https://staging.example.test"

            [auth]
            username = "evzijst"
            app_password = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.bitbucket_url.as_deref(),
            Some("https://staging.example.test"),
        );
        assert_eq!(config.auth.username.as_deref(), Some("evzijst"));
        assert_eq!(config.auth.app_password.as_deref(), Some("secret"));
        assert_eq!(config.auth.email, None);
    }

    #[test]
    fn test_missing_sections_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.bitbucket_url, None);
        assert_eq!(config.auth.username, None);
    }
}
