//
//  bitbucket-cloud
//  tests/config_tests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Integration tests for configuration loading and the config-to-client
//! path.

use std::io::Write;

use bitbucket_cloud::api::{ApiError, Client};
use bitbucket_cloud::config::Config;

#[test]
fn loads_a_config_file_and_builds_a_client() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path)?;
    writeln!(
        file,
        r#"
bitbucket_url = "https://staging.example.test"

[auth]
username = "evzijst"
app_password = "app-password"
"#,
    )?;

    let config = Config::load_from(&path)?;
    let client = Client::from_config(&config)?;

    assert_eq!(client.base_url(), "https://staging.example.test");
    assert_eq!(client.username(), Some("evzijst"));
    Ok(())
}

#[test]
fn unparseable_config_is_a_typed_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "bitbucket_url = [not, toml")?;

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
    assert!(err.to_string().contains("config.toml"));
    Ok(())
}

#[test]
fn missing_file_is_not_an_error_for_default_load() {
    // Config::load falls back to defaults when no file exists; the
    // explicit loader is strict.
    let err = Config::load_from(std::path::Path::new("/nonexistent/config.toml")).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}
