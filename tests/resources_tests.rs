//
//  bitbucket-cloud
//  tests/resources_tests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Integration tests for resource operations against a mock server:
//! per-endpoint body encodings, expected-status contracts, and the
//! 404-as-absent policy for single lookups.

use bitbucket_cloud::api::cloud::hooks::{Hook, HookPayload};
use bitbucket_cloud::api::cloud::snippets::Snippet;
use bitbucket_cloud::api::cloud::teams::Team;
use bitbucket_cloud::api::cloud::users::User;
use bitbucket_cloud::api::v1::consumers::{Consumer, ConsumerPayload, PermissionScope};
use bitbucket_cloud::api::{ApiError, Client};
use mockito::Matcher;
use serde_json::json;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn client_for(server: &mockito::ServerGuard) -> Client {
    Client::at(&server.url()).unwrap().with_username("evzijst")
}

#[tokio::test]
async fn consumer_create_sends_a_urlencoded_form() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/1.0/users/evzijst/consumers")
        .match_header(
            "content-type",
            Matcher::Regex("application/x-www-form-urlencoded".to_string()),
        )
        .match_body(Matcher::Exact(
            "name=autopilot&scope=repository&scope=webhook".to_string(),
        ))
        .with_status(200)
        .with_body(
            json!({
                "id": 302,
                "name": "autopilot",
                "secret": "c6aa1d4b",
                "key": "jv7a2u9pqnkmbz"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let payload = ConsumerPayload::new()
        .name("autopilot")
        .scope(PermissionScope::RepositoryRead)
        .scope(PermissionScope::Webhook);
    let consumer = Consumer::create(&payload, &client).await.unwrap();

    assert_eq!(consumer.id(), Some(302));
    assert_eq!(consumer.key(), Some("jv7a2u9pqnkmbz"));
    // The self link came from the shipped catalog, expanded with the
    // new consumer's id.
    assert_eq!(
        consumer.resource().self_url(),
        Some(format!("{}/1.0/users/evzijst/consumers/302", server.url()).as_str()),
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn consumer_list_handles_the_bare_array_shape() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/1.0/users/evzijst/consumers")
        .with_status(200)
        .with_body(
            json!([
                {"id": 302, "name": "autopilot", "secret": "a", "key": "k1"},
                {"id": 303, "name": "dashboard", "secret": "b", "key": "k2"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let consumers = Consumer::find_consumers(&client).await.unwrap();

    assert_eq!(consumers.len(), 2);
    assert_eq!(consumers[1].name(), Some("dashboard"));
}

#[tokio::test]
async fn consumer_lookup_treats_404_as_absent() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/1.0/users/evzijst/consumers/999")
        .with_status(404)
        .create_async()
        .await;

    let client = client_for(&server);
    let found = Consumer::find_consumer_by_id(999, &client).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn hook_create_sends_json_and_binds_the_response() {
    let mut server = mockito::Server::new_async().await;

    let hook_url = format!(
        "{}/2.0/repositories/evzijst/ui/hooks/%7B5d2fcf3a%7D",
        server.url(),
    );
    let mock = server
        .mock("POST", "/2.0/repositories/evzijst/ui/hooks")
        .match_header("content-type", Matcher::Regex("application/json".to_string()))
        .match_body(Matcher::Json(json!({
            "url": "https://hooks.example.test/receive",
            "events": ["repo:push"]
        })))
        .with_status(200)
        .with_body(
            json!({
                "uuid": "{5d2fcf3a}",
                "active": true,
                "events": ["repo:push"],
                "links": {"self": {"href": hook_url}}
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let payload = HookPayload::new()
        .url("https://hooks.example.test/receive")
        .events(["repo:push"]);
    let hook = Hook::create("ui", &payload, &client).await.unwrap();

    assert_eq!(hook.uuid(), Some("{5d2fcf3a}"));
    assert_eq!(hook.is_active(), Some(true));
    mock.assert_async().await;
}

#[tokio::test]
async fn hook_create_surfaces_unexpected_status_with_the_actual_code() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/2.0/repositories/evzijst/ui/hooks")
        .with_status(400)
        .with_body(r#"{"error": {"message": "url is required"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = Hook::create("ui", &HookPayload::new(), &client)
        .await
        .unwrap_err();

    match err {
        ApiError::UnexpectedStatus { status, ref body, .. } => {
            assert_eq!(status, 400);
            assert!(body.contains("url is required"));
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn snippet_lookup_treats_404_as_absent() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/2.0/snippets/evzijst/kypj")
        .with_status(404)
        .with_body(r#"{"type": "error", "error": {"message": "not found"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let found = Snippet::find_by_id("kypj", &client).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn snippet_delete_expects_204() {
    let mut server = mockito::Server::new_async().await;

    let self_url = format!("{}/2.0/snippets/evzijst/kypj", server.url());
    server
        .mock("GET", "/2.0/snippets/evzijst/kypj")
        .with_status(200)
        .with_body(
            json!({
                "id": 4,
                "title": "notes",
                "links": {"self": {"href": self_url}}
            })
            .to_string(),
        )
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/2.0/snippets/evzijst/kypj")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let snippet = Snippet::find_by_id("kypj", &client).await.unwrap().unwrap();
    snippet.delete().await.unwrap();

    delete.assert_async().await;
}

#[tokio::test]
async fn snippet_delete_rejects_any_other_status() {
    let mut server = mockito::Server::new_async().await;

    let self_url = format!("{}/2.0/snippets/evzijst/kypj", server.url());
    server
        .mock("GET", "/2.0/snippets/evzijst/kypj")
        .with_status(200)
        .with_body(
            json!({"id": 4, "links": {"self": {"href": self_url}}}).to_string(),
        )
        .create_async()
        .await;
    server
        .mock("DELETE", "/2.0/snippets/evzijst/kypj")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = client_for(&server);
    let snippet = Snippet::find_by_id("kypj", &client).await.unwrap().unwrap();
    let err = snippet.delete().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn snippet_content_follows_the_file_self_link() {
    let mut server = mockito::Server::new_async().await;

    let self_url = format!("{}/2.0/snippets/evzijst/kypj", server.url());
    let file_url = format!("{}/2.0/snippets/evzijst/kypj/files/notes.md", server.url());
    server
        .mock("GET", "/2.0/snippets/evzijst/kypj")
        .with_status(200)
        .with_body(
            json!({
                "id": 4,
                "links": {"self": {"href": self_url}},
                "files": {
                    "notes.md": {"links": {"self": {"href": file_url}}}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/snippets/evzijst/kypj/files/notes.md")
        .with_status(200)
        .with_body("# scratch")
        .create_async()
        .await;

    let client = client_for(&server);
    let snippet = Snippet::find_by_id("kypj", &client).await.unwrap().unwrap();

    let contents = snippet.content("notes.md").await.unwrap();
    assert_eq!(contents.as_deref(), Some(b"# scratch".as_slice()));

    // Unknown file names answer without touching the network.
    assert!(snippet.content("missing.txt").await.unwrap().is_none());
}

#[tokio::test]
async fn team_members_traversal_dispatches_users() {
    let mut server = mockito::Server::new_async().await;

    let members_url = format!("{}/2.0/teams/teamsinspace/members", server.url());
    server
        .mock("GET", "/2.0/teams/teamsinspace")
        .with_status(200)
        .with_body(
            json!({
                "type": "team",
                "username": "teamsinspace",
                "links": {"members": {"href": members_url}}
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/2.0/teams/teamsinspace/members")
        .with_status(200)
        .with_body(
            json!({
                "values": [
                    {"type": "user", "username": "evzijst"},
                    {"type": "user", "username": "jdoe"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let team = Team::find_by_username("teamsinspace", &client)
        .await
        .unwrap()
        .unwrap();

    let mut members = team.members().unwrap();
    let mut seen = Vec::new();
    while let Some(member) = members.try_next().await.unwrap() {
        let user = member.into_user().expect("members should classify as users");
        seen.push(user.username().unwrap().to_string());
    }

    assert_eq!(seen, vec!["evzijst", "jdoe"]);
}

#[tokio::test]
async fn current_user_requires_a_200() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/2.0/user")
        .with_status(401)
        .with_body(r#"{"type": "error", "error": {"message": "Access denied"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = User::current(&client).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn app_password_credentials_travel_as_basic_auth() {
    use base64::Engine;

    let mut server = mockito::Server::new_async().await;

    let expected = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode("evzijst:app-password"),
    );
    let mock = server
        .mock("GET", "/2.0/user")
        .match_header("authorization", expected.as_str())
        .with_status(200)
        .with_body(
            json!({"type": "user", "username": "evzijst"}).to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = Client::at(&server.url())
        .unwrap()
        .with_auth(bitbucket_cloud::auth::AuthCredential::app_password(
            "evzijst",
            "app-password",
        ));
    let user = User::current(&client).await.unwrap();

    assert_eq!(user.username(), Some("evzijst"));
    mock.assert_async().await;
}

#[tokio::test]
async fn team_lookup_treats_404_as_absent() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/2.0/teams/nosuchteam")
        .with_status(404)
        .create_async()
        .await;

    let client = client_for(&server);
    let found = Team::find_by_username("nosuchteam", &client).await.unwrap();
    assert!(found.is_none());
}
