// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::gitlab::encode_path;
use super::{GitLabClient, MemberScope, MemoryRemote, RemoteHierarchy};
use crate::config::types::{CloneProtocol, GitlabConfig};
use crate::error::{ConductorError, RemoteError};

fn client_for(server: &MockServer, api_key: &str) -> GitLabClient {
    let config = GitlabConfig {
        url: server.uri(),
        api_key: api_key.to_string(),
        per_page: 2,
        ..GitlabConfig::default()
    };
    GitLabClient::new(&config).unwrap()
}

fn project_json(id: u64, path: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": path,
        "path": path,
        "path_with_namespace": format!("acme/{path}"),
        "ssh_url_to_repo": format!("git@gitlab.example:acme/{path}.git"),
        "http_url_to_repo": format!("https://gitlab.example/acme/{path}.git"),
        "default_branch": "main",
    })
}

fn remote_error(err: &ConductorError) -> &RemoteError {
    match err {
        ConductorError::Remote(inner) => inner,
        other => panic!("expected ConductorError::Remote, got {other:?}"),
    }
}

#[test]
fn test_encode_path() {
    assert_eq!(encode_path("acme/backend/core"), "acme%2Fbackend%2Fcore");
    assert_eq!(encode_path("/acme.io/"), "acme.io");
}

#[tokio::test]
async fn test_group_lookup_sends_token_and_encodes_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/acme%2Fbackend"))
        .and(header("PRIVATE-TOKEN", "glpat-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "name": "Backend",
            "path": "backend",
            "full_path": "acme/backend",
            "visibility": "private",
        })))
        .mount(&server)
        .await;

    let group = client_for(&server, "glpat-test")
        .group("acme/backend")
        .await
        .unwrap();
    assert_eq!(group.id, 7);
    assert_eq!(group.path, "backend");
    assert_eq!(group.full_path, "acme/backend");
}

#[tokio::test]
async fn test_group_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server, "").group("ghost").await.unwrap_err();
    assert!(matches!(
        remote_error(&err),
        RemoteError::GroupNotFound { group } if group == "ghost"
    ));
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server, "bad").group("acme").await.unwrap_err();
    assert!(matches!(
        remote_error(&err),
        RemoteError::Unauthorized { status: 401, .. }
    ));
}

#[tokio::test]
async fn test_projects_follow_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/projects"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-next-page", "2")
                .set_body_json(serde_json::json!([project_json(10, "p1"), project_json(11, "p2")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/projects"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-next-page", "")
                .set_body_json(serde_json::json!([project_json(12, "p3")])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let group = super::RemoteGroup {
        id: 1,
        name: "acme".to_string(),
        path: "acme".to_string(),
        full_path: "acme".to_string(),
    };
    let projects = client.projects(&group).await.unwrap();

    let paths: Vec<_> = projects.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, ["p1", "p2", "p3"]);
    assert_eq!(
        projects[0].clone_url(CloneProtocol::Ssh),
        "git@gitlab.example:acme/p1.git"
    );
    assert_eq!(
        projects[0].clone_url(CloneProtocol::Https),
        "https://gitlab.example/acme/p1.git"
    );
}

#[tokio::test]
async fn test_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/5/members/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server, "")
        .members(MemberScope::Project(5))
        .await
        .unwrap_err();
    assert!(matches!(remote_error(&err), RemoteError::Decode { .. }));
}

#[tokio::test]
async fn test_members_parse_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/3/members/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": 1,
                "name": "Ada",
                "username": "ada",
                "access_level": 50,
                "expires_at": null,
                "public_email": "ada@example.org",
            },
            { "id": 2, "name": "Bob", "username": "bob", "access_level": 30 },
        ])))
        .mount(&server)
        .await;

    let members = client_for(&server, "")
        .members(MemberScope::Group(3))
        .await
        .unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].public_email.as_deref(), Some("ada@example.org"));
    assert_eq!(members[1].expires_at, None);
}

#[tokio::test]
async fn test_memory_remote_listing() {
    let mut remote = MemoryRemote::new();
    remote.add_group("G");
    remote.add_group("G/S");
    remote.add_group("G/S/T");
    remote.add_project("G", "p2", "/srv").unwrap();
    remote.add_project("G", "p1", "/srv").unwrap();
    remote.add_project("G/S", "p3", "/srv").unwrap();
    assert!(remote.add_project("missing", "p", "/srv").is_err());

    let root = remote.group("G").await.unwrap();
    let projects = remote.projects(&root).await.unwrap();
    let names: Vec<_> = projects.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(names, ["p2", "p1"]);
    assert_eq!(projects[1].ssh_url_to_repo, "/srv/G/p1.git");

    let subgroups = remote.subgroups(&root).await.unwrap();
    assert_eq!(subgroups.len(), 1);
    assert_eq!(subgroups[0].full_path, "G/S");

    assert!(remote.group("nope").await.is_err());
    assert_eq!(remote.calls(), 4);
}
