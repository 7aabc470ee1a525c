// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for building a tree from a GitLab REST API.

use std::path::Path;

use gitconductor::config::types::{CloneProtocol, GitlabConfig};
use gitconductor::error::{ConductorError, RemoteError};
use gitconductor::remote::GitLabClient;
use gitconductor::tree::{Layout, TreeBuilder};
use gitconductor::viz::render_tree;
use gitconductor::tree::Scope;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GitLabClient {
    let config = GitlabConfig {
        url: server.uri(),
        ..GitlabConfig::default()
    };
    GitLabClient::new(&config).unwrap()
}

fn group_json(id: u64, full_path: &str) -> serde_json::Value {
    let leaf = full_path.rsplit('/').next().unwrap();
    serde_json::json!({ "id": id, "name": leaf, "path": leaf, "full_path": full_path })
}

fn project_json(id: u64, namespace: &str, path: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": path,
        "path": path,
        "path_with_namespace": format!("{namespace}/{path}"),
        "ssh_url_to_repo": format!("git@gitlab.example:{namespace}/{path}.git"),
        "http_url_to_repo": format!("https://gitlab.example/{namespace}/{path}.git"),
    })
}

async fn mount_json(server: &MockServer, url_path: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-next-page", "")
                .set_body_json(body),
        )
        .mount(server)
        .await;
}

/// acme: web, api, tools: ci
async fn acme(server: &MockServer) {
    mount_json(server, "/api/v4/groups/acme", group_json(1, "acme")).await;
    mount_json(
        server,
        "/api/v4/groups/1/projects",
        serde_json::json!([project_json(10, "acme", "web"), project_json(11, "acme", "api")]),
    )
    .await;
    mount_json(
        server,
        "/api/v4/groups/1/subgroups",
        serde_json::json!([group_json(2, "acme/tools")]),
    )
    .await;
    mount_json(
        server,
        "/api/v4/groups/2/projects",
        serde_json::json!([project_json(20, "acme/tools", "ci")]),
    )
    .await;
    mount_json(server, "/api/v4/groups/2/subgroups", serde_json::json!([])).await;
}

#[tokio::test]
async fn tree_from_gitlab_api() {
    let server = MockServer::start().await;
    acme(&server).await;
    let client = client_for(&server);

    let tree = TreeBuilder::new(&client, CloneProtocol::Https)
        .build("acme", Path::new("/r"), Layout::Nested)
        .await
        .unwrap();

    insta::assert_snapshot!(render_tree(Scope::Group(&tree)), @r"
    acme
    |-- api
    |-- web
    '-- tools
        '-- ci
    ");
    let ci = &tree.children[0].projects[0];
    assert_eq!(ci.fullname, "acme/tools/ci");
    assert_eq!(ci.local_path, Path::new("/r/acme/tools/ci"));
    assert_eq!(ci.clone_url, "https://gitlab.example/acme/tools/ci.git");
    assert_eq!(ci.remote_id, 20);
}

#[tokio::test]
async fn flat_tree_from_gitlab_api() {
    let server = MockServer::start().await;
    acme(&server).await;
    let client = client_for(&server);

    let tree = TreeBuilder::new(&client, CloneProtocol::Ssh)
        .build("acme", Path::new("/r"), Layout::Flat)
        .await
        .unwrap();

    let paths: Vec<_> = tree
        .projects()
        .into_iter()
        .map(|p| p.local_path.display().to_string())
        .collect();
    assert_eq!(paths, ["/r/acme-api", "/r/acme-web", "/r/acme-tools-ci"]);
    assert_eq!(tree.projects()[0].clone_url, "git@gitlab.example:acme/api.git");
}

#[tokio::test]
async fn unknown_group_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = TreeBuilder::new(&client, CloneProtocol::Ssh)
        .build("nobody/here", Path::new("/r"), Layout::Nested)
        .await
        .unwrap_err();

    match err {
        ConductorError::Remote(inner) => {
            assert!(matches!(*inner, RemoteError::GroupNotFound { ref group } if group == "nobody/here"));
        }
        other => panic!("expected a remote error, got {other:?}"),
    }
}
