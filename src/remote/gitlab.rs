// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitLab REST v4 client.
//!
//! ```text
//! group(full_path)  GET /groups/<full_path with '/' as %2F>
//! projects(group)   GET /groups/:id/projects?per_page=N&page=P
//! subgroups(group)  GET /groups/:id/subgroups?per_page=N&page=P
//! members(scope)    GET /{groups|projects}/:id/members/all?...
//!
//! pagination: follow `x-next-page` until it is absent or empty
//! auth:       PRIVATE-TOKEN header when an API key is configured
//! ```

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::{MemberScope, RemoteGroup, RemoteHierarchy, RemoteMember, RemoteProject};
use crate::config::types::GitlabConfig;
use crate::error::{ConductorError, ConductorResult, RemoteError};

/// Client for one GitLab instance.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: Client,
    api_base: String,
    token: Option<String>,
    per_page: u32,
}

impl GitLabClient {
    /// Build a client from the `[gitlab]` settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Reqwest`] if the HTTP client cannot be built.
    pub fn new(config: &GitlabConfig) -> ConductorResult<Self> {
        let client = Client::builder()
            .user_agent(format!("gitconductor/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()
            .map_err(RemoteError::Reqwest)?;

        Ok(Self {
            client,
            api_base: format!("{}/api/v4", config.url.trim_end_matches('/')),
            token: config.has_api_key().then(|| config.api_key.clone()),
            per_page: config.per_page,
        })
    }

    /// The `/api/v4` base URL requests are made against.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn get(&self, url: &str) -> ConductorResult<reqwest::Response> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.header("PRIVATE-TOKEN", token);
        }

        tracing::debug!(%url, "GET");
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout {
                    url: url.to_string(),
                }
            } else {
                RemoteError::Reqwest(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = url.to_string();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized {
                status: status.as_u16(),
                url,
            },
            _ => RemoteError::HttpError {
                status: status.as_u16(),
                url,
            },
        }
        .into())
    }

    async fn decode<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> ConductorResult<T> {
        let body = response.text().await.map_err(RemoteError::Reqwest)?;
        serde_json::from_str(&body).map_err(|e| {
            RemoteError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Fetch every page of a list endpoint.
    async fn get_all<T: DeserializeOwned>(&self, endpoint: &str) -> ConductorResult<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1_u32;
        loop {
            let url = format!(
                "{}{endpoint}?per_page={}&page={page}",
                self.api_base, self.per_page
            );
            let response = self.get(&url).await?;
            let next = response
                .headers()
                .get("x-next-page")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u32>().ok());
            let mut batch: Vec<T> = Self::decode(&url, response).await?;
            items.append(&mut batch);

            match next {
                Some(n) if n > page => page = n,
                _ => break,
            }
        }
        Ok(items)
    }

    async fn fetch_group(&self, full_path: &str) -> ConductorResult<RemoteGroup> {
        let url = format!("{}/groups/{}", self.api_base, encode_path(full_path));
        let response = match self.get(&url).await {
            Err(ConductorError::Remote(err))
                if matches!(*err, RemoteError::HttpError { status: 404, .. }) =>
            {
                return Err(RemoteError::GroupNotFound {
                    group: full_path.to_string(),
                }
                .into());
            }
            other => other?,
        };
        Self::decode(&url, response).await
    }
}

/// Encode a namespace path for use as a single URL path segment.
pub(super) fn encode_path(full_path: &str) -> String {
    full_path
        .trim_matches('/')
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                char::from(b).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

impl RemoteHierarchy for GitLabClient {
    fn group<'a>(&'a self, full_path: &'a str) -> BoxFuture<'a, ConductorResult<RemoteGroup>> {
        Box::pin(self.fetch_group(full_path))
    }

    fn projects<'a>(
        &'a self,
        group: &'a RemoteGroup,
    ) -> BoxFuture<'a, ConductorResult<Vec<RemoteProject>>> {
        let endpoint = format!("/groups/{}/projects", group.id);
        Box::pin(async move { self.get_all(&endpoint).await })
    }

    fn subgroups<'a>(
        &'a self,
        group: &'a RemoteGroup,
    ) -> BoxFuture<'a, ConductorResult<Vec<RemoteGroup>>> {
        let endpoint = format!("/groups/{}/subgroups", group.id);
        Box::pin(async move { self.get_all(&endpoint).await })
    }

    fn members(&self, scope: MemberScope) -> BoxFuture<'_, ConductorResult<Vec<RemoteMember>>> {
        let endpoint = match scope {
            MemberScope::Group(id) => format!("/groups/{id}/members/all"),
            MemberScope::Project(id) => format!("/projects/{id}/members/all"),
        };
        Box::pin(async move { self.get_all(&endpoint).await })
    }
}
