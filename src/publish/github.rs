//! Publishing through the GitHub contents API.
//!
//! Each page is one file in the website repository. The current blob sha is
//! read first, identical content is left alone, anything else is committed
//! with a single `PUT`.

use super::{PublishOutcome, Publisher};
use crate::config::{HttpConfig, PublishConfig};
use crate::errors::{AppError, AppResult};
use crate::net::{build_client, retry::send_with_retry};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Subset of the `GET /contents/{path}` response we rely on.
#[derive(Debug, Deserialize)]
pub struct RemoteFile {
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl RemoteFile {
    /// Decoded file content; None when GitHub did not inline it (large files).
    pub fn decoded(&self) -> Option<String> {
        if self.encoding.as_deref() != Some("base64") {
            return None;
        }
        let packed: String = self
            .content
            .as_deref()?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = STANDARD.decode(packed).ok()?;
        String::from_utf8(bytes).ok()
    }
}

/// Body of `PUT /contents/{path}`.
#[derive(Debug, Serialize)]
pub struct UpdateRequest<'a> {
    pub message: &'a str,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
    pub branch: &'a str,
}

impl<'a> UpdateRequest<'a> {
    pub fn new(message: &'a str, content: &str, sha: Option<&'a str>, branch: &'a str) -> Self {
        Self {
            message,
            content: STANDARD.encode(content.as_bytes()),
            sha,
            branch,
        }
    }
}

pub fn contents_url(api_url: &str, repository: &str, path: &str) -> String {
    format!(
        "{}/repos/{}/contents/{}",
        api_url.trim_end_matches('/'),
        repository.trim_matches('/'),
        path.trim_start_matches('/')
    )
}

pub struct GitHubPublisher {
    client: Client,
    http: HttpConfig,
    api_url: String,
    repository: String,
    branch: String,
    token: String,
}

impl GitHubPublisher {
    pub fn new(publish: &PublishConfig, http: &HttpConfig, token: String) -> AppResult<Self> {
        if publish.repository.split('/').filter(|s| !s.is_empty()).count() != 2 {
            return Err(AppError::Config(format!(
                "publish.repository must look like 'owner/name', got '{}'",
                publish.repository
            )));
        }
        Ok(Self {
            client: build_client(http)?,
            http: http.clone(),
            api_url: publish.api_url.clone(),
            repository: publish.repository.clone(),
            branch: publish.branch.clone(),
            token,
        })
    }

    pub fn from_config(publish: &PublishConfig, http: &HttpConfig) -> AppResult<Self> {
        Self::new(publish, http, publish.resolve_token()?)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    fn fetch_remote(&self, path: &str, url: &str) -> AppResult<Option<RemoteFile>> {
        let resp = send_with_retry(
            || {
                self.authorized(self.client.get(url))
                    .query(&[("ref", self.branch.as_str())])
            },
            &self.http,
            &format!("read {path}"),
        )?;

        match resp.status() {
            s if s.is_success() => Ok(Some(resp.json::<RemoteFile>()?)),
            StatusCode::NOT_FOUND => Ok(None),
            s => Err(status_error(s, path, &self.repository)),
        }
    }
}

fn status_error(status: StatusCode, path: &str, repository: &str) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::PublishAuth(format!("{repository} rejected the token ({status})"))
        }
        StatusCode::NOT_FOUND => {
            AppError::PublishNotFound(format!("{repository}: {path} ({status})"))
        }
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => AppError::PublishConflict(
            format!("{path} changed remotely or the sha is stale ({status})"),
        ),
        s => AppError::Publish(format!("{path}: unexpected HTTP {s}")),
    }
}

impl Publisher for GitHubPublisher {
    fn publish(&self, path: &str, content: &str, message: &str) -> AppResult<PublishOutcome> {
        let url = contents_url(&self.api_url, &self.repository, path);

        let remote = self.fetch_remote(path, &url)?;
        if let Some(file) = &remote
            && file.decoded().as_deref() == Some(content)
        {
            return Ok(PublishOutcome::Unchanged);
        }

        let sha = remote.as_ref().map(|f| f.sha.as_str());
        let body = UpdateRequest::new(message, content, sha, &self.branch);

        let resp = send_with_retry(
            || self.authorized(self.client.put(&url)).json(&body),
            &self.http,
            &format!("write {path}"),
        )?;

        match resp.status() {
            StatusCode::CREATED => Ok(PublishOutcome::Created),
            s if s.is_success() => Ok(PublishOutcome::Updated),
            s => Err(status_error(s, path, &self.repository)),
        }
    }

    fn describe(&self) -> String {
        format!("{}@{}", self.repository, self.branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped(status: StatusCode) -> AppError {
        status_error(status, "en/program.html", "owner/site")
    }

    #[test]
    fn test_rejected_token_is_an_auth_error() {
        assert!(matches!(mapped(StatusCode::UNAUTHORIZED), AppError::PublishAuth(_)));
        assert!(matches!(mapped(StatusCode::FORBIDDEN), AppError::PublishAuth(_)));
    }

    #[test]
    fn test_missing_repository_or_branch_is_not_found() {
        let err = mapped(StatusCode::NOT_FOUND);
        assert!(matches!(err, AppError::PublishNotFound(_)));
        assert!(err.to_string().contains("en/program.html"));
    }

    #[test]
    fn test_stale_sha_is_a_conflict() {
        assert!(matches!(mapped(StatusCode::CONFLICT), AppError::PublishConflict(_)));
        assert!(matches!(
            mapped(StatusCode::UNPROCESSABLE_ENTITY),
            AppError::PublishConflict(_)
        ));
    }

    #[test]
    fn test_other_statuses_are_generic_publish_errors() {
        assert!(matches!(mapped(StatusCode::INTERNAL_SERVER_ERROR), AppError::Publish(_)));
        assert!(matches!(mapped(StatusCode::BAD_REQUEST), AppError::Publish(_)));
    }
}
