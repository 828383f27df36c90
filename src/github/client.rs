use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use spdlog::debug;

use crate::config::Github;
use crate::github::contents::{ContentSha, ContentsApi, FileLocation, PutFileRequest, RemoteFile, SyncError};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Deserialize)]
struct PutFileResponse {
    content: PutFileContent,
}

#[derive(Deserialize)]
struct PutFileContent {
    sha: ContentSha,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: Option<String>,
}

/// Contents API over HTTPS, authenticated with a personal access token.
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubClient {
    /// Every request carries the configured User-Agent.
    pub fn new(github: &Github) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .user_agent(github.user_agent.as_str())
            .build()?;

        Ok(GithubClient {
            http,
            api_base: github.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn contents_url(&self, location: &FileLocation) -> String {
        format!("{}/repos/{}/{}/contents/{}", self.api_base, location.owner, location.repo, location.path)
    }
}

#[async_trait]
impl ContentsApi for GithubClient {
    async fn get_file(&self, location: &FileLocation) -> Result<Option<RemoteFile>, SyncError> {
        let url = self.contents_url(location);
        debug!("GET {} ref={}", url, location.branch);

        let response = self.http.get(&url)
            .query(&[("ref", location.branch.as_str())])
            .header(AUTHORIZATION, format!("token {}", location.token))
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if !status.is_success() => Err(SyncError::Status(status.as_u16())),
            _ => Ok(Some(response.json::<RemoteFile>().await?)),
        }
    }

    async fn put_file(&self, location: &FileLocation, request: &PutFileRequest) -> Result<ContentSha, SyncError> {
        let url = self.contents_url(location);
        debug!("PUT {} branch={} sha={:?}", url, request.branch, request.sha);

        let response = self.http.put(&url)
            .header(AUTHORIZATION, format!("token {}", location.token))
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.json::<ApiMessage>().await.ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            return Err(SyncError::Rejected(message));
        }

        let body: PutFileResponse = response.json().await?;
        Ok(body.content.sha)
    }
}
