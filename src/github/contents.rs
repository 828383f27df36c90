use std::fmt;
use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::SessionConfig;

/// Blob SHA of the stored file, sent back on update so GitHub can reject stale writes.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSha(pub String);

impl Display for ContentSha {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("GitHub API Error: {0}")]
    Status(u16),

    #[error("Failed to save: {0}")]
    Rejected(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid post collection: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sync task stopped: {0}")]
    Task(String),
}

/// Where the collection lives and how to authenticate against it.
#[derive(Clone, PartialEq)]
pub struct FileLocation {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
    pub token: String,
}

impl FileLocation {
    pub fn new(session: &SessionConfig, path: &str) -> Self {
        FileLocation {
            owner: session.owner.clone(),
            repo: session.repo.clone(),
            branch: session.branch.clone(),
            path: path.to_string(),
            token: session.token.clone(),
        }
    }
}

impl Display for FileLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}:{}", self.owner, self.repo, self.branch, self.path)
    }
}

/// File as returned by `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteFile {
    /// Base64, wrapped with newlines by GitHub.
    pub content: String,
    pub sha: ContentSha,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PutFileRequest {
    pub message: String,
    pub content: String,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<ContentSha>,
}

#[async_trait]
pub trait ContentsApi: Send + Sync {
    /// `Ok(None)` when the file does not exist yet.
    async fn get_file(&self, location: &FileLocation) -> Result<Option<RemoteFile>, SyncError>;

    /// Commits the file and returns the SHA of the new blob.
    async fn put_file(&self, location: &FileLocation, request: &PutFileRequest) -> Result<ContentSha, SyncError>;
}
