//! Client side of the matching service's HTTP contract.
//!
//! Everything that touches the network goes through [`MatchApi`], so the
//! orchestration code can be driven by a fake in tests.

mod http;

pub use http::HttpMatchApi;

use crate::errors::ClientError;
use crate::results::{MatchResult, RequestId};
use crate::session::Credential;
use crate::upload::{ProgressTracker, UploadOutcome, UploadRequest};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;

#[async_trait]
pub trait MatchApi: Send + Sync {
    /// Exchanges a username and password for a credential.
    async fn login(&self, username: &str, password: &str) -> Result<Credential, ClientError>;

    /// Sends one job description and its resumes for scoring. Body progress
    /// is reported through `progress`.
    async fn upload(
        &self,
        request: UploadRequest,
        credential: &Credential,
        progress: Arc<ProgressTracker>,
    ) -> Result<UploadOutcome, ClientError>;

    /// Service banner from the root endpoint.
    async fn health(&self) -> Result<String, ClientError>;

    /// Link to a stored resume of a result set.
    fn download_url(&self, request_id: &RequestId, filename: &str) -> Result<Url, ClientError>;
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub results: Vec<WireMatchResult>,
    pub request_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMatchResult {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Similarity Score")]
    pub similarity_score: f64,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Resume Filename")]
    pub resume_filename: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RootResponse {
    pub message: String,
}

impl From<WireMatchResult> for MatchResult {
    fn from(wire: WireMatchResult) -> Self {
        Self {
            name: wire.name.filter(|n| !n.is_empty()),
            email: wire.email.unwrap_or_default(),
            similarity_score: wire.similarity_score,
            category: wire.category.filter(|c| !c.is_empty()),
            resume_filename: wire.resume_filename,
        }
    }
}

impl From<UploadResponse> for UploadOutcome {
    fn from(response: UploadResponse) -> Self {
        Self {
            results: response.results.into_iter().map(MatchResult::from).collect(),
            request_id: RequestId::new(response.request_id),
        }
    }
}

/// `{base}/download/{request_id}/{filename}` with each segment escaped.
pub fn build_download_url(
    base: &Url,
    request_id: &RequestId,
    filename: &str,
) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::Config(format!("{base} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(["download", request_id.as_str(), filename]);
    Ok(url)
}
