use super::{build_download_url, MatchApi, RootResponse, TokenResponse, UploadResponse};
use crate::errors::ClientError;
use crate::results::RequestId;
use crate::session::Credential;
use crate::upload::{FilePayload, ProgressTracker, UploadOutcome, UploadRequest};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const RESUMES_FIELD: &str = "resumes";
const CHUNK_SIZE: usize = 64 * 1024;

/// [`MatchApi`] over HTTP with `reqwest`.
#[derive(Clone)]
pub struct HttpMatchApi {
    client: Client,
    base_url: Url,
}

impl HttpMatchApi {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Config(format!("bad endpoint '{path}': {e}")))
    }
}

#[async_trait]
impl MatchApi for HttpMatchApi {
    async fn login(&self, username: &str, password: &str) -> Result<Credential, ClientError> {
        let response = self
            .client
            .post(self.endpoint("token")?)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("Login rejected with status {}", response.status());
            return Err(ClientError::InvalidCredentials);
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            warn!("Malformed token response: {e}");
            ClientError::InvalidCredentials
        })?;
        if token.access_token.is_empty() {
            return Err(ClientError::InvalidCredentials);
        }

        Ok(Credential::new(token.access_token, token.role.unwrap_or_default()))
    }

    async fn upload(
        &self,
        request: UploadRequest,
        credential: &Credential,
        progress: Arc<ProgressTracker>,
    ) -> Result<UploadOutcome, ClientError> {
        let mut form = Form::new().part(
            JOB_DESCRIPTION_FIELD,
            tracked_part(request.job_description, Arc::clone(&progress))?,
        );
        for resume in request.resumes {
            form = form.part(RESUMES_FIELD, tracked_part(resume, Arc::clone(&progress))?);
        }

        let response = self
            .client
            .post(self.endpoint("upload/")?)
            .bearer_auth(credential.token())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::UploadFailed(format!("Failed to send request: {e}")))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("Upload rejected the credential with status {status}");
                return Err(ClientError::SessionExpired);
            }
            _ if !status.is_success() => {
                return Err(ClientError::UploadFailed(format!(
                    "Upload failed with status: {status}"
                )))
            }
            _ => {}
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            ClientError::UploadFailed(format!("Failed to parse upload response: {e}"))
        })?;

        Ok(body.into())
    }

    async fn health(&self) -> Result<String, ClientError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await?
            .error_for_status()?;
        let root: RootResponse = response.json().await?;
        Ok(root.message)
    }

    fn download_url(&self, request_id: &RequestId, filename: &str) -> Result<Url, ClientError> {
        build_download_url(&self.base_url, request_id, filename)
    }
}

/// A multipart part whose body advances `progress` as it is read.
// Only file bytes are counted; boundaries and part headers are not, so 100
// can be reported just before the last framing bytes go out.
fn tracked_part(payload: FilePayload, progress: Arc<ProgressTracker>) -> Result<Part, ClientError> {
    let length = payload.bytes.len() as u64;
    let chunks = chunk(payload.bytes);
    let body = stream::iter(chunks).map(move |chunk| {
        progress.advance(chunk.len() as u64);
        Ok::<Bytes, std::io::Error>(chunk)
    });

    let mime = mime_for(&payload.name);
    Part::stream_with_length(Body::wrap_stream(body), length)
        .file_name(payload.name)
        .mime_str(mime)
        .map_err(|e| ClientError::UploadFailed(e.to_string()))
}

fn chunk(bytes: Bytes) -> Vec<Bytes> {
    (0..bytes.len())
        .step_by(CHUNK_SIZE)
        .map(|start| bytes.slice(start..(start + CHUNK_SIZE).min(bytes.len())))
        .collect()
}

fn mime_for(name: &str) -> &'static str {
    if name.to_lowercase().ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_covers_all_bytes() {
        let bytes = Bytes::from(vec![7u8; CHUNK_SIZE * 2 + 10]);
        let chunks = chunk(bytes.clone());
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 10);
        assert_eq!(chunks.iter().map(|c| c.len()).sum::<usize>(), bytes.len());
    }

    #[test]
    fn test_chunk_of_empty_file_is_empty() {
        assert!(chunk(Bytes::new()).is_empty());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("CV.PDF"), "application/pdf");
        assert_eq!(mime_for("notes.docx"), "application/octet-stream");
    }

    #[test]
    fn test_endpoints_resolve_against_base() {
        let api = HttpMatchApi::new(
            Url::parse("http://127.0.0.1:8000").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            api.endpoint("upload/").unwrap().as_str(),
            "http://127.0.0.1:8000/upload/"
        );
        assert_eq!(
            api.endpoint("token").unwrap().as_str(),
            "http://127.0.0.1:8000/token"
        );
    }
}
