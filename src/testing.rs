//! Scripted [`MatchApi`] and helpers shared by the unit tests.

use crate::api::{build_download_url, MatchApi};
use crate::errors::ClientError;
use crate::results::{MatchResult, RequestId};
use crate::session::{Credential, MemoryStorage, SessionStore};
use crate::upload::{FileSelection, ProgressTracker, SelectedFile, UploadOutcome, UploadRequest};
use async_trait::async_trait;
use reqwest::Url;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub struct FakeMatchApi {
    pub upload_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
    pub uploaded_resumes: Mutex<Vec<Vec<String>>>,
    outcome: Result<UploadOutcome, String>,
    rejects_credential: bool,
    delay: Duration,
}

impl FakeMatchApi {
    pub fn succeeding(outcome: UploadOutcome) -> Self {
        Self {
            upload_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            uploaded_resumes: Mutex::new(Vec::new()),
            outcome: Ok(outcome),
            rejects_credential: false,
            delay: Duration::ZERO,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            ..Self::succeeding(outcome(&[], "unused"))
        }
    }

    /// Answers every upload as if the service refused the token.
    pub fn rejecting_credential() -> Self {
        Self {
            rejects_credential: true,
            ..Self::succeeding(outcome(&[], "unused"))
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn uploads(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchApi for FakeMatchApi {
    async fn login(&self, username: &str, password: &str) -> Result<Credential, ClientError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if username == "recruiter" && password == "secret" {
            Ok(Credential::new("tok1", "recruiter"))
        } else {
            Err(ClientError::InvalidCredentials)
        }
    }

    async fn upload(
        &self,
        request: UploadRequest,
        _credential: &Credential,
        progress: Arc<ProgressTracker>,
    ) -> Result<UploadOutcome, ClientError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.uploaded_resumes.lock() {
            seen.push(request.resumes.iter().map(|r| r.name.clone()).collect());
        }

        let total = request.total_bytes();
        progress.advance(total / 2);
        tokio::time::sleep(self.delay).await;
        progress.advance(total - total / 2);

        if self.rejects_credential {
            return Err(ClientError::SessionExpired);
        }
        self.outcome.clone().map_err(ClientError::UploadFailed)
    }

    async fn health(&self) -> Result<String, ClientError> {
        Ok("Resume Matcher Backend".to_string())
    }

    fn download_url(&self, request_id: &RequestId, filename: &str) -> Result<Url, ClientError> {
        let base = Url::parse("http://127.0.0.1:8000")
            .map_err(|e| ClientError::Config(e.to_string()))?;
        build_download_url(&base, request_id, filename)
    }
}

pub fn result(name: &str, email: &str, score: f64, category: &str, filename: &str) -> MatchResult {
    MatchResult {
        name: Some(name.to_string()),
        email: email.to_string(),
        similarity_score: score,
        category: Some(category.to_string()),
        resume_filename: filename.to_string(),
    }
}

pub fn outcome(results: &[MatchResult], request_id: &str) -> UploadOutcome {
    UploadOutcome {
        results: results.to_vec(),
        request_id: RequestId::new(request_id),
    }
}

pub fn ann_and_bob() -> UploadOutcome {
    outcome(
        &[
            result("Ann", "ann@x.com", 82.0, "Eng", "a.pdf"),
            result("Bob", "bob@x.com", 47.0, "Sales", "b.pdf"),
        ],
        "r1",
    )
}

pub fn logged_in_session() -> SessionStore {
    let mut session = SessionStore::hydrate(Box::new(MemoryStorage::new()));
    session.login(Credential::new("tok1", "recruiter")).unwrap();
    session
}

/// Writes `jd.pdf` plus the named resumes into `dir` and selects them.
pub fn selection_in(dir: &Path, resumes: &[&str]) -> FileSelection {
    let mut selection = FileSelection::default();
    let jd = dir.join("jd.pdf");
    std::fs::write(&jd, b"%PDF job description").unwrap();
    selection.set_job_description(SelectedFile::from_path(&jd).unwrap());

    let files = resumes
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, format!("%PDF resume {name}")).unwrap();
            SelectedFile::from_path(&path).unwrap()
        })
        .collect();
    selection.set_resumes(files);
    selection
}

/// Calls `poll` until it yields something or five seconds pass.
pub fn wait_for<T>(mut poll: impl FnMut() -> Option<T>) -> T {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(value) = poll() {
            return value;
        }
        assert!(Instant::now() < deadline, "timed out waiting for background task");
        std::thread::sleep(Duration::from_millis(5));
    }
}
