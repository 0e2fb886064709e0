use super::{
    FilePayload, ProgressTracker, SelectedFile, SettledUpload, UploadEvent, UploadOutcome,
    UploadRequest, ValidatedSelection,
};
use crate::api::MatchApi;
use crate::errors::ClientError;
use crate::session::{Credential, SessionStore, SessionTicket};
use bytes::Bytes;
use std::sync::mpsc::{self as std_mpsc, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// A submission running on its own worker thread.
///
/// Dropping the job cancels the request.
pub struct UploadJob {
    ticket: SessionTicket,
    events: Receiver<UploadEvent>,
    cancel: watch::Sender<bool>,
}

impl UploadJob {
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }
}

/// Runs at most one upload at a time and relays its progress.
pub struct UploadOrchestrator {
    api: Arc<dyn MatchApi>,
    job: Option<UploadJob>,
    progress: u8,
}

impl UploadOrchestrator {
    pub fn new(api: Arc<dyn MatchApi>) -> Self {
        Self {
            api,
            job: None,
            progress: 0,
        }
    }

    pub fn api(&self) -> &Arc<dyn MatchApi> {
        &self.api
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// Percentage of the current request body sent so far; 0 when idle.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Starts one upload of `selection` under the active session.
    ///
    /// Fails with `Unauthenticated` before touching the network when there is
    /// no credential, and with `UploadInProgress` while another job is out.
    pub fn submit(
        &mut self,
        selection: ValidatedSelection,
        session: &SessionStore,
    ) -> Result<(), ClientError> {
        let (credential, ticket) = match (session.credential(), session.ticket()) {
            (Some(credential), Some(ticket)) => (credential.clone(), ticket),
            _ => return Err(ClientError::Unauthenticated),
        };
        if self.job.is_some() {
            return Err(ClientError::UploadInProgress);
        }

        info!(
            "Submitting job description '{}' with {} resumes",
            selection.job_description().name,
            selection.resumes().len()
        );

        let (events_tx, events_rx) = std_mpsc::channel();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let api = Arc::clone(&self.api);

        std::thread::spawn(move || {
            let result = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(async {
                    tokio::select! {
                        result = run_upload(api.as_ref(), &selection, &credential, &events_tx) => {
                            Some(result)
                        }
                        _ = cancelled(cancel_rx) => None,
                    }
                }),
                Err(e) => Some(Err(ClientError::UploadFailed(format!(
                    "Failed to start upload worker: {e}"
                )))),
            };

            if let Some(result) = result {
                let _ = events_tx.send(UploadEvent::Settled(result));
            }
        });

        self.progress = 0;
        self.job = Some(UploadJob {
            ticket,
            events: events_rx,
            cancel: cancel_tx,
        });
        Ok(())
    }

    /// Drains pending worker events. Returns the outcome once the job has
    /// settled, after which the orchestrator is idle again.
    pub fn poll(&mut self) -> Option<SettledUpload> {
        let job = self.job.as_ref()?;

        let result = loop {
            match job.events.try_recv() {
                Ok(UploadEvent::Progress(percent)) => {
                    self.progress = self.progress.max(percent);
                }
                Ok(UploadEvent::Settled(result)) => break result,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    error!("Upload worker exited without a result");
                    break Err(ClientError::UploadFailed(
                        "The upload worker stopped unexpectedly".to_string(),
                    ));
                }
            }
        };

        let job = self.job.take()?;
        self.progress = 0;
        match &result {
            Ok(outcome) => info!(
                "Upload settled with {} results (request {})",
                outcome.results.len(),
                outcome.request_id
            ),
            Err(e) => warn!("Upload failed: {e}"),
        }

        Some(SettledUpload {
            ticket: job.ticket,
            result,
        })
    }

    /// Abandons the running job, if any. Nothing it produces is reported.
    pub fn cancel(&mut self) {
        if let Some(job) = self.job.take() {
            job.cancel();
            info!("Upload abandoned");
        }
        self.progress = 0;
    }
}

async fn cancelled(mut cancel: watch::Receiver<bool>) {
    // a dropped sender means the job itself is gone
    while !*cancel.borrow() {
        if cancel.changed().await.is_err() {
            return;
        }
    }
}

async fn run_upload(
    api: &dyn MatchApi,
    selection: &ValidatedSelection,
    credential: &Credential,
    events: &Sender<UploadEvent>,
) -> Result<UploadOutcome, ClientError> {
    let _ = events.send(UploadEvent::Progress(0));

    let request = read_request(selection).await?;
    let tracker = Arc::new(ProgressTracker::new(request.total_bytes(), events.clone()));
    api.upload(request, credential, tracker).await
}

async fn read_request(selection: &ValidatedSelection) -> Result<UploadRequest, ClientError> {
    let job_description = read_payload(selection.job_description()).await?;
    let mut resumes = Vec::with_capacity(selection.resumes().len());
    for resume in selection.resumes() {
        resumes.push(read_payload(resume).await?);
    }
    Ok(UploadRequest {
        job_description,
        resumes,
    })
}

async fn read_payload(file: &SelectedFile) -> Result<FilePayload, ClientError> {
    let bytes = tokio::fs::read(&file.path).await.map_err(|e| {
        ClientError::UploadFailed(format!("Failed to read file {}: {}", file.name, e))
    })?;
    Ok(FilePayload {
        name: file.name.clone(),
        bytes: Bytes::from(bytes),
    })
}
