use crate::errors::ClientError;
use crate::results::{MatchResult, RequestId};
use crate::session::SessionTicket;
use bytes::Bytes;

/// One file ready to go on the wire.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    pub bytes: Bytes,
}

/// The multipart request body, in the order the parts are sent.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub job_description: FilePayload,
    pub resumes: Vec<FilePayload>,
}

impl UploadRequest {
    pub fn total_bytes(&self) -> u64 {
        let resumes: usize = self.resumes.iter().map(|r| r.bytes.len()).sum();
        (self.job_description.bytes.len() + resumes) as u64
    }
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub results: Vec<MatchResult>,
    pub request_id: RequestId,
}

/// Messages sent from an upload worker back to the UI thread.
#[derive(Debug)]
pub enum UploadEvent {
    Progress(u8),
    Settled(Result<UploadOutcome, ClientError>),
}

/// A finished upload together with the session it was started under.
#[derive(Debug)]
pub struct SettledUpload {
    pub ticket: SessionTicket,
    pub result: Result<UploadOutcome, ClientError>,
}
