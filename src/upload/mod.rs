mod orchestrator;
mod progress;
mod selection;
mod types;

pub use orchestrator::{UploadJob, UploadOrchestrator};
pub use progress::ProgressTracker;
pub use selection::{FileSelection, SelectedFile, ValidatedSelection};
pub use types::{FilePayload, SettledUpload, UploadEvent, UploadOutcome, UploadRequest};
