use crate::errors::ClientError;
use std::fs;
use std::path::{Path, PathBuf};

/// A document picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ClientError::UploadFailed(format!("Invalid filename: {}", path.display()))
            })?
            .to_string();
        let size = fs::metadata(path)?.len();

        Ok(Self {
            name,
            path: path.to_path_buf(),
            size,
        })
    }
}

/// What the user has picked so far. Each setter replaces its slot outright.
#[derive(Debug, Default, Clone)]
pub struct FileSelection {
    job_description: Option<SelectedFile>,
    resumes: Vec<SelectedFile>,
}

impl FileSelection {
    pub fn set_job_description(&mut self, file: SelectedFile) {
        self.job_description = Some(file);
    }

    pub fn set_resumes(&mut self, files: Vec<SelectedFile>) {
        self.resumes = files;
    }

    pub fn job_description(&self) -> Option<&SelectedFile> {
        self.job_description.as_ref()
    }

    pub fn resumes(&self) -> &[SelectedFile] {
        &self.resumes
    }

    pub fn validate_for_submit(&self) -> Result<ValidatedSelection, ClientError> {
        match &self.job_description {
            Some(job_description) if !self.resumes.is_empty() => Ok(ValidatedSelection {
                job_description: job_description.clone(),
                resumes: self.resumes.clone(),
            }),
            _ => Err(ClientError::MissingInput),
        }
    }
}

/// Snapshot of a selection with a job description and at least one resume.
/// Only [`FileSelection::validate_for_submit`] produces one.
#[derive(Debug, Clone)]
pub struct ValidatedSelection {
    job_description: SelectedFile,
    resumes: Vec<SelectedFile>,
}

impl ValidatedSelection {
    pub fn job_description(&self) -> &SelectedFile {
        &self.job_description
    }

    pub fn resumes(&self) -> &[SelectedFile] {
        &self.resumes
    }

    pub fn total_size(&self) -> u64 {
        self.job_description.size + self.resumes.iter().map(|r| r.size).sum::<u64>()
    }
}
