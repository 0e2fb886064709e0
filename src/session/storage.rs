use super::Credential;
use crate::errors::ClientError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Durable slot for the credential. Only the session store writes to it.
pub trait CredentialStorage: Send {
    fn load(&self) -> Result<Option<Credential>, ClientError>;
    fn save(&mut self, credential: &Credential) -> Result<(), ClientError>;
    fn clear(&mut self) -> Result<(), ClientError>;
}

#[derive(Serialize, Deserialize)]
struct StoredCredential {
    token: String,
    #[serde(default)]
    role: String,
}

/// Keeps the credential as a small JSON file with `token` and `role` keys.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStorage for FileStorage {
    fn load(&self) -> Result<Option<Credential>, ClientError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredCredential = serde_json::from_str(&content).map_err(|e| {
            ClientError::Storage(format!(
                "{} is not a valid session file: {}",
                self.path.display(),
                e
            ))
        })?;

        if stored.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(Credential::new(stored.token, stored.role)))
    }

    fn save(&mut self, credential: &Credential) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let stored = StoredCredential {
            token: credential.token().to_string(),
            role: credential.role().to_string(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::write(&self.path, json)?;
        debug!("Session written to {}", self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage. Clones share the same slot, so a test can keep a handle
/// and inspect what the session store wrote.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<Credential>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(credential))),
        }
    }

    pub fn stored(&self) -> Option<Credential> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl CredentialStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Credential>, ClientError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| ClientError::Storage("memory storage poisoned".to_string()))?;
        Ok(slot.clone().filter(|c| !c.token().is_empty()))
    }

    fn save(&mut self, credential: &Credential) -> Result<(), ClientError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ClientError::Storage("memory storage poisoned".to_string()))?;
        *slot = Some(credential.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ClientError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ClientError::Storage("memory storage poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}
