mod storage;

pub use storage::{CredentialStorage, FileStorage, MemoryStorage};

use crate::errors::ClientError;
use std::fmt;
use tracing::{info, warn};

/// Bearer token plus the role label the service assigned at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    role: String,
}

impl Credential {
    pub fn new(token: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role: role.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

// The token never ends up in logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Identifies the session a background task was started under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    epoch: u64,
    token: String,
}

/// Owns the active credential and mirrors it into durable storage.
///
/// Authenticated iff a credential with a non-empty token is held. The epoch
/// moves on every login and logout so that work started under an earlier
/// session can be recognised and dropped.
pub struct SessionStore {
    storage: Box<dyn CredentialStorage>,
    credential: Option<Credential>,
    epoch: u64,
}

impl SessionStore {
    /// Restores a previously persisted credential, if any. The token is not
    /// validated here; an expired one surfaces on the first API call.
    pub fn hydrate(storage: Box<dyn CredentialStorage>) -> Self {
        let credential = match storage.load() {
            Ok(credential) => credential,
            Err(e) => {
                warn!("Ignoring unreadable session storage: {e}");
                None
            }
        };
        if let Some(credential) = &credential {
            info!("Restored session for role '{}'", credential.role());
        }

        Self {
            storage,
            credential,
            epoch: 0,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn ticket(&self) -> Option<SessionTicket> {
        self.credential.as_ref().map(|c| SessionTicket {
            epoch: self.epoch,
            token: c.token.clone(),
        })
    }

    /// True if `ticket` was issued by the session that is still active.
    pub fn is_current(&self, ticket: &SessionTicket) -> bool {
        self.ticket().as_ref() == Some(ticket)
    }

    pub fn login(&mut self, credential: Credential) -> Result<(), ClientError> {
        if credential.token.is_empty() {
            return Err(ClientError::InvalidCredentials);
        }

        self.storage.save(&credential)?;
        info!("Logged in with role '{}'", credential.role());
        self.credential = Some(credential);
        self.epoch += 1;
        Ok(())
    }

    /// Drops the in-memory credential unconditionally. A failure to clear
    /// durable storage is still returned so the caller can report it.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.credential = None;
        self.epoch += 1;
        info!("Logged out");

        self.storage.clear().map_err(|e| {
            warn!("Failed to clear stored session: {e}");
            e
        })
    }
}
