use crate::api::MatchApi;
use crate::errors::ClientError;
use crate::session::Credential;
use crate::utils::task;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pending: Option<Receiver<Result<Credential, ClientError>>>,
}

impl LoginForm {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Sends the entered credentials. Ignored while a request is out.
    pub fn submit(&mut self, api: Arc<dyn MatchApi>) {
        if self.pending.is_some() {
            return;
        }
        self.error = None;

        let username = self.username.trim().to_string();
        let password = self.password.clone();
        debug!("Requesting token for '{username}'");
        self.pending = Some(task::spawn(move || async move {
            api.login(&username, &password).await
        }));
    }

    /// The login result once the request has finished. A failure is also
    /// kept on the form for display.
    pub fn poll(&mut self) -> Option<Result<Credential, ClientError>> {
        let result = task::try_take(self.pending.as_ref()?)?;
        self.pending = None;

        if let Err(e) = &result {
            self.error = Some(e.to_string());
            self.password.clear();
        }
        Some(result)
    }
}
