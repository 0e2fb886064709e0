use super::login::LoginForm;
use super::state::{LandingState, WorkspaceState};
use crate::api::MatchApi;
use crate::errors::ClientError;
use crate::session::{Credential, SessionStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The screen currently shown. Only the workspace exists while a session is
/// active, so "logged in but on the landing page" cannot be represented.
pub enum View {
    Landing(LandingState),
    Login(LoginForm),
    Workspace(Box<WorkspaceState>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Landing,
    Login,
    Workspace,
}

impl View {
    pub fn kind(&self) -> ViewKind {
        match self {
            View::Landing(_) => ViewKind::Landing,
            View::Login(_) => ViewKind::Login,
            View::Workspace(_) => ViewKind::Workspace,
        }
    }
}

/// Landing -> Login -> Workspace, and back to Landing on logout.
pub struct Router {
    view: View,
    api: Arc<dyn MatchApi>,
    export_dir: PathBuf,
}

impl Router {
    pub fn new(session: &SessionStore, api: Arc<dyn MatchApi>, export_dir: PathBuf) -> Self {
        let view = if session.is_authenticated() {
            View::Workspace(Box::new(WorkspaceState::new(
                Arc::clone(&api),
                export_dir.clone(),
            )))
        } else {
            View::Landing(LandingState::new(Arc::clone(&api)))
        };
        Self {
            view,
            api,
            export_dir,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn kind(&self) -> ViewKind {
        self.view.kind()
    }

    pub fn api(&self) -> Arc<dyn MatchApi> {
        Arc::clone(&self.api)
    }

    /// Landing -> Login.
    pub fn get_started(&mut self) {
        if let View::Landing(_) = self.view {
            self.view = View::Login(LoginForm::default());
        }
    }

    /// Login -> Workspace, once the credential has been stored.
    pub fn complete_login(
        &mut self,
        session: &mut SessionStore,
        credential: Credential,
    ) -> Result<(), ClientError> {
        if !matches!(self.view, View::Login(_)) {
            return Ok(());
        }
        session.login(credential)?;
        self.view = View::Workspace(Box::new(WorkspaceState::new(
            Arc::clone(&self.api),
            self.export_dir.clone(),
        )));
        Ok(())
    }

    /// Picks up a finished login request and moves to the workspace on
    /// success. Failures stay on the form.
    pub fn poll_login(&mut self, session: &mut SessionStore) {
        let View::Login(form) = &mut self.view else {
            return;
        };
        let Some(Ok(credential)) = form.poll() else {
            return;
        };
        if let Err(e) = self.complete_login(session, credential) {
            if let View::Login(form) = &mut self.view {
                form.error = Some(e.to_string());
            }
        }
    }

    /// Applies a settled upload to the workspace. An upload the service
    /// refused for its credential ends the session and opens the login form.
    pub fn poll_workspace(&mut self, session: &mut SessionStore) {
        let View::Workspace(workspace) = &mut self.view else {
            return;
        };
        let Some(result) = workspace.poll(session) else {
            return;
        };

        match result {
            Ok(count) => {
                workspace.error_message = None;
                workspace.status_message = Some(format!("Matched {count} resumes"));
            }
            Err(e) if e.requires_login() => {
                warn!("Upload needs a new login: {e}");
                if let Err(clear_err) = self.require_login(session, &e) {
                    error!("Could not clear stored session: {clear_err}");
                }
            }
            Err(e) => {
                workspace.status_message = None;
                workspace.error_message = Some(e.to_string());
            }
        }
    }

    /// Workspace -> Landing. The workspace, and any upload still running in
    /// it, is dropped.
    pub fn logout(&mut self, session: &mut SessionStore) -> Result<(), ClientError> {
        if !matches!(self.view, View::Workspace(_)) {
            return Ok(());
        }
        let result = session.logout();
        self.view = View::Landing(LandingState::new(Arc::clone(&self.api)));
        info!("Returned to landing page");
        result
    }

    /// Sends the user back to the login form when the session turned out to
    /// be unusable. `reason` is shown on the form.
    pub fn require_login(
        &mut self,
        session: &mut SessionStore,
        reason: &ClientError,
    ) -> Result<(), ClientError> {
        let result = self.logout(session);
        self.get_started();
        if let View::Login(form) = &mut self.view {
            form.error = Some(reason.to_string());
        }
        result
    }
}
