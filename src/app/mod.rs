mod login;
mod router;
mod state;
mod ui;

pub use login::LoginForm;
pub use router::{Router, View, ViewKind};
pub use state::{LandingState, WorkspaceState};

use crate::api::MatchApi;
use crate::config::Config;
use crate::session::SessionStore;
use eframe::{egui, App};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct ResumeMatcherApp {
    session: SessionStore,
    router: Router,
}

impl ResumeMatcherApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: &Config,
        api: Arc<dyn MatchApi>,
        session: SessionStore,
    ) -> Self {
        info!("Initializing Resume Matcher client");
        let router = Router::new(&session, api, config.export_dir.clone());
        Self { session, router }
    }

    /// Pumps background task results into the current view.
    pub fn update_state(&mut self, ctx: &egui::Context) {
        let busy = match self.router.view_mut() {
            View::Landing(landing) => {
                landing.poll();
                landing.service_status.is_none()
            }
            View::Login(form) => form.is_pending(),
            View::Workspace(workspace) => workspace.is_uploading(),
        };

        self.router.poll_workspace(&mut self.session);
        self.router.poll_login(&mut self.session);

        if busy {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl App for ResumeMatcherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
