use anyhow::Result;
use eframe::CreationContext;
use resume_matcher_client::api::{HttpMatchApi, MatchApi};
use resume_matcher_client::app::ResumeMatcherApp;
use resume_matcher_client::config::Config;
use resume_matcher_client::session::{FileStorage, SessionStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Resume Matcher v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_base_url
    );

    let api: Arc<dyn MatchApi> = Arc::new(HttpMatchApi::new(
        config.api_base_url.clone(),
        config.request_timeout,
    )?);
    let session = SessionStore::hydrate(Box::new(FileStorage::new(&config.session_file)));

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([600.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Resume Matcher",
        options,
        Box::new(move |cc: &CreationContext| {
            Box::new(ResumeMatcherApp::new(cc, &config, api, session))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI event loop failed: {e}"))
}
