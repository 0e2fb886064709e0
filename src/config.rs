use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_SESSION_FILE: &str = ".resume_matcher/session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Client configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub session_file: PathBuf,
    pub export_dir: PathBuf,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_base_url = parse_base_url(&env_or("MATCHER_API_URL", DEFAULT_API_URL))?;
        let timeout_secs = match std::env::var("MATCHER_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("MATCHER_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_base_url,
            session_file: PathBuf::from(env_or("MATCHER_SESSION_FILE", DEFAULT_SESSION_FILE)),
            export_dir: PathBuf::from(env_or("MATCHER_EXPORT_DIR", ".")),
            request_timeout: Duration::from_secs(timeout_secs),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Parses the service root. Download links are built by appending path
/// segments, so the URL must be able to act as a base.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("'{raw}' is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        bail!("'{raw}' must be an http(s) URL");
    }
    Ok(url)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
