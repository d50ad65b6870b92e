use std::env;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const ENV_BASE_URL: &str = "ACCOMMO_API_URL";
const ENV_STATE_DIR: &str = "ACCOMMO_STATE_DIR";

/// Runtime configuration. Each field resolves flag > environment > default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the accommodation REST API
    pub base_url: String,
    /// Directory holding the persisted session (token + user record)
    pub state_dir: PathBuf,
}

impl Config {
    pub fn resolve(base_url_flag: Option<String>, state_dir_flag: Option<PathBuf>) -> Self {
        let base_url = base_url_flag
            .or_else(|| env::var(ENV_BASE_URL).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let state_dir = state_dir_flag
            .or_else(|| env::var(ENV_STATE_DIR).ok().map(PathBuf::from))
            .unwrap_or_else(default_state_dir);

        debug!("Using API at {} with state dir {:?}", base_url, state_dir);
        Self { base_url, state_dir }
    }
}

fn default_state_dir() -> PathBuf {
    match env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".accommo"),
        Err(_) => PathBuf::from(".accommo"),
    }
}
