use std::path::PathBuf;

use crate::error::Ya360Error;

use super::store::FileConfigStore;

pub const DEFAULT_API_BASE_URL: &str = "https://api360.yandex.net/";
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://oauth.yandex.ru";

const CONFIG_FILE_NAME: &str = "ya360.toml";

/// Remote endpoints used by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base_url: String,
    pub authorize_url: String,
    pub token_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_OAUTH_BASE_URL)
    }
}

impl Endpoints {
    /// Build endpoints from an API base URL and an OAuth server base URL.
    pub fn new(api_base_url: &str, oauth_base_url: &str) -> Self {
        let oauth = oauth_base_url.trim_end_matches('/');
        Self {
            api_base_url: with_trailing_slash(api_base_url),
            authorize_url: format!("{oauth}/authorize"),
            token_url: format!("{oauth}/token"),
        }
    }

    /// Defaults overridden by `YA360_API_BASE_URL` and `YA360_OAUTH_BASE_URL`.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("YA360_API_BASE_URL").ok(),
            std::env::var("YA360_OAUTH_BASE_URL").ok(),
        )
    }

    fn from_values(api: Option<String>, oauth: Option<String>) -> Self {
        Self::new(
            api.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
            oauth.as_deref().unwrap_or(DEFAULT_OAUTH_BASE_URL),
        )
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Resolve the config file path.
///
/// Precedence:
/// 1. `--config` CLI flag
/// 2. `YA360_CONFIG` env var
/// 3. `./ya360.toml` if it exists
/// 4. `~/.ya360/ya360.toml`
pub fn resolve_config_path(cli_config: Option<&str>) -> PathBuf {
    resolve_from(cli_config, std::env::var("YA360_CONFIG").ok())
}

fn resolve_from(cli_config: Option<&str>, env_config: Option<String>) -> PathBuf {
    if let Some(path) = cli_config {
        return PathBuf::from(path);
    }
    if let Some(path) = env_config.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let project = PathBuf::from(".").join(CONFIG_FILE_NAME);
    if project.exists() {
        return project;
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ya360")
        .join(CONFIG_FILE_NAME)
}

/// Open the file store at the resolved config path.
pub fn open_store(cli_config: Option<&str>) -> Result<FileConfigStore, Ya360Error> {
    let path = resolve_config_path(cli_config);
    tracing::debug!(path = %path.display(), "using config file");
    FileConfigStore::open(path)
}
