use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Ya360Error {
    #[error(
        "No verification code provided. Authorize at {authorize_url} and store the received code \
         as verification_code next to client_id and client_secret."
    )]
    AuthConfig { client_id: String, authorize_url: String },

    #[error("Token exchange failed with status {status}: {description}")]
    AuthExchange { status: u16, description: String },

    #[error("Token exchange returned no usable token: {0}")]
    AuthState(String),

    #[error("Request to API failed: {method} {url} (params: {params}): {detail}")]
    ApiRequest {
        method: String,
        url: String,
        params: String,
        status: Option<u16>,
        detail: String,
    },

    #[error("Client is not authenticated. Obtain a token first.")]
    NotAuthenticated,

    #[error("Transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Error in config {}: {detail}", path.display())]
    ConfigError { path: PathBuf, detail: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Ya360Error {
    /// Error code string for structured JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            Ya360Error::AuthConfig { .. } => "auth_config",
            Ya360Error::AuthExchange { .. } => "auth_exchange",
            Ya360Error::AuthState(_) => "auth_state",
            Ya360Error::ApiRequest { .. } => "api_request",
            Ya360Error::NotAuthenticated => "not_authenticated",
            Ya360Error::Transport(_) => "transport_error",
            Ya360Error::Parse(_) => "parse_error",
            Ya360Error::ConfigError { .. } => "config_error",
            Ya360Error::IoError(_) => "io_error",
        }
    }

    /// HTTP status reported by the upstream service, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Ya360Error::AuthExchange { status, .. } => Some(*status),
            Ya360Error::ApiRequest { status, .. } => *status,
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Ya360Error::ApiRequest { url, .. } => Some(url),
            Ya360Error::AuthConfig { authorize_url, .. } => Some(authorize_url),
            _ => None,
        }
    }

    /// Produce a structured JSON error object.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        if let Some(url) = self.url() {
            obj.insert("url".into(), serde_json::Value::String(url.to_string()));
        }
        if let Some(status) = self.status() {
            obj.insert("status".into(), serde_json::Value::from(status));
        }
        obj.insert("message".into(), serde_json::Value::String(self.to_string()));
        obj.insert("code".into(), serde_json::Value::String(self.code().to_string()));
        serde_json::json!({ "error": obj })
    }
}
