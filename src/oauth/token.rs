use serde::{Deserialize, Serialize};

use crate::config::ConfigStore;
use crate::error::Ya360Error;

use super::credentials::ClientCredentials;

pub const TOKEN_SECTION: &str = "Yandex360TokenData";

/// Token material returned by the OAuth server. All fields are kept as
/// strings, the way they are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: String,
}

impl TokenState {
    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("OAuth {}", self.access_token)
    }

    pub fn expires_in_secs(&self) -> Option<i64> {
        self.expires_in.trim().parse().ok()
    }

    /// Parse a token response body.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Ya360Error> {
        let resp: TokenResponse = serde_json::from_value(value.clone())
            .map_err(|e| Ya360Error::Parse(format!("Failed to parse token response: {e}")))?;
        Ok(resp.into_token_state())
    }

    /// Load a persisted token. `Ok(None)` when the section is absent.
    pub fn load(store: &dyn ConfigStore) -> Result<Option<Self>, Ya360Error> {
        if !store.has_section(TOKEN_SECTION) {
            return Ok(None);
        }
        let required = |key: &str| {
            store.get(TOKEN_SECTION, key).ok_or_else(|| {
                Ya360Error::Parse(format!("Section [{TOKEN_SECTION}] is missing '{key}'"))
            })
        };
        Ok(Some(Self {
            access_token: required("access_token")?,
            refresh_token: required("refresh_token")?,
            token_type: required("token_type")?,
            expires_in: required("expires_in")?,
        }))
    }

    /// Write all four fields into the store. The caller decides when to flush.
    pub fn save(&self, store: &mut dyn ConfigStore) {
        store.set(TOKEN_SECTION, "access_token", &self.access_token);
        store.set(TOKEN_SECTION, "refresh_token", &self.refresh_token);
        store.set(TOKEN_SECTION, "expires_in", &self.expires_in);
        store.set(TOKEN_SECTION, "token_type", &self.token_type);
    }
}

/// The two grant shapes accepted by the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant<'a> {
    AuthorizationCode(&'a str),
    RefreshToken(&'a str),
}

impl Grant<'_> {
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::AuthorizationCode(_) => "authorization_code",
            Grant::RefreshToken(_) => "refresh_token",
        }
    }

    /// Form field carrying the grant's secret.
    fn field(&self) -> (&'static str, &str) {
        match self {
            Grant::AuthorizationCode(code) => ("code", *code),
            Grant::RefreshToken(token) => ("refresh_token", *token),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(serde_json::Number),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Num(n) => n.to_string(),
        }
    }
}

/// Raw token response from the OAuth server.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: StringOrNumber,
    token_type: String,
}

impl TokenResponse {
    fn into_token_state(self) -> TokenState {
        TokenState {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type,
            expires_in: self.expires_in.into_string(),
        }
    }
}

/// Consent page URL a human visits to obtain a verification code.
pub fn authorize_url(authorize_endpoint: &str, client_id: &str) -> String {
    format!("{authorize_endpoint}?response_type=code&client_id={client_id}")
}

/// POST a form-encoded grant to the token endpoint.
pub async fn exchange(
    http: &reqwest::Client,
    token_url: &str,
    credentials: &ClientCredentials,
    grant: Grant<'_>,
) -> Result<TokenState, Ya360Error> {
    let (field, secret) = grant.field();
    tracing::debug!(grant_type = grant.grant_type(), %token_url, "exchanging token");

    let resp = http
        .post(token_url)
        .form(&[
            ("grant_type", grant.grant_type()),
            (field, secret),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ])
        .send()
        .await
        .map_err(|e| Ya360Error::Transport(Box::new(e)))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| Ya360Error::Transport(Box::new(e)))?;

    if status != reqwest::StatusCode::OK {
        return Err(Ya360Error::AuthExchange {
            status: status.as_u16(),
            description: error_description(&body),
        });
    }

    let value: serde_json::Value = if body.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&body)
            .map_err(|e| Ya360Error::Parse(format!("Token response is not JSON: {e}")))?
    };
    if value.is_null() {
        return Err(Ya360Error::AuthState(
            "token endpoint returned an empty body".to_string(),
        ));
    }

    let state = TokenState::from_json(&value)?;
    if state.access_token.is_empty() {
        return Err(Ya360Error::AuthState(
            "token endpoint returned an empty access_token".to_string(),
        ));
    }
    Ok(state)
}

/// Pull `error_description` out of an OAuth error body, falling back to the raw text.
fn error_description(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error_description")
                .and_then(|d| d.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
