use chrono::{DateTime, Utc};

use crate::config::{ConfigStore, Endpoints};
use crate::error::Ya360Error;

use super::credentials::ClientCredentials;
use super::token::{authorize_url, exchange, Grant, TokenState, TOKEN_SECTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Unauthenticated,
    Authenticated,
}

/// Sole owner of the client's OAuth token.
///
/// `obtain()` performs an authorization-code exchange on a cold start and a
/// refresh-token exchange once a token is held. A failed exchange leaves the
/// held token untouched.
#[derive(Debug)]
pub struct TokenManager {
    http: reqwest::Client,
    authorize_endpoint: String,
    token_url: String,
    credentials: ClientCredentials,
    state: Option<TokenState>,
    obtained_at: Option<DateTime<Utc>>,
    store: Box<dyn ConfigStore>,
}

impl TokenManager {
    /// Create a manager with no prior token.
    pub fn new(credentials: ClientCredentials, store: Box<dyn ConfigStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            authorize_endpoint: Endpoints::default().authorize_url,
            token_url: Endpoints::default().token_url,
            credentials,
            state: None,
            obtained_at: None,
            store,
        }
    }

    /// Build a manager from whatever the store holds.
    ///
    /// Explicitly provided credentials win and are written back to the store;
    /// otherwise the stored credentials are used. A stored token is restored
    /// only if it was issued to the same client id, and is deleted otherwise.
    pub fn from_store(
        mut store: Box<dyn ConfigStore>,
        provided: Option<ClientCredentials>,
    ) -> Result<Self, Ya360Error> {
        let stored = ClientCredentials::load(store.as_ref())?;
        let stored_client_id = stored.as_ref().map(|c| c.client_id.clone());

        let mut dirty = false;
        let credentials = match (provided, stored) {
            (Some(provided), _) => {
                provided.save(store.as_mut());
                dirty = true;
                provided
            }
            (None, Some(stored)) => stored,
            (None, None) => {
                return Err(Ya360Error::ConfigError {
                    path: "<config>".into(),
                    detail: "No client credentials provided or stored".to_string(),
                })
            }
        };

        // A foreign token is removed so a later run cannot pair it with these credentials.
        let state = match TokenState::load(store.as_ref())? {
            Some(token) if stored_client_id.as_deref() == Some(credentials.client_id.as_str()) => {
                Some(token)
            }
            Some(_) => {
                tracing::info!("discarding stored token issued to a different client id");
                store.remove_section(TOKEN_SECTION);
                dirty = true;
                None
            }
            None => None,
        };
        if dirty {
            store.flush()?;
        }

        let mut manager = Self::new(credentials, store);
        manager.state = state;
        Ok(manager)
    }

    /// Point the manager at different OAuth endpoints.
    pub fn with_endpoints(mut self, endpoints: &Endpoints) -> Self {
        self.authorize_endpoint = endpoints.authorize_url.clone();
        self.token_url = endpoints.token_url.clone();
        self
    }

    /// Seed the manager with a previously persisted token.
    pub fn with_token(mut self, token: TokenState) -> Self {
        self.state = Some(token);
        self
    }

    pub fn status(&self) -> AuthStatus {
        match self.state {
            Some(_) => AuthStatus::Authenticated,
            None => AuthStatus::Unauthenticated,
        }
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    pub fn token(&self) -> Option<&TokenState> {
        self.state.as_ref()
    }

    /// `OAuth <access_token>`, once a token is held.
    pub fn bearer(&self) -> Option<String> {
        self.state.as_ref().map(TokenState::bearer)
    }

    pub fn store(&self) -> &dyn ConfigStore {
        self.store.as_ref()
    }

    /// Consent page for this client's id.
    pub fn authorize_url(&self) -> String {
        authorize_url(&self.authorize_endpoint, &self.credentials.client_id)
    }

    /// Expiry computed from `expires_in` and the time of the last exchange
    /// in this process. `None` for restored tokens until they are refreshed.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.state.as_ref()?.expires_in_secs()?;
        Some(self.obtained_at? + chrono::Duration::seconds(secs))
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires) => Utc::now() >= expires,
            None => false,
        }
    }

    /// Exchange the verification code (cold start) or the held refresh token
    /// for a new token, persist it, and return it.
    pub async fn obtain(&mut self) -> Result<&TokenState, Ya360Error> {
        let grant = match &self.state {
            None => {
                let code = self.credentials.verification_code().ok_or_else(|| {
                    Ya360Error::AuthConfig {
                        client_id: self.credentials.client_id.clone(),
                        authorize_url: self.authorize_url(),
                    }
                })?;
                Grant::AuthorizationCode(code)
            }
            Some(state) => Grant::RefreshToken(&state.refresh_token),
        };

        let new_state = exchange(&self.http, &self.token_url, &self.credentials, grant).await?;
        tracing::info!(
            grant_type = grant.grant_type(),
            token_type = %new_state.token_type,
            "obtained access token"
        );

        new_state.save(self.store.as_mut());
        let obtained_at = Utc::now();
        let state = self.state.insert(new_state);
        self.obtained_at = Some(obtained_at);
        self.store.flush()?;
        tracing::debug!("token persisted");

        Ok(state)
    }
}
