use serde_json::Value;

use crate::config::{ConfigStore, Endpoints};
use crate::error::Ya360Error;
use crate::fetch::{PageSet, PaginatedFetcher};
use crate::http::ApiClient;
use crate::oauth::{AuthStatus, ClientCredentials, TokenManager, TokenState};
use crate::params::RequestParams;

/// Directory API client: a token manager plus the data-plane HTTP client.
#[derive(Debug)]
pub struct Ya360Client {
    api: ApiClient,
    auth: TokenManager,
}

impl Ya360Client {
    /// Client against the public Yandex endpoints.
    pub fn new(auth: TokenManager) -> Result<Self, Ya360Error> {
        Ok(Self {
            api: ApiClient::new(&Endpoints::default().api_base_url)?,
            auth,
        })
    }

    /// Client against custom endpoints; the token manager is re-pointed too.
    pub fn with_endpoints(auth: TokenManager, endpoints: &Endpoints) -> Result<Self, Ya360Error> {
        Ok(Self {
            api: ApiClient::new(&endpoints.api_base_url)?,
            auth: auth.with_endpoints(endpoints),
        })
    }

    /// Load credentials and any persisted token from `store`, then build a client.
    pub fn from_store(
        store: Box<dyn ConfigStore>,
        credentials: Option<ClientCredentials>,
        endpoints: &Endpoints,
    ) -> Result<Self, Ya360Error> {
        let auth = TokenManager::from_store(store, credentials)?;
        Self::with_endpoints(auth, endpoints)
    }

    /// Obtain or refresh the access token.
    pub async fn start(&mut self) -> Result<&TokenState, Ya360Error> {
        self.auth.obtain().await
    }

    pub fn auth(&self) -> &TokenManager {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut TokenManager {
        &mut self.auth
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.status() == AuthStatus::Authenticated
    }

    fn bearer(&self) -> Result<String, Ya360Error> {
        self.auth.bearer().ok_or(Ya360Error::NotAuthenticated)
    }

    /// Paginated GET; see [`PaginatedFetcher::fetch`].
    pub async fn fetch(
        &self,
        url: &str,
        params: Option<&RequestParams>,
    ) -> Result<PageSet, Ya360Error> {
        let bearer = self.bearer()?;
        PaginatedFetcher::new(&self.api, &bearer)
            .fetch(url, params)
            .await
    }

    pub async fn get(&self, url: &str, params: Option<&RequestParams>) -> Result<Value, Ya360Error> {
        let bearer = self.bearer()?;
        self.api.get(url, &bearer, params).await
    }

    pub async fn post(&self, url: &str, body: &Value) -> Result<Value, Ya360Error> {
        let bearer = self.bearer()?;
        self.api.post(url, &bearer, body).await
    }

    pub async fn patch(&self, url: &str, body: &Value) -> Result<Value, Ya360Error> {
        let bearer = self.bearer()?;
        self.api.patch(url, &bearer, body).await
    }

    pub async fn put(&self, url: &str, body: &Value) -> Result<Value, Ya360Error> {
        let bearer = self.bearer()?;
        self.api.put(url, &bearer, body).await
    }

    pub async fn delete(&self, url: &str) -> Result<Value, Ya360Error> {
        let bearer = self.bearer()?;
        self.api.delete(url, &bearer).await
    }
}
