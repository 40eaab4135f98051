use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::error::Ya360Error;
use crate::params::RequestParams;

/// Data-plane HTTP client bound to the directory API base URL.
///
/// Every request carries the bearer passed by the caller; a non-200 answer
/// becomes `Ya360Error::ApiRequest`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, Ya360Error> {
        let base_url = reqwest::Url::parse(base_url).map_err(|e| {
            Ya360Error::Parse(format!("Invalid API base URL '{base_url}': {e}"))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Ya360Error::Transport(Box::new(e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Resolve an absolute or base-relative URL.
    pub fn resolve(&self, url: &str) -> Result<reqwest::Url, Ya360Error> {
        self.base_url
            .join(url)
            .map_err(|e| Ya360Error::Parse(format!("Invalid URL '{url}': {e}")))
    }

    pub async fn get(
        &self,
        url: &str,
        bearer: &str,
        params: Option<&RequestParams>,
    ) -> Result<Value, Ya360Error> {
        self.send(Method::GET, url, bearer, params, None).await
    }

    pub async fn post(&self, url: &str, bearer: &str, body: &Value) -> Result<Value, Ya360Error> {
        self.send(Method::POST, url, bearer, None, Some(body)).await
    }

    pub async fn patch(&self, url: &str, bearer: &str, body: &Value) -> Result<Value, Ya360Error> {
        self.send(Method::PATCH, url, bearer, None, Some(body)).await
    }

    pub async fn put(&self, url: &str, bearer: &str, body: &Value) -> Result<Value, Ya360Error> {
        self.send(Method::PUT, url, bearer, None, Some(body)).await
    }

    pub async fn delete(&self, url: &str, bearer: &str) -> Result<Value, Ya360Error> {
        self.send(Method::DELETE, url, bearer, None, None).await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        bearer: &str,
        params: Option<&RequestParams>,
        body: Option<&Value>,
    ) -> Result<Value, Ya360Error> {
        let target = self.resolve(url)?;
        // Bodies may carry passwords; only query parameters are reported.
        let rendered_params = params.map(ToString::to_string).unwrap_or_default();
        let request_error = |status: Option<StatusCode>, detail: String| Ya360Error::ApiRequest {
            method: method.to_string(),
            url: target.to_string(),
            params: rendered_params.clone(),
            status: status.map(|s| s.as_u16()),
            detail,
        };

        let mut req = self
            .client
            .request(method.clone(), target.clone())
            .header(reqwest::header::AUTHORIZATION, bearer);
        if let Some(params) = params {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        tracing::debug!(%method, url = %target, params = %rendered_params, "sending API request");
        let response = req
            .send()
            .await
            .map_err(|e| request_error(None, format!("request failed: {e}")))?;

        let status = response.status();
        tracing::debug!(%method, url = %target, %status, "received API response");
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(request_error(Some(status), format!("HTTP {status}: {text}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| request_error(Some(status), format!("cannot read body: {e}")))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| request_error(Some(status), format!("invalid JSON body: {e}")))
    }
}
