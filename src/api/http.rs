use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiError, Endpoints, InvestmentApi};
use crate::model::{ErrorBody, Investment, InvestmentId, InvestmentPayload};

/// `InvestmentApi` over HTTP with a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct HttpApi {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpApi {
    /// `timeout` of `None` awaits every request to completion.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let endpoints = Endpoints::parse(base_url)?;
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("investments/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;
        Ok(Self { http, endpoints })
    }

    pub fn with_client(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&InvestmentPayload>,
    ) -> Result<Response, ApiError> {
        let label = method_label(&method);
        debug!(method = label, url = %url, "sending request");

        let mut request = self.http.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|source| ApiError::Transport {
            method: label,
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        debug!(method = label, url = %url, status = status.as_u16(), "response received");
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message());
        Err(ApiError::Status {
            method: label,
            url: url.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            detail,
        })
    }

    async fn read_json<T: DeserializeOwned>(
        method: &'static str,
        url: &Url,
        response: Response,
    ) -> Result<T, ApiError> {
        let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
            method,
            url: url.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            method,
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Write responses are informational only: an empty or unexpected body
    /// does not turn a successful write into a failure.
    async fn read_echo(method: &'static str, url: &Url, response: Response) -> Option<Investment> {
        let bytes = response.bytes().await.ok()?;
        match serde_json::from_slice::<Investment>(&bytes) {
            Ok(inv) => Some(inv),
            Err(e) => {
                debug!(method, url = %url, error = %e, "write response carried no record");
                None
            }
        }
    }
}

fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        _ => "HTTP",
    }
}

#[async_trait]
impl InvestmentApi for HttpApi {
    async fn list(&self) -> Result<Vec<Investment>, ApiError> {
        let url = self.endpoints.collection().clone();
        let response = self.send(Method::GET, url.clone(), None).await?;
        Self::read_json("GET", &url, response).await
    }

    async fn get(&self, id: &InvestmentId) -> Result<Investment, ApiError> {
        let url = self.endpoints.item(id);
        let response = self.send(Method::GET, url.clone(), None).await?;
        Self::read_json("GET", &url, response).await
    }

    async fn create(&self, payload: &InvestmentPayload) -> Result<Option<Investment>, ApiError> {
        let url = self.endpoints.collection().clone();
        let response = self.send(Method::POST, url.clone(), Some(payload)).await?;
        Ok(Self::read_echo("POST", &url, response).await)
    }

    async fn update(
        &self,
        id: &InvestmentId,
        payload: &InvestmentPayload,
    ) -> Result<Option<Investment>, ApiError> {
        let url = self.endpoints.item(id);
        let response = self.send(Method::PUT, url.clone(), Some(payload)).await?;
        Ok(Self::read_echo("PUT", &url, response).await)
    }

    async fn delete(&self, id: &InvestmentId) -> Result<(), ApiError> {
        let url = self.endpoints.item(id);
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }
}
