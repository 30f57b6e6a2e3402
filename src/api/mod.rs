pub mod http;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use crate::model::{Investment, InvestmentId, InvestmentPayload};

pub use http::HttpApi;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1/investimentos/";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(
        "{method} {url} returned {status} {reason} - {}",
        .detail.as_deref().unwrap_or("no details")
    )]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        reason: String,
        detail: Option<String>,
    },

    #[error("failed to decode response of {method} {url}: {message}")]
    Decode {
        method: &'static str,
        url: String,
        message: String,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Short text for alerts: the status line plus the server detail, without
    /// the request URL the log line already carries.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                status,
                reason,
                detail,
                ..
            } => {
                let head = if reason.is_empty() {
                    status.to_string()
                } else {
                    format!("{status} {reason}")
                };
                format!("{head} - {}", detail.as_deref().unwrap_or("no details"))
            }
            ApiError::Transport { source, .. } => format!("server unreachable ({source})"),
            other => other.to_string(),
        }
    }
}

/// Collection and single-item URLs of the investments resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    collection: Url,
}

impl Endpoints {
    /// The collection URL is normalized to end in `/`, so
    /// `http://host/api/v1/investimentos` and `.../investimentos/` are the
    /// same resource.
    pub fn parse(base: &str) -> Result<Self, ApiError> {
        let trimmed = base.trim();
        let invalid = |message: String| ApiError::InvalidBaseUrl {
            url: trimmed.to_string(),
            message,
        };
        let mut url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("URL cannot hold a path".to_string()));
        }
        url.set_query(None);
        url.set_fragment(None);
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self { collection: url })
    }

    pub fn collection(&self) -> &Url {
        &self.collection
    }

    /// `{collection}/{id}`, with the id percent-encoded as a single segment.
    pub fn item(&self, id: &InvestmentId) -> Url {
        let mut url = self.collection.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }
}

/// The five calls the client makes against the investments resource.
#[async_trait]
pub trait InvestmentApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Investment>, ApiError>;

    async fn get(&self, id: &InvestmentId) -> Result<Investment, ApiError>;

    /// Returns the created record when the server echoes one back.
    async fn create(&self, payload: &InvestmentPayload) -> Result<Option<Investment>, ApiError>;

    async fn update(
        &self,
        id: &InvestmentId,
        payload: &InvestmentPayload,
    ) -> Result<Option<Investment>, ApiError>;

    async fn delete(&self, id: &InvestmentId) -> Result<(), ApiError>;
}
