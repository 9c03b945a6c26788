//! REST client for the landlord API.

use crate::config::TuiConfig;
use async_trait::async_trait;
use landlord_core::{
    CollectionError, Cursor, Landlord, MessageList, Page, PageRequest, PageSource, RecordId,
};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const LANDLORDS_PATH: &str = "/landlords-properties/";
const MESSAGES_PATH: &str = "/messages/";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl From<ApiClientError> for CollectionError {
    fn from(err: ApiClientError) -> Self {
        match err {
            ApiClientError::InvalidResponse(message) => CollectionError::Network(message),
            other => CollectionError::Network(other.to_string()),
        }
    }
}

/// Error body shape used by the upstream API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    /// Root of the landlord API, `{api_base_url}/landlord`.
    base_url: String,
    /// `base_url` with a trailing slash, the base cursors are resolved
    /// against.
    cursor_base: Url,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        Self::with_base_url(
            &config.api_base_url,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn with_base_url(api_base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let api_base_url = api_base_url.trim().trim_end_matches('/');
        if api_base_url.is_empty() {
            return Err(ApiClientError::Config("api_base_url is empty".to_string()));
        }
        let base_url = format!("{}/landlord", api_base_url);
        let cursor_base = Url::parse(&format!("{}/", base_url))
            .map_err(|err| ApiClientError::Config(format!("api_base_url: {}", err)))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            cursor_base,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of landlords. `page_number` is one-based.
    pub async fn list_landlords(&self, page_number: usize) -> Result<Page<Landlord>, ApiClientError> {
        self.get_json(LANDLORDS_PATH, Some(&[("page", page_number)]))
            .await
    }

    /// Resolves a cursor the way a browser resolves a link: absolute URLs
    /// as given, `/`-rooted paths against the host, anything else against
    /// the landlord root.
    pub fn cursor_url(&self, cursor: &Cursor) -> Result<Url, ApiClientError> {
        self.cursor_base.join(cursor.as_str()).map_err(|err| {
            ApiClientError::InvalidResponse(format!("Invalid cursor '{}': {}", cursor, err))
        })
    }

    /// Fetches the page a `next`/`previous` cursor points at.
    pub async fn follow_cursor(&self, cursor: &Cursor) -> Result<Page<Landlord>, ApiClientError> {
        let url = self.cursor_url(cursor)?;
        debug!(%url, "following cursor");
        let response = self.client.get(url).send().await?;
        self.parse_response(response).await
    }

    pub async fn list_messages(&self, landlord_id: RecordId) -> Result<MessageList, ApiClientError> {
        self.get_json(MESSAGES_PATH, Some(&[("landlord_id", landlord_id)]))
            .await
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let mut request = self.client.get(url);
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = request.send().await?;
        self.parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            return Ok(serde_json::from_str::<T>(&text)?);
        }
        if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
            return Err(ApiClientError::InvalidResponse(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.detail
            )));
        }
        Err(ApiClientError::InvalidResponse(format!(
            "HTTP {}: {}",
            status.as_u16(),
            text
        )))
    }
}

#[async_trait]
impl PageSource for RestClient {
    type Record = Landlord;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Landlord>, CollectionError> {
        let page = match request {
            PageRequest::Index(index) => self.list_landlords(index + 1).await?,
            PageRequest::Cursor(cursor) => self.follow_cursor(cursor).await?,
        };
        Ok(page)
    }
}
