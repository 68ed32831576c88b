//! HTTP client for the Supabase Storage REST API.
//!
//! Every request is authenticated with the service-role key, sent both as a
//! bearer token and as the `apikey` header. Provides generic GET/POST helpers
//! and the storage domain methods (list buckets, list objects, fetch, upload).

pub mod api;
pub mod models;

use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

pub use models::{
    Bucket, CreateBucketRequest, ListObjectsRequest, ObjectEntry, LIST_PAGE_LIMIT,
};

/// Path prefix of the storage API under the project URL.
pub const STORAGE_API_PREFIX: &str = "/storage/v1";

/// Errors returned by [`ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Failed to send request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status of the response, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP client for the storage API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("service_key", &"<redacted>")
            .finish()
    }
}

impl ApiClient {
    /// Build a client for the project at `base_url`.
    ///
    /// `timeout` of `None` leaves reqwest's defaults in place (no overall timeout).
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the storage API root (e.g. "/bucket").
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, STORAGE_API_PREFIX, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("apikey", self.service_key.as_str())
    }

    /// Send an authenticated request and turn non-2xx answers into [`ApiError::Status`].
    async fn send(&self, url: &str, request: RequestBuilder) -> ApiResult<Response> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        tracing::debug!(url = %url, status = %status, "Storage API response");
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> ApiResult<T> {
        response.json().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.build_url(path);
        let response = self.send(&url, self.client.get(&url)).await?;
        Self::decode(&url, response).await
    }

    /// GET request returning the raw response body.
    pub async fn get_bytes(&self, path: &str) -> ApiResult<Bytes> {
        let url = self.build_url(path);
        let response = self.send(&url, self.client.get(&url)).await?;
        response.bytes().await.map_err(|source| ApiError::Decode { url, source })
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        let response = self.send(&url, self.client.post(&url).json(body)).await?;
        Self::decode(&url, response).await
    }

    /// POST a raw body with an explicit content type and deserialize response.
    pub async fn post_bytes<T: DeserializeOwned>(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
        headers: &[(&str, &str)],
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", content_type)
            .body(data);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = self.send(&url, request).await?;
        Self::decode(&url, response).await
    }
}
