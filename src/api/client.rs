//! HTTP transport for the drafting service.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::disposition::parse_content_disposition_filename;
use super::models::SelectedFile;
use crate::config::Settings;

/// Errors raised while talking to the service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Header names are lowercase.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header, normalizing its name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Check if the response is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Get the Content-Disposition header.
    pub fn content_disposition(&self) -> Option<&str> {
        self.header("content-disposition")
    }

    /// Get the filename from Content-Disposition header.
    pub fn content_disposition_filename(&self) -> Option<String> {
        self.content_disposition()
            .and_then(parse_content_disposition_filename)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// The requests the controllers need from the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `file` as multipart form data under `field`.
    async fn post_file(
        &self,
        path: &str,
        field: &str,
        file: &SelectedFile,
    ) -> Result<ApiResponse, ApiError>;

    /// POST a JSON body.
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, ApiError>;

    /// GET a resource.
    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError>;
}

/// `reqwest`-backed transport rooted at the service base URL.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a client from settings.
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let mut builder = Client::builder()
            .user_agent(&settings.user_agent)
            .gzip(true)
            .brotli(true);
        if let Some(secs) = settings.request_timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: Url::parse(&settings.server_url)?,
        })
    }

    /// Resolve an endpoint path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn execute(
        &self,
        method: &str,
        url: Url,
        request: RequestBuilder,
    ) -> Result<ApiResponse, ApiError> {
        debug!("{} {}", method, url);
        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.to_string(), v.to_string());
            }
        }

        let body = response.bytes().await?.to_vec();
        info!(
            method,
            %url,
            status = status.as_u16(),
            bytes = body.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request complete"
        );

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn post_file(
        &self,
        path: &str,
        field: &str,
        file: &SelectedFile,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(path)?;
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new().part(field.to_string(), part);

        let request = self.client.post(url.clone()).multipart(form);
        self.execute("POST", url, request).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(path)?;
        let request = self.client.post(url.clone()).json(body);
        self.execute("POST", url, request).await
    }

    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(path)?;
        let request = self.client.get(url.clone());
        self.execute("GET", url, request).await
    }
}
