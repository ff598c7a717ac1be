use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{PayloadFetcher, SubtitleService, VideoRequest};
use crate::subtitles::model::RawPayload;
use crate::tracks::builder::ServiceResponse;
use crate::tracks::descriptor::TrackDescriptor;

/// Maximum number of body characters kept in an error message
const ERROR_BODY_LIMIT: usize = 200;

fn build_client(timeout_ms: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .unwrap_or_default()
}

fn send_error(e: reqwest::Error, timeout_ms: u64) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout_ms)
    } else if e.is_connect() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

/// Turn a non-2xx response into an `ApiError`
async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    error!("Request failed with status {}: {}", status, message);
    Err(ProviderError::ApiError {
        status_code: status.as_u16(),
        message,
    })
}

/// Fetches track payloads over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout_ms: u64,
}

impl HttpFetcher {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            client: build_client(timeout_ms),
            timeout_ms,
        }
    }
}

#[async_trait]
impl PayloadFetcher for HttpFetcher {
    async fn fetch(&self, track: &TrackDescriptor) -> Result<RawPayload, ProviderError> {
        let url = Url::parse(&track.url)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid track url '{}': {}", track.url, e)))?;
        debug!("Fetching {} subtitles from {}", track.language, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_ms))?;
        let response = check_status(response).await?;

        if track.format.is_text_track() {
            let text = response
                .text()
                .await
                .map_err(|e| ProviderError::ParseError(format!("Failed to read subtitle body: {}", e)))?;
            Ok(RawPayload::Text(text))
        } else {
            let value: Value = response
                .json()
                .await
                .map_err(|e| ProviderError::ParseError(format!("Failed to decode subtitle JSON: {}", e)))?;
            Ok(RawPayload::Json(value))
        }
    }
}

/// Client for a translation service exposing a JSON subtitles endpoint
#[derive(Debug, Clone)]
pub struct HttpSubtitleService {
    endpoint: Url,
    client: Client,
    timeout_ms: u64,
}

impl HttpSubtitleService {
    pub fn new(endpoint: &str, timeout_ms: u64) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid service endpoint '{}': {}", endpoint, e)))?;
        Ok(Self {
            endpoint,
            client: build_client(timeout_ms),
            timeout_ms,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SubtitleService for HttpSubtitleService {
    async fn request_subtitles(&self, video: &VideoRequest) -> Result<ServiceResponse, ProviderError> {
        debug!("Requesting subtitles for {} from {}", video.url, self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(video)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_ms))?;
        let response = check_status(response).await?;

        response
            .json::<ServiceResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to decode service response: {}", e)))
    }
}
