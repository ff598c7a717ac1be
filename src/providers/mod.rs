/*!
 * Collaborators at the pipeline boundary.
 *
 * The pipeline only talks to these traits:
 * - `SubtitleService`: the translation service that offers generated and translated tracks
 * - `NativeTrackSource`: tracks the host platform provides itself
 * - `PayloadFetcher`: downloads one track's payload
 *
 * Implementations:
 * - `http`: reqwest-backed fetcher and service client
 * - `host`: fixed host-provided track list
 * - `mock`: in-memory collaborators for tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::subtitles::model::RawPayload;
use crate::tracks::builder::ServiceResponse;
use crate::tracks::descriptor::TrackDescriptor;

/// Video the subtitles are requested for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    /// Host identifier, e.g. "youtube"
    pub host: String,

    /// Page URL of the video
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    /// Duration in seconds, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Detected spoken language of the video
    #[serde(rename = "requestLang")]
    pub request_language: String,
}

impl VideoRequest {
    pub fn new(host: impl Into<String>, url: impl Into<String>, request_language: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            url: url.into(),
            video_id: None,
            duration: None,
            request_language: request_language.into(),
        }
    }
}

/// Translation service offering subtitle tracks for a video
#[async_trait]
pub trait SubtitleService: Send + Sync + Debug {
    /// Ask the service which tracks it has for `video`
    async fn request_subtitles(&self, video: &VideoRequest) -> Result<ServiceResponse, ProviderError>;
}

/// Host platform offering its own tracks
#[async_trait]
pub trait NativeTrackSource: Send + Sync + Debug {
    /// Tracks the platform provides for `video`
    async fn native_tracks(&self, video: &VideoRequest) -> Result<Vec<TrackDescriptor>, ProviderError>;
}

/// Downloads track payloads
#[async_trait]
pub trait PayloadFetcher: Send + Sync + Debug {
    /// Fetch the body of `track`, decoded according to its format
    async fn fetch(&self, track: &TrackDescriptor) -> Result<RawPayload, ProviderError>;
}

pub mod host;
pub mod http;
pub mod mock;
