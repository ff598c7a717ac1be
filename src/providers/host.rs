use async_trait::async_trait;
use log::debug;

use crate::errors::ProviderError;
use crate::providers::{NativeTrackSource, VideoRequest};
use crate::tracks::descriptor::TrackDescriptor;

/// Track list handed over by the host page together with the video data
#[derive(Debug, Clone, Default)]
pub struct StaticTrackSource {
    tracks: Vec<TrackDescriptor>,
}

impl StaticTrackSource {
    pub fn new(tracks: Vec<TrackDescriptor>) -> Self {
        Self { tracks }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NativeTrackSource for StaticTrackSource {
    async fn native_tracks(&self, video: &VideoRequest) -> Result<Vec<TrackDescriptor>, ProviderError> {
        debug!("{} host tracks for {}", self.tracks.len(), video.url);
        Ok(self.tracks.clone())
    }
}
