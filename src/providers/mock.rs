/*!
 * Mock collaborators for testing.
 *
 * Each mock follows a `MockBehavior`:
 * - `MockBehavior::Working` - answers immediately with its canned data
 * - `MockBehavior::Failing` - always fails with a connection error
 * - `MockBehavior::Slow` - answers after a delay (for timeout testing)
 *
 * Counters record how many calls started and how many ran to completion, so
 * tests can observe work that was abandoned by a timeout but not cancelled.
 */

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{NativeTrackSource, PayloadFetcher, SubtitleService, VideoRequest};
use crate::subtitles::model::RawPayload;
use crate::tracks::builder::ServiceResponse;
use crate::tracks::descriptor::TrackDescriptor;

/// Behavior mode for a mock collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with an error
    Failing,
    /// Succeeds after `delay_ms`
    Slow { delay_ms: u64 },
}

impl MockBehavior {
    async fn play(self, what: &str) -> Result<(), ProviderError> {
        match self {
            Self::Working => Ok(()),
            Self::Failing => Err(ProviderError::ConnectionError(format!("mock {} unavailable", what))),
            Self::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(())
            }
        }
    }
}

/// Started/completed call counters shared with clones of a mock
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    started: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn start(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn complete(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Translation service answering with a fixed response
#[derive(Debug, Clone)]
pub struct MockSubtitleService {
    behavior: MockBehavior,
    response: ServiceResponse,
    calls: CallCounter,
}

impl MockSubtitleService {
    pub fn new(behavior: MockBehavior, response: ServiceResponse) -> Self {
        Self {
            behavior,
            response,
            calls: CallCounter::default(),
        }
    }

    pub fn working(response: ServiceResponse) -> Self {
        Self::new(MockBehavior::Working, response)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing, ServiceResponse::default())
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

#[async_trait]
impl SubtitleService for MockSubtitleService {
    async fn request_subtitles(&self, _video: &VideoRequest) -> Result<ServiceResponse, ProviderError> {
        self.calls.start();
        self.behavior.play("subtitle service").await?;
        self.calls.complete();
        Ok(self.response.clone())
    }
}

/// Host platform answering with a fixed track list
#[derive(Debug, Clone)]
pub struct MockNativeSource {
    behavior: MockBehavior,
    tracks: Vec<TrackDescriptor>,
    calls: CallCounter,
}

impl MockNativeSource {
    pub fn new(behavior: MockBehavior, tracks: Vec<TrackDescriptor>) -> Self {
        Self {
            behavior,
            tracks,
            calls: CallCounter::default(),
        }
    }

    pub fn working(tracks: Vec<TrackDescriptor>) -> Self {
        Self::new(MockBehavior::Working, tracks)
    }

    pub fn slow(delay_ms: u64, tracks: Vec<TrackDescriptor>) -> Self {
        Self::new(MockBehavior::Slow { delay_ms }, tracks)
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

#[async_trait]
impl NativeTrackSource for MockNativeSource {
    async fn native_tracks(&self, _video: &VideoRequest) -> Result<Vec<TrackDescriptor>, ProviderError> {
        self.calls.start();
        self.behavior.play("native source").await?;
        self.calls.complete();
        Ok(self.tracks.clone())
    }
}

/// Fetcher serving payloads registered by URL
#[derive(Debug, Default)]
pub struct MockFetcher {
    payloads: RwLock<HashMap<String, RawPayload>>,
    last_url: Mutex<Option<String>>,
    calls: CallCounter,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `payload` for `url`
    pub fn with_payload(self, url: impl Into<String>, payload: RawPayload) -> Self {
        self.payloads.write().insert(url.into(), payload);
        self
    }

    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().clone()
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

#[async_trait]
impl PayloadFetcher for MockFetcher {
    async fn fetch(&self, track: &TrackDescriptor) -> Result<RawPayload, ProviderError> {
        self.calls.start();
        *self.last_url.lock() = Some(track.url.clone());
        let payload = self.payloads.read().get(&track.url).cloned();
        match payload {
            Some(payload) => {
                self.calls.complete();
                Ok(payload)
            }
            None => Err(ProviderError::ApiError {
                status_code: 404,
                message: format!("no mock payload for {}", track.url),
            }),
        }
    }
}
