/*!
 * Subtitle pipeline: candidate discovery and track loading.
 *
 * `candidates` asks the translation service and the host platform for tracks
 * concurrently. Each round-trip runs on its own task and is raced against a
 * deadline; when the deadline wins, the task is detached rather than
 * cancelled and whatever it eventually returns is dropped unobserved.
 *
 * `load` fetches one track and runs it through normalization and alignment.
 */

use log::{debug, error, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::{PipelineError, ProviderError};
use crate::providers::host::StaticTrackSource;
use crate::providers::http::{HttpFetcher, HttpSubtitleService};
use crate::providers::{NativeTrackSource, PayloadFetcher, SubtitleService, VideoRequest};
use crate::subtitles::aligner::{AlignOptions, align};
use crate::subtitles::model::{RawPayload, SubtitleDocument};
use crate::subtitles::normalizer::{FormatNormalizer, SourceKind};
use crate::tracks::builder::{ServiceResponse, TrackCandidateBuilder};
use crate::tracks::descriptor::TrackDescriptor;
use crate::tracks::ranker::TrackRanker;

/// Run `future` on its own task and wait at most `deadline` for it.
///
/// On timeout the `JoinHandle` is dropped, which detaches the task: it keeps
/// running to completion but nobody observes the result.
pub async fn settle_within<T, F>(future: F, deadline: Duration) -> Result<T, ProviderError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, ProviderError>> + Send + 'static,
{
    let handle = tokio::spawn(future);
    tokio::select! {
        joined = handle => match joined {
            Ok(result) => result,
            Err(e) => Err(ProviderError::RequestFailed(format!("Request task failed: {}", e))),
        },
        _ = tokio::time::sleep(deadline) => Err(ProviderError::Timeout(deadline.as_millis() as u64)),
    }
}

/// Orchestrates candidate discovery and track loading
#[derive(Debug, Clone)]
pub struct SubtitlePipeline {
    service: Option<Arc<dyn SubtitleService>>,
    native: Arc<dyn NativeTrackSource>,
    fetcher: Arc<dyn PayloadFetcher>,
    normalizer: FormatNormalizer,
    builder: TrackCandidateBuilder,
    ui_language: String,
    candidate_timeout: Duration,
}

impl SubtitlePipeline {
    /// Pipeline with no service, no host tracks and a 5 second candidate deadline
    pub fn new(fetcher: Arc<dyn PayloadFetcher>) -> Self {
        Self {
            service: None,
            native: Arc::new(StaticTrackSource::empty()),
            fetcher,
            normalizer: FormatNormalizer::new(),
            builder: TrackCandidateBuilder::new(),
            ui_language: "en".to_string(),
            candidate_timeout: Duration::from_millis(5000),
        }
    }

    /// Pipeline wired to HTTP collaborators as configured
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let network = &config.network;
        let mut pipeline = Self::new(Arc::new(HttpFetcher::new(network.fetch_timeout_ms)))
            .with_ui_language(config.ui_language.as_str())
            .with_candidate_timeout(Duration::from_millis(network.candidate_timeout_ms));

        if !network.service_endpoint.is_empty() {
            let service = HttpSubtitleService::new(&network.service_endpoint, network.candidate_timeout_ms)?;
            pipeline = pipeline.with_service(Arc::new(service));
        }
        Ok(pipeline)
    }

    pub fn with_service(mut self, service: Arc<dyn SubtitleService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_native_source(mut self, native: Arc<dyn NativeTrackSource>) -> Self {
        self.native = native;
        self
    }

    pub fn with_normalizer(mut self, normalizer: FormatNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_ui_language(mut self, ui_language: impl Into<String>) -> Self {
        self.ui_language = ui_language.into();
        self
    }

    pub fn with_candidate_timeout(mut self, timeout: Duration) -> Self {
        self.candidate_timeout = timeout;
        self
    }

    /// Ranked candidate tracks for `video`.
    ///
    /// A slow or failing collaborator only empties its own share of the list;
    /// `NoCandidates` is returned when nothing at all is left.
    pub async fn candidates(&self, video: &VideoRequest) -> Result<Vec<TrackDescriptor>, PipelineError> {
        let service_request = {
            let service = self.service.clone();
            let video = video.clone();
            async move {
                match service {
                    Some(service) => service.request_subtitles(&video).await,
                    None => Ok(ServiceResponse::default()),
                }
            }
        };
        let native_request = {
            let native = Arc::clone(&self.native);
            let video = video.clone();
            async move { native.native_tracks(&video).await }
        };

        let (service_result, native_result) = tokio::join!(
            settle_within(service_request, self.candidate_timeout),
            settle_within(native_request, self.candidate_timeout),
        );

        let response = match service_result {
            Ok(response) => {
                if response.waiting {
                    error!("Failed to get service subtitles: the service is still preparing them");
                }
                debug!("Service offered {} subtitle entries", response.subtitles.len());
                response
            }
            Err(ProviderError::Timeout(ms)) => {
                warn!("Failed to get service subtitles. Reason: timeout after {} ms", ms);
                ServiceResponse::default()
            }
            Err(e) => {
                error!("Failed to get service subtitles: {}", e);
                ServiceResponse::default()
            }
        };

        let native_tracks = match native_result {
            Ok(tracks) => tracks,
            Err(ProviderError::Timeout(ms)) => {
                warn!("Failed to get platform subtitles. Reason: timeout after {} ms", ms);
                Vec::new()
            }
            Err(e) => {
                error!("Failed to get platform subtitles: {}", e);
                Vec::new()
            }
        };

        let candidates = self.builder.build(&response, native_tracks);
        if candidates.is_empty() {
            return Err(PipelineError::NoCandidates);
        }

        let ranked = TrackRanker::new(video.request_language.as_str(), self.ui_language.as_str()).rank(candidates);
        info!("Found {} subtitle candidates for {}", ranked.len(), video.url);
        Ok(ranked)
    }

    /// Fetch, normalize and align `track`. Failures give an empty document.
    pub async fn load(&self, track: &TrackDescriptor) -> SubtitleDocument {
        match self.fetcher.fetch(track).await {
            Ok(payload) => self.process(payload, track),
            Err(e) => {
                error!("Failed to fetch subtitles: {}", e);
                align(SubtitleDocument::empty(), AlignOptions::for_track(track))
            }
        }
    }

    /// Normalize and align an already fetched payload
    pub fn process(&self, payload: RawPayload, track: &TrackDescriptor) -> SubtitleDocument {
        let document = self.normalizer.normalize(payload, SourceKind::for_track(track));
        let document = align(document, AlignOptions::for_track(track));
        debug!("Loaded {} lines for {}", document.lines.len(), track);
        document
    }
}
