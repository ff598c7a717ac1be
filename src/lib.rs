/*!
 * # subtrack - subtitle normalization and track selection
 *
 * A Rust library that turns heterogeneous subtitle payloads into one timed,
 * token-aligned document model and picks the best subtitle track for a video.
 *
 * ## Features
 *
 * - Normalize subtitle payloads from several sources:
 *   - YouTube timed-text events
 *   - translation service JSON documents
 *   - VK JSON documents (markup stripped)
 *   - WebVTT and SRT text tracks
 * - Align every line into contiguous timed tokens
 * - Gather candidates from a translation service and the host platform
 * - Rank candidates by source, language and generation method
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitles`: Document model and per-document processing:
 *   - `subtitles::normalizer`: Payload shape detection and conversion
 *   - `subtitles::aligner`: Token alignment
 *   - `subtitles::text_track`: VTT/SRT cue parsing
 * - `tracks`: Candidate descriptors, flattening and ranking
 * - `pipeline`: Candidate discovery and track loading
 * - `providers`: Translation service, host platform and payload fetcher clients
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

pub mod app_config;
pub mod errors;
pub mod language_utils;
pub mod pipeline;
pub mod providers;
pub mod subtitles;
pub mod tracks;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, PipelineError, ProviderError, SubtitleError};
pub use pipeline::SubtitlePipeline;
pub use providers::VideoRequest;
pub use subtitles::{FormatNormalizer, SubtitleDocument, Token, align};
pub use tracks::{TrackCandidateBuilder, TrackDescriptor, TrackRanker, TrackSource};
