/*!
 * Track candidates: descriptors, flattening of service responses, ranking.
 */

pub mod builder;
pub mod descriptor;
pub mod ranker;

pub use builder::{ServiceResponse, ServiceSubtitle, TrackCandidateBuilder};
pub use descriptor::{SubtitleFormat, TrackDescriptor, TrackSource};
pub use ranker::{TrackRanker, rank};
