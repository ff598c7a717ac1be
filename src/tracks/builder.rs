/*!
 * Flattening of translation-service responses into track candidates.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::tracks::descriptor::{SubtitleFormat, TrackDescriptor, TrackSource};

/// Response returned by the translation service for a subtitle request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    /// The service is still preparing tracks
    #[serde(default)]
    pub waiting: bool,

    /// Offered entries; each may bundle an original track and a translation
    #[serde(default)]
    pub subtitles: Vec<ServiceSubtitle>,
}

/// One entry of a service response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSubtitle {
    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_url: Option<String>,
}

/// Builds the flat candidate list from a service response and host tracks
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackCandidateBuilder;

impl TrackCandidateBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Flatten `response` into independent candidates, then append `extra_tracks` unmodified.
    ///
    /// At most one untranslated candidate is kept per language (first one wins).
    /// Every declared translation yields its own candidate, duplicates included.
    pub fn build(&self, response: &ServiceResponse, extra_tracks: Vec<TrackDescriptor>) -> Vec<TrackDescriptor> {
        let mut candidates: Vec<TrackDescriptor> = Vec::with_capacity(response.subtitles.len() * 2 + extra_tracks.len());

        for entry in &response.subtitles {
            if !entry.language.is_empty() {
                let original = TrackDescriptor::new(TrackSource::Service, entry.language.as_str(), entry.url.as_str());
                let duplicate = candidates.iter().any(|c| c.identity() == original.identity());
                if duplicate {
                    debug!("Dropping duplicate service track for language {}", entry.language);
                } else {
                    candidates.push(original);
                }
            }

            if let Some(translated_language) = &entry.translated_language {
                let url = entry.translated_url.clone().unwrap_or_default();
                if url.is_empty() {
                    debug!("Translated track {} -> {} has no url", entry.language, translated_language);
                }
                let mut translated =
                    TrackDescriptor::new(TrackSource::Service, translated_language.as_str(), url).with_format(SubtitleFormat::Json);
                if entry.language.is_empty() {
                    // No source language means the track is not a translation
                    if candidates.iter().any(|c| c.identity() == translated.identity()) {
                        debug!("Dropping duplicate service track for language {}", translated_language);
                        continue;
                    }
                } else {
                    translated = translated.translated_from(entry.language.as_str());
                }
                candidates.push(translated);
            }
        }

        candidates.extend(extra_tracks);
        candidates
    }
}
