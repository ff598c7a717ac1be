/*!
 * Track candidate descriptors.
 *
 * A `TrackDescriptor` names one selectable subtitle stream for a video. It is
 * built once by the candidate builder (or handed over by the host platform)
 * and never mutated afterwards.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a subtitle track comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    /// Translation service: generated or translated tracks with pre-timed words
    #[serde(rename = "yandex", alias = "service")]
    Service,
    /// YouTube timedtext, delivered as an event/segment payload
    #[serde(rename = "youtube")]
    YouTube,
    /// VK JSON, text carries inline markup
    Vk,
    /// Any other host-provided track
    #[default]
    Native,
}

impl TrackSource {
    /// Whether the track was produced by the translation service
    pub fn is_service(self) -> bool {
        matches!(self, Self::Service)
    }

    /// Whether token emission is monotonic for this source when it carries word timing
    pub fn emits_timed_words(self, is_auto_generated: bool) -> bool {
        match self {
            Self::Service => true,
            Self::YouTube => is_auto_generated,
            Self::Vk | Self::Native => false,
        }
    }

    // @returns: Lowercase wire identifier
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Service => "yandex",
            Self::YouTube => "youtube",
            Self::Vk => "vk",
            Self::Native => "native",
        }
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrackSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "yandex" | "service" => Ok(Self::Service),
            "youtube" => Ok(Self::YouTube),
            "vk" => Ok(Self::Vk),
            "native" => Ok(Self::Native),
            _ => Err(anyhow::anyhow!("Invalid track source: {}", s)),
        }
    }
}

/// Body format of a track payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// JSON, either event-based or pass-through
    #[default]
    Json,
    /// WebVTT text
    Vtt,
    /// SubRip text
    Srt,
}

impl SubtitleFormat {
    /// Whether the body must go through the text-track converter
    pub fn is_text_track(self) -> bool {
        matches!(self, Self::Vtt | Self::Srt)
    }
}

impl std::str::FromStr for SubtitleFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "json" | "json3" => Ok(Self::Json),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "srt" => Ok(Self::Srt),
            _ => Err(anyhow::anyhow!("Invalid subtitle format: {}", s)),
        }
    }
}

/// One candidate subtitle track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDescriptor {
    /// Track origin
    pub source: TrackSource,

    /// Language of the subtitle text
    pub language: String,

    /// Where the payload can be fetched
    #[serde(default)]
    pub url: String,

    /// Produced by speech recognition rather than authored
    #[serde(default)]
    pub is_auto_generated: bool,

    /// Language the track was machine-translated from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_from_language: Option<String>,

    /// Payload body format
    #[serde(default)]
    pub format: SubtitleFormat,
}

impl TrackDescriptor {
    /// Create an untranslated descriptor with JSON format
    pub fn new(source: TrackSource, language: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source,
            language: language.into(),
            url: url.into(),
            is_auto_generated: false,
            translated_from_language: None,
            format: SubtitleFormat::Json,
        }
    }

    /// Mark the descriptor as a translation from `language`
    pub fn translated_from(mut self, language: impl Into<String>) -> Self {
        self.translated_from_language = Some(language.into());
        self
    }

    /// Set the auto-generated flag
    pub fn auto_generated(mut self, value: bool) -> Self {
        self.is_auto_generated = value;
        self
    }

    /// Set the payload format
    pub fn with_format(mut self, format: SubtitleFormat) -> Self {
        self.format = format;
        self
    }

    pub fn is_translated(&self) -> bool {
        self.translated_from_language.is_some()
    }

    /// Identity used for deduplication: source, language and whether it is a translation
    pub fn identity(&self) -> (TrackSource, &str, bool) {
        (self.source, self.language.as_str(), self.is_translated())
    }
}

impl fmt::Display for TrackDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.language, self.source)?;
        if let Some(from) = &self.translated_from_language {
            write!(f, " (translated from {})", from)?;
        }
        if self.is_auto_generated {
            write!(f, " (auto-generated)")?;
        }
        Ok(())
    }
}
