/*!
 * Canonical subtitle document model and the raw upstream shapes it is built from.
 *
 * A `SubtitleDocument` leaves the normalizer with plain lines, gets its tokens
 * from the aligner, and is then handed to rendering as a read-only snapshot.
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Half-open character interval `[start, end)` in the alignment stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlignRange {
    pub start: usize,
    pub end: usize,
}

impl AlignRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// A word or whitespace separator with its own timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub align_range: AlignRange,
}

impl Token {
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }
}

/// Upstream word timing carried into the aligner, before alignment ranges exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    #[serde(default)]
    pub text: String,

    /// Absent when upstream did not time this word explicitly
    #[serde(default)]
    pub start_ms: Option<u64>,

    #[serde(default)]
    pub duration_ms: u64,
}

/// One caption cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub text: String,
    pub start_ms: u64,
    pub duration_ms: u64,

    /// Aligned tokens, present once the aligner has run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Token>>,

    /// Word timing supplied by upstream
    #[serde(skip)]
    pub words: Option<Vec<Word>>,
}

impl Line {
    pub fn new(text: impl Into<String>, start_ms: u64, duration_ms: u64) -> Self {
        Self {
            text: text.into(),
            start_ms,
            duration_ms,
            tokens: None,
            words: None,
        }
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = Some(words);
        self
    }

    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }

    /// Whether upstream supplied at least one timed word
    pub fn has_words(&self) -> bool {
        self.words.as_ref().is_some_and(|w| !w.is_empty())
    }
}

/// Normalized subtitle document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SubtitleDocument {
    #[serde(rename = "containsTokens")]
    contains_tokens: bool,

    #[serde(rename = "subtitles")]
    pub lines: Vec<Line>,
}

impl SubtitleDocument {
    /// Document with no lines and no tokens
    pub fn empty() -> Self {
        Self::default()
    }

    /// Untokenized document built from `lines`
    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self {
            contains_tokens: false,
            lines,
        }
    }

    /// True once every line has been tokenized
    pub fn contains_tokens(&self) -> bool {
        self.contains_tokens
    }

    /// Set by the aligner; there is no way back
    pub(crate) fn mark_tokenized(&mut self) {
        self.contains_tokens = true;
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Last line whose span strictly contains `time_ms`, which is what playback shows
    pub fn line_at(&self, time_ms: u64) -> Option<&Line> {
        self.lines
            .iter()
            .rev()
            .find(|line| line.start_ms < time_ms && time_ms < line.end_ms())
    }
}

/// One line of the pass-through shape
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLine {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub start_ms: u64,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub tokens: Option<Vec<Word>>,
}

/// Pass-through payload: `{ containsTokens, subtitles: [...] }`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    #[serde(default)]
    pub contains_tokens: bool,
    #[serde(default)]
    pub subtitles: Vec<RawLine>,
}

impl RawDocument {
    /// Convert into canonical lines, keeping upstream word timing for the aligner
    pub fn into_document(self) -> SubtitleDocument {
        let lines = self
            .subtitles
            .into_iter()
            .map(|raw| Line {
                text: raw.text,
                start_ms: raw.start_ms,
                duration_ms: raw.duration_ms,
                tokens: None,
                words: raw.tokens,
            })
            .collect();
        SubtitleDocument::from_lines(lines)
    }
}

/// One segment of a YouTube timedtext event
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSegment {
    #[serde(default)]
    pub utf8: String,
    #[serde(default)]
    pub t_offset_ms: Option<u64>,
}

/// One YouTube timedtext event
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeEvent {
    #[serde(default)]
    pub t_start_ms: u64,
    #[serde(default)]
    pub d_duration_ms: u64,
    #[serde(default)]
    pub segs: Option<Vec<YouTubeSegment>>,
}

/// Fetched payload before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Decoded JSON body
    Json(Value),
    /// Plain text body (VTT/SRT)
    Text(String),
}

impl RawPayload {
    pub fn empty() -> Self {
        Self::Json(Value::Null)
    }
}
