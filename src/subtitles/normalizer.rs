/*!
 * Conversion of provider payloads into the canonical `SubtitleDocument`.
 *
 * Three input shapes are recognized: YouTube timedtext events, the
 * pass-through JSON document, and VTT/SRT text handed to a
 * `TextTrackConverter`. Anything else yields an empty document and an
 * error log line; normalization itself never fails.
 */

use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::SubtitleError;
use crate::subtitles::model::{Line, RawDocument, RawPayload, SubtitleDocument, Word, YouTubeEvent};
use crate::subtitles::text_track::{CueTextConverter, TextTrackConverter};
use crate::tracks::descriptor::{SubtitleFormat, TrackDescriptor, TrackSource};

static MARKUP_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Which converter a payload goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Event/segment payload; word timing is kept for auto-generated tracks
    Events { auto_generated: bool },
    /// Pass-through document
    Json { strip_markup: bool },
    /// Raw VTT or SRT text
    TextTrack(SubtitleFormat),
}

impl SourceKind {
    /// Pick the converter for a track
    pub fn for_track(track: &TrackDescriptor) -> Self {
        if track.format.is_text_track() {
            return Self::TextTrack(track.format);
        }
        match track.source {
            TrackSource::YouTube => Self::Events {
                auto_generated: track.is_auto_generated,
            },
            TrackSource::Vk => Self::Json { strip_markup: true },
            TrackSource::Service | TrackSource::Native => Self::Json { strip_markup: false },
        }
    }
}

/// Input shapes after the discriminant check
enum Shape {
    Events(Vec<YouTubeEvent>),
    Document(RawDocument),
    Text(String),
}

/// Converts raw payloads into `SubtitleDocument`s
#[derive(Debug, Clone)]
pub struct FormatNormalizer {
    converter: Arc<dyn TextTrackConverter>,
}

impl Default for FormatNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatNormalizer {
    /// Normalizer with the built-in cue converter
    pub fn new() -> Self {
        Self::with_converter(Arc::new(CueTextConverter::new()))
    }

    /// Normalizer delegating VTT/SRT to `converter`
    pub fn with_converter(converter: Arc<dyn TextTrackConverter>) -> Self {
        Self { converter }
    }

    /// Convert `payload` according to `kind`. Malformed input gives an empty document.
    pub fn normalize(&self, payload: RawPayload, kind: SourceKind) -> SubtitleDocument {
        let document = Self::classify(payload, kind).and_then(|shape| match shape {
            Shape::Events(events) => Ok(Self::convert_events(&events, kind)),
            Shape::Document(raw) => Ok(Self::convert_document(raw, kind)),
            Shape::Text(text) => {
                let SourceKind::TextTrack(format) = kind else {
                    return Err(SubtitleError::MalformedPayload("text body for a JSON source".to_string()));
                };
                self.converter
                    .convert(&text, format)
                    .map(|raw| drop_blank_lines(raw.into_document()))
            }
        });

        match document {
            Ok(document) => {
                debug!("Normalized {} subtitle lines ({:?})", document.lines.len(), kind);
                document
            }
            Err(e) => {
                error!("Failed to format subtitles: {}", e);
                SubtitleDocument::empty()
            }
        }
    }

    /// Explicit shape check before any destructuring
    fn classify(payload: RawPayload, kind: SourceKind) -> Result<Shape, SubtitleError> {
        match (kind, payload) {
            (SourceKind::TextTrack(_), RawPayload::Text(text)) => Ok(Shape::Text(text)),
            (SourceKind::TextTrack(_), RawPayload::Json(value)) => match value {
                Value::String(text) => Ok(Shape::Text(text)),
                other => Err(SubtitleError::MalformedPayload(format!("expected text track, got {}", kind_of(&other)))),
            },
            (_, RawPayload::Text(_)) => Err(SubtitleError::MalformedPayload("expected a JSON object, got text".to_string())),
            (SourceKind::Events { .. }, RawPayload::Json(value)) => {
                let mut map = match value {
                    Value::Object(map) => map,
                    other => {
                        return Err(SubtitleError::MalformedPayload(format!("expected an object, got {}", kind_of(&other))));
                    }
                };
                match map.remove("events") {
                    Some(events @ Value::Array(_)) => serde_json::from_value(events)
                        .map(Shape::Events)
                        .map_err(|e| SubtitleError::MalformedPayload(format!("invalid events: {}", e))),
                    Some(other) => Err(SubtitleError::MalformedPayload(format!("events is {}", kind_of(&other)))),
                    None => Err(SubtitleError::MalformedPayload("missing events".to_string())),
                }
            }
            (SourceKind::Json { .. }, RawPayload::Json(value)) => {
                let lines_kind = match &value {
                    Value::Object(map) => map.get("subtitles").map(kind_of),
                    other => {
                        return Err(SubtitleError::MalformedPayload(format!("expected an object, got {}", kind_of(other))));
                    }
                };
                match lines_kind {
                    Some("an array") => serde_json::from_value(value)
                        .map(Shape::Document)
                        .map_err(|e| SubtitleError::MalformedPayload(format!("invalid subtitles: {}", e))),
                    Some(other) => Err(SubtitleError::MalformedPayload(format!("subtitles is {}", other))),
                    None => Err(SubtitleError::MalformedPayload("missing subtitles".to_string())),
                }
            }
        }
    }

    /// YouTube events to lines
    fn convert_events(events: &[YouTubeEvent], kind: SourceKind) -> SubtitleDocument {
        let keep_words = matches!(kind, SourceKind::Events { auto_generated: true });
        let mut lines = Vec::with_capacity(events.len());

        for (i, event) in events.iter().enumerate() {
            let Some(segs) = &event.segs else {
                continue;
            };

            let mut duration_ms = event.d_duration_ms;
            if let Some(next) = events.get(i + 1) {
                if event.t_start_ms + event.d_duration_ms > next.t_start_ms {
                    duration_ms = next.t_start_ms.saturating_sub(event.t_start_ms);
                }
            }

            let kept: Vec<(&str, Option<u64>)> = segs
                .iter()
                .filter_map(|seg| {
                    let text = seg.utf8.trim();
                    (!text.is_empty()).then_some((text, seg.t_offset_ms))
                })
                .collect();
            let offsets: Vec<Option<u64>> = kept.iter().map(|(_, offset)| *offset).collect();

            let words: Vec<Word> = kept
                .iter()
                .zip(segment_spans(&offsets, duration_ms))
                .map(|((text, _), (offset, seg_duration))| Word {
                    text: (*text).to_string(),
                    start_ms: Some(event.t_start_ms + offset),
                    duration_ms: seg_duration,
                })
                .collect();

            let text = words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                continue;
            }

            let line = Line::new(text, event.t_start_ms, duration_ms);
            lines.push(if keep_words { line.with_words(words) } else { line });
        }

        SubtitleDocument::from_lines(lines)
    }

    /// Pass-through document, optionally without markup tags
    fn convert_document(raw: RawDocument, kind: SourceKind) -> SubtitleDocument {
        let mut document = raw.into_document();
        if matches!(kind, SourceKind::Json { strip_markup: true }) {
            for line in &mut document.lines {
                line.text = strip_markup(&line.text);
            }
        }
        drop_blank_lines(document)
    }
}

/// Lines with nothing but whitespace would leave the aligner without tokens
fn drop_blank_lines(mut document: SubtitleDocument) -> SubtitleDocument {
    let before = document.lines.len();
    document.lines.retain(|line| !line.text.trim().is_empty());
    if document.lines.len() < before {
        debug!("Dropped {} blank subtitle lines", before - document.lines.len());
    }
    document
}

/// `(offset, duration)` of each kept segment of an event lasting `duration_ms`.
///
/// The first segment starts at its offset or at 0. A later segment without a
/// non-zero offset is placed evenly between its timed neighbours (the event end
/// closes a trailing run). Offsets are kept monotonic and inside the event, and
/// the last segment takes the remainder, so durations always sum to `duration_ms`.
pub fn segment_spans(offsets: &[Option<u64>], duration_ms: u64) -> Vec<(u64, u64)> {
    let count = offsets.len();
    if count == 0 {
        return Vec::new();
    }

    let mut floor = 0;
    let anchors: Vec<Option<u64>> = offsets
        .iter()
        .enumerate()
        .map(|(k, offset)| {
            let explicit = if k == 0 {
                Some(offset.unwrap_or(0))
            } else {
                offset.filter(|o| *o != 0)
            };
            let anchor = explicit.map(|o| o.clamp(floor, duration_ms));
            if let Some(anchor) = anchor {
                floor = anchor;
            }
            anchor
        })
        .collect();

    let mut positions = vec![0u64; count];
    let mut k = 0;
    while k < count {
        if let Some(anchor) = anchors[k] {
            positions[k] = anchor;
            k += 1;
            continue;
        }
        // anchors[0] is always set, so a gap starts after a known position
        let from_idx = k - 1;
        let from = positions[from_idx];
        let next_known = (k..count).find_map(|j| anchors[j].map(|anchor| (j, anchor)));
        let (stop, to, span) = match next_known {
            Some((j, anchor)) => (j, anchor, j - from_idx),
            None => (count, duration_ms, count - from_idx),
        };
        for (m, position) in positions.iter_mut().enumerate().take(stop).skip(k) {
            *position = from + (to - from) * (m - from_idx) as u64 / span as u64;
        }
        k = stop;
    }

    let first = positions[0];
    positions
        .iter()
        .enumerate()
        .map(|(k, &position)| {
            let duration = match positions.get(k + 1) {
                Some(next) => next - position,
                None => duration_ms - (position - first),
            };
            (position, duration)
        })
        .collect()
}

/// Remove `<...>` tags from subtitle text
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG_REGEX.replace_all(text, "").into_owned()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
