use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Debug;

use crate::errors::SubtitleError;
use crate::subtitles::model::{RawDocument, RawLine};
use crate::tracks::descriptor::SubtitleFormat;

// @module: VTT/SRT text tracks to the pass-through document shape

// @const: Cue timing line, SRT (comma) or WebVTT (dot, optional hours)
static CUE_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d{1,2}):)?(\d{2}):(\d{2})[,.](\d{3})\s+-->\s+(?:(\d{1,2}):)?(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

/// Converts a raw text track into the pass-through shape
pub trait TextTrackConverter: Send + Sync + Debug {
    fn convert(&self, content: &str, format: SubtitleFormat) -> Result<RawDocument, SubtitleError>;
}

/// Default converter for SubRip and WebVTT cues
#[derive(Debug, Default, Clone, Copy)]
pub struct CueTextConverter;

impl CueTextConverter {
    pub fn new() -> Self {
        Self
    }

    /// Parse a `[HH:]MM:SS[,.]mmm` timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        let (hours, rest) = match parts.len() {
            4 => (parts[0], &parts[1..]),
            3 => ("0", &parts[..]),
            _ => return Err(SubtitleError::TextTrack(format!("Invalid timestamp format: {}", timestamp))),
        };

        let parse = |value: &str, what: &str| {
            value
                .parse::<u64>()
                .map_err(|_| SubtitleError::TextTrack(format!("Failed to parse {} in {}", what, timestamp)))
        };
        let hours = parse(hours, "hours")?;
        let minutes = parse(rest[0], "minutes")?;
        let seconds = parse(rest[1], "seconds")?;
        let millis = parse(rest[2], "milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SubtitleError::TextTrack(format!("Invalid time components in timestamp: {}", timestamp)));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    fn capture_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let field = |idx: usize| {
            caps.get(idx)
                .map_or(0, |m| m.as_str().parse::<u64>().unwrap_or(0))
        };
        (field(start_idx) * 3600 + field(start_idx + 1) * 60 + field(start_idx + 2)) * 1000 + field(start_idx + 3)
    }

    /// Split content into blank-line separated blocks
    fn blocks(content: &str) -> Vec<Vec<&str>> {
        let mut blocks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
            } else {
                current.push(line.trim_end());
            }
        }
        if !current.is_empty() {
            blocks.push(current);
        }
        blocks
    }

    /// Parse one block; `None` when it carries no cue
    fn parse_block(block: &[&str], block_index: usize) -> Option<RawLine> {
        let timing_idx = block.iter().position(|l| CUE_TIMING_REGEX.is_match(l.trim_start()))?;
        let caps = CUE_TIMING_REGEX.captures(block[timing_idx].trim_start())?;
        let start_ms = Self::capture_to_ms(&caps, 1);
        let end_ms = Self::capture_to_ms(&caps, 5);

        if end_ms < start_ms {
            warn!("Skipping cue {} with end time {} before start time {}", block_index, end_ms, start_ms);
            return None;
        }

        let text = block[timing_idx + 1..].join("\n");
        if text.trim().is_empty() {
            debug!("Skipping empty cue {}", block_index);
            return None;
        }

        Some(RawLine {
            text,
            start_ms,
            duration_ms: end_ms - start_ms,
            tokens: None,
        })
    }
}

impl TextTrackConverter for CueTextConverter {
    fn convert(&self, content: &str, format: SubtitleFormat) -> Result<RawDocument, SubtitleError> {
        let content = content.trim_start_matches('\u{feff}');
        let blocks = Self::blocks(content);

        let body: &[Vec<&str>] = match format {
            SubtitleFormat::Vtt => {
                let header = blocks.first().and_then(|b| b.first()).copied().unwrap_or_default();
                if !header.starts_with("WEBVTT") {
                    return Err(SubtitleError::TextTrack("Missing WEBVTT header".to_string()));
                }
                // Header block may hold a cue only when the file has no blank line after WEBVTT
                if blocks[0].iter().any(|l| CUE_TIMING_REGEX.is_match(l)) {
                    &blocks[..]
                } else {
                    &blocks[1..]
                }
            }
            SubtitleFormat::Srt => &blocks[..],
            SubtitleFormat::Json => {
                return Err(SubtitleError::TextTrack("JSON is not a text track format".to_string()));
            }
        };

        let mut subtitles = Vec::with_capacity(body.len());
        for (i, block) in body.iter().enumerate() {
            let first = block.first().copied().unwrap_or_default();
            if format == SubtitleFormat::Vtt
                && (first.starts_with("NOTE") || first.starts_with("STYLE") || first.starts_with("REGION"))
            {
                continue;
            }
            match Self::parse_block(block, i + 1) {
                Some(line) => subtitles.push(line),
                None => debug!("Block {} has no usable cue", i + 1),
            }
        }

        if subtitles.is_empty() && !body.is_empty() {
            return Err(SubtitleError::TextTrack("No valid cues were found in the text track".to_string()));
        }

        let overlap_count = subtitles
            .windows(2)
            .filter(|pair| pair[0].start_ms + pair[0].duration_ms > pair[1].start_ms)
            .count();
        if overlap_count > 0 {
            warn!("Found {} overlapping cues", overlap_count);
        }

        Ok(RawDocument {
            contains_tokens: false,
            subtitles,
        })
    }
}
