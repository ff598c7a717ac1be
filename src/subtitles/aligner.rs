/*!
 * Token alignment for progressive (word-by-word) highlighting.
 *
 * Every line gets a token sequence whose texts concatenate back to the line
 * text and whose alignment ranges are contiguous. The alignment cursor is an
 * explicit value carried from one line to the next, so ranges form one
 * document-wide coordinate space.
 *
 * Two per-line algorithms exist:
 * - re-flow: upstream already timed the words (translation service, YouTube
 *   auto-generated captions); single-space separators are inserted between them
 * - even split: the line text is split on whitespace, keeping each whitespace
 *   character as its own token, and the line duration is divided evenly
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitles::model::{AlignRange, Line, SubtitleDocument, Token, Word};
use crate::tracks::descriptor::{TrackDescriptor, TrackSource};

// @const: A single whitespace delimiter or a run of anything else
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n \t]|[^\n \t]+").unwrap());

/// Source metadata the aligner needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignOptions {
    pub source: TrackSource,
    pub is_auto_generated: bool,
}

impl AlignOptions {
    pub fn new(source: TrackSource, is_auto_generated: bool) -> Self {
        Self { source, is_auto_generated }
    }

    pub fn for_track(track: &TrackDescriptor) -> Self {
        Self::new(track.source, track.is_auto_generated)
    }

    /// Whether upstream word timing on a line can be trusted as-is
    fn reflows_words(&self) -> bool {
        self.source.emits_timed_words(self.is_auto_generated)
    }
}

/// Position in the document-wide alignment stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignCursor(pub usize);

impl AlignCursor {
    /// Range for `text` starting at the cursor, and the advanced cursor
    fn take(self, text: &str) -> (AlignRange, AlignCursor) {
        let end = self.0 + text.chars().count();
        (AlignRange::new(self.0, end), AlignCursor(end))
    }
}

/// Populate tokens on every line of `document` and mark it tokenized
pub fn align(document: SubtitleDocument, options: AlignOptions) -> SubtitleDocument {
    let mut document = document;
    let lines = std::mem::take(&mut document.lines);

    let (lines, cursor) = lines
        .into_iter()
        .fold((Vec::new(), AlignCursor::default()), |(mut aligned, cursor), line| {
            let (line, cursor) = align_line(line, cursor, options);
            aligned.push(line);
            (aligned, cursor)
        });

    debug!(
        "Aligned {} lines ({} source, {} characters)",
        lines.len(),
        options.source,
        cursor.0
    );

    document.lines = lines;
    document.mark_tokenized();
    document
}

/// Tokenize one line starting at `cursor`; returns the line and the cursor after it
pub fn align_line(mut line: Line, cursor: AlignCursor, options: AlignOptions) -> (Line, AlignCursor) {
    let words = line.words.take().filter(|w| !w.is_empty());
    let (tokens, cursor) = match words {
        Some(words) if options.reflows_words() => reflow_words(&line, &words, cursor),
        _ => split_evenly(&line, cursor),
    };
    line.tokens = Some(tokens);
    (line, cursor)
}

/// Keep upstream word timing and insert timed single-space separators between words
pub fn reflow_words(line: &Line, words: &[Word], cursor: AlignCursor) -> (Vec<Token>, AlignCursor) {
    let line_end_ms = line.end_ms();
    let mut tokens = Vec::with_capacity(words.len() * 2);
    let mut cursor = cursor;
    let mut previous_end_ms = line.start_ms;

    for (i, word) in words.iter().enumerate() {
        let start_ms = word.start_ms.unwrap_or(previous_end_ms);
        let (align_range, next_cursor) = cursor.take(&word.text);
        cursor = next_cursor;

        let token = Token {
            text: word.text.clone(),
            start_ms,
            duration_ms: word.duration_ms,
            align_range,
        };
        let end_ms = token.end_ms();
        tokens.push(token);
        previous_end_ms = end_ms;

        if let Some(next) = words.get(i + 1) {
            let gap_end_ms = next.start_ms.unwrap_or(line_end_ms);
            let (align_range, next_cursor) = cursor.take(" ");
            cursor = next_cursor;
            tokens.push(Token {
                text: " ".to_string(),
                start_ms: end_ms,
                duration_ms: gap_end_ms.saturating_sub(end_ms),
                align_range,
            });
        }
    }

    (tokens, cursor)
}

/// Split the line text into words and single whitespace characters, timed evenly
pub fn split_evenly(line: &Line, cursor: AlignCursor) -> (Vec<Token>, AlignCursor) {
    let pieces: Vec<&str> = TOKEN_REGEX.find_iter(&line.text).map(|m| m.as_str()).collect();
    if pieces.is_empty() {
        warn!("Line at {} ms has no text to tokenize", line.start_ms);
        return (Vec::new(), cursor);
    }

    let count = pieces.len() as u64;
    let token_duration_ms = line.duration_ms / count;
    let line_end_ms = line.end_ms();
    let mut cursor = cursor;

    let tokens = pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| {
            let (align_range, next_cursor) = cursor.take(piece);
            cursor = next_cursor;
            let start_ms = line.start_ms + token_duration_ms * i as u64;
            let is_last = i as u64 == count - 1;
            Token {
                text: (*piece).to_string(),
                start_ms,
                duration_ms: if is_last { line_end_ms - start_ms } else { token_duration_ms },
                align_range,
            }
        })
        .collect();

    (tokens, cursor)
}
