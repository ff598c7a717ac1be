/*!
 * Tests for token alignment
 */

use serde_json::json;
use subtrack::subtitles::aligner::{AlignCursor, align_line};
use subtrack::subtitles::{AlignOptions, FormatNormalizer, Line, RawPayload, SourceKind, SubtitleDocument, Word, align};
use subtrack::tracks::TrackSource;

use crate::common;

fn word(text: &str, start_ms: Option<u64>, duration_ms: u64) -> Word {
    Word {
        text: text.to_string(),
        start_ms,
        duration_ms,
    }
}

#[test]
fn test_align_withPlainLines_shouldCoverTextAndConserveDuration() {
    let doc = SubtitleDocument::from_lines(vec![
        Line::new("The quick  brown fox", 0, 1000),
        Line::new("jumps\tover\nthe dog", 1000, 777),
        Line::new("x", 1777, 5),
    ]);

    let aligned = align(doc, AlignOptions::new(TrackSource::Native, false));
    common::assert_aligned(&aligned);

    for line in &aligned.lines {
        let tokens = line.tokens.as_ref().unwrap();
        let total: u64 = tokens.iter().map(|t| t.duration_ms).sum();
        assert_eq!(total, line.duration_ms);
        assert_eq!(tokens.last().unwrap().end_ms(), line.end_ms());
    }
}

#[test]
fn test_align_acrossLines_shouldContinueCursor() {
    let doc = SubtitleDocument::from_lines(vec![Line::new("ab cd", 0, 100), Line::new("ef", 100, 100)]);

    let aligned = align(doc, AlignOptions::new(TrackSource::YouTube, false));
    let second = aligned.lines[1].tokens.as_ref().unwrap();
    assert_eq!(second[0].align_range.start, 5);
    assert_eq!(second[0].align_range.end, 7);
}

#[test]
fn test_align_withServiceWords_shouldInsertTimedSeparators() {
    let line = Line::new("hi there", 1000, 2000).with_words(vec![
        word("hi", Some(1000), 500),
        word("there", Some(1800), 700),
    ]);

    let aligned = align(
        SubtitleDocument::from_lines(vec![line]),
        AlignOptions::new(TrackSource::Service, false),
    );
    common::assert_aligned(&aligned);

    let tokens = aligned.lines[0].tokens.as_ref().unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].text, " ");
    assert_eq!(tokens[1].start_ms, 1500);
    assert_eq!(tokens[1].duration_ms, 300);
    assert_eq!(tokens[2].start_ms, 1800);
    assert_eq!(tokens[2].duration_ms, 700);
}

#[test]
fn test_align_withUntimedNextWord_shouldFillSeparatorToLineEnd() {
    let line = Line::new("a b", 0, 1000).with_words(vec![word("a", Some(0), 200), word("b", None, 100)]);

    let (line, cursor) = align_line(line, AlignCursor(0), AlignOptions::new(TrackSource::Service, false));
    let tokens = line.tokens.unwrap();

    assert_eq!(tokens[1].start_ms, 200);
    assert_eq!(tokens[1].duration_ms, 800);
    // Untimed word starts where the previous token ended
    assert_eq!(tokens[2].start_ms, 200);
    assert_eq!(cursor, AlignCursor(3));
}

#[test]
fn test_align_withAutoGeneratedYouTube_shouldReflowSegments() {
    let payload = json!({
        "events": [
            {"tStartMs": 0, "dDurationMs": 3000, "segs": [
                {"utf8": "one", "tOffsetMs": 0},
                {"utf8": "two", "tOffsetMs": 1000},
                {"utf8": "three", "tOffsetMs": 2000}
            ]},
            {"tStartMs": 3000, "dDurationMs": 1000, "segs": [{"utf8": "four"}]}
        ]
    });
    let doc = FormatNormalizer::new().normalize(RawPayload::Json(payload), SourceKind::Events { auto_generated: true });

    let aligned = align(doc, AlignOptions::new(TrackSource::YouTube, true));
    common::assert_aligned(&aligned);

    let first = aligned.lines[0].tokens.as_ref().unwrap();
    let texts: Vec<&str> = first.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["one", " ", "two", " ", "three"]);
    assert_eq!(first[4].start_ms, 2000);
    assert_eq!(first[4].duration_ms, 1000);

    let second = aligned.lines[1].tokens.as_ref().unwrap();
    assert_eq!(second[0].align_range.start, 13);
}

#[test]
fn test_align_withWordsOnAuthoredNativeTrack_shouldSplitEvenly() {
    let line = Line::new("a b", 0, 300).with_words(vec![word("a", Some(0), 10), word("b", Some(290), 10)]);

    let aligned = align(
        SubtitleDocument::from_lines(vec![line]),
        AlignOptions::new(TrackSource::Vk, false),
    );
    let tokens = aligned.lines[0].tokens.as_ref().unwrap();
    assert!(tokens.iter().all(|t| t.duration_ms == 100));
}

#[test]
fn test_align_withEmptyDocument_shouldStillMarkTokenized() {
    let aligned = align(SubtitleDocument::empty(), AlignOptions::new(TrackSource::Native, false));
    assert!(aligned.is_empty());
    assert!(aligned.contains_tokens());
}

#[test]
fn test_align_withMultibyteText_shouldCountCharacters() {
    let doc = FormatNormalizer::new().normalize(
        RawPayload::Json(common::service_document_payload()),
        SourceKind::Json { strip_markup: false },
    );

    let aligned = align(doc, AlignOptions::new(TrackSource::Service, false));
    common::assert_aligned(&aligned);

    let first = aligned.lines[0].tokens.as_ref().unwrap();
    assert_eq!(first[0].align_range.end, 6);
    assert_eq!(first[2].align_range.end, 10);
    assert_eq!(aligned.lines[1].tokens.as_ref().unwrap()[0].align_range.start, 10);
}

#[test]
fn test_line_at_shouldReturnLastStrictlyContainingLine() {
    let doc = SubtitleDocument::from_lines(vec![Line::new("a", 0, 2000), Line::new("b", 1000, 2000)]);
    assert_eq!(doc.line_at(1500).map(|l| l.text.as_str()), Some("b"));
    assert_eq!(doc.line_at(500).map(|l| l.text.as_str()), Some("a"));
    assert!(doc.line_at(0).is_none());
    assert!(doc.line_at(3000).is_none());
}

#[test]
fn test_align_withIrregularAutoGeneratedSegments_shouldConserveDurations() {
    let payload = json!({
        "events": [
            {"tStartMs": 0, "dDurationMs": 3000, "segs": [
                {"utf8": "a", "tOffsetMs": 0},
                {"utf8": "b", "tOffsetMs": 1000},
                {"utf8": "\n"}
            ]},
            {"tStartMs": 3000, "dDurationMs": 5000, "segs": [
                {"utf8": "c"},
                {"utf8": "d"},
                {"utf8": "e", "tOffsetMs": 2400},
                {"utf8": "f"}
            ]},
            {"tStartMs": 6000, "dDurationMs": 900, "segs": [
                {"utf8": "  "},
                {"utf8": "g", "tOffsetMs": 300},
                {"utf8": "h", "tOffsetMs": 100}
            ]}
        ]
    });
    let doc = FormatNormalizer::new().normalize(RawPayload::Json(payload), SourceKind::Events { auto_generated: true });

    let aligned = align(doc, AlignOptions::new(TrackSource::YouTube, true));
    common::assert_aligned(&aligned);

    assert_eq!(aligned.lines.len(), 3);
    for line in &aligned.lines {
        let tokens = line.tokens.as_ref().unwrap();
        let total: u64 = tokens.iter().map(|t| t.duration_ms).sum();
        assert_eq!(total, line.duration_ms, "line '{}' should conserve its duration", line.text);
        assert!(tokens.iter().all(|t| t.start_ms >= line.start_ms));
    }
}

#[test]
fn test_align_withMarkupOnlyVkLine_shouldNotLeaveTokenlessLines() {
    let payload = json!({
        "subtitles": [
            {"text": "<br>", "startMs": 0, "durationMs": 1000},
            {"text": "hi", "startMs": 1000, "durationMs": 1000}
        ]
    });
    let doc = FormatNormalizer::new().normalize(RawPayload::Json(payload), SourceKind::Json { strip_markup: true });

    let aligned = align(doc, AlignOptions::new(TrackSource::Vk, false));

    assert_eq!(aligned.lines.len(), 1);
    assert!(aligned.lines.iter().all(|line| line.tokens.as_ref().is_some_and(|t| !t.is_empty())));
}
