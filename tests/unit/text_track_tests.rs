/*!
 * Tests for VTT/SRT conversion
 */

use subtrack::subtitles::{CueTextConverter, TextTrackConverter};
use subtrack::tracks::SubtitleFormat;

use crate::common;

#[test]
fn test_convert_srt_withSampleFile_shouldParseAllCues() {
    let doc = CueTextConverter::new().convert(common::srt_content(), SubtitleFormat::Srt).unwrap();

    assert_eq!(doc.subtitles.len(), 2);
    assert_eq!(doc.subtitles[0].text, "This is a test subtitle.");
    assert_eq!(doc.subtitles[0].start_ms, 1000);
    assert_eq!(doc.subtitles[0].duration_ms, 3000);
    assert_eq!(doc.subtitles[1].start_ms, 5000);
    assert_eq!(doc.subtitles[1].duration_ms, 4000);
    assert!(!doc.contains_tokens);
}

#[test]
fn test_convert_srt_withBomAndCrlf_shouldParse() {
    let content = "\u{feff}1\r\n00:00:00,500 --> 00:00:01,000\r\nHi\r\n";
    let doc = CueTextConverter::new().convert(content, SubtitleFormat::Srt).unwrap();

    assert_eq!(doc.subtitles.len(), 1);
    assert_eq!(doc.subtitles[0].text, "Hi");
    assert_eq!(doc.subtitles[0].duration_ms, 500);
}

#[test]
fn test_convert_vtt_withCueSettingsAndIdentifiers_shouldParse() {
    let doc = CueTextConverter::new().convert(common::vtt_content(), SubtitleFormat::Vtt).unwrap();

    assert_eq!(doc.subtitles.len(), 2);
    assert_eq!(doc.subtitles[0].start_ms, 1000);
    assert_eq!(doc.subtitles[0].duration_ms, 3000);
    assert_eq!(doc.subtitles[1].text, "General Kenobi");
    assert_eq!(doc.subtitles[1].duration_ms, 1500);
}

#[test]
fn test_convert_withGarbage_shouldFail() {
    let result = CueTextConverter::new().convert("just some text\nwithout cues\n", SubtitleFormat::Srt);
    assert!(result.is_err());
}

#[test]
fn test_convert_withEmptyBody_shouldReturnNoCues() {
    let doc = CueTextConverter::new().convert("", SubtitleFormat::Srt).unwrap();
    assert!(doc.subtitles.is_empty());

    let doc = CueTextConverter::new().convert("WEBVTT\n", SubtitleFormat::Vtt).unwrap();
    assert!(doc.subtitles.is_empty());
}

#[test]
fn test_convert_withJsonFormat_shouldFail() {
    assert!(CueTextConverter::new().convert("{}", SubtitleFormat::Json).is_err());
}

#[test]
fn test_convert_withReversedTimes_shouldSkipCue() {
    let content = "1\n00:00:05,000 --> 00:00:04,000\nbroken\n\n2\n00:00:06,000 --> 00:00:07,000\nfine\n";
    let doc = CueTextConverter::new().convert(content, SubtitleFormat::Srt).unwrap();

    assert_eq!(doc.subtitles.len(), 1);
    assert_eq!(doc.subtitles[0].text, "fine");
}
