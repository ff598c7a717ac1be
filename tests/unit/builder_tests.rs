/*!
 * Tests for flattening service responses into candidates
 */

use subtrack::tracks::{ServiceResponse, TrackCandidateBuilder, TrackDescriptor, TrackSource};

use crate::common::{original, service_response, with_translation};

#[test]
fn test_build_withDuplicateLanguage_shouldEmitOneOriginal() {
    let response = service_response(vec![original("en", "https://a"), original("en", "https://b")]);

    let candidates = TrackCandidateBuilder::new().build(&response, Vec::new());

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].language, "en");
    assert_eq!(candidates[0].url, "https://a");
    assert_eq!(candidates[0].source, TrackSource::Service);
}

#[test]
fn test_build_withTranslation_shouldEmitBothCandidates() {
    let response = service_response(vec![with_translation("en", "https://en", "ru", "https://en-ru")]);

    let candidates = TrackCandidateBuilder::new().build(&response, Vec::new());

    assert_eq!(candidates.len(), 2);
    assert!(!candidates[0].is_translated());
    assert_eq!(candidates[1].language, "ru");
    assert_eq!(candidates[1].url, "https://en-ru");
    assert_eq!(candidates[1].translated_from_language.as_deref(), Some("en"));
}

#[test]
fn test_build_withDuplicateOriginalButTranslation_shouldKeepTranslation() {
    let response = service_response(vec![
        original("en", "https://en"),
        with_translation("en", "https://en-2", "de", "https://en-de"),
    ]);

    let candidates = TrackCandidateBuilder::new().build(&response, Vec::new());

    let urls: Vec<&str> = candidates.iter().map(|c| c.url.as_str()).collect();
    assert_eq!(urls, vec!["https://en", "https://en-de"]);
}

#[test]
fn test_build_withExtraTracks_shouldAppendUnmodified() {
    let native = TrackDescriptor::new(TrackSource::YouTube, "en", "https://yt").auto_generated(true);
    let response = service_response(vec![original("ru", "https://ru")]);

    let candidates = TrackCandidateBuilder::new().build(&response, vec![native.clone()]);

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[1], native);
}

#[test]
fn test_build_withWaitingEmptyResponse_shouldOnlyReturnExtraTracks() {
    let response: ServiceResponse = serde_json::from_str(r#"{"waiting": true}"#).unwrap();
    assert!(response.waiting);

    let native = TrackDescriptor::new(TrackSource::Vk, "ru", "https://vk");
    let candidates = TrackCandidateBuilder::new().build(&response, vec![native]);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].source, TrackSource::Vk);
}

#[test]
fn test_service_response_shouldDecodeCamelCaseFields() {
    let json = r#"{
        "waiting": false,
        "subtitles": [
            {"language": "en", "url": "https://en", "translatedLanguage": "ru", "translatedUrl": "https://en-ru"}
        ]
    }"#;

    let response: ServiceResponse = serde_json::from_str(json).unwrap();

    assert_eq!(response.subtitles[0].translated_language.as_deref(), Some("ru"));
    assert_eq!(response.subtitles[0].translated_url.as_deref(), Some("https://en-ru"));
}

#[test]
fn test_build_withTranslationOfUnknownSource_shouldTreatAsOriginal() {
    let response = service_response(vec![with_translation("", "", "ru", "https://ru")]);

    let candidates = TrackCandidateBuilder::new().build(&response, Vec::new());

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].language, "ru");
    assert_eq!(candidates[0].url, "https://ru");
    assert_eq!(candidates[0].translated_from_language, None);
    assert!(!candidates[0].is_translated());
}
