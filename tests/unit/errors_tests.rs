/*!
 * Tests for error types
 */

use subtrack::errors::{AppError, PipelineError, ProviderError, SubtitleError};

#[test]
fn test_provider_error_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 404,
        message: "not found".to_string(),
    };
    assert_eq!(error.to_string(), "Server responded with error: 404 - not found");
    assert_eq!(ProviderError::Timeout(5000).to_string(), "Timed out after 5000 ms");
}

#[test]
fn test_pipeline_error_fromProviderError_shouldWrap() {
    let error: PipelineError = ProviderError::ConnectionError("refused".to_string()).into();
    assert!(matches!(error, PipelineError::Provider(ProviderError::ConnectionError(_))));
    assert_eq!(PipelineError::NoCandidates.to_string(), "No subtitle candidates available");
}

#[test]
fn test_app_error_conversions_shouldPickVariant() {
    let error: AppError = SubtitleError::MalformedPayload("missing events".to_string()).into();
    assert!(matches!(error, AppError::Subtitle(_)));

    let error: AppError = PipelineError::NoCandidates.into();
    assert!(error.to_string().contains("No subtitle candidates"));

    let error: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(error, AppError::File(_)));

    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(_)));
}
