/*!
 * Error types for the subtrack library.
 *
 * Format and shape errors are absorbed close to where they happen and turned
 * into empty documents; only `PipelineError::NoCandidates` is meant to reach
 * the caller as a visible failure.
 */

use thiserror::Error;

/// Errors raised by the external collaborators (fetcher, service, native source)
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making a request fails
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Error when decoding a response body fails
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Non-2xx status returned by the remote end
    #[error("Server responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message or body excerpt
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The round-trip did not settle before the deadline
    #[error("Timed out after {0} ms")]
    Timeout(u64),
}

/// Errors that can occur while converting a subtitle payload
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Payload does not match any recognized input shape
    #[error("Malformed subtitle payload: {0}")]
    MalformedPayload(String),

    /// The text-track converter could not read a VTT/SRT body
    #[error("Text track conversion failed: {0}")]
    TextTrack(String),
}

/// Errors surfaced by the subtitle pipeline to its caller
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Neither the translation service nor the platform offered a track
    #[error("No subtitle candidates available")]
    NoCandidates,

    /// Error from a collaborator that could not be recovered locally
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle conversion
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
