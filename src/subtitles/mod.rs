/*!
 * Subtitle documents: the canonical model, payload normalization, token
 * alignment and the VTT/SRT text-track converter.
 */

pub mod aligner;
pub mod model;
pub mod normalizer;
pub mod text_track;

pub use aligner::{AlignOptions, align};
pub use model::{AlignRange, Line, RawDocument, RawPayload, SubtitleDocument, Token, Word};
pub use normalizer::{FormatNormalizer, SourceKind};
pub use text_track::{CueTextConverter, TextTrackConverter};
