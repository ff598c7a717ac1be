/*!
 * Ranking of subtitle track candidates.
 *
 * The comparator is a chain of tie-break predicates evaluated left to right;
 * the first one that returns something other than `Equal` decides. Each
 * predicate is public so it can be exercised on its own.
 */

use std::cmp::Ordering;

use log::debug;

use crate::tracks::descriptor::TrackDescriptor;

/// `Less` when only `a` holds, `Greater` when only `b` does
fn prefer(a: bool, b: bool) -> Ordering {
    match (a, b) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Translation-service candidates come before platform-native ones
pub fn by_source(a: &TrackDescriptor, b: &TrackDescriptor) -> Ordering {
    prefer(a.source.is_service(), b.source.is_service())
}

/// A candidate in the preferred UI language comes first
pub fn by_ui_language(a: &TrackDescriptor, b: &TrackDescriptor, ui_language: &str) -> Ordering {
    if a.language == b.language {
        return Ordering::Equal;
    }
    prefer(a.language == ui_language, b.language == ui_language)
}

/// Service candidates that differ in being translated: for the same language the
/// original wins, across languages the translation wins
pub fn by_translation_group(a: &TrackDescriptor, b: &TrackDescriptor) -> Ordering {
    if !a.source.is_service() || !b.source.is_service() || a.is_translated() == b.is_translated() {
        return Ordering::Equal;
    }
    if a.language == b.language {
        prefer(!a.is_translated(), !b.is_translated())
    } else {
        prefer(a.is_translated(), b.is_translated())
    }
}

/// Service translations from different languages: the one translated from the
/// requested language wins
pub fn by_translation_origin(a: &TrackDescriptor, b: &TrackDescriptor, request_language: &str) -> Ordering {
    if !a.source.is_service() || !b.source.is_service() {
        return Ordering::Equal;
    }
    match (&a.translated_from_language, &b.translated_from_language) {
        (Some(from_a), Some(from_b)) if from_a != from_b => {
            prefer(from_a == request_language, from_b == request_language)
        }
        _ => Ordering::Equal,
    }
}

/// Untranslated service candidates: the one in the requested language wins
pub fn by_request_language(a: &TrackDescriptor, b: &TrackDescriptor, request_language: &str) -> Ordering {
    if !a.source.is_service() || !b.source.is_service() || a.is_translated() || b.is_translated() {
        return Ordering::Equal;
    }
    prefer(a.language == request_language, b.language == request_language)
}

/// Platform-native candidates: authored tracks before auto-generated ones
pub fn by_generation_method(a: &TrackDescriptor, b: &TrackDescriptor) -> Ordering {
    if a.source.is_service() || b.source.is_service() {
        return Ordering::Equal;
    }
    prefer(!a.is_auto_generated, !b.is_auto_generated)
}

/// Orders candidates for a given request and UI language
#[derive(Debug, Clone)]
pub struct TrackRanker {
    request_language: String,
    ui_language: String,
}

impl TrackRanker {
    pub fn new(request_language: impl Into<String>, ui_language: impl Into<String>) -> Self {
        Self {
            request_language: request_language.into(),
            ui_language: ui_language.into(),
        }
    }

    /// Full comparator
    pub fn compare(&self, a: &TrackDescriptor, b: &TrackDescriptor) -> Ordering {
        by_source(a, b)
            .then_with(|| by_ui_language(a, b, &self.ui_language))
            .then_with(|| by_translation_group(a, b))
            .then_with(|| by_translation_origin(a, b, &self.request_language))
            .then_with(|| by_request_language(a, b, &self.request_language))
            .then_with(|| by_generation_method(a, b))
    }

    /// Stable sort of `candidates`; equal elements keep their input order.
    pub fn rank(&self, mut candidates: Vec<TrackDescriptor>) -> Vec<TrackDescriptor> {
        // The chain is not guaranteed transitive for every input, and the std sorts
        // may panic on such comparators. Insertion sort never does and lists are short.
        for i in 1..candidates.len() {
            let mut j = i;
            while j > 0 && self.compare(&candidates[j - 1], &candidates[j]) == Ordering::Greater {
                candidates.swap(j - 1, j);
                j -= 1;
            }
        }

        debug!(
            "Ranked {} candidates (request: {}, ui: {})",
            candidates.len(),
            self.request_language,
            self.ui_language
        );
        candidates
    }
}

/// Rank `candidates` for `request_language` with `ui_language` as the preferred UI language
pub fn rank(candidates: Vec<TrackDescriptor>, request_language: &str, ui_language: &str) -> Vec<TrackDescriptor> {
    TrackRanker::new(request_language, ui_language).rank(candidates)
}
