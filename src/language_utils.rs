/*!
 * Language utilities for the tags carried by subtitle tracks.
 *
 * Providers use ISO 639-1 codes, sometimes with a region suffix ("en-US",
 * "pt_BR"). Ranking compares tags verbatim; these helpers are for validation
 * and display.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Primary subtag of a language tag, lowercased ("en-US" -> "en")
pub fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn lookup(tag: &str) -> Option<Language> {
    let primary = primary_subtag(tag);
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    }
}

/// Validate that `tag` names a known ISO 639-1 or ISO 639-3 language
pub fn validate_language_code(tag: &str) -> Result<()> {
    lookup(tag)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", tag))
}

/// English name of the language, e.g. "ru" -> "Russian"
pub fn get_language_name(tag: &str) -> Result<String> {
    lookup(tag)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", tag))
}

/// Display label: language name when known, the raw tag otherwise
pub fn display_name(tag: &str) -> String {
    get_language_name(tag).unwrap_or_else(|_| tag.to_string())
}
