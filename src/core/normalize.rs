// src/core/normalize.rs
//! String clean-up for tag values and the file names built from them.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization as _;

/// Short words that stay lower case inside a title.
const ARTICLES: [&str; 11] = [
    "A", "An", "The", "Of", "In", "To", "And", "But", "Or", "Nor", "For",
];

// Characters that cannot appear in a path component, or a bracketed run
// like " [Remastered]" including the space before it.
static UNWANTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)[\\/:?<>|]| ?\[.*?\]").expect("unwanted-text pattern is valid")
});

/// Lower-cases articles and conjunctions that sit between two spaces.
///
/// Only the capitalized spelling is touched and a word at the start or end
/// of the string is left alone, so `"The Lord Of The Rings"` becomes
/// `"The Lord of the Rings"`. Running it again changes nothing.
#[must_use]
pub fn articles_to_lower(s: &str) -> String {
    let words: Vec<&str> = s.split(' ').collect();
    let last = words.len().saturating_sub(1);

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i > 0 && i < last && ARTICLES.contains(word) {
                word.to_lowercase()
            } else {
                (*word).to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Makes a tag value safe to use as a single path component.
///
/// Bracketed runs and the characters `\ / : ? < > |` are removed, every
/// pair of spaces becomes one space and accented letters lose their
/// diacritics. The space pass runs once, so three spaces end up as two.
#[must_use]
pub fn prepare_file_name(s: &str) -> String {
    let stripped = UNWANTED.replace_all(s, "");
    let spaced = stripped.replace("  ", " ");
    spaced.nfd().filter(char::is_ascii).collect()
}
