//! Title similarity and script checks.

use std::collections::HashSet;

/// Lower-cased words longer than two characters.
pub fn significant_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2)
        .map(|w| w.to_string())
        .collect()
}

/// Fraction of the reference's significant words found in any candidate title.
///
/// Returns `matches / total` in `[0.0, 1.0]`, or 0.0 when the reference
/// has no significant words.
pub fn word_overlap(reference: &str, candidate_titles: &[&str]) -> f32 {
    let words = significant_words(reference);
    if words.is_empty() {
        return 0.0;
    }

    let pool: HashSet<String> = candidate_titles
        .iter()
        .flat_map(|t| significant_words(t))
        .collect();

    let matches = words.iter().filter(|w| pool.contains(w.as_str())).count();
    matches as f32 / words.len() as f32
}

/// Whether the text is written in Latin script only.
///
/// Accepts ASCII, Latin-1 and Latin Extended letters, combining accents and
/// general punctuation. Rejects kana, kanji, hangul, cyrillic and so on.
pub fn is_latin_script(text: &str) -> bool {
    text.chars().all(|c| {
        c.is_ascii()
            || matches!(
                c as u32,
                0x00A0..=0x024F | 0x0300..=0x036F | 0x1E00..=0x1EFF | 0x2000..=0x206F
            )
    })
}
