//! Search query variants for a title.
//!
//! Index search is literal, so one title is turned into several queries:
//! the title as-is, without season/part markers, cut at its subtitle, and
//! without punctuation. Order is preserved so earlier variants take priority.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex_lite::Regex;

static SEASON_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(season|part|cour)\s*\d+\b").expect("season marker pattern")
});

static ORDINAL_SEASON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+(st|nd|rd|th)\s+season\b").expect("ordinal season pattern")
});

static ASIDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]").expect("aside pattern"));

/// Truncated variants shorter than this are too vague to search for.
const MIN_TRUNCATED_LEN: usize = 3;

/// Base query variants for a title, deduplicated case-insensitively.
pub fn base_variants(title: &str) -> Vec<String> {
    let verbatim = normalize_whitespace(title);
    let mut variants = Vec::new();
    let mut seen = HashSet::new();

    push_unique(&mut variants, &mut seen, verbatim.clone());
    push_unique(&mut variants, &mut seen, strip_markers(&verbatim));
    if let Some(truncated) = truncate_at_subtitle(&verbatim) {
        push_unique(&mut variants, &mut seen, truncated);
    }
    push_unique(&mut variants, &mut seen, strip_punctuation(&verbatim));

    variants
}

/// Query variants for a title, expanded with the episode number if given.
///
/// Each base variant becomes `"<base> <EE>"` and `"<base> <E>"`.
pub fn query_variants(title: &str, episode: Option<u32>) -> Vec<String> {
    let bases = base_variants(title);
    let Some(episode) = episode else {
        return bases;
    };

    let mut variants = Vec::with_capacity(bases.len() * 2);
    let mut seen = HashSet::new();
    for base in &bases {
        push_unique(&mut variants, &mut seen, format!("{} {:02}", base, episode));
        push_unique(&mut variants, &mut seen, format!("{} {}", base, episode));
    }
    variants
}

fn push_unique(variants: &mut Vec<String>, seen: &mut HashSet<String>, variant: String) {
    if variant.is_empty() {
        return;
    }
    if seen.insert(variant.to_lowercase()) {
        variants.push(variant);
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_markers(title: &str) -> String {
    let stripped = ORDINAL_SEASON.replace_all(title, " ");
    let stripped = SEASON_MARKER.replace_all(&stripped, " ");
    let stripped = ASIDE.replace_all(&stripped, " ");
    let stripped = stripped.replace(':', " ");
    normalize_whitespace(&stripped)
        .trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_string()
}

fn truncate_at_subtitle(title: &str) -> Option<String> {
    let cut = title.find([':', '-'])?;
    let head = title[..cut].trim();
    (head.chars().count() >= MIN_TRUNCATED_LEN).then(|| head.to_string())
}

fn strip_punctuation(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    normalize_whitespace(&cleaned)
}
