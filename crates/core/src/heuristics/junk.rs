//! Detection of non-episode content.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Metadata titles that describe side material rather than the main show.
static JUNK_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(recaps?|specials?|ova|oad|previews?|picture\s+drama|digest)\b")
        .expect("junk title pattern")
});

/// Release names for recaps, extras and promotional clips.
static JUNK_RELEASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(recaps?|ovas?|oads?|specials?|pv|previews?|trailers?|teasers?|ncop|nced|creditless|mini\s+anime)\b",
    )
    .expect("junk release pattern")
});

/// Whether a metadata title variant should be kept out of search queries.
pub fn is_junk_title(title: &str) -> bool {
    JUNK_TITLE.is_match(title)
}

/// Whether a torrent name is for non-episode content.
pub fn is_junk_release(name: &str) -> bool {
    JUNK_RELEASE.is_match(name)
}
