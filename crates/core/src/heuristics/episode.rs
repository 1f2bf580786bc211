//! Episode number matching for release names.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static BATCH_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(complete|batch)\b").expect("batch pattern"));

static EPISODE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,4})(?:-|\s*~\s*)(\d{1,4})").expect("range pattern"));

/// Words whose trailing number is not an episode ("Season 2", "Part 2",
/// "Kaiju No. 8").
const MARKER_WORDS: &[&str] = &["season", "part", "cour", "vol", "volume", "no"];

/// Whether a release name covers the requested episode.
///
/// A name matches when it carries the episode number as a standalone token
/// (`- 07`, `E07`, `Ep 7`, `#07`, `S01E07`), when it contains a numeric
/// range such as `01-12` or `01 ~ 26` that includes the episode, or when it
/// is labelled as a complete/batch pack.
pub fn matches_episode(name: &str, episode: u32) -> bool {
    BATCH_WORDS.is_match(name)
        || range_contains(name, episode)
        || episode_numbers(name).contains(&episode)
}

fn range_contains(name: &str, episode: u32) -> bool {
    EPISODE_RANGE.captures_iter(name).any(|caps| {
        let (Some(lo), Some(hi)) = (caps.get(1), caps.get(2)) else {
            return false;
        };

        let before = name[..lo.start()].chars().next_back();
        let after = name[hi.end()..].chars().next();
        if before.is_some_and(|c| c.is_alphanumeric() || c == '.')
            || after.is_some_and(|c| c.is_alphanumeric())
        {
            return false;
        }

        match (lo.as_str().parse::<u32>(), hi.as_str().parse::<u32>()) {
            (Ok(lo), Ok(hi)) => lo < hi && (lo..=hi).contains(&episode),
            _ => false,
        }
    })
}

/// Numbers in the name that are positioned like episode numbers.
fn episode_numbers(name: &str) -> Vec<u32> {
    let chars: Vec<char> = name.chars().collect();
    let mut numbers = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i - start > 4 || !is_episode_token(&chars, start, i) {
            continue;
        }
        let digits: String = chars[start..i].iter().collect();
        if let Ok(n) = digits.parse() {
            numbers.push(n);
        }
    }

    numbers
}

fn is_episode_token(chars: &[char], start: usize, end: usize) -> bool {
    let before = start.checked_sub(1).map(|i| chars[i]);
    let after = chars.get(end).copied();

    // Decimals such as "5.1" audio.
    if before == Some('.') && start >= 2 && chars[start - 2].is_ascii_digit() {
        return false;
    }
    if after == Some('.') && chars.get(end + 1).is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }

    let prefix_ok = match before {
        None => true,
        Some(c) if c.is_alphabetic() => {
            let prefix = word_before(chars, start);
            matches!(prefix.as_str(), "e" | "ep" | "episode")
        }
        Some(c) => is_delimiter(c) && !follows_marker_word(chars, start),
    };
    if !prefix_ok {
        return false;
    }

    match after {
        None => true,
        // Version suffix: "07v2".
        Some('v') | Some('V') => chars.get(end + 1).is_some_and(|c| c.is_ascii_digit()),
        Some(c) => is_delimiter(c),
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '[' | ']' | '(' | ')' | '-' | '_' | '.' | '~' | '#' | ',' | '+'
        )
}

/// Lower-cased run of letters ending right before `pos`.
fn word_before(chars: &[char], pos: usize) -> String {
    let mut start = pos;
    while start > 0 && chars[start - 1].is_alphabetic() {
        start -= 1;
    }
    chars[start..pos].iter().collect::<String>().to_lowercase()
}

fn follows_marker_word(chars: &[char], pos: usize) -> bool {
    let mut end = pos;
    while end > 0 && (chars[end - 1].is_whitespace() || chars[end - 1] == '.') {
        end -= 1;
    }
    let word = word_before(chars, end);
    MARKER_WORDS.contains(&word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_delimited_episode() {
        let name = "[SubsPlease] Kimetsu no Yaiba - 07 (1080p) [A1B2C3D4].mkv";
        assert!(matches_episode(name, 7));
        assert!(!matches_episode(name, 1));
        assert!(!matches_episode(name, 1080));
    }

    #[test]
    fn test_episode_prefixes() {
        assert!(matches_episode("Kimetsu no Yaiba E07 720p", 7));
        assert!(matches_episode("Kimetsu no Yaiba Ep07", 7));
        assert!(matches_episode("Kimetsu no Yaiba Episode 7 [720p]", 7));
        assert!(matches_episode("Kimetsu no Yaiba #07", 7));
    }

    #[test]
    fn test_season_episode_notation() {
        let name = "Kimetsu no Yaiba S01E07 1080p x264";
        assert!(matches_episode(name, 7));
        assert!(!matches_episode(name, 1));
        assert!(!matches_episode(name, 264));
    }

    #[test]
    fn test_marker_words_are_not_episodes() {
        let name = "Show Season 2 - 05 [720p]";
        assert!(matches_episode(name, 5));
        assert!(!matches_episode(name, 2));
        assert!(!matches_episode("Show 2nd Season - 05", 2));
    }

    #[test]
    fn test_number_in_title_is_not_an_episode() {
        let name = "[SubsPlease] Kaiju No. 8 - 03 (1080p)";
        assert!(matches_episode(name, 3));
        assert!(!matches_episode(name, 8));
        assert!(matches_episode("[SubsPlease] Kaiju No. 8 - 08 (1080p)", 8));
        assert!(!matches_episode("Kaiju No.8 - 03", 8));
        assert!(!matches_episode("Show Vol.2 - 05", 2));
    }

    #[test]
    fn test_no_partial_number_match() {
        assert!(!matches_episode("Show - 17 [1080p]", 7));
        assert!(!matches_episode("Show - 170 [1080p]", 17));
    }

    #[test]
    fn test_version_suffix() {
        assert!(matches_episode("Show - 07v2 [720p]", 7));
    }

    #[test]
    fn test_decimals_are_ignored() {
        let name = "Show AAC 5.1 - 03";
        assert!(matches_episode(name, 3));
        assert!(!matches_episode(name, 5));
        assert!(!matches_episode(name, 1));
    }

    #[test]
    fn test_batch_ranges() {
        let name = "Show (01-12) [1080p]";
        assert!(matches_episode(name, 1));
        assert!(matches_episode(name, 5));
        assert!(matches_episode(name, 12));
        assert!(!matches_episode(name, 13));
        assert!(matches_episode("Show 01~26 BD", 20));
    }

    #[test]
    fn test_resolution_is_not_a_range_end() {
        assert!(!matches_episode("Show - 07 - 1080p", 12));
    }

    #[test]
    fn test_complete_and_batch_words() {
        assert!(matches_episode("Show Complete Series [BD 1080p]", 99));
        assert!(matches_episode("[Group] Show (Batch)", 3));
    }
}
