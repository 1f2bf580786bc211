//! Magnet URI helpers.

/// Extract the info hash from a magnet URI's `btih:` component.
///
/// Matching is case-insensitive and the hash is returned lower-cased.
/// Only 40-character hex and 32-character base32 hashes are accepted.
pub fn extract_info_hash(magnet_uri: &str) -> Option<String> {
    let lower = magnet_uri.to_ascii_lowercase();
    let start = lower.find("btih:")? + "btih:".len();
    let hash: String = lower[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();

    let valid = match hash.len() {
        40 => hash.chars().all(|c| c.is_ascii_hexdigit()),
        32 => hash
            .chars()
            .all(|c| c.is_ascii_lowercase() || ('2'..='7').contains(&c)),
        _ => false,
    };
    valid.then_some(hash)
}

/// Build a magnet URI from an info hash, display name and tracker list.
pub fn build_magnet(info_hash: &str, name: &str, trackers: &[String]) -> String {
    let mut magnet = format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        info_hash.to_lowercase(),
        urlencoding::encode(name)
    );
    for tracker in trackers {
        magnet.push_str("&tr=");
        magnet.push_str(&urlencoding::encode(tracker));
    }
    magnet
}
