//! Testing utilities and mock implementations.
//!
//! Every collaborator trait has a mock here, so the resolver, discovery
//! and conversion stages can be exercised end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use anistream_core::testing::{fixtures, MockSearcher};
//!
//! let searcher = MockSearcher::new();
//! searcher
//!     .set_results(vec![fixtures::raw_result("[SubsPlease] Show - 01 (1080p)", 'a', 10)])
//!     .await;
//! ```

mod mock_anime_catalog;
mod mock_canonical_titles;
mod mock_debrid;
mod mock_searcher;

pub use mock_anime_catalog::{MockAnimeCatalog, RecordedCatalogQuery};
pub use mock_canonical_titles::MockCanonicalTitles;
pub use mock_debrid::{MockDebridProvider, RecordedDebridCall};
pub use mock_searcher::{MockSearcher, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::metadata::{AnimeEntry, AnimeFormat, AnimeTitles};
    use crate::searcher::{RawTorrentResult, TorrentRecord};

    /// A 40-character info hash made of one repeated hex digit.
    pub fn info_hash(c: char) -> String {
        std::iter::repeat(c).take(40).collect()
    }

    /// Magnet URI for [`info_hash`].
    pub fn magnet(c: char) -> String {
        format!("magnet:?xt=urn:btih:{}", info_hash(c))
    }

    /// Raw index result whose magnet carries `info_hash(hash)`.
    pub fn raw_result(name: &str, hash: char, seeders: u32) -> RawTorrentResult {
        RawTorrentResult {
            name: name.to_string(),
            magnet_uri: format!("{}&dn={}", magnet(hash), urlencoding::encode(name)),
            seeders,
            size_label: "1.4 GiB".to_string(),
        }
    }

    /// Deduplicated record for `info_hash(hash)`.
    pub fn torrent_record(name: &str, hash: char, seeders: u32) -> TorrentRecord {
        TorrentRecord {
            name: name.to_string(),
            magnet_uri: magnet(hash),
            info_hash: info_hash(hash),
            seeders,
            size_label: "1.4 GiB".to_string(),
        }
    }

    /// Catalog entry with the given titles.
    pub fn anime_entry(
        id: u64,
        romanized: Option<&str>,
        english: Option<&str>,
        native: Option<&str>,
        format: AnimeFormat,
        year: Option<u32>,
    ) -> AnimeEntry {
        AnimeEntry {
            id,
            titles: AnimeTitles {
                romanized: romanized.map(str::to_string),
                english: english.map(str::to_string),
                native: native.map(str::to_string),
                canonical: romanized.map(str::to_string),
            },
            format,
            year,
        }
    }
}
