//! Nyaa RSS search backend.
//!
//! Nyaa exposes search results as an RSS feed with `nyaa:` extension
//! elements carrying the info hash, seeders and size of each torrent.

use std::time::Duration;

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use reqwest::Client;
use tracing::debug;

use crate::config::NyaaConfig;

use super::magnet::build_magnet;
use super::{RawTorrentResult, SearchCategory, SearchError, SearchQuery, Searcher};

/// Nyaa category covering every category.
const ALL_CATEGORIES: &str = "0_0";

/// Nyaa RSS search backend.
pub struct NyaaSearcher {
    client: Client,
    config: NyaaConfig,
}

impl NyaaSearcher {
    pub fn new(config: NyaaConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self { client, config })
    }

    fn category_for(&self, query: &SearchQuery) -> &str {
        match query.category {
            None | Some(SearchCategory::Anime) => &self.config.category,
            Some(_) => ALL_CATEGORIES,
        }
    }
}

#[async_trait]
impl Searcher for NyaaSearcher {
    fn name(&self) -> &str {
        "nyaa"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawTorrentResult>, SearchError> {
        let url = format!("{}/", self.config.base_url.trim_end_matches('/'));
        debug!(query = %query.query, "Searching Nyaa");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("page", "rss"),
                ("q", query.query.as_str()),
                ("c", self.category_for(query)),
                ("f", "0"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response.bytes().await?;
        let results = parse_nyaa_feed(&body, &self.config.trackers)?;

        debug!(query = %query.query, results = results.len(), "Nyaa search complete");
        Ok(results)
    }
}

/// Parse a Nyaa RSS feed, building magnets with the given trackers.
///
/// Items without a title or info hash are skipped.
pub fn parse_nyaa_feed(
    xml: &[u8],
    trackers: &[String],
) -> Result<Vec<RawTorrentResult>, SearchError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut buf = Vec::new();

    let mut current_item: Option<NyaaItemBuilder> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" {
                    current_item = Some(NyaaItemBuilder::default());
                }
                current_element = name;
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(item) = current_item.take().and_then(|b| b.build(trackers)) {
                        items.push(item);
                    }
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                if let Some(ref mut item) = current_item {
                    let text = e.unescape().unwrap_or_default().to_string();
                    if !text.is_empty() {
                        match current_element.as_str() {
                            "title" => item.title = Some(text),
                            "nyaa:infoHash" => item.info_hash = Some(text.to_lowercase()),
                            "nyaa:seeders" => item.seeders = text.parse().ok(),
                            "nyaa:size" => item.size = Some(text),
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SearchError::ParseError(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

#[derive(Default)]
struct NyaaItemBuilder {
    title: Option<String>,
    info_hash: Option<String>,
    seeders: Option<u32>,
    size: Option<String>,
}

impl NyaaItemBuilder {
    fn build(self, trackers: &[String]) -> Option<RawTorrentResult> {
        let title = self.title?;
        let info_hash = self.info_hash?;
        Some(RawTorrentResult {
            magnet_uri: build_magnet(&info_hash, &title, trackers),
            name: title,
            seeders: self.seeders.unwrap_or(0),
            size_label: self.size.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss xmlns:atom="http://www.w3.org/2005/Atom" xmlns:nyaa="https://nyaa.si/xmlns/nyaa" version="2.0">
  <channel>
    <title>Nyaa - "kimetsu no yaiba 01" - Torrent File RSS</title>
    <item>
      <title>[SubsPlease] Kimetsu no Yaiba - 01 (1080p) [A1B2C3D4].mkv</title>
      <link>https://nyaa.si/download/1.torrent</link>
      <nyaa:seeders>321</nyaa:seeders>
      <nyaa:leechers>4</nyaa:leechers>
      <nyaa:infoHash>0123456789ABCDEF0123456789ABCDEF01234567</nyaa:infoHash>
      <nyaa:size>1.4 GiB</nyaa:size>
    </item>
    <item>
      <title>Kimetsu &amp; Friends - 01</title>
      <nyaa:seeders>2</nyaa:seeders>
      <nyaa:infoHash>abcdef0123456789abcdef0123456789abcdef01</nyaa:infoHash>
      <nyaa:size>300.0 MiB</nyaa:size>
    </item>
    <item>
      <title>No hash here</title>
      <nyaa:seeders>50</nyaa:seeders>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed() {
        let trackers = vec!["udp://tracker.example:1337/announce".to_string()];
        let items = parse_nyaa_feed(FEED.as_bytes(), &trackers).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].name,
            "[SubsPlease] Kimetsu no Yaiba - 01 (1080p) [A1B2C3D4].mkv"
        );
        assert_eq!(items[0].seeders, 321);
        assert_eq!(items[0].size_label, "1.4 GiB");
        assert!(items[0]
            .magnet_uri
            .starts_with("magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567"));
        assert!(items[0].magnet_uri.contains("&tr=udp%3A%2F%2Ftracker.example"));

        assert_eq!(items[1].name, "Kimetsu & Friends - 01");
    }

    #[test]
    fn test_channel_title_is_not_an_item() {
        let items = parse_nyaa_feed(FEED.as_bytes(), &[]).unwrap();
        assert!(items.iter().all(|i| !i.name.starts_with("Nyaa -")));
    }

    #[test]
    fn test_parse_empty_feed() {
        let xml = r#"<rss><channel><title>empty</title></channel></rss>"#;
        assert!(parse_nyaa_feed(xml.as_bytes(), &[]).unwrap().is_empty());
    }
}
