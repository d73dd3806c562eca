//! Image URL search: find a poster/cover/photo URL for a list item.
//!
//! Serper and Brave have dedicated image endpoints. DuckDuckGo does not, so
//! the fallback runs site-scoped text searches over media-rich sites and
//! pulls image URLs out of the result text with a regex set.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::brave::BraveSearch;
use crate::duckduckgo::DuckDuckGo;
use crate::rate_limit::RateLimiter;
use crate::serper::SerperSearch;
use crate::types::{hits_to_text, ImageSize, SearchProviderKind};
use crate::{ProviderKeys, SearchBackend};

/// Sites that reliably embed poster/cover art in their result snippets.
const MEDIA_SITES: &[&str] = &[
    "imdb.com",
    "wikipedia.org",
    "ign.com",
    "metacritic.com",
    "gamespot.com",
    "allmusic.com",
    "discogs.com",
    "themoviedb.org",
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Drop filler words and append media-type hints so image search lands on
/// poster/cover art instead of stills or news photos.
pub fn optimize_image_query(query: &str) -> String {
    let lower = query.to_lowercase();
    let mut words: Vec<&str> = lower
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w))
        .collect();

    if lower.contains("movie") || lower.contains("film") {
        words.extend(["poster", "movie"]);
    } else if lower.contains("game") {
        words.extend(["cover", "game"]);
    } else if lower.contains("album") || lower.contains("music") {
        words.extend(["album", "cover"]);
    } else if lower.contains("sport") || lower.contains("athlete") {
        words.push("photo");
    }

    words.join(" ")
}

fn image_url_res() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            // Direct image URLs
            r#"https?://[^\s<>"']+\.(?:jpg|jpeg|png|gif|webp)(?:\?[^\s<>"']*)?"#,
            // Image-path URLs without an extension in the match
            r#"https?://[^\s<>"']*(?:image|img|poster|cover|photo|picture)[^\s<>"']*\.(?:jpg|jpeg|png|gif|webp)"#,
            // Known hosts
            r#"https?://m\.media-amazon\.com/images/[^\s<>"']+"#,
            r#"https?://upload\.wikimedia\.org/[^\s<>"']+\.(?:jpg|jpeg|png|gif|webp)"#,
            // CDN patterns
            r#"https?://[^\s<>"']*cdn[^\s<>"']*\.(?:jpg|jpeg|png|gif|webp)"#,
            r#"https?://[^\s<>"']*static[^\s<>"']*\.(?:jpg|jpeg|png|gif|webp)"#,
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    })
}

fn trailing_junk_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[.,;:!?'">\])}]+$"#).expect("valid regex"))
}

/// Pull candidate image URLs out of free text, deduplicated in order.
pub fn extract_image_urls(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for re in image_url_res() {
        for m in re.find_iter(text) {
            let cleaned = trailing_junk_re().replace(m.as_str(), "").to_string();
            if looks_like_image_url(&cleaned) && !found.contains(&cleaned) {
                found.push(cleaned);
            }
        }
    }
    found
}

const IMAGE_INDICATORS: &[&str] = &[
    ".jpg",
    ".jpeg",
    ".png",
    ".gif",
    ".webp",
    ".bmp",
    "/images/",
    "/img/",
    "/poster/",
    "/cover/",
    "/photo/",
    "/picture/",
    "media-amazon.com",
    "wikimedia.org",
    "imdb.",
];

const BAD_INDICATORS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "linkedin.com",
    "youtube.com",
    "tiktok.com",
    ".css",
    ".js",
    ".html",
    ".pdf",
    // Product pages, not images
    "amazon.com/dp/",
    "amazon.com/gp/",
];

/// Quick shape check before spending a validation request on a URL.
pub fn looks_like_image_url(url: &str) -> bool {
    if url.len() < 10 || !(url.starts_with("http://") || url.starts_with("https://")) {
        return false;
    }
    let lower = url.to_lowercase();
    let has_indicator = IMAGE_INDICATORS.iter().any(|i| lower.contains(i));
    let has_bad = BAD_INDICATORS.iter().any(|b| lower.contains(b));
    has_indicator && !has_bad
}

/// Rate-limited image URL lookup over the configured provider.
pub struct ImageFinder {
    provider: ImageProvider,
    limiter: Arc<RateLimiter>,
}

enum ImageProvider {
    Serper(SerperSearch),
    Brave(BraveSearch),
    DuckDuckGo(DuckDuckGo),
}

impl ImageFinder {
    /// Like [`crate::SearchClient::for_provider`], falls back to DuckDuckGo
    /// when the requested provider has no key.
    pub fn for_provider(
        kind: SearchProviderKind,
        keys: &ProviderKeys,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        let provider = match kind {
            SearchProviderKind::Serper => match &keys.serper {
                Some(key) => ImageProvider::Serper(SerperSearch::new(key)),
                None => {
                    warn!("SERPER_API_KEY not set, image search falling back to DuckDuckGo");
                    ImageProvider::DuckDuckGo(DuckDuckGo::new())
                }
            },
            SearchProviderKind::Brave => match &keys.brave {
                Some(key) => ImageProvider::Brave(BraveSearch::new(key)),
                None => {
                    warn!("BRAVE_API_KEY not set, image search falling back to DuckDuckGo");
                    ImageProvider::DuckDuckGo(DuckDuckGo::new())
                }
            },
            SearchProviderKind::DuckDuckGo => ImageProvider::DuckDuckGo(DuckDuckGo::new()),
        };
        Self { provider, limiter }
    }

    /// Find the best candidate image URL for a query, or None.
    /// Failures are logged and reported as None; a missing image never
    /// fails a list run.
    pub async fn find(&self, query: &str, size: ImageSize) -> Option<String> {
        self.limiter.wait().await;
        let optimized = optimize_image_query(query);

        let result = match &self.provider {
            ImageProvider::Serper(serper) => match serper.search_images(&optimized, size).await {
                Ok(urls) => urls.into_iter().find(|u| looks_like_image_url(u)),
                Err(e) => {
                    warn!(query = optimized, error = %e, "Serper image search failed");
                    None
                }
            },
            ImageProvider::Brave(brave) => match brave.search_images(&optimized).await {
                Ok(urls) => urls.into_iter().find(|u| looks_like_image_url(u)),
                Err(e) => {
                    warn!(query = optimized, error = %e, "Brave image search failed");
                    None
                }
            },
            ImageProvider::DuckDuckGo(ddg) => self.find_via_duckduckgo(ddg, &optimized).await,
        };

        if let Some(ref url) = result {
            debug!(query = optimized, url, "Selected image candidate");
        }
        result
    }

    /// Site-scoped searches over media sites, then a general query with
    /// image terms appended.
    async fn find_via_duckduckgo(&self, ddg: &DuckDuckGo, query: &str) -> Option<String> {
        for site in MEDIA_SITES {
            self.limiter.wait().await;
            let site_query = format!("{query} site:{site}");
            match ddg.search(&site_query).await {
                Ok(hits) => {
                    let candidates = extract_image_urls(&hits_to_text(&hits));
                    if let Some(url) = candidates.into_iter().next() {
                        return Some(url);
                    }
                }
                Err(e) => {
                    debug!(site, error = %e, "Site-scoped image search failed");
                }
            }
        }

        self.limiter.wait().await;
        let general = format!("{query} poster cover image jpg png");
        match ddg.search(&general).await {
            Ok(hits) => extract_image_urls(&hits_to_text(&hits)).into_iter().next(),
            Err(e) => {
                warn!(query, error = %e, "General image search failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_optimization_strips_stop_words_and_adds_hints() {
        let q = optimize_image_query("The Godfather movie poster");
        assert!(!q.split_whitespace().any(|w| w == "the"));
        assert!(q.contains("poster"));
        assert!(q.contains("movie"));

        let q = optimize_image_query("Dark Side of the Moon album");
        assert!(q.contains("album"));
        assert!(q.contains("cover"));

        let q = optimize_image_query("Michael Jordan athlete");
        assert!(q.contains("photo"));
    }

    #[test]
    fn extracts_direct_image_urls_from_text() {
        let text = "See https://upload.wikimedia.org/wikipedia/en/Godfather.jpg, \
                    and https://example.com/page.html too.";
        let urls = extract_image_urls(text);
        assert_eq!(urls, vec!["https://upload.wikimedia.org/wikipedia/en/Godfather.jpg"]);
    }

    #[test]
    fn strips_trailing_punctuation() {
        let text = "(https://cdn.example.com/cover.png).";
        let urls = extract_image_urls(text);
        assert_eq!(urls, vec!["https://cdn.example.com/cover.png"]);
    }

    #[test]
    fn deduplicates_candidates() {
        let text = "https://static.example.org/a.jpg https://static.example.org/a.jpg";
        assert_eq!(extract_image_urls(text).len(), 1);
    }

    #[test]
    fn filters_social_and_document_urls() {
        assert!(!looks_like_image_url("https://facebook.com/photo/123.jpg"));
        assert!(!looks_like_image_url("https://example.com/styles.css"));
        assert!(!looks_like_image_url("https://www.amazon.com/dp/B000123"));
        assert!(!looks_like_image_url("ftp://example.com/a.jpg"));
        assert!(looks_like_image_url("https://m.media-amazon.com/images/M/poster"));
        assert!(looks_like_image_url("https://example.com/images/cover.png"));
    }
}
