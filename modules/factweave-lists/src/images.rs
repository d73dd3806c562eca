//! Image enrichment for generated lists: validate what the model produced,
//! replace dead links, and find URLs for items that have none.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use factweave_common::{Category, ImageStatus, RankedItem};
use search_client::images::ImageFinder;
use search_client::validate::validate_image_url;
use search_client::ImageSize;

/// Where candidate image URLs come from and how liveness is checked.
/// The status transitions in [`ImageEnricher`] are written against this
/// seam so they can be exercised without network access.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Best candidate URL for a query, or None.
    async fn find(&self, query: &str) -> Option<String>;

    /// Whether the URL currently serves an image.
    async fn is_live(&self, url: &str) -> bool;
}

/// Production source: provider image search plus HTTP liveness validation.
pub struct WebImageSource {
    finder: ImageFinder,
    http: Client,
}

impl WebImageSource {
    pub fn new(finder: ImageFinder) -> Self {
        Self {
            finder,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ImageSource for WebImageSource {
    async fn find(&self, query: &str) -> Option<String> {
        self.finder.find(query, ImageSize::Medium).await
    }

    async fn is_live(&self, url: &str) -> bool {
        validate_image_url(&self.http, url).await
    }
}

pub struct ImageEnricher {
    source: Box<dyn ImageSource>,
}

impl ImageEnricher {
    pub fn new(finder: ImageFinder) -> Self {
        Self::from_source(WebImageSource::new(finder))
    }

    pub fn from_source(source: impl ImageSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Validate every item's image URL, replacing broken ones and finding
    /// URLs for items that have none. Sets [`ImageStatus`] per item; only
    /// URLs that pass liveness validation are kept.
    pub async fn validate_and_fix(&self, items: &mut [RankedItem], category: &Category) {
        let total = items.len();
        info!(total, "Validating item image URLs");

        for (i, item) in items.iter_mut().enumerate() {
            debug!(item = i + 1, total, title = %item.title, "Processing item image");

            match item.image_url.take() {
                Some(url) if self.source.is_live(&url).await => {
                    item.image_url = Some(url);
                    item.image_status = ImageStatus::Valid;
                }
                Some(_) => {
                    debug!(title = %item.title, "Image URL broken, searching for replacement");
                    self.replace(item, category, ImageStatus::Replaced).await;
                }
                None => {
                    self.replace(item, category, ImageStatus::Found).await;
                }
            }
        }
    }

    /// Search for a fresh URL and validate it. `on_success` distinguishes a
    /// replacement from a first find; dead or missing candidates leave the
    /// item without a URL.
    async fn replace(&self, item: &mut RankedItem, category: &Category, on_success: ImageStatus) {
        match self.source.find(&search_query(item, category)).await {
            Some(url) if self.source.is_live(&url).await => {
                item.image_url = Some(url);
                item.image_status = on_success;
            }
            Some(_) => {
                item.image_status = ImageStatus::Failed;
            }
            None => {
                item.image_status = if on_success == ImageStatus::Replaced {
                    ImageStatus::Failed
                } else {
                    ImageStatus::NotFound
                };
            }
        }
    }
}

// The category word steers the query optimizer toward poster/cover style
// results.
fn search_query(item: &RankedItem, category: &Category) -> String {
    format!("{} {} {}", item.title, item.creator, category)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stub source with a fixed candidate and an allow-list of live URLs.
    struct StubSource {
        found: Option<&'static str>,
        live: Vec<&'static str>,
    }

    #[async_trait]
    impl ImageSource for StubSource {
        async fn find(&self, _query: &str) -> Option<String> {
            self.found.map(str::to_string)
        }

        async fn is_live(&self, url: &str) -> bool {
            self.live.contains(&url)
        }
    }

    fn item(image_url: Option<&str>) -> RankedItem {
        RankedItem {
            title: "The Matrix".to_string(),
            creator: "The Wachowskis".to_string(),
            year: Some(1999),
            description: None,
            genres: Vec::new(),
            rank: 1,
            estimated_time: None,
            rating: None,
            accolades: Vec::new(),
            image_url: image_url.map(str::to_string),
            image_status: ImageStatus::Unchecked,
        }
    }

    async fn run(source: StubSource, image_url: Option<&str>) -> RankedItem {
        let mut items = vec![item(image_url)];
        ImageEnricher::from_source(source)
            .validate_and_fix(&mut items, &Category::Movies)
            .await;
        items.pop().unwrap()
    }

    #[tokio::test]
    async fn live_existing_url_is_kept_as_valid() {
        let source = StubSource {
            found: None,
            live: vec!["https://cdn.example/poster.jpg"],
        };
        let item = run(source, Some("https://cdn.example/poster.jpg")).await;
        assert_eq!(item.image_status, ImageStatus::Valid);
        assert_eq!(item.image_url.as_deref(), Some("https://cdn.example/poster.jpg"));
    }

    #[tokio::test]
    async fn broken_url_with_live_candidate_is_replaced() {
        let source = StubSource {
            found: Some("https://cdn.example/fresh.jpg"),
            live: vec!["https://cdn.example/fresh.jpg"],
        };
        let item = run(source, Some("https://cdn.example/dead.jpg")).await;
        assert_eq!(item.image_status, ImageStatus::Replaced);
        assert_eq!(item.image_url.as_deref(), Some("https://cdn.example/fresh.jpg"));
    }

    #[tokio::test]
    async fn broken_url_with_dead_candidate_fails() {
        let source = StubSource {
            found: Some("https://cdn.example/also-dead.jpg"),
            live: vec![],
        };
        let item = run(source, Some("https://cdn.example/dead.jpg")).await;
        assert_eq!(item.image_status, ImageStatus::Failed);
        assert!(item.image_url.is_none());
    }

    #[tokio::test]
    async fn broken_url_with_no_candidate_fails() {
        let source = StubSource {
            found: None,
            live: vec![],
        };
        let item = run(source, Some("https://cdn.example/dead.jpg")).await;
        assert_eq!(item.image_status, ImageStatus::Failed);
        assert!(item.image_url.is_none());
    }

    #[tokio::test]
    async fn missing_url_with_live_candidate_is_found() {
        let source = StubSource {
            found: Some("https://cdn.example/new.jpg"),
            live: vec!["https://cdn.example/new.jpg"],
        };
        let item = run(source, None).await;
        assert_eq!(item.image_status, ImageStatus::Found);
        assert_eq!(item.image_url.as_deref(), Some("https://cdn.example/new.jpg"));
    }

    #[tokio::test]
    async fn missing_url_with_dead_candidate_fails() {
        let source = StubSource {
            found: Some("https://cdn.example/dead.jpg"),
            live: vec![],
        };
        let item = run(source, None).await;
        assert_eq!(item.image_status, ImageStatus::Failed);
        assert!(item.image_url.is_none());
    }

    #[tokio::test]
    async fn missing_url_with_no_candidate_is_not_found() {
        let source = StubSource {
            found: None,
            live: vec![],
        };
        let item = run(source, None).await;
        assert_eq!(item.image_status, ImageStatus::NotFound);
        assert!(item.image_url.is_none());
    }

    #[test]
    fn query_carries_title_creator_and_category() {
        let query = search_query(&item(None), &Category::Movies);
        assert_eq!(query, "The Matrix The Wachowskis movies");
    }
}
