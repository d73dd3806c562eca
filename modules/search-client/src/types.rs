use serde::{Deserialize, Serialize};

/// Which search provider to route queries through.
/// DuckDuckGo needs no API key and is the fallback for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchProviderKind {
    DuckDuckGo,
    Serper,
    Brave,
}

impl SearchProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "duckduckgo" | "ddg" => Some(Self::DuckDuckGo),
            "serper" | "google" => Some(Self::Serper),
            "brave" => Some(Self::Brave),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::DuckDuckGo => "duckduckgo",
            Self::Serper => "serper",
            Self::Brave => "brave",
        }
    }
}

/// One web search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchHit {
    /// Render as a line of research text: title, snippet, then source URL.
    pub fn as_text(&self) -> String {
        format!("{} - {} ({})", self.title, self.snippet, self.url)
    }
}

/// Join hits into the text blob downstream prompts consume.
pub fn hits_to_text(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(SearchHit::as_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Preferred image size for image search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Thumbnail,
    Small,
    #[default]
    Medium,
    Large,
}

impl ImageSize {
    /// Google `tbs=isz:` size parameter.
    pub fn google_param(self) -> &'static str {
        match self {
            Self::Thumbnail => "i",
            Self::Small => "s",
            Self::Medium => "m",
            Self::Large => "l",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parsing() {
        assert_eq!(SearchProviderKind::parse("google"), Some(SearchProviderKind::Serper));
        assert_eq!(SearchProviderKind::parse("DDG"), Some(SearchProviderKind::DuckDuckGo));
        assert_eq!(SearchProviderKind::parse("bing"), None);
    }

    #[test]
    fn hits_render_to_text() {
        let hits = vec![
            SearchHit {
                title: "A".into(),
                url: "https://a.example".into(),
                snippet: "first".into(),
            },
            SearchHit {
                title: "B".into(),
                url: "https://b.example".into(),
                snippet: "second".into(),
            },
        ];
        let text = hits_to_text(&hits);
        assert!(text.contains("A - first (https://a.example)"));
        assert_eq!(text.lines().count(), 2);
    }
}
