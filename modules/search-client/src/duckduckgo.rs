//! Keyless web search via the DuckDuckGo HTML endpoint.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

use crate::error::{Result, SearchError};
use crate::types::SearchHit;
use crate::SearchBackend;

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) factweave/0.1";
const MAX_HITS: usize = 10;

pub struct DuckDuckGo {
    http: reqwest::Client,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGo {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        debug!(query, "DuckDuckGo search");

        let response = self
            .http
            .get(DDG_HTML_URL)
            .query(&[("q", query)])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let html = response.text().await?;
        Ok(parse_results(&html))
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

fn result_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#)
            .expect("valid regex")
    })
}

fn snippet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#).expect("valid regex")
    })
}

/// Parse the result list out of the DuckDuckGo HTML page.
/// Snippets are matched positionally; a page with mismatched counts still
/// yields hits, just with empty snippets at the tail.
pub(crate) fn parse_results(html: &str) -> Vec<SearchHit> {
    let snippets: Vec<String> = snippet_re()
        .captures_iter(html)
        .map(|cap| clean_html(&cap[1]))
        .collect();

    result_link_re()
        .captures_iter(html)
        .take(MAX_HITS)
        .enumerate()
        .filter_map(|(i, cap)| {
            let url = resolve_redirect(&cap[1])?;
            Some(SearchHit {
                title: clean_html(&cap[2]),
                url,
                snippet: snippets.get(i).cloned().unwrap_or_default(),
            })
        })
        .collect()
}

/// DuckDuckGo links point through `//duckduckgo.com/l/?uddg=<target>`;
/// unwrap them to the real destination.
fn resolve_redirect(href: &str) -> Option<String> {
    let absolute = if let Some(stripped) = href.strip_prefix("//") {
        format!("https://{stripped}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    if parsed.domain() == Some("duckduckgo.com") {
        for (key, value) in parsed.query_pairs() {
            if key == "uddg" {
                return Some(value.into_owned());
            }
        }
        return None;
    }
    Some(absolute)
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"))
}

fn clean_html(s: &str) -> String {
    let without_tags = tag_re().replace_all(s, "");
    without_tags
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
        <div class="result">
          <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.org%2Fpage&amp;rut=abc">The <b>Example</b> Page</a>
          <a class="result__snippet" href="#">A snippet with &amp; entities</a>
        </div>
        <div class="result">
          <a rel="nofollow" class="result__a" href="https://direct.example/doc">Direct Link</a>
          <a class="result__snippet" href="#">Second snippet</a>
        </div>
    "##;

    #[test]
    fn parses_results_and_unwraps_redirects() {
        let hits = parse_results(SAMPLE);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://example.org/page");
        assert_eq!(hits[0].title, "The Example Page");
        assert_eq!(hits[0].snippet, "A snippet with & entities");
        assert_eq!(hits[1].url, "https://direct.example/doc");
    }

    #[test]
    fn empty_page_yields_no_hits() {
        assert!(parse_results("<html><body>no results</body></html>").is_empty());
    }

    #[test]
    fn redirect_without_uddg_is_dropped() {
        let html = r#"<a class="result__a" href="//duckduckgo.com/l/?rut=abc">Ad</a>"#;
        assert!(parse_results(html).is_empty());
    }
}
