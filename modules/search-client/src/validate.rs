//! Image URL liveness checks.
//!
//! A HEAD request is cheap, but some image hosts reject HEAD; those get a
//! ranged GET for the first kilobyte instead.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

const VALIDATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Check that a URL is reachable and serves image content.
/// Network errors and non-image responses both count as invalid.
pub async fn validate_image_url(http: &reqwest::Client, url: &str) -> bool {
    if url.is_empty() || !(url.starts_with("http://") || url.starts_with("https://")) {
        return false;
    }

    let head = http
        .head(url)
        .timeout(VALIDATION_TIMEOUT)
        .send()
        .await;

    match head {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                return has_image_content_type(&response);
            }
            if status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_IMPLEMENTED {
                return validate_with_ranged_get(http, url).await;
            }
            debug!(url, status = status.as_u16(), "Image HEAD rejected");
            false
        }
        Err(e) => {
            debug!(url, error = %e, "Image HEAD failed");
            false
        }
    }
}

/// Hosts that reject HEAD usually honour a ranged GET; one kilobyte is
/// enough to confirm the content type without downloading the image.
async fn validate_with_ranged_get(http: &reqwest::Client, url: &str) -> bool {
    let get = http
        .get(url)
        .header(reqwest::header::RANGE, "bytes=0-1023")
        .timeout(VALIDATION_TIMEOUT)
        .send()
        .await;

    match get {
        Ok(response) => {
            let status = response.status();
            (status == StatusCode::OK || status == StatusCode::PARTIAL_CONTENT)
                && has_image_content_type(&response)
        }
        Err(e) => {
            debug!(url, error = %e, "Ranged image GET failed");
            false
        }
    }
}

fn has_image_content_type(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("image/"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_non_http_urls() {
        let http = reqwest::Client::new();
        assert!(!validate_image_url(&http, "").await);
        assert!(!validate_image_url(&http, "ftp://example.com/a.jpg").await);
        assert!(!validate_image_url(&http, "not a url").await);
    }
}
