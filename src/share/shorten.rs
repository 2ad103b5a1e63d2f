//! URL shortening via the public TinyURL create endpoint.
//!
//! The endpoint takes the full share URL as a query parameter and answers
//! with plain text: either a shortener-domain URL or an error string.
//! Failures are not retried; the user retries by re-invoking the action.

use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{codec::MAX_SHARE_URL_CHARS, ShareError};

/// Public shortener endpoint.
pub const SHORTENER_ENDPOINT: &str = "https://tinyurl.com/api-create.php";

/// A successful response must point at the shortener's own domain.
const SHORTENER_DOMAIN: &str = "https://tinyurl.com/";

/// Request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Shorten a share URL.
///
/// The length gate is re-checked here so a payload can never reach the
/// network over the limit, regardless of which path produced the URL.
pub async fn shorten_url(share_url: &str) -> Result<String, ShareError> {
    if share_url.len() > MAX_SHARE_URL_CHARS {
        return Err(ShareError::UrlTooLong {
            length: share_url.len(),
            overage: share_url.len() - MAX_SHARE_URL_CHARS,
            limit: MAX_SHARE_URL_CHARS,
        });
    }

    let mut endpoint = Url::parse(SHORTENER_ENDPOINT).expect("Invalid shortener endpoint");
    endpoint.query_pairs_mut().append_pair("url", share_url);

    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;

    debug!("Requesting short URL ({} characters in)", share_url.len());
    let response = client.get(endpoint).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ShareError::ShortenerResponse(format!("HTTP {}", status)));
    }

    let body = response.text().await?.trim().to_string();
    if body.starts_with(SHORTENER_DOMAIN) {
        debug!("Short URL: {}", body);
        Ok(body)
    } else {
        Err(ShareError::ShortenerResponse(body))
    }
}
