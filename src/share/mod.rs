//! Shareable list links.
//!
//! A list can be shared without any server by encoding its full shareable
//! subset into a URL. This module owns the codec, the size governance
//! gate in front of the URL-shortening service, and the name-collision
//! protocol applied when a shared list is imported.

mod codec;
mod collision;
mod shorten;

use thiserror::Error;

pub use codec::{
    decode_payload, decode_shared_url, encode_payload, extract_shared_param,
    generate_shareable_url, SharedList, MAX_SHARE_URL_CHARS, SHARE_VERSION,
};
pub use collision::{find_existing, import_as_new, overwrite_existing, strip_shared_suffix};
pub use shorten::{shorten_url, SHORTENER_ENDPOINT};

/// Failures on the share generation path. Decoding never produces these:
/// a malformed inbound payload is logged and treated as "no shared data
/// present".
#[derive(Debug, Error)]
pub enum ShareError {
    #[error(
        "Share URL is {length} characters, {overage} over the {limit} limit; \
         the list is too large to share as a link"
    )]
    UrlTooLong {
        length: usize,
        overage: usize,
        limit: usize,
    },

    #[error("Failed to serialize share payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("URL shortener request failed: {0}")]
    ShortenerRequest(#[from] reqwest::Error),

    #[error("URL shortener returned an unexpected response: {0}")]
    ShortenerResponse(String),
}
