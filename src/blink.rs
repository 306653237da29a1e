//! The blink entity and the rules that keep its key space and targets sane.

use serde::Serialize;
use url::Url;

/// Prefix shared by every stored blink key.
pub const KEY_PREFIX: &str = "blink:";

/// A short identifier mapped to the URL it resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Blink {
    pub blink_url: String,
    pub redirect_url: String,
    /// UNIX timestamp in seconds, kept as the string the store holds.
    pub created_at: String,
}

impl Blink {
    /// A new blink stamped with the current time.
    pub fn new(blink_url: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        Self {
            blink_url: blink_url.into(),
            redirect_url: redirect_url.into(),
            created_at: chrono::Utc::now().timestamp().to_string(),
        }
    }

    pub fn key(&self) -> String {
        store_key(&self.blink_url)
    }
}

pub fn store_key(blink_url: &str) -> String {
    format!("{}{}", KEY_PREFIX, blink_url)
}

/// Recover the blink id from a store key, `None` for keys outside the namespace.
pub fn blink_url_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(KEY_PREFIX)
}

/// Lowercase the identifier so `FooBar` and `foobar` share one key.
///
/// Returns `None` when nothing addressable is left: an empty id, or one
/// containing `/` which could never be matched as a single path segment.
pub fn normalize_blink_url(raw: &str) -> Option<String> {
    let id = raw.trim();
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(id.to_lowercase())
}

/// Default to `http://` for bare hosts such as `example.com`.
pub fn with_default_scheme(raw: &str) -> String {
    let url = raw.trim();
    if has_http_scheme(url) {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

/// Absolute URL with both a scheme and a non-empty host.
pub fn is_valid_redirect_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| url.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false)
}
