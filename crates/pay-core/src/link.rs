//! # Payment Link Lookup
//!
//! Finds an existing hosted checkout link by its URL, a URL suffix, or the
//! URL's path. Both the short `url` and the `long_url` of a record are
//! candidates. The first matching record wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::{ParseError, Url};

/// Links fetched per lookup. Only the first page is searched.
pub const PAYMENT_LINK_PAGE_SIZE: u32 = 100;

/// Base for resolving a bare-path query to its own path portion
const PATH_BASE: &str = "http://query.invalid/";

/// A provider payment link object, passed through to callers unmodified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentLinkRecord(Value);

impl PaymentLinkRecord {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// The hosted checkout URL, if the record has one
    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(Value::as_str)
    }

    /// The long-form checkout URL the short link redirects to
    pub fn long_url(&self) -> Option<&str> {
        self.0.get("long_url").and_then(Value::as_str)
    }

    /// Does any of this record's URLs match `query`? Records without a
    /// short `url` never match.
    pub fn matches(&self, query: &str) -> bool {
        let Some(url) = self.url() else {
            return false;
        };
        link_matches(url, query) || self.long_url().is_some_and(|long| link_matches(long, query))
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Does the stored link URL match the caller's query?
///
/// Matches when the query equals the stored URL, is a literal suffix of it,
/// or when the stored URL's path ends with the query's path. A query may be
/// a full URL or a bare path; anything that fails to parse is a non-match,
/// as is a query whose path is empty or `/`.
pub fn link_matches(stored_url: &str, query: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    if stored_url == query || stored_url.ends_with(query) {
        return true;
    }
    path_suffix_matches(stored_url, query).unwrap_or(false)
}

fn path_suffix_matches(stored_url: &str, query: &str) -> Option<bool> {
    let stored = Url::parse(stored_url).ok()?;
    let query_path = match Url::parse(query) {
        Ok(url) => url.path().to_string(),
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(PATH_BASE).ok()?.join(query).ok()?.path().to_string()
        }
        Err(_) => return None,
    };

    if query_path.is_empty() || query_path == "/" {
        return Some(false);
    }
    Some(stored.path().ends_with(&query_path))
}

/// First record whose `url` or `long_url` matches `query`
pub fn find_payment_link<'a>(
    records: &'a [PaymentLinkRecord],
    query: &str,
) -> Option<&'a PaymentLinkRecord> {
    records.iter().find(|record| record.matches(query))
}
