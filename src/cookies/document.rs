//! The ambient cookie document.
//!
//! A [`CookieDocument`] is what a page script sees as `document.cookie`: reading yields a
//! header string of `name=value` pairs joined by `"; "`, writing takes exactly one record
//! string and lets the document merge it into its state the way a user agent does.
//!
//! Both backends share the merge rules through [`CookieTable`]:
//! - a record for an existing name (and path) overwrites it, last write wins;
//! - a record whose `expires` lies in the past removes the cookie;
//! - a `Secure` record is refused on a page that is not served over an encrypted transport;
//! - expired and `HttpOnly` cookies never show up in the header.
//!
//! This module exports two implementations:
//! - [`InMemoryCookieDocument`]: in-process state, used for tests and ephemeral pages.
//! - [`JsonCookieDocument`]: file-backed state, so a later visit sees earlier decisions.
mod in_memory;
mod json;

use crate::cookies::Cookie;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use url::Url;

pub use in_memory::InMemoryCookieDocument;
pub use json::JsonCookieDocument;

/// A handle to a type-erased cookie document.
pub type CookieDocumentHandle = Arc<dyn CookieDocument + Send + Sync>;

/// Object-safe view of `document.cookie`.
///
/// Implementations must be internally synchronized; all methods take `&self`.
pub trait CookieDocument: Send + Sync {
    /// Returns the current cookie header (`a=1; b=2`), empty when no cookie is visible.
    fn cookie_header(&self) -> String;

    /// Writes a single cookie record string.
    fn write_cookie(&self, record: &str) -> anyhow::Result<()>;

    /// Returns `true` if the page is served over an encrypted transport.
    fn is_secure_context(&self) -> bool;

    /// Current time as seen by the document, used to compute and check expiries.
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Cookie state of a single page, shared by the document backends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookieTable {
    /// Cookies in insertion order, which is also the order of the header.
    pub cookies: Vec<Cookie>,
}

impl CookieTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a record string into the table.
    ///
    /// Returns `false` if the record was refused (unparsable, or `Secure` on an insecure page).
    pub fn apply_record(&mut self, record: &str, page: &Url, now: OffsetDateTime) -> bool {
        let Some(mut cookie) = Cookie::parse_record(record) else {
            log::debug!("ignoring malformed cookie record {:?}", record);
            return false;
        };

        if cookie.secure && page.scheme() != "https" {
            log::debug!("refusing secure cookie {:?} on insecure page {}", cookie.name, page);
            return false;
        }

        if cookie.path.is_none() {
            cookie.path = Some(default_path(page).to_string());
        }

        let position = self
            .cookies
            .iter()
            .position(|c| c.name == cookie.name && c.path == cookie.path);

        if cookie.is_expired(now) {
            if let Some(idx) = position {
                self.cookies.remove(idx);
            }
            return true;
        }

        match position {
            Some(idx) => self.cookies[idx] = cookie,
            None => self.cookies.push(cookie),
        }
        true
    }

    /// Builds the header visible to scripts on `page` at `now`.
    pub fn header(&self, page: &Url, now: OffsetDateTime) -> String {
        let path = page.path();
        let host = page.host_str().unwrap_or_default();
        let is_https = page.scheme() == "https";

        self.cookies
            .iter()
            .filter(|c| !c.http_only && !c.is_expired(now))
            .filter(|c| match &c.domain {
                Some(domain) => host == domain || host.ends_with(&format!(".{}", domain)),
                None => true,
            })
            .filter(|c| match &c.path {
                Some(cookie_path) => path_matches(path, cookie_path),
                None => true,
            })
            .filter(|c| !c.secure || is_https)
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Drops every cookie that expired before `now`.
    pub fn purge_expired(&mut self, now: OffsetDateTime) {
        self.cookies.retain(|c| !c.is_expired(now));
    }
}

/// RFC 6265 path-match: `cookie_path` is `request_path` or a prefix of it ending on a
/// segment boundary.
fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    match request_path.strip_prefix(cookie_path) {
        Some(rest) => rest.is_empty() || cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

/// Default cookie path for a page: the directory part of its path.
fn default_path(page: &Url) -> &str {
    page.path()
        .rsplit_once('/')
        .map_or("/", |(a, _)| if a.is_empty() { "/" } else { a })
}
