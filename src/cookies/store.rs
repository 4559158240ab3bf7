//! Cookie store adapter.
//!
//! A [`CookieStore`] is the get/set/erase capability the consent controller is given.
//! [`DocumentCookieStore`] implements it over any [`CookieDocument`] by building record
//! strings on write and scanning the header string on read.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use cookie_consent::cookies::{CookieOptions, CookieStore, DocumentCookieStore, InMemoryCookieDocument};
//!
//! let store = DocumentCookieStore::new(Arc::new(InMemoryCookieDocument::secure()));
//! store.set_cookie("site_theme", "dark", &CookieOptions::days(365)).unwrap();
//! assert_eq!(store.get_cookie("site_theme").as_deref(), Some("dark"));
//!
//! store.erase_cookie("site_theme").unwrap();
//! assert!(store.get_cookie("site_theme").is_none());
//! ```
use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use crate::cookies::document::CookieDocumentHandle;
use crate::cookies::{format_http_date, validate_name, Cookie, SameSite};
use crate::errors::ConsentError;

const SECONDS_PER_DAY: i64 = 86_400;

/// A handle to a type-erased cookie store.
///
/// Stores synchronize internally; all trait methods take `&self`.
pub type CookieStoreHandle = Arc<dyn CookieStore + Send + Sync>;

/// Attributes applied when writing a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieOptions {
    /// Lifetime in days from now. `None` and `Some(0)` write a session cookie, a negative
    /// value writes an already expired cookie.
    pub days: Option<i64>,
    /// Request the `Secure` attribute. Only honoured on encrypted pages.
    pub secure: bool,
    /// SameSite policy
    pub same_site: SameSite,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            days: None,
            secure: true,
            same_site: SameSite::Strict,
        }
    }
}

impl CookieOptions {
    /// Default options with an expiry `days` from now.
    pub fn days(days: i64) -> Self {
        Self {
            days: Some(days),
            ..Self::default()
        }
    }
}

/// Get/set/erase of name-value pairs.
pub trait CookieStore: Send + Sync {
    /// Writes `name=value` with root path and the given options.
    fn set_cookie(&self, name: &str, value: &str, options: &CookieOptions) -> Result<(), ConsentError>;

    /// Returns the value of the first cookie named exactly `name`, or `None`.
    fn get_cookie(&self, name: &str) -> Option<String>;

    /// Expires the cookie `name` on the root path.
    fn erase_cookie(&self, name: &str) -> Result<(), ConsentError>;
}

/// Cookie store that reads and writes a [`CookieDocument`](crate::cookies::CookieDocument).
pub struct DocumentCookieStore {
    document: CookieDocumentHandle,
}

impl DocumentCookieStore {
    pub fn new(document: CookieDocumentHandle) -> Self {
        Self { document }
    }

    /// Builds the record string that [`CookieStore::set_cookie`] would write at `now`.
    ///
    /// Fails with [`ConsentError::ExpiryOutOfRange`] when `now + days` is not a representable date.
    pub fn build_record(
        &self,
        name: &str,
        value: &str,
        options: &CookieOptions,
        now: OffsetDateTime,
    ) -> Result<String, ConsentError> {
        let mut cookie = Cookie::new(name, value);
        cookie.expires = match options.days {
            None | Some(0) => None,
            Some(days) => {
                let expires = days
                    .checked_mul(SECONDS_PER_DAY)
                    .and_then(|secs| now.checked_add(Duration::seconds(secs)))
                    .ok_or(ConsentError::ExpiryOutOfRange(days))?;
                Some(format_http_date(expires))
            }
        };
        cookie.path = Some("/".to_string());
        cookie.secure = options.secure && self.document.is_secure_context();
        cookie.same_site = Some(options.same_site);
        Ok(cookie.to_record())
    }
}

impl CookieStore for DocumentCookieStore {
    fn set_cookie(&self, name: &str, value: &str, options: &CookieOptions) -> Result<(), ConsentError> {
        validate_name(name)?;

        let record = self.build_record(name, value, options, self.document.now())?;
        log::trace!("writing cookie record {:?}", record);
        self.document.write_cookie(&record)?;
        Ok(())
    }

    fn get_cookie(&self, name: &str) -> Option<String> {
        let header = self.document.cookie_header();
        header
            .split(';')
            .map(str::trim_start)
            .find_map(|segment| match segment.split_once('=') {
                Some((k, v)) if k == name => Some(v.to_string()),
                _ => None,
            })
    }

    fn erase_cookie(&self, name: &str) -> Result<(), ConsentError> {
        validate_name(name)?;

        let mut cookie = Cookie::new(name, "");
        cookie.expires = Some(format_http_date(OffsetDateTime::UNIX_EPOCH));
        cookie.path = Some("/".to_string());
        self.document.write_cookie(&cookie.to_record())?;
        Ok(())
    }
}
