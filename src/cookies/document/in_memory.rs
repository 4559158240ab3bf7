use std::sync::RwLock;

use time::{Duration, OffsetDateTime};
use url::Url;

use crate::cookies::document::{CookieDocument, CookieTable};

/// In-memory cookie document for a single page (no persistence).
///
/// The page URL decides the secure context (`https` only) and the default cookie path.
/// The document keeps its own clock offset so expiry can be tested by moving time forward.
pub struct InMemoryCookieDocument {
    /// URL of the page this document belongs to
    page: Url,
    /// Cookies currently set
    table: RwLock<CookieTable>,
    /// Offset added to the wall clock
    skew: RwLock<Duration>,
}

impl InMemoryCookieDocument {
    pub fn new(page: Url) -> Self {
        Self {
            page,
            table: RwLock::new(CookieTable::new()),
            skew: RwLock::new(Duration::ZERO),
        }
    }

    /// Creates a document for `https://localhost/`.
    pub fn secure() -> Self {
        Self::new(Url::parse("https://localhost/").expect("static URL is valid"))
    }

    /// Creates a document for `http://localhost/`.
    pub fn insecure() -> Self {
        Self::new(Url::parse("http://localhost/").expect("static URL is valid"))
    }

    /// Moves the document clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut skew = self.skew.write().unwrap_or_else(|e| e.into_inner());
        *skew += by;
    }

    /// Returns a copy of all stored cookies, including attributes.
    pub fn snapshot(&self) -> CookieTable {
        self.table.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl CookieDocument for InMemoryCookieDocument {
    fn cookie_header(&self) -> String {
        let now = self.now();
        self.table
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .header(&self.page, now)
    }

    fn write_cookie(&self, record: &str) -> anyhow::Result<()> {
        let now = self.now();
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        table.apply_record(record, &self.page, now);
        Ok(())
    }

    fn is_secure_context(&self) -> bool {
        self.page.scheme() == "https"
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc() + *self.skew.read().unwrap_or_else(|e| e.into_inner())
    }
}
