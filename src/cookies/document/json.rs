//! JSON-backed cookie document.
//!
//! `JsonCookieDocument` keeps the cookie table of one page in a single JSON file. Every
//! write reloads the file, merges the record and rewrites the file, so separate document
//! instances pointing at the same file (a later visit) observe the same cookies.
//!
//! ### Caveats
//! - File writes are not atomic.
//! - Expired cookies are purged on every write.
//! - I/O and serialization failures are returned to the caller, never panicked on.
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use url::Url;

use crate::cookies::document::{CookieDocument, CookieTable};

/// A file-backed cookie document for a single page.
pub struct JsonCookieDocument {
    /// URL of the page this document belongs to
    page: Url,
    /// Path to the JSON file where cookies are stored
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl JsonCookieDocument {
    /// Opens (or creates) a JSON cookie document at `path`.
    ///
    /// If the file does not exist, an empty table is written.
    pub fn new(page: Url, path: PathBuf) -> anyhow::Result<Self> {
        let doc = Self {
            page,
            path,
            lock: Mutex::new(()),
        };

        if !doc.path.exists() {
            doc.save_file(&CookieTable::new())?;
        }

        Ok(doc)
    }

    /// Loads the table from disk.
    ///
    /// A file that cannot be deserialized is treated as empty.
    fn load_file(&self) -> anyhow::Result<CookieTable> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading cookie file {}", self.path.display()))?;

        Ok(serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("cookie file {} is corrupt, starting empty: {}", self.path.display(), e);
            CookieTable::new()
        }))
    }

    fn save_file(&self, table: &CookieTable) -> anyhow::Result<()> {
        let contents = serde_json::to_string_pretty(table)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("writing cookie file {}", self.path.display()))?;
        Ok(())
    }
}

impl CookieDocument for JsonCookieDocument {
    fn cookie_header(&self) -> String {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        match self.load_file() {
            Ok(table) => table.header(&self.page, self.now()),
            Err(e) => {
                log::warn!("cannot read cookies: {:#}", e);
                String::new()
            }
        }
    }

    fn write_cookie(&self, record: &str) -> anyhow::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.now();

        let mut table = self.load_file()?;
        table.purge_expired(now);
        table.apply_record(record, &self.page, now);
        self.save_file(&table)
    }

    fn is_secure_context(&self) -> bool {
        self.page.scheme() == "https"
    }
}
