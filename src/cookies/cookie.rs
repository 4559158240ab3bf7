//! Cookie record type and the `document.cookie` wire format.
//!
//! A record written to the document looks like
//!
//! ```text
//! name=value; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/; Secure; SameSite=Strict
//! ```
//!
//! `expires` is an RFC 1123 UTC timestamp and is omitted for session cookies.

use crate::errors::ConsentError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

const HTTP_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Formats `at` as an RFC 1123 date (`Thu, 01 Jan 1970 00:00:00 GMT`).
pub fn format_http_date(at: OffsetDateTime) -> String {
    let utc = at.to_offset(time::UtcOffset::UTC);
    // The format only holds literal and numeric components, so formatting cannot fail for
    // any representable date.
    utc.format(HTTP_DATE).unwrap_or_default()
}

/// Parses an RFC 1123 date as written in the `expires` attribute.
pub fn parse_http_date(s: &str) -> Option<OffsetDateTime> {
    PrimitiveDateTime::parse(s.trim(), HTTP_DATE)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Checks that `name` can be used as a cookie name without corrupting the header.
///
/// Names must be non-empty and free of `=`, `;`, `,` and whitespace.
pub fn validate_name(name: &str) -> Result<(), ConsentError> {
    let bad = name.is_empty()
        || name
            .chars()
            .any(|c| c == '=' || c == ';' || c == ',' || c.is_whitespace() || c.is_control());
    if bad {
        return Err(ConsentError::InvalidCookieName(name.to_string()));
    }
    Ok(())
}

/// SameSite policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    /// Parses a SameSite attribute value, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("strict") {
            Some(SameSite::Strict)
        } else if s.eq_ignore_ascii_case("lax") {
            Some(SameSite::Lax)
        } else if s.eq_ignore_ascii_case("none") {
            Some(SameSite::None)
        } else {
            None
        }
    }
}

impl Display for SameSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// A cookie as written to and kept by a cookie document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value, stored verbatim.
    pub value: String,

    /// Path scoping (e.g., `"/"`).
    pub path: Option<String>,

    /// Domain scoping (host-only if `None`).
    pub domain: Option<String>,

    /// If `true`, the cookie was written with the `Secure` attribute.
    pub secure: bool,

    /// Expiration timestamp in RFC 1123 form. Session cookies have `None`.
    pub expires: Option<String>,

    /// SameSite policy, if one was given.
    pub same_site: Option<SameSite>,

    /// If `true`, cookie is hidden from `document.cookie`.
    pub http_only: bool,
}

impl Cookie {
    /// Creates a session cookie without any attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            secure: false,
            expires: None,
            same_site: None,
            http_only: false,
        }
    }

    /// Returns the parsed expiry, or `None` for session cookies and unparsable dates.
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.expires.as_deref().and_then(parse_http_date)
    }

    /// A cookie is expired when its expiry lies at or before `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        match self.expires_at() {
            Some(at) => at <= now,
            None => false,
        }
    }

    /// Serializes the cookie into a record string as assigned to `document.cookie`.
    pub fn to_record(&self) -> String {
        let mut record = format!("{}={}", self.name, self.value);
        if let Some(expires) = &self.expires {
            record.push_str("; expires=");
            record.push_str(expires);
        }
        if let Some(path) = &self.path {
            record.push_str("; path=");
            record.push_str(path);
        }
        if let Some(domain) = &self.domain {
            record.push_str("; domain=");
            record.push_str(domain);
        }
        if self.secure {
            record.push_str("; Secure");
        }
        if self.http_only {
            record.push_str("; HttpOnly");
        }
        if let Some(same_site) = self.same_site {
            record.push_str("; SameSite=");
            record.push_str(&same_site.to_string());
        }
        record
    }

    /// Parses a record string. Returns `None` when the leading `name=value` pair is missing.
    ///
    /// The value is kept verbatim up to the first `;`, surrounding whitespace included.
    /// Unknown attributes are ignored, attribute names are case-insensitive.
    pub fn parse_record(record: &str) -> Option<Cookie> {
        let mut parts = record.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie::new(name, value);
        for part in parts {
            let part = part.trim();
            if let Some((k, v)) = part.split_once('=') {
                match k.trim().to_ascii_lowercase().as_str() {
                    "path" => cookie.path = Some(v.trim().to_string()),
                    "domain" => cookie.domain = Some(v.trim().trim_start_matches('.').to_string()),
                    "expires" => cookie.expires = Some(v.trim().to_string()),
                    "samesite" => cookie.same_site = SameSite::parse(v),
                    _ => {}
                }
            } else if part.eq_ignore_ascii_case("secure") {
                cookie.secure = true;
            } else if part.eq_ignore_ascii_case("httponly") {
                cookie.http_only = true;
            }
        }

        Some(cookie)
    }
}
