//! Cookies: [`Cookie`], the injected [`CookieDocument`] and the [`CookieStore`] adapter.
//!
//! The layering mirrors what a page sees:
//! - a [`CookieDocument`] is the ambient `document.cookie`: one header string to read,
//!   one record string per write, plus the knowledge whether the page is served securely;
//! - a [`CookieStore`] is the get/set/erase capability built on top of a document and
//!   handed to the consent controller.

mod cookie;
mod document;
mod store;

pub use cookie::{format_http_date, parse_http_date, validate_name, Cookie, SameSite};

pub use document::CookieDocument;
pub use document::CookieDocumentHandle;
pub use document::CookieTable;
pub use document::InMemoryCookieDocument;
pub use document::JsonCookieDocument;

pub use store::CookieOptions;
pub use store::CookieStore;
pub use store::CookieStoreHandle;
pub use store::DocumentCookieStore;
