//! Cookie consent manager.
//!
//! Persists a consent decision and a four-category [`PreferenceSet`](preferences::PreferenceSet)
//! in cookies, gates theme/language/font-size storage, analytics and marketing behind those
//! categories, and wires the banner, settings modal and theme selector to the controller.
//!
//! ```rust
//! use std::sync::Arc;
//! use cookie_consent::config::ElementIds;
//! use cookie_consent::consent::ConsentController;
//! use cookie_consent::cookies::{DocumentCookieStore, InMemoryCookieDocument};
//! use cookie_consent::dom::VirtualDom;
//!
//! let store = Arc::new(DocumentCookieStore::new(Arc::new(InMemoryCookieDocument::secure())));
//! let dom = Arc::new(VirtualDom::consent_page(&ElementIds::default()));
//!
//! let mut consent = ConsentController::builder().store(store).dom(dom.clone()).build();
//! let _bindings = consent.init();
//! assert!(!consent.has_consent());
//!
//! consent.reject_all();
//! assert!(consent.has_consent());
//! assert!(!consent.save_theme("dark"));
//! ```
pub mod config;
pub mod consent;
pub mod cookies;
pub mod dom;
pub mod errors;
pub mod event;
pub mod hooks;
pub mod preferences;
pub mod ui;

pub use config::ConsentConfig;
pub use consent::{ConsentController, ConsentState};
pub use errors::ConsentError;
pub use preferences::{Category, PreferenceSet};
