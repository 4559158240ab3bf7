//! Consent categories and the four-category [`PreferenceSet`].
//!
//! `necessary` is pinned to `true`: every constructor sets it, deserialization re-pins it,
//! and [`PreferenceSet::set`] refuses to clear it. The optional categories are independent.
//!
//! Stored JSON is merged over the defaults: a key missing from the stored object keeps
//! its default `false`, unknown keys are ignored.

use crate::errors::ConsentError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A consent category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Required for the site to work, always granted
    Necessary,
    /// Theme, language, font size and other remembered settings
    Functional,
    /// Page views and tracked events
    Analytics,
    /// Advertising storage
    Marketing,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Necessary,
        Category::Functional,
        Category::Analytics,
        Category::Marketing,
    ];

    /// The user-settable categories.
    pub const OPTIONAL: [Category; 3] = [Category::Functional, Category::Analytics, Category::Marketing];

    /// Key used in the serialized preference object.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Necessary => "necessary",
            Category::Functional => "functional",
            Category::Analytics => "analytics",
            Category::Marketing => "marketing",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Granted/denied flag per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredPreferences")]
pub struct PreferenceSet {
    necessary: bool,
    functional: bool,
    analytics: bool,
    marketing: bool,
}

/// Shape of the stored JSON, every key optional.
#[derive(Deserialize, Default)]
#[serde(default)]
struct StoredPreferences {
    #[allow(dead_code)]
    necessary: bool,
    functional: bool,
    analytics: bool,
    marketing: bool,
}

impl From<StoredPreferences> for PreferenceSet {
    fn from(stored: StoredPreferences) -> Self {
        Self {
            necessary: true,
            functional: stored.functional,
            analytics: stored.analytics,
            marketing: stored.marketing,
        }
    }
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self::all_denied()
    }
}

impl PreferenceSet {
    /// Every optional category granted.
    pub fn all_granted() -> Self {
        Self::with_optional(true, true, true)
    }

    /// Every optional category denied. Same as the default.
    pub fn all_denied() -> Self {
        Self::with_optional(false, false, false)
    }

    /// Builds a set from the three optional flags.
    pub fn with_optional(functional: bool, analytics: bool, marketing: bool) -> Self {
        Self {
            necessary: true,
            functional,
            analytics,
            marketing,
        }
    }

    pub fn is_granted(&self, category: Category) -> bool {
        match category {
            Category::Necessary => self.necessary,
            Category::Functional => self.functional,
            Category::Analytics => self.analytics,
            Category::Marketing => self.marketing,
        }
    }

    /// Sets the flag of an optional category.
    ///
    /// Granting `necessary` is a no-op, denying it is an error.
    pub fn set(&mut self, category: Category, granted: bool) -> Result<(), ConsentError> {
        match category {
            Category::Necessary if !granted => return Err(ConsentError::NecessaryCategory),
            Category::Necessary => {}
            Category::Functional => self.functional = granted,
            Category::Analytics => self.analytics = granted,
            Category::Marketing => self.marketing = granted,
        }
        Ok(())
    }

    /// Categories currently granted, `necessary` first.
    pub fn granted(&self) -> Vec<Category> {
        Category::ALL.into_iter().filter(|c| self.is_granted(*c)).collect()
    }

    /// Parses stored JSON, merging it over the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConsentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to `{"necessary":..,"functional":..,"analytics":..,"marketing":..}`.
    pub fn to_json(&self) -> String {
        format!(
            r#"{{"necessary":{},"functional":{},"analytics":{},"marketing":{}}}"#,
            self.necessary, self.functional, self.analytics, self.marketing
        )
    }
}
