//! The page surface the consent manager reads and mutates.
//!
//! Everything is addressed by element identifier and every call tolerates a missing
//! element: setters report `false`, getters return `None`. Nothing here panics on an
//! incomplete page.

mod virtual_dom;

use std::sync::Arc;

pub use virtual_dom::{ElementKind, VirtualDom};

/// A handle to a type-erased DOM.
pub type DomHandle = Arc<dyn Dom + Send + Sync>;

/// A document-level setting applied to the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSetting {
    /// `data-theme` attribute on the root element
    Theme(String),
    /// `lang` attribute on the root element
    Language(String),
    /// `font-size` style on the root element
    FontSize(String),
}

/// Object-safe view of the page.
pub trait Dom: Send + Sync {
    /// Returns `true` if an element with `id` exists.
    fn contains(&self, id: &str) -> bool;

    /// Shows or hides the element. Returns `false` if it does not exist.
    fn set_visible(&self, id: &str, visible: bool) -> bool;

    /// Visibility of the element, `None` if it does not exist.
    fn is_visible(&self, id: &str) -> Option<bool>;

    /// Checked state of a checkbox, `None` if it does not exist or is not a checkbox.
    fn is_checked(&self, id: &str) -> Option<bool>;

    /// Sets the checked state of a checkbox. Returns `false` if it cannot.
    fn set_checked(&self, id: &str, checked: bool) -> bool;

    /// Selected value of a select element.
    fn value(&self, id: &str) -> Option<String>;

    /// Sets the selected value of a select element. Returns `false` if it cannot.
    fn set_value(&self, id: &str, value: &str) -> bool;

    /// Applies a setting to the document root.
    fn apply(&self, setting: DocumentSetting);
}
