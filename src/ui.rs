//! UI binding layer.
//!
//! Connects page controls to controller operations. Registration takes a mapping from
//! element identifier to [`Control`] and looks every identifier up on its own: an
//! identifier missing from the page gets no binding and does not affect the others.
//! [`UiBindings::bound`] exposes the result, so the skip behaviour can be checked.
//!
//! ```rust
//! use std::sync::Arc;
//! use cookie_consent::config::ElementIds;
//! use cookie_consent::consent::ConsentController;
//! use cookie_consent::dom::VirtualDom;
//! use cookie_consent::ui::UiEvent;
//!
//! let ids = ElementIds::default();
//! let mut consent = ConsentController::builder()
//!     .dom(Arc::new(VirtualDom::consent_page(&ids)))
//!     .build();
//!
//! let bindings = consent.init();
//! assert!(bindings.dispatch(&mut consent, &UiEvent::click("accept-all-cookies")));
//! assert!(consent.has_consent());
//! ```

use crate::config::ElementIds;
use crate::consent::ConsentController;
use crate::dom::Dom;

/// Controller operation a page control is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Banner button: accept every category
    AcceptAll,
    /// Banner button: reject every optional category
    RejectAll,
    /// Banner button: open the settings modal
    OpenSettings,
    /// Modal button: save the toggles
    SavePreferences,
    /// Modal button: close without saving
    CloseSettings,
    /// Click on the modal backdrop: close without saving
    ModalBackdrop,
    /// Select element: store the chosen theme
    ThemeSelector,
}

/// An interaction reported by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click { id: String },
    Change { id: String, value: String },
}

impl UiEvent {
    pub fn click(id: &str) -> Self {
        UiEvent::Click { id: id.to_string() }
    }

    pub fn change(id: &str, value: &str) -> Self {
        UiEvent::Change {
            id: id.to_string(),
            value: value.to_string(),
        }
    }

    pub fn target(&self) -> &str {
        match self {
            UiEvent::Click { id } | UiEvent::Change { id, .. } => id,
        }
    }
}

/// Controls bound to elements present on the page.
#[derive(Debug, Clone, Default)]
pub struct UiBindings {
    bindings: Vec<(String, Control)>,
}

impl UiBindings {
    /// The standard mapping of consent UI identifiers to controls.
    pub fn default_mapping(ids: &ElementIds) -> Vec<(String, Control)> {
        vec![
            (ids.accept_button.clone(), Control::AcceptAll),
            (ids.reject_button.clone(), Control::RejectAll),
            (ids.settings_button.clone(), Control::OpenSettings),
            (ids.save_button.clone(), Control::SavePreferences),
            (ids.close_button.clone(), Control::CloseSettings),
            (ids.modal.clone(), Control::ModalBackdrop),
            (ids.theme_selector.clone(), Control::ThemeSelector),
        ]
    }

    /// Binds every identifier of `mapping` that exists in `dom`, skipping the rest.
    pub fn register<I, S>(dom: &dyn Dom, mapping: I) -> Self
    where
        I: IntoIterator<Item = (S, Control)>,
        S: Into<String>,
    {
        let mut bindings = Vec::new();
        for (id, control) in mapping {
            let id = id.into();
            if dom.contains(&id) {
                bindings.push((id, control));
            } else {
                log::debug!("element {:?} not on page, {:?} not bound", id, control);
            }
        }
        Self { bindings }
    }

    /// Identifiers and controls that were bound, in registration order.
    pub fn bound(&self) -> &[(String, Control)] {
        &self.bindings
    }

    pub fn is_bound(&self, id: &str) -> bool {
        self.control_for(id).is_some()
    }

    pub fn control_for(&self, id: &str) -> Option<Control> {
        self.bindings.iter().find(|(bound, _)| bound == id).map(|(_, c)| *c)
    }

    /// Routes `event` to the controller.
    ///
    /// Returns `false` for events on unbound elements and for events of the wrong kind
    /// (a change on a button, a click on the theme selector).
    pub fn dispatch(&self, consent: &mut ConsentController, event: &UiEvent) -> bool {
        let Some(control) = self.control_for(event.target()) else {
            return false;
        };

        match (control, event) {
            (Control::AcceptAll, UiEvent::Click { .. }) => consent.accept_all(),
            (Control::RejectAll, UiEvent::Click { .. }) => consent.reject_all(),
            (Control::OpenSettings, UiEvent::Click { .. }) => consent.open_settings(),
            (Control::SavePreferences, UiEvent::Click { .. }) => consent.save_custom_preferences(),
            (Control::CloseSettings, UiEvent::Click { .. }) => consent.close_settings(),
            (Control::ModalBackdrop, UiEvent::Click { .. }) => consent.close_settings(),
            (Control::ThemeSelector, UiEvent::Change { value, .. }) => {
                consent.save_theme(value);
            }
            _ => return false,
        }
        true
    }
}
