//! Consent events and the bus they are published on.
//!
//! The controller publishes a [`ConsentEvent`] for every observable transition: banner
//! visibility, decisions, loads, each category enable routine, stored preference cookies
//! and forwarded tracking events. Subscribers receive them through a
//! [`Subscription`]; publishing never fails, even without subscribers.

use crate::preferences::{Category, PreferenceSet};
use tokio::sync::broadcast;

/// Default capacity of the event channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 128;

/// A handle for receiving consent events.
pub type Subscription = broadcast::Receiver<ConsentEvent>;

/// Observable transitions of the consent controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsentEvent {
    /// The banner was shown because no decision is stored
    BannerShown,
    /// The banner was hidden after a decision
    BannerHidden,
    /// Preferences were read from the preference cookie. `recovered` is set when the stored
    /// value was malformed and defaults were used instead.
    PreferencesLoaded {
        preferences: PreferenceSet,
        recovered: bool,
    },
    /// The user decided (accept all, reject all or custom save)
    DecisionMade { preferences: PreferenceSet },
    /// The enable routine of an optional category ran
    CategoryEnabled(Category),
    /// A functional cookie (theme, language, font size or custom preference) was written
    PreferenceStored { name: String, value: String },
    /// A tracking event was forwarded to the tag hook
    EventTracked { name: String },
    /// The settings modal was opened or closed
    SettingsVisibility { open: bool },
    /// Consent was withdrawn and all consent cookies erased
    ConsentReset,
}

#[derive(Debug)]
pub(crate) struct ConsentBus {
    tx: broadcast::Sender<ConsentEvent>,
}

impl Default for ConsentBus {
    fn default() -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl ConsentBus {
    pub(crate) fn subscribe(&self) -> Subscription {
        self.tx.subscribe()
    }

    pub(crate) fn publish(&self, ev: ConsentEvent) {
        // send() only fails when nobody is listening, which is fine.
        let _ = self.tx.send(ev);
    }
}
