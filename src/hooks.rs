//! External tag hooks.
//!
//! A page may carry a third-party analytics/advertising tag. The consent manager talks to
//! it through [`TagHook`]: a two-argument consent update and a named event. The hook is
//! optional everywhere; its absence simply means the feature is unavailable.

use serde_json::Value;
use std::fmt::Display;
use std::sync::{Arc, Mutex};

/// A handle to a type-erased tag hook.
pub type TagHookHandle = Arc<dyn TagHook + Send + Sync>;

/// Storage kind whose consent is signalled to the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentSignal {
    AnalyticsStorage,
    AdStorage,
}

impl Display for ConsentSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsentSignal::AnalyticsStorage => write!(f, "analytics_storage"),
            ConsentSignal::AdStorage => write!(f, "ad_storage"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentStatus {
    Granted,
    Denied,
}

impl Display for ConsentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsentStatus::Granted => write!(f, "granted"),
            ConsentStatus::Denied => write!(f, "denied"),
        }
    }
}

/// Third-party tag the consent manager signals to.
pub trait TagHook: Send + Sync {
    /// Updates the consent state of one storage kind.
    fn update_consent(&self, signal: ConsentSignal, status: ConsentStatus);

    /// Records a named event with free-form data.
    fn event(&self, name: &str, data: &Value);
}

/// A single call received by a [`RecordingTagHook`].
#[derive(Debug, Clone, PartialEq)]
pub enum TagCall {
    Consent(ConsentSignal, ConsentStatus),
    Event(String, Value),
}

/// Tag hook that records every call, in order.
#[derive(Debug, Default)]
pub struct RecordingTagHook {
    calls: Mutex<Vec<TagCall>>,
}

impl RecordingTagHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all calls so far.
    pub fn calls(&self) -> Vec<TagCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Names of all recorded events.
    pub fn event_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TagCall::Event(name, _) => Some(name),
                TagCall::Consent(..) => None,
            })
            .collect()
    }

    fn record(&self, call: TagCall) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }
}

impl TagHook for RecordingTagHook {
    fn update_consent(&self, signal: ConsentSignal, status: ConsentStatus) {
        log::debug!("tag consent update: {}={}", signal, status);
        self.record(TagCall::Consent(signal, status));
    }

    fn event(&self, name: &str, data: &Value) {
        log::debug!("tag event: {}", name);
        self.record(TagCall::Event(name.to_string(), data.clone()));
    }
}
