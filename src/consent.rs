//! Consent controller: [`ConsentController`], [`ConsentState`] and [`ConsentBuilder`].
//!
//! The controller owns two independent axes: whether a decision exists
//! ([`ConsentState`]) and which categories are granted
//! ([`PreferenceSet`](crate::preferences::PreferenceSet)). Every decision persists both
//! axes as cookies and re-applies the category-gated side effects.

mod builder;
mod controller;
mod state;

pub use builder::ConsentBuilder;
pub use controller::ConsentController;
pub use state::ConsentState;
