use std::fmt::Display;

/// Whether the user made a consent decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsentState {
    /// No marker cookie, the banner is shown
    #[default]
    NoDecision,
    /// Marker cookie present, the banner stays hidden
    Decided,
}

impl Display for ConsentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsentState::NoDecision => write!(f, "NoDecision"),
            ConsentState::Decided => write!(f, "Decided"),
        }
    }
}
