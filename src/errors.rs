#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    #[error("Invalid cookie name: {0:?}")]
    InvalidCookieName(String),

    #[error("Malformed preferences: {0}")]
    MalformedPreferences(#[from] serde_json::Error),

    #[error("The necessary category cannot be disabled")]
    NecessaryCategory,

    #[error("Cookie expiry of {0} days is out of range")]
    ExpiryOutOfRange(i64),

    #[error("Cookie storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for ConsentError {
    fn from(e: anyhow::Error) -> Self {
        ConsentError::Storage(e.to_string())
    }
}
