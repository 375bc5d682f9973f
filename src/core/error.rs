/// Errors raised by the settings store and its backends
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings document: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Unknown setting key: {0}")]
    UnknownKey(String),

    #[error("Update rejected: {0}")]
    Rejected(String),

    #[error("Settings store is shut down")]
    StoreClosed,

    #[error("Settings state lock poisoned: {0}")]
    Lock(String),
}
