pub mod error;
pub mod settings;
pub mod types;

pub use error::SettingsError;
pub use settings::ProviderSettings;
pub use types::*;
