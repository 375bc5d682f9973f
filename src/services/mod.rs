pub mod backend;
pub mod provider_check;
pub mod settings_store;

pub use backend::{JsonFileBackend, MemoryBackend, SettingsBackend};
pub use provider_check::{CheckKind, CheckOutcome, ProbeError, ProviderEndpoint};
pub use settings_store::{SettingSubscription, SettingsStore};
