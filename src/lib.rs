#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_match)]
#![allow(clippy::collapsible_else_if)]

pub mod config;
pub mod core;
pub mod i18n;
pub mod logging;
pub mod services;
pub mod tui;

// Re-export commonly used types
pub use core::{ProviderKind, ProviderSettings, SettingKey, SettingsError};
pub use services::{JsonFileBackend, MemoryBackend, SettingsBackend, SettingsStore};
pub use tui::{Action, ActionCategory};
