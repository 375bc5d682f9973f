pub mod bound_field;
pub mod provider_fields;
pub mod settings_panel;

pub use bound_field::{BoundSettingField, FieldOptions, FieldSpec, InputKind};
pub use settings_panel::{SettingsPanel, StatusLine};
