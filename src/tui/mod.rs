pub mod action;
pub mod app;
pub mod component;
pub mod components;
pub mod keybindings;
pub mod layout;
pub mod theme;
pub mod widgets;

pub use action::{Action, ActionCategory};
pub use app::App;
pub use component::{Component, Focusable};
pub use components::{BoundSettingField, SettingsPanel};
pub use keybindings::{KeyBinding, KeyBindings, KeyPattern};
pub use theme::Theme;
pub use widgets::DescriptionMode;
