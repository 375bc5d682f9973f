pub mod setting_container;
pub mod text_input;

pub use setting_container::{DescriptionMode, SettingContainer};
pub use text_input::{MASK_CHAR, TextInput};
