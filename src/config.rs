use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use derive_deref::{Deref, DerefMut};
use directories::BaseDirs;
use lazy_static::lazy_static;
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize, de::Deserializer};
use tracing::{debug, warn};

use crate::tui::components::settings_panel::DEFAULT_CHAT_MODEL;
use crate::tui::{DescriptionMode, Theme};

const CONFIG: &str = include_str!("../.config/config.json5");

const SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    /// Settings document; defaults to `settings.json` in the data dir
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
    /// Optional JSON keybindings file
    #[serde(default)]
    pub keybindings_path: Option<PathBuf>,
    /// Optional JSON5 catalog layered over the built-in English strings
    #[serde(default)]
    pub locale_path: Option<PathBuf>,
    #[serde(default)]
    pub description_mode: DescriptionMode,
    #[serde(default)]
    pub theme: ThemeName,
    #[serde(default)]
    pub styles: Styles,
    /// Model used by the completion check
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Load the config at `config_path`, or the per-user config file,
    /// creating it from the embedded defaults when missing.
    pub fn from_path(config_path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let selected_path = match config_path {
            Some(path) => expand_tilde(path),
            None => {
                let home_cfg = default_home_config_path();
                if !home_cfg.exists() {
                    if let Some(parent) = home_cfg.parent() {
                        let _ = fs::create_dir_all(parent);
                    }
                    if let Err(e) = fs::write(&home_cfg, CONFIG) {
                        warn!("Could not write default config to {}: {e}", home_cfg.display());
                    }
                }
                home_cfg
            }
        };
        Self::from_file(&selected_path)
    }

    /// Embedded defaults overlaid with the JSON5 file at `path`
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        debug!("Loading config from {}", path.display());
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5))
            .add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Json5)
                    .required(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Config made of the embedded defaults only
    pub fn embedded() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("data_dir", get_data_dir().to_string_lossy().to_string())?
            .set_default("config_dir", get_config_dir().to_string_lossy().to_string())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5))
            .build()?
            .try_deserialize()
    }

    /// Resolved location of the settings document
    pub fn settings_file(&self) -> PathBuf {
        match &self.settings_path {
            Some(path) => expand_tilde(path),
            None => self.config.data_dir.join(SETTINGS_FILE),
        }
    }

    pub fn keybindings_file(&self) -> Option<PathBuf> {
        self.keybindings_path.as_deref().map(expand_tilde)
    }

    pub fn locale_file(&self) -> Option<PathBuf> {
        self.locale_path.as_deref().map(expand_tilde)
    }

    /// Selected base theme with the configured style overrides applied
    pub fn theme(&self) -> Theme {
        let base = match self.theme {
            ThemeName::Dark => Theme::dark(),
            ThemeName::Light => Theme::light(),
        };
        base.with_overrides(&self.styles)
    }
}

pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(base) = BaseDirs::new() {
            return base.home_dir().join(rest);
        }
    }
    path.to_path_buf()
}

fn default_home_config_path() -> PathBuf {
    if let Some(base) = BaseDirs::new() {
        return base.home_dir().join(".settui-config.json5");
    }
    PathBuf::from(".settui-config.json5")
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else {
        PathBuf::from(".").join(".config")
    }
}

/// Named style overrides, written as strings such as `"bold yellow on blue"`
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Styles(pub HashMap<String, Style>);

impl<'de> Deserialize<'de> for Styles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(Styles(
            parsed_map
                .into_iter()
                .map(|(name, style_string)| (name, parse_style(&style_string)))
                .collect(),
        ))
    }
}

pub fn parse_style(line: &str) -> Style {
    let lower = line.to_lowercase();
    let (foreground, background) = match lower.find("on ") {
        Some(at) => (&lower[..at], &lower[at + 3..]),
        None => (lower.as_str(), ""),
    };
    let (fg_name, fg_modifiers) = process_color_string(foreground);
    let (bg_name, bg_modifiers) = process_color_string(background);

    let mut style = Style::default();
    if let Some(fg) = parse_color(&fg_name) {
        style = style.fg(fg);
    }
    if let Some(bg) = parse_color(&bg_name) {
        style = style.bg(bg);
    }
    style.add_modifier(fg_modifiers | bg_modifiers)
}

/// Split modifier words from a color phrase
fn process_color_string(color_str: &str) -> (String, Modifier) {
    let mut modifiers = Modifier::empty();
    let mut color = Vec::new();
    for word in color_str.split_whitespace() {
        match word {
            "bold" => modifiers |= Modifier::BOLD,
            "italic" => modifiers |= Modifier::ITALIC,
            "dim" => modifiers |= Modifier::DIM,
            "underline" => modifiers |= Modifier::UNDERLINED,
            "inverse" => modifiers |= Modifier::REVERSED,
            other => color.push(other.replace("grey", "gray")),
        }
    }
    (color.join(" "), modifiers)
}

/// Accepts ratatui color names and hex (`"light blue"`, `"#ff8800"`),
/// `colorN` for indexed colors, `grayN` for the 24-step gray ramp and
/// `rgbRGB` for the 6x6x6 cube.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(index) = s.strip_prefix("color") {
        return index.trim().parse::<u8>().ok().map(Color::Indexed);
    }
    if let Some(step) = s.strip_prefix("gray").filter(|rest| !rest.is_empty()) {
        return step
            .parse::<u8>()
            .ok()
            .filter(|step| *step < 24)
            .map(|step| Color::Indexed(232 + step));
    }
    if let Some(cube) = s.strip_prefix("rgb") {
        let digits: Vec<u8> = cube
            .chars()
            .filter_map(|c| c.to_digit(6).map(|d| d as u8))
            .collect();
        if let [r, g, b] = digits[..] {
            return Some(Color::Indexed(16 + r * 36 + g * 6 + b));
        }
        return None;
    }
    s.parse::<Color>().ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::Builder;

    use super::*;

    #[test]
    fn test_parse_style_default() {
        let style = parse_style("");
        assert_eq!(style, Style::default());
    }

    #[test]
    fn test_parse_style_foreground_and_background() {
        let style = parse_style("bold yellow on blue");
        assert_eq!(style.fg, Some(Color::Yellow));
        assert_eq!(style.bg, Some(Color::Blue));
        assert!(style.add_modifier.contains(Modifier::BOLD));

        assert_eq!(parse_style("on red").bg, Some(Color::Red));
    }

    #[test]
    fn test_process_color_string() {
        let (color, modifiers) = process_color_string("underline bold inverse grey");
        assert_eq!(color, "gray");
        assert!(modifiers.contains(Modifier::UNDERLINED));
        assert!(modifiers.contains(Modifier::BOLD));
        assert!(modifiers.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("rgb123"), Some(Color::Indexed(16 + 36 + 2 * 6 + 3)));
        assert_eq!(parse_color("gray5"), Some(Color::Indexed(237)));
        assert_eq!(parse_color("color42"), Some(Color::Indexed(42)));
        assert_eq!(parse_color("#ff8800"), Some(Color::Rgb(0xff, 0x88, 0x00)));
        assert_eq!(parse_color("gray"), Some(Color::Gray));
        assert_eq!(parse_color("unknown"), None);
        assert_eq!(parse_color("rgb9"), None);
    }

    #[test]
    fn test_embedded_defaults() {
        let cfg = Config::embedded().unwrap();
        assert_eq!(cfg.description_mode, DescriptionMode::Inline);
        assert_eq!(cfg.theme, ThemeName::Dark);
        assert!(cfg.settings_path.is_none());
        assert_eq!(cfg.settings_file(), cfg.config.data_dir.join("settings.json"));
        assert_eq!(cfg.chat_model, "gpt-4o-mini");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = Builder::new().suffix(".json5").tempfile().unwrap();
        writeln!(
            file,
            r#"{{
                // user overrides
                description_mode: "tooltip",
                theme: "light",
                chat_model: "local-llama",
                settings_path: "/tmp/settui/settings.json",
                styles: {{ label: "bold magenta" }},
            }}"#
        )
        .unwrap();

        let cfg = Config::from_file(file.path()).unwrap();
        assert_eq!(cfg.description_mode, DescriptionMode::Tooltip);
        assert_eq!(cfg.theme, ThemeName::Light);
        assert_eq!(cfg.chat_model, "local-llama");
        assert_eq!(cfg.settings_file(), PathBuf::from("/tmp/settui/settings.json"));
        assert_eq!(cfg.styles.get("label").and_then(|s| s.fg), Some(Color::Magenta));
        assert_eq!(cfg.theme().label_style().fg, Some(Color::Magenta));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::from_file(Path::new("/nonexistent/settui.json5")).is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let plain = PathBuf::from("/etc/settui.json5");
        assert_eq!(expand_tilde(&plain), plain);
        if BaseDirs::new().is_some() {
            assert!(!expand_tilde(Path::new("~/settings.json")).starts_with("~"));
        }
    }
}
