use crate::tui::action::Action;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

/// Maps KeyEvents to Actions
///
/// Plain printable characters are never bound: they are text input for the
/// focused field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(rename = "bindings")]
    bindings_list: Vec<KeyBinding>,

    #[serde(skip)]
    bindings_map: HashMap<KeyPattern, Action>,
}

/// Single keybinding entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    pub action: Action,
}

/// Pattern for matching key events
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPattern {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_list(vec![
            // Field navigation
            KeyBinding::new("Tab", Action::FocusNext),
            KeyBinding::new("Shift+Tab", Action::FocusPrev),
            KeyBinding::new("Down", Action::FocusNext),
            KeyBinding::new("Up", Action::FocusPrev),
            // Cursor
            KeyBinding::new("Left", Action::CursorLeft),
            KeyBinding::new("Right", Action::CursorRight),
            KeyBinding::new("Home", Action::CursorHome),
            KeyBinding::new("End", Action::CursorEnd),
            KeyBinding::new("Ctrl+a", Action::CursorHome),
            KeyBinding::new("Ctrl+e", Action::CursorEnd),
            // Editing
            KeyBinding::new("Backspace", Action::DeleteBackward),
            KeyBinding::new("Delete", Action::DeleteForward),
            KeyBinding::new("Ctrl+u", Action::ClearField),
            // View
            KeyBinding::new("F1", Action::ToggleHelp),
            KeyBinding::new("F2", Action::ToggleDescriptions),
            KeyBinding::new("F5", Action::Refresh),
            KeyBinding::new("Ctrl+r", Action::Refresh),
            // Providers
            KeyBinding::new("Ctrl+t", Action::CheckProvider),
            KeyBinding::new("Ctrl+p", Action::CheckCompletion),
            // Application
            KeyBinding::new("Ctrl+q", Action::Quit),
            KeyBinding::new("Ctrl+c", Action::Quit),
            KeyBinding::new("Esc", Action::Cancel),
            KeyBinding::new("Enter", Action::Confirm),
        ])
    }
}

impl KeyBindings {
    fn from_list(bindings_list: Vec<KeyBinding>) -> Self {
        let bindings_map = Self::build_map(&bindings_list);
        Self {
            bindings_list,
            bindings_map,
        }
    }

    /// Build hashmap from bindings list
    fn build_map(bindings: &[KeyBinding]) -> HashMap<KeyPattern, Action> {
        bindings
            .iter()
            .filter_map(|b| {
                KeyPattern::from_string(&b.key)
                    .ok()
                    .map(|pattern| (pattern, b.action))
            })
            .collect()
    }

    /// Get action for key event
    pub fn get_action(&self, key: &KeyEvent) -> Option<Action> {
        let pattern = KeyPattern::from_event(key);
        self.bindings_map.get(&pattern).copied()
    }

    /// Load from JSON config file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let bindings: KeyBindings = serde_json::from_str(&content)?;
        Ok(Self::from_list(bindings.bindings_list))
    }

    /// Save to JSON config file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get all bindings for an action (for help display)
    pub fn get_keys_for_action(&self, action: Action) -> Vec<String> {
        self.bindings_list
            .iter()
            .filter(|b| b.action == action)
            .map(|b| b.key.clone())
            .collect()
    }

    /// Actions without any binding, with their descriptions
    pub fn get_unbound_actions(&self) -> Vec<(Action, &'static str)> {
        let bound_actions: HashSet<Action> = self.bindings_list.iter().map(|b| b.action).collect();

        Action::all()
            .into_iter()
            .filter(|action| !bound_actions.contains(action))
            .map(|action| (action, action.description()))
            .collect()
    }

    /// Validate bindings and return warnings
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let mut seen_keys: HashMap<String, Action> = HashMap::new();
        for binding in &self.bindings_list {
            if let Some(existing_action) = seen_keys.get(&binding.key) {
                warnings.push(format!(
                    "Duplicate key '{}': bound to both {:?} and {:?}",
                    binding.key, existing_action, binding.action
                ));
            } else {
                seen_keys.insert(binding.key.clone(), binding.action);
            }
        }

        let unbound = self.get_unbound_actions();
        if !unbound.is_empty() {
            warnings.push(format!(
                "{} action(s) have no keybindings: {}",
                unbound.len(),
                unbound
                    .iter()
                    .map(|(action, _)| format!("{:?}", action))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        for binding in &self.bindings_list {
            match KeyPattern::from_string(&binding.key) {
                Err(_) => warnings.push(format!(
                    "Invalid key pattern '{}' for action {:?}",
                    binding.key, binding.action
                )),
                Ok(pattern) if pattern.is_text_input() => warnings.push(format!(
                    "Key '{}' for action {:?} is text input and will never fire inside a field",
                    binding.key, binding.action
                )),
                Ok(_) => {}
            }
        }

        warnings
    }
}

impl KeyBinding {
    pub fn new(key: &str, action: Action) -> Self {
        Self {
            key: key.to_string(),
            action,
        }
    }
}

impl KeyPattern {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::normalized(code, modifiers)
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self::normalized(event.code, event.modifiers)
    }

    /// Terminals report Shift+Tab as BackTab, with or without the Shift flag
    fn normalized(code: KeyCode, mut modifiers: KeyModifiers) -> Self {
        let code = match code {
            KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            other => other,
        };
        if code == KeyCode::BackTab {
            modifiers.insert(KeyModifiers::SHIFT);
        }
        Self { code, modifiers }
    }

    /// True if this key would be typed into a field rather than trigger an action
    pub fn is_text_input(&self) -> bool {
        matches!(self.code, KeyCode::Char(_))
            && !self
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    }

    /// Parse from string (e.g., "Ctrl+C", "Shift+Tab", "F2")
    pub fn from_string(s: &str) -> Result<Self, String> {
        let parts: Vec<&str> = s.split('+').collect();

        let mut modifiers = KeyModifiers::empty();
        let key_part = if parts.len() > 1 {
            for part in &parts[..parts.len() - 1] {
                match part.to_lowercase().as_str() {
                    "ctrl" => modifiers |= KeyModifiers::CONTROL,
                    "alt" => modifiers |= KeyModifiers::ALT,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    "cmd" | "command" | "super" => {
                        // Mac Command key maps to SUPER
                        #[cfg(target_os = "macos")]
                        {
                            modifiers |= KeyModifiers::SUPER;
                        }
                        #[cfg(not(target_os = "macos"))]
                        {
                            modifiers |= KeyModifiers::CONTROL;
                        }
                    }
                    _ => return Err(format!("Unknown modifier: {}", part)),
                }
            }
            parts[parts.len() - 1]
        } else {
            parts[0]
        };

        let code = match key_part.to_lowercase().as_str() {
            "up" | "↑" => KeyCode::Up,
            "down" | "↓" => KeyCode::Down,
            "left" | "←" => KeyCode::Left,
            "right" | "→" => KeyCode::Right,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdown" | "pgdn" => KeyCode::PageDown,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "insert" | "ins" => KeyCode::Insert,
            "space" => KeyCode::Char(' '),

            // Single characters (before the function key check so "f" stays a char)
            single if single.chars().count() == 1 => match single.chars().next() {
                Some(ch) => KeyCode::Char(ch),
                None => return Err(format!("Unknown key: {}", key_part)),
            },

            // Function keys: F1-F12
            function if function.starts_with('f') && (2..=3).contains(&function.len()) => {
                match function[1..].parse::<u8>() {
                    Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
                    _ => return Err(format!("Invalid function key: {}", function)),
                }
            }

            _ => return Err(format!("Unknown key: {}", key_part)),
        };

        Ok(Self::normalized(code, modifiers))
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if self.modifiers.contains(KeyModifiers::SUPER) {
            parts.push(if cfg!(target_os = "macos") { "Cmd" } else { "Super" }.to_string());
        }
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) && self.code != KeyCode::BackTab {
            parts.push("Shift".to_string());
        }

        parts.push(match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            other => format!("{:?}", other),
        });

        write!(f, "{}", parts.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    #[test]
    fn test_key_pattern_parsing() {
        assert!(KeyPattern::from_string("Ctrl+c").is_ok());
        assert!(KeyPattern::from_string("F2").is_ok());
        assert!(KeyPattern::from_string("Up").is_ok());
        assert!(KeyPattern::from_string("Ctrl+Alt+Delete").is_ok());
        assert!(KeyPattern::from_string("Hyper+x").is_err());
        assert!(KeyPattern::from_string("F13").is_err());
    }

    #[test]
    fn test_shift_tab_matches_backtab_events() {
        let bindings = KeyBindings::default();
        let with_shift = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        let without_shift = KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE);
        assert_eq!(bindings.get_action(&with_shift), Some(Action::FocusPrev));
        assert_eq!(bindings.get_action(&without_shift), Some(Action::FocusPrev));
    }

    #[test]
    fn test_ctrl_bindings_resolve() {
        let bindings = KeyBindings::default();
        let mut key = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Press;
        assert_eq!(bindings.get_action(&key), Some(Action::CheckProvider));

        let plain = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE);
        assert_eq!(bindings.get_action(&plain), None);
    }

    #[test]
    fn test_default_bindings_are_valid() {
        let bindings = KeyBindings::default();
        let warnings = bindings.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_text_input_binding_is_flagged() {
        let bindings = KeyBindings::from_list(vec![KeyBinding::new("q", Action::Quit)]);
        let warnings = bindings.validate();
        assert!(warnings.iter().any(|w| w.contains("text input")));
    }

    #[test]
    fn test_display() {
        let pattern = KeyPattern::from_string("Ctrl+t").unwrap();
        assert_eq!(pattern.to_string(), "Ctrl+t");
        let backtab = KeyPattern::from_string("Shift+Tab").unwrap();
        assert_eq!(backtab.to_string(), "Shift+Tab");
    }

    #[test]
    fn test_save_and_load() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keybindings.json");

        let bindings = KeyBindings::default();
        bindings.save_to_file(&path).unwrap();

        let loaded = KeyBindings::load_from_file(&path).unwrap();
        assert_eq!(bindings.bindings_list.len(), loaded.bindings_list.len());
        let f2 = KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE);
        assert_eq!(loaded.get_action(&f2), Some(Action::ToggleDescriptions));
    }
}
