use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

/// Color scheme for the settings panel
///
/// Individual styles can be overridden by name from the config file
/// (`label`, `description`, `input`, `placeholder`, `disabled`, `cursor`,
/// `border`, `border_focused`, `group`, `status`).
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI colors
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Field colors
    pub label_fg: Color,
    pub description_fg: Color,
    pub placeholder_fg: Color,
    pub disabled_fg: Color,
    pub cursor_fg: Color,
    pub cursor_bg: Color,

    // Status/feedback colors
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,

    overrides: HashMap<String, Style>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Default dark theme
    pub fn dark() -> Self {
        Self {
            name: "Default Dark".to_string(),
            background: Color::Reset,
            foreground: Color::Gray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            label_fg: Color::White,
            description_fg: Color::Gray,
            placeholder_fg: Color::DarkGray,
            disabled_fg: Color::DarkGray,
            cursor_fg: Color::Black,
            cursor_bg: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
            overrides: HashMap::new(),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            background: Color::White,
            foreground: Color::Black,
            border: Color::Gray,
            border_focused: Color::Blue,
            label_fg: Color::Black,
            description_fg: Color::DarkGray,
            placeholder_fg: Color::Gray,
            disabled_fg: Color::Gray,
            cursor_fg: Color::White,
            cursor_bg: Color::Blue,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Rgb(200, 150, 0), // Darker yellow for light bg
            info: Color::Blue,
            overrides: HashMap::new(),
        }
    }

    /// Layer named style overrides on top of this theme
    pub fn with_overrides(mut self, overrides: &HashMap<String, Style>) -> Self {
        self.overrides
            .extend(overrides.iter().map(|(name, style)| (name.clone(), *style)));
        self
    }

    fn styled(&self, name: &str, base: Style) -> Style {
        match self.overrides.get(name) {
            Some(over) => base.patch(*over),
            None => base,
        }
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn label_style(&self) -> Style {
        self.styled(
            "label",
            Style::default().fg(self.label_fg).add_modifier(Modifier::BOLD),
        )
    }

    pub fn description_style(&self) -> Style {
        self.styled("description", Style::default().fg(self.description_fg))
    }

    pub fn input_style(&self) -> Style {
        self.styled("input", Style::default().fg(self.foreground))
    }

    pub fn placeholder_style(&self) -> Style {
        self.styled(
            "placeholder",
            Style::default()
                .fg(self.placeholder_fg)
                .add_modifier(Modifier::ITALIC),
        )
    }

    pub fn disabled_style(&self) -> Style {
        self.styled(
            "disabled",
            Style::default().fg(self.disabled_fg).add_modifier(Modifier::DIM),
        )
    }

    /// Block cursor drawn over the character at the cursor position
    pub fn cursor_style(&self) -> Style {
        self.styled("cursor", Style::default().fg(self.cursor_fg).bg(self.cursor_bg))
    }

    pub fn border_style(&self) -> Style {
        self.styled("border", Style::default().fg(self.border))
    }

    pub fn focused_border_style(&self) -> Style {
        self.styled("border_focused", Style::default().fg(self.border_focused))
    }

    pub fn group_style(&self) -> Style {
        self.styled(
            "group",
            Style::default()
                .fg(self.border_focused)
                .add_modifier(Modifier::BOLD),
        )
    }

    pub fn status_style(&self) -> Style {
        self.styled("status", Style::default().fg(self.info))
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = Theme::default();
        assert_eq!(theme.name, "Default Dark");
        assert_ne!(theme.cursor_bg, Color::Reset);
    }

    #[test]
    fn test_light_theme() {
        let theme = Theme::light();
        assert_eq!(theme.name, "Light");
        assert_eq!(theme.background, Color::White);
        assert_eq!(theme.foreground, Color::Black);
    }

    #[test]
    fn test_style_helpers() {
        let theme = Theme::default();
        assert!(theme.label_style().add_modifier.contains(Modifier::BOLD));
        assert_eq!(theme.cursor_style().bg, Some(theme.cursor_bg));
        assert_ne!(theme.placeholder_style(), theme.input_style());
    }

    #[test]
    fn test_overrides_patch_base_style() {
        let mut overrides = HashMap::new();
        overrides.insert("placeholder".to_string(), Style::default().fg(Color::Magenta));
        let theme = Theme::default().with_overrides(&overrides);

        let placeholder = theme.placeholder_style();
        assert_eq!(placeholder.fg, Some(Color::Magenta));
        assert!(placeholder.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(theme.label_style(), Theme::default().label_style());
    }
}
