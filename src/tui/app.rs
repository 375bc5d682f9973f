use crate::i18n::Catalog;
use crate::services::SettingsStore;
use crate::tui::components::SettingsPanel;
use crate::tui::layout::centered_rect;
use crate::tui::widgets::DescriptionMode;
use crate::tui::{Action, ActionCategory, Component, KeyBindings, Theme};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

/// Application state
///
/// Routes key events to the settings panel and owns the help overlay.
pub struct App {
    /// Settings page
    panel: SettingsPanel,

    /// Keybindings configuration
    keybindings: KeyBindings,

    /// Current theme
    theme: Theme,

    /// Whether the help overlay is visible
    show_help: bool,

    /// Whether the app should quit
    should_quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(
        store: &SettingsStore,
        runtime: Handle,
        catalog: Arc<Catalog>,
        theme: Theme,
        description_mode: DescriptionMode,
    ) -> Self {
        let panel = SettingsPanel::new(store, runtime, catalog, theme.clone(), description_mode);
        Self {
            panel,
            keybindings: KeyBindings::default(),
            theme,
            show_help: false,
            should_quit: false,
        }
    }

    /// Handle a key event
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Only handle key press events, ignore release/repeat
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Plain characters are text for the focused field
        if let KeyCode::Char(c) = key.code {
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                && self.panel.handle_input(c)?
            {
                return Ok(());
            }
        }

        // Translate key to action
        if let Some(action) = self.keybindings.get_action(&key) {
            self.handle_action(action)?;
        }

        Ok(())
    }

    /// Handle an action
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        debug!("Action: {:?}", action);
        match action {
            Action::Quit => {
                // Leaving the page commits the focused field
                self.panel.blur();
                self.should_quit = true;
                return Ok(());
            }
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                return Ok(());
            }
            Action::Cancel if self.show_help => {
                self.show_help = false;
                return Ok(());
            }
            _ => {}
        }

        self.panel.handle_action(action)?;
        Ok(())
    }

    /// Check if the app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_help_visible(&self) -> bool {
        self.show_help
    }

    /// Update app state (called on every tick)
    pub fn update(&mut self) -> Result<()> {
        self.panel.update()
    }

    /// Render the app
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.panel.render(frame, area);

        if self.show_help {
            let lines = self.help_lines();
            let height = lines.len() as u16 + 2;
            let help_area = centered_rect(area, 60, height);
            frame.render_widget(Clear, help_area);
            frame.render_widget(
                Paragraph::new(lines).block(
                    Block::default()
                        .title("Help")
                        .borders(Borders::ALL)
                        .border_style(self.theme.focused_border_style()),
                ),
                help_area,
            );
        }
    }

    fn help_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for category in ActionCategory::all() {
            lines.push(Line::from(Span::styled(
                category.to_string(),
                self.theme.group_style(),
            )));
            for action in Action::all().into_iter().filter(|a| a.category() == category) {
                let keys = self.keybindings.get_keys_for_action(action);
                if keys.is_empty() {
                    continue;
                }
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<18}", keys.join(", ")), self.theme.label_style()),
                    Span::styled(action.description(), self.theme.description_style()),
                ]));
            }
        }
        lines
    }

    pub fn panel(&self) -> &SettingsPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut SettingsPanel {
        &mut self.panel
    }

    /// Get reference to theme
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Get keybindings
    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    /// Set keybindings
    pub fn set_keybindings(&mut self, keybindings: KeyBindings) {
        self.keybindings = keybindings;
    }
}
