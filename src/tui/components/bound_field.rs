//! Editable setting field bound to the settings store
//!
//! The field keeps a local edit buffer seeded from the store. Keystrokes only
//! touch the buffer; losing focus commits it with a single update request
//! when it differs from the last value the field knows about. Any change the
//! store reports replaces the buffer, including unsaved edits.

use crate::core::{SettingKey, SettingsError};
use crate::i18n::Catalog;
use crate::services::{SettingSubscription, SettingsStore};
use crate::tui::action::Action;
use crate::tui::component::{Component, Focusable};
use crate::tui::widgets::{DescriptionMode, SettingContainer, TextInput};
use crate::tui::Theme;
use color_eyre::Result;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::Frame;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// How the value is shown while editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    /// Masked on screen
    Password,
}

/// Static description of one bound field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: SettingKey,
    pub input_kind: InputKind,
    pub placeholder: &'static str,
    pub label_key: &'static str,
    pub description_key: &'static str,
}

/// Presentation options shared by the fields of a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub description_mode: DescriptionMode,
    pub grouped: bool,
    pub compact: bool,
}

pub struct BoundSettingField {
    spec: FieldSpec,
    options: FieldOptions,
    store: SettingsStore,
    subscription: SettingSubscription,
    buffer: String,
    /// Cursor position in characters
    cursor: usize,
    /// Last value received from or submitted to the store
    last_known: String,
    focused: bool,
    catalog: Arc<Catalog>,
    theme: Theme,
}

const ACTIONS: &[Action] = &[
    Action::CursorLeft,
    Action::CursorRight,
    Action::CursorHome,
    Action::CursorEnd,
    Action::DeleteBackward,
    Action::DeleteForward,
    Action::ClearField,
];

impl BoundSettingField {
    /// Seed the buffer from the store and subscribe to the field's key
    pub fn mount(
        spec: FieldSpec,
        store: &SettingsStore,
        options: FieldOptions,
        catalog: Arc<Catalog>,
        theme: Theme,
    ) -> Self {
        let subscription = store.subscribe(spec.key);
        let value = subscription.current().unwrap_or_default();
        debug!("Mounted field for {}", spec.key);
        Self {
            spec,
            options,
            store: store.clone(),
            subscription,
            cursor: value.chars().count(),
            buffer: value.clone(),
            last_known: value,
            focused: false,
            catalog,
            theme,
        }
    }

    pub fn key(&self) -> SettingKey {
        self.spec.key
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// Current buffer content
    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Buffer as rendered: masked for password fields
    pub fn display_value(&self) -> String {
        self.input().display_text()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.buffer != self.last_known
    }

    /// True while an update for this field's key is in flight
    pub fn is_disabled(&self) -> bool {
        self.store.is_updating(self.spec.key)
    }

    pub fn set_description_mode(&mut self, mode: DescriptionMode) {
        self.options.description_mode = mode;
    }

    pub fn description_mode(&self) -> DescriptionMode {
        self.options.description_mode
    }

    /// Apply the latest store value, if it changed, discarding local edits.
    /// Returns true when the buffer was replaced.
    pub fn sync(&mut self) -> bool {
        let Some(value) = self.subscription.poll_change() else {
            return false;
        };
        let value = value.unwrap_or_default();
        if self.has_unsaved_changes() && self.buffer != value {
            debug!("Store changed {} while editing; local edits discarded", self.spec.key);
        }
        self.cursor = value.chars().count();
        self.buffer = value.clone();
        self.last_known = value;
        true
    }

    fn editable(&self) -> bool {
        if self.is_disabled() {
            trace!("Rejecting edit of {}: update in flight", self.spec.key);
            return false;
        }
        true
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        if c.is_control() || !self.editable() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 || !self.editable() {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.buffer.remove(at);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.buffer.chars().count() || !self.editable() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.buffer.remove(at);
        true
    }

    pub fn clear(&mut self) -> bool {
        if self.buffer.is_empty() || !self.editable() {
            return false;
        }
        self.buffer.clear();
        self.cursor = 0;
        true
    }

    /// Replace the whole buffer, as a paste would
    pub fn set_value(&mut self, value: &str) -> bool {
        if !self.editable() {
            return false;
        }
        self.buffer = value.to_string();
        self.cursor = self.buffer.chars().count();
        true
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Lose focus and commit the buffer.
    /// Returns true when an update request was issued.
    pub fn blur(&mut self) -> Result<bool, SettingsError> {
        self.focused = false;
        self.sync();
        self.commit()
    }

    /// Issue one update request if the buffer differs from the last known value
    pub fn commit(&mut self) -> Result<bool, SettingsError> {
        if !self.has_unsaved_changes() {
            return Ok(false);
        }
        self.store.request_update(self.spec.key, self.buffer.clone())?;
        self.last_known = self.buffer.clone();
        debug!("Committed {}", self.spec.key);
        Ok(true)
    }

    fn input(&self) -> TextInput<'_> {
        TextInput::new(&self.buffer, &self.theme)
            .placeholder(self.spec.placeholder)
            .masked(self.spec.input_kind == InputKind::Password)
            .compact(self.options.compact)
            .disabled(self.is_disabled())
            .focused(self.focused)
            .cursor(self.cursor)
    }

    fn container(&self) -> SettingContainer<'_> {
        let status = self
            .is_disabled()
            .then(|| self.catalog.text("settings.status.saving"));
        SettingContainer::new(
            self.catalog.text(self.spec.label_key),
            self.catalog.text(self.spec.description_key),
            &self.theme,
        )
        .mode(self.options.description_mode)
        .grouped(self.options.grouped)
        .focused(self.focused)
        .status(status)
    }

    /// Rows this field needs at the given width
    pub fn height(&self, width: u16) -> u16 {
        self.container().height(width, self.input().height())
    }

    pub fn draw(&self, area: Rect, buf: &mut Buffer) {
        let input = self.input();
        let input_area = self.container().render(area, buf, input.height());
        input.render(input_area, buf);
    }
}

impl Component for BoundSettingField {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        if !self.focused {
            return Ok(false);
        }
        match action {
            Action::CursorLeft => self.move_cursor_left(),
            Action::CursorRight => self.move_cursor_right(),
            Action::CursorHome => self.move_cursor_home(),
            Action::CursorEnd => self.move_cursor_end(),
            Action::DeleteBackward => {
                self.backspace();
            }
            Action::DeleteForward => {
                self.delete();
            }
            Action::ClearField => {
                self.clear();
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn handle_input(&mut self, c: char) -> Result<bool> {
        if !self.focused {
            return Ok(false);
        }
        Ok(self.insert_char(c))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.draw(area, frame.buffer_mut());
    }

    fn supported_actions(&self) -> &[Action] {
        ACTIONS
    }

    fn name(&self) -> &str {
        self.spec.key.as_str()
    }

    fn update(&mut self) -> Result<()> {
        self.sync();
        Ok(())
    }
}

impl Focusable for BoundSettingField {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        if focused {
            self.focus();
        } else if self.focused {
            if let Err(e) = self.blur() {
                warn!("Could not commit {}: {e}", self.spec.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProviderSettings;
    use crate::services::MemoryBackend;
    use pretty_assertions::assert_eq;
    use tokio::runtime::Handle;

    const SPEC: FieldSpec = FieldSpec {
        key: SettingKey::NovaApiKey,
        input_kind: InputKind::Password,
        placeholder: "Enter your Deepgram API Key...",
        label_key: "settings.novaApiKey.title",
        description_key: "settings.novaApiKey.description",
    };

    fn setup(initial: Option<&str>) -> (SettingsStore, BoundSettingField) {
        let mut settings = ProviderSettings::default();
        settings.set(SPEC.key, initial.map(str::to_string));
        let store = SettingsStore::open(Arc::new(MemoryBackend::new(settings)), &Handle::current()).unwrap();
        let field = BoundSettingField::mount(
            SPEC,
            &store,
            FieldOptions::default(),
            Arc::new(Catalog::english()),
            Theme::default(),
        );
        (store, field)
    }

    #[tokio::test]
    async fn test_mount_seeds_buffer() {
        let (_store, field) = setup(Some("secret"));
        assert_eq!(field.value(), "secret");
        assert_eq!(field.cursor(), 6);
        assert_eq!(field.display_value(), "••••••");
        assert!(!field.has_unsaved_changes());

        let (_store, empty) = setup(None);
        assert_eq!(empty.value(), "");
    }

    #[tokio::test]
    async fn test_editing_does_not_touch_store() {
        let (store, mut field) = setup(None);
        field.focus();
        for c in "abc".chars() {
            assert!(field.insert_char(c));
        }
        field.move_cursor_left();
        assert!(field.backspace());
        assert!(field.insert_char('X'));
        assert_eq!(field.value(), "aXc");

        field.move_cursor_home();
        assert!(field.delete());
        assert_eq!(field.value(), "Xc");
        assert_eq!(store.get(SettingKey::NovaApiKey), None);
        assert!(!store.is_updating(SettingKey::NovaApiKey));
    }

    #[tokio::test]
    async fn test_multibyte_cursor_editing() {
        let (_store, mut field) = setup(Some("héllo"));
        field.move_cursor_home();
        field.move_cursor_right();
        field.move_cursor_right();
        assert!(field.backspace());
        assert_eq!(field.value(), "hllo");
        assert_eq!(field.cursor(), 1);
    }

    #[tokio::test]
    async fn test_blur_commits_once() {
        let (store, mut field) = setup(None);
        field.focus();
        assert!(field.set_value("abc123"));

        assert!(field.blur().unwrap());
        assert_eq!(store.get(SettingKey::NovaApiKey).as_deref(), Some("abc123"));
        assert!(!field.blur().unwrap());

        store.flush().await.unwrap();
        field.sync();
        assert_eq!(field.value(), "abc123");
        assert!(!field.blur().unwrap());
    }

    #[tokio::test]
    async fn test_external_change_discards_edits() {
        let (store, mut field) = setup(Some("old"));
        field.focus();
        field.insert_char('!');
        store
            .set_external(SettingKey::NovaApiKey, Some("new".into()))
            .unwrap();

        assert!(field.sync());
        assert_eq!(field.value(), "new");
        assert!(!field.sync());
    }

    #[tokio::test]
    async fn test_unfocused_field_ignores_input() {
        let (_store, mut field) = setup(None);
        assert!(!field.handle_input('a').unwrap());
        assert!(!field.handle_action(Action::DeleteBackward).unwrap());

        field.set_focused(true);
        assert!(field.handle_input('a').unwrap());
        assert!(!field.handle_input('\u{7}').unwrap());
        assert!(field.handle_action(Action::CursorHome).unwrap());
        assert!(!field.handle_action(Action::Quit).unwrap());
        assert_eq!(field.value(), "a");
    }

    #[tokio::test]
    async fn test_set_focused_false_commits() {
        let (store, mut field) = setup(None);
        field.set_focused(true);
        field.handle_input('k').unwrap();
        field.set_focused(false);

        assert!(!field.is_focused());
        assert_eq!(store.get(SettingKey::NovaApiKey).as_deref(), Some("k"));
    }

    #[tokio::test]
    async fn test_height_depends_on_mode_and_compactness() {
        let (store, field) = setup(None);
        let inline = field.height(60);

        let mut compact = BoundSettingField::mount(
            SPEC,
            &store,
            FieldOptions {
                compact: true,
                ..FieldOptions::default()
            },
            Arc::new(Catalog::english()),
            Theme::default(),
        );
        assert_eq!(compact.height(60), inline - 2);

        compact.set_description_mode(DescriptionMode::Tooltip);
        assert!(compact.height(60) < inline - 2);
    }
}
