//! Provider settings page
//!
//! Hosts the bound fields grouped by provider and moves focus between them.
//! Moving focus away from a field is what commits it.

use crate::core::{ProviderKind, SettingKey};
use crate::i18n::Catalog;
use crate::services::provider_check::{self, CheckKind, CheckOutcome, ProbeError, ProviderEndpoint};
use crate::services::SettingsStore;
use crate::tui::action::Action;
use crate::tui::component::{Component, Focusable};
use crate::tui::components::bound_field::{BoundSettingField, FieldOptions};
use crate::tui::components::provider_fields::{all_specs, group_label_key};
use crate::tui::layout::split_panel_area;
use crate::tui::widgets::DescriptionMode;
use crate::tui::Theme;
use color_eyre::Result;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use ratatui::Frame;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, info, warn};

const INSTRUCTIONS: &str =
    "Tab/Shift+Tab: Move  Enter: Next  Esc: Leave  F2: Descriptions  Ctrl+t: Models  Ctrl+p: Prompt  F5: Reload  F1: Help";

const GROUPS: [ProviderKind; 2] = [ProviderKind::Deepgram, ProviderKind::OpenAi];

/// One-line feedback shown under the groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Info(String),
    Success(String),
    Error(String),
}

impl StatusLine {
    pub fn text(&self) -> &str {
        match self {
            StatusLine::Info(text) | StatusLine::Success(text) | StatusLine::Error(text) => text,
        }
    }

    fn style(&self, theme: &Theme) -> Style {
        match self {
            StatusLine::Info(_) => theme.status_style(),
            StatusLine::Success(_) => theme.success_style(),
            StatusLine::Error(_) => theme.error_style(),
        }
    }
}

/// Model used by the completion check unless configured otherwise
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

type CheckReceiver = oneshot::Receiver<Result<CheckOutcome, ProbeError>>;

pub struct SettingsPanel {
    fields: Vec<BoundSettingField>,
    /// Index of the focused field; `None` when focus has left the panel
    focus: Option<usize>,
    description_mode: DescriptionMode,
    store: SettingsStore,
    catalog: Arc<Catalog>,
    theme: Theme,
    runtime: Handle,
    status: Option<StatusLine>,
    pending_check: Option<(ProviderKind, CheckReceiver)>,
    chat_model: String,
    show_instructions: bool,
    focused: bool,
}

const ACTIONS: &[Action] = &[
    Action::FocusNext,
    Action::FocusPrev,
    Action::Confirm,
    Action::Cancel,
    Action::ToggleDescriptions,
    Action::CheckProvider,
    Action::CheckCompletion,
    Action::Refresh,
    Action::CursorLeft,
    Action::CursorRight,
    Action::CursorHome,
    Action::CursorEnd,
    Action::DeleteBackward,
    Action::DeleteForward,
    Action::ClearField,
];

impl SettingsPanel {
    /// Mount one field per provider setting and focus the first one
    pub fn new(
        store: &SettingsStore,
        runtime: Handle,
        catalog: Arc<Catalog>,
        theme: Theme,
        description_mode: DescriptionMode,
    ) -> Self {
        let options = FieldOptions {
            description_mode,
            grouped: true,
            compact: false,
        };
        let fields = all_specs()
            .into_iter()
            .map(|spec| BoundSettingField::mount(spec, store, options, catalog.clone(), theme.clone()))
            .collect();

        let mut panel = Self {
            fields,
            focus: None,
            description_mode,
            store: store.clone(),
            catalog,
            theme,
            runtime,
            status: None,
            pending_check: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            show_instructions: true,
            focused: true,
        };
        panel.focus_field(Some(0));
        panel
    }

    pub fn fields(&self) -> &[BoundSettingField] {
        &self.fields
    }

    pub fn field(&self, key: SettingKey) -> Option<&BoundSettingField> {
        self.fields.iter().find(|field| field.key() == key)
    }

    pub fn focused_key(&self) -> Option<SettingKey> {
        self.focus.map(|index| self.fields[index].key())
    }

    pub fn description_mode(&self) -> DescriptionMode {
        self.description_mode
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn set_show_instructions(&mut self, show: bool) {
        self.show_instructions = show;
    }

    pub fn set_chat_model(&mut self, model: impl Into<String>) {
        self.chat_model = model.into();
    }

    /// Blur the focused field (committing it) and focus `target`
    fn focus_field(&mut self, target: Option<usize>) {
        if let Some(current) = self.focus.take() {
            self.fields[current].set_focused(false);
        }
        if let Some(index) = target {
            self.fields[index].set_focused(true);
            debug!("Focused {}", self.fields[index].key());
        }
        self.focus = target;
    }

    pub fn focus_key(&mut self, key: SettingKey) {
        let index = self.fields.iter().position(|field| field.key() == key);
        self.focus_field(index);
    }

    pub fn focus_next(&mut self) {
        let next = match self.focus {
            Some(index) => (index + 1) % self.fields.len(),
            None => 0,
        };
        self.focus_field(Some(next));
    }

    pub fn focus_prev(&mut self) {
        let prev = match self.focus {
            Some(0) | None => self.fields.len() - 1,
            Some(index) => index - 1,
        };
        self.focus_field(Some(prev));
    }

    /// Move focus out of the panel, committing the focused field
    pub fn blur(&mut self) {
        self.focus_field(None);
    }

    pub fn toggle_descriptions(&mut self) {
        self.description_mode = self.description_mode.toggled();
        for field in &mut self.fields {
            field.set_description_mode(self.description_mode);
        }
        debug!("Description mode: {}", self.description_mode);
    }

    /// Start listing models for the focused field's provider
    pub fn check_provider(&mut self) {
        self.start_check(CheckKind::Models);
    }

    /// Send a short test prompt to the focused field's provider
    pub fn check_completion(&mut self) {
        self.start_check(CheckKind::Completion {
            model: self.chat_model.clone(),
        });
    }

    fn start_check(&mut self, kind: CheckKind) {
        let provider = self
            .focused_key()
            .map(|key| key.provider())
            .unwrap_or(ProviderKind::Deepgram);
        let settings = match self.store.snapshot() {
            Ok(settings) => settings,
            Err(e) => {
                self.status = Some(StatusLine::Error(e.to_string()));
                return;
            }
        };
        let endpoint = ProviderEndpoint::from_settings(provider, &settings);
        let status = match &kind {
            CheckKind::Models => {
                info!("Checking {} at {}", provider, endpoint.models_url());
                self.catalog.format(
                    "settings.status.checking",
                    &[("provider", provider.display_name())],
                )
            }
            CheckKind::Completion { model } => {
                info!("Prompting {} at {}", model, endpoint.completions_url());
                self.catalog.format(
                    "settings.status.prompting",
                    &[("provider", provider.display_name()), ("model", model)],
                )
            }
        };
        self.status = Some(StatusLine::Info(status));
        self.pending_check = Some((
            provider,
            provider_check::spawn_check(&self.runtime, endpoint, kind),
        ));
    }

    fn poll_check(&mut self) {
        let Some((provider, receiver)) = self.pending_check.as_mut() else {
            return;
        };
        let provider = *provider;
        let outcome = match receiver.try_recv() {
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err("check was cancelled".to_string()),
            Ok(result) => result.map_err(|e| e.to_string()),
        };
        self.pending_check = None;

        let name = provider.display_name();
        self.status = Some(match outcome {
            Ok(CheckOutcome::Models(models)) => {
                info!("{} lists {} model(s)", provider, models.len());
                StatusLine::Success(self.catalog.format(
                    "settings.status.models",
                    &[("provider", name), ("count", &models.len().to_string())],
                ))
            }
            Ok(CheckOutcome::Reply(Some(reply))) => {
                info!("{} answered the test prompt", provider);
                let reply = reply.split_whitespace().collect::<Vec<_>>().join(" ");
                StatusLine::Success(self.catalog.format(
                    "settings.status.reply",
                    &[("provider", name), ("model", &self.chat_model), ("reply", &reply)],
                ))
            }
            Ok(CheckOutcome::Reply(None)) => StatusLine::Info(self.catalog.format(
                "settings.status.noReply",
                &[("provider", name), ("model", &self.chat_model)],
            )),
            Err(error) => {
                warn!("Checking {} failed: {}", provider, error);
                StatusLine::Error(self.catalog.format(
                    "settings.status.failed",
                    &[("provider", name), ("error", &error)],
                ))
            }
        });
    }

    pub fn is_checking(&self) -> bool {
        self.pending_check.is_some()
    }

    /// Re-read the settings document
    pub fn refresh(&mut self) {
        match self.store.reload() {
            Ok(changed) => {
                self.status = Some(StatusLine::Info(self.catalog.format(
                    "settings.status.reloaded",
                    &[("count", &changed.len().to_string())],
                )));
                for field in &mut self.fields {
                    field.sync();
                }
            }
            Err(e) => {
                warn!("Reload failed: {e}");
                self.status = Some(StatusLine::Error(e.to_string()));
            }
        }
    }

    pub fn draw(&self, area: Rect, buf: &mut Buffer) {
        let layout = split_panel_area(area, self.show_instructions, Some(INSTRUCTIONS));

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(Span::styled(
                self.catalog.text("settings.title"),
                self.theme.label_style(),
            ));
        let inner = outer.inner(layout.content_area);
        outer.render(layout.content_area, buf);

        let status_height = u16::from(self.status.is_some() && inner.height > 0);
        let bottom = inner.y + inner.height - status_height;
        let mut y = inner.y;

        for provider in GROUPS {
            if y >= bottom {
                break;
            }
            let members: Vec<&BoundSettingField> = self
                .fields
                .iter()
                .filter(|field| field.key().provider() == provider)
                .collect();
            let group_width = inner.width;
            let content_width = group_width.saturating_sub(2);
            let wanted = 2 + members
                .iter()
                .map(|field| field.height(content_width))
                .sum::<u16>();
            let group_area = Rect {
                x: inner.x,
                y,
                width: group_width,
                height: wanted.min(bottom - y),
            };
            let group_focused = members.iter().any(|field| field.is_focused());
            let group = Block::default()
                .borders(Borders::ALL)
                .border_style(if group_focused {
                    self.theme.focused_border_style()
                } else {
                    self.theme.border_style()
                })
                .title(Span::styled(
                    self.catalog.text(group_label_key(provider)),
                    self.theme.group_style(),
                ));
            let group_inner = group.inner(group_area);
            group.render(group_area, buf);

            let group_bottom = group_inner.y + group_inner.height;
            let mut field_y = group_inner.y;
            for field in members {
                if field_y >= group_bottom {
                    break;
                }
                let height = field.height(group_inner.width).min(group_bottom - field_y);
                field.draw(
                    Rect {
                        x: group_inner.x,
                        y: field_y,
                        width: group_inner.width,
                        height,
                    },
                    buf,
                );
                field_y += height;
            }
            y += group_area.height;
        }

        if let Some(status) = &self.status {
            if status_height > 0 {
                let text: String = status.text().chars().take(inner.width as usize).collect();
                buf.set_string(inner.x, bottom, text, status.style(&self.theme));
            }
        }

        if let Some(instructions_area) = layout.instructions_area {
            Paragraph::new(INSTRUCTIONS)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(self.theme.border_style()),
                )
                .style(self.theme.description_style())
                .wrap(Wrap { trim: true })
                .render(instructions_area, buf);
        }
    }
}

impl Component for SettingsPanel {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::FocusNext | Action::Confirm => self.focus_next(),
            Action::FocusPrev => self.focus_prev(),
            Action::Cancel => {
                if self.focus.is_none() {
                    return Ok(false);
                }
                self.blur();
            }
            Action::ToggleDescriptions => self.toggle_descriptions(),
            Action::CheckProvider => self.check_provider(),
            Action::CheckCompletion => self.check_completion(),
            Action::Refresh => self.refresh(),
            _ => {
                return match self.focus {
                    Some(index) => self.fields[index].handle_action(action),
                    None => Ok(false),
                };
            }
        }
        Ok(true)
    }

    fn handle_input(&mut self, c: char) -> Result<bool> {
        match self.focus {
            Some(index) => self.fields[index].handle_input(c),
            None => Ok(false),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.draw(area, frame.buffer_mut());
    }

    fn supported_actions(&self) -> &[Action] {
        ACTIONS
    }

    fn name(&self) -> &str {
        "SettingsPanel"
    }

    fn update(&mut self) -> Result<()> {
        for field in &mut self.fields {
            field.update()?;
        }
        self.poll_check();
        Ok(())
    }
}

impl Focusable for SettingsPanel {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.blur();
        }
    }
}
