//! Titled, described frame around one setting's input
use crate::tui::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::{Block, Borders, Widget};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Where a setting's description is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionMode {
    /// Always visible, between title and input
    #[default]
    Inline,
    /// Only visible while the setting has focus, below the input
    Tooltip,
}

impl DescriptionMode {
    pub fn toggled(self) -> Self {
        match self {
            DescriptionMode::Inline => DescriptionMode::Tooltip,
            DescriptionMode::Tooltip => DescriptionMode::Inline,
        }
    }
}

const TOOLTIP_MARKER: &str = " (?)";

/// Presentation frame for a setting: title, description and a slot for the input.
///
/// Grouped containers sit inside a shared group box and draw no border of
/// their own; ungrouped containers draw a bordered box with the title in
/// the border.
pub struct SettingContainer<'a> {
    title: &'a str,
    description: &'a str,
    mode: DescriptionMode,
    grouped: bool,
    focused: bool,
    status: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> SettingContainer<'a> {
    pub fn new(title: &'a str, description: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            description,
            mode: DescriptionMode::Inline,
            grouped: false,
            focused: false,
            status: None,
            theme,
        }
    }

    pub fn mode(mut self, mode: DescriptionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Short right-aligned note next to the title (e.g. "Saving...")
    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }

    pub fn description_visible(&self) -> bool {
        !self.description.is_empty()
            && match self.mode {
                DescriptionMode::Inline => true,
                DescriptionMode::Tooltip => self.focused,
            }
    }

    fn content_width(&self, width: u16) -> u16 {
        if self.grouped { width } else { width.saturating_sub(2) }
    }

    fn description_lines(&self, width: u16) -> Vec<String> {
        if !self.description_visible() {
            return Vec::new();
        }
        let wrap_width = (self.content_width(width) as usize).max(10);
        textwrap::wrap(self.description, wrap_width)
            .into_iter()
            .map(|line| line.into_owned())
            .collect()
    }

    /// Rows needed to show this container around an input of `input_height` rows
    pub fn height(&self, width: u16, input_height: u16) -> u16 {
        let chrome = if self.grouped { 1 } else { 2 };
        chrome + self.description_lines(width).len() as u16 + input_height
    }

    /// Draw the frame and return the area reserved for the input
    pub fn render(self, area: Rect, buf: &mut Buffer, input_height: u16) -> Rect {
        let description = self.description_lines(area.width);
        let title = self.decorated_title();
        let title_style = if self.focused {
            self.theme.label_style().add_modifier(Modifier::UNDERLINED)
        } else {
            self.theme.label_style()
        };

        let content = if self.grouped {
            buf.set_string(area.x, area.y, &title, title_style);
            Rect {
                y: area.y + 1,
                height: area.height.saturating_sub(1),
                ..area
            }
        } else {
            let border_style = if self.focused {
                self.theme.focused_border_style()
            } else {
                self.theme.border_style()
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(ratatui::text::Span::styled(title.clone(), title_style));
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        };

        if let Some(status) = self.status {
            let width = status.chars().count() as u16;
            if width < area.width {
                let status_x = area.x + area.width - width - u16::from(!self.grouped);
                buf.set_string(status_x, area.y, status, self.theme.warning_style());
            }
        }

        let mut y = content.y;
        let bottom = content.y + content.height;
        let inline = self.mode == DescriptionMode::Inline;
        if inline {
            for line in &description {
                if y >= bottom {
                    break;
                }
                buf.set_string(content.x, y, line, self.theme.description_style());
                y += 1;
            }
        }

        let input_area = Rect {
            x: content.x,
            y,
            width: content.width,
            height: input_height.min(bottom.saturating_sub(y)),
        };
        y += input_area.height;

        if !inline {
            for line in &description {
                if y >= bottom {
                    break;
                }
                buf.set_string(content.x, y, line, self.theme.description_style());
                y += 1;
            }
        }

        input_area
    }

    fn decorated_title(&self) -> String {
        let marker = if self.focused { "▸ " } else { "" };
        let tooltip = if self.mode == DescriptionMode::Tooltip && !self.description.is_empty() && !self.focused {
            TOOLTIP_MARKER
        } else {
            ""
        };
        format!("{marker}{}{tooltip}", self.title)
    }
}
