//! Single-line text input, plain or masked
use crate::tui::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Widget};

/// Character shown in place of each character of a masked value
pub const MASK_CHAR: char = '•';

/// Render-only text input. The caller owns the text and the cursor.
pub struct TextInput<'a> {
    value: &'a str,
    placeholder: &'a str,
    masked: bool,
    compact: bool,
    disabled: bool,
    focused: bool,
    cursor: usize,
    theme: &'a Theme,
}

impl<'a> TextInput<'a> {
    pub fn new(value: &'a str, theme: &'a Theme) -> Self {
        Self {
            value,
            placeholder: "",
            masked: false,
            compact: false,
            disabled: false,
            focused: false,
            cursor: value.chars().count(),
            theme,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    /// Compact inputs have no border and take a single row
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Cursor position, in characters
    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn height(&self) -> u16 {
        if self.compact { 1 } else { 3 }
    }

    /// Text as it appears on screen (masked values are replaced by bullets)
    pub fn display_text(&self) -> String {
        if self.masked {
            std::iter::repeat_n(MASK_CHAR, self.value.chars().count()).collect()
        } else {
            self.value.to_string()
        }
    }

    fn shows_cursor(&self) -> bool {
        self.focused && !self.disabled
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text_area = if self.compact {
            Rect { height: area.height.min(1), ..area }
        } else {
            let border_style = if self.disabled {
                self.theme.disabled_style()
            } else if self.focused {
                self.theme.focused_border_style()
            } else {
                self.theme.border_style()
            };
            let block = Block::default().borders(Borders::ALL).border_style(border_style);
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        };
        if text_area.width == 0 || text_area.height == 0 {
            return;
        }

        let width = text_area.width as usize;
        let text = self.display_text();
        let chars: Vec<char> = text.chars().collect();
        let cursor = self.cursor.min(chars.len());

        if chars.is_empty() {
            let style = if self.disabled {
                self.theme.disabled_style()
            } else {
                self.theme.placeholder_style()
            };
            let visible: String = self.placeholder.chars().take(width).collect();
            buf.set_string(text_area.x, text_area.y, visible, style);
        } else {
            // Scroll horizontally so the cursor stays on screen
            let offset = if self.shows_cursor() {
                (cursor + 1).saturating_sub(width)
            } else {
                0
            };
            let style = if self.disabled {
                self.theme.disabled_style()
            } else {
                self.theme.input_style()
            };
            let visible: String = chars[offset..].iter().take(width).collect();
            buf.set_string(text_area.x, text_area.y, visible, style);

            if self.shows_cursor() {
                let under_cursor = chars.get(cursor).copied().unwrap_or(' ');
                let cursor_x = text_area.x + (cursor - offset) as u16;
                buf.set_string(
                    cursor_x,
                    text_area.y,
                    under_cursor.to_string(),
                    self.theme.cursor_style(),
                );
            }
            return;
        }

        if self.shows_cursor() {
            let under_cursor = self.placeholder.chars().next().unwrap_or(' ');
            buf.set_string(
                text_area.x,
                text_area.y,
                under_cursor.to_string(),
                self.theme.cursor_style(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
    }

    #[test]
    fn test_masked_display() {
        let theme = Theme::default();
        let input = TextInput::new("abc123", &theme).masked(true);
        assert_eq!(input.display_text(), "••••••");
        assert_eq!(TextInput::new("abc", &theme).display_text(), "abc");
    }

    #[test]
    fn test_placeholder_when_empty() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        TextInput::new("", &theme)
            .placeholder("Enter your Deepgram API Key...")
            .compact(true)
            .render(area, &mut buf);

        assert!(row(&buf, 0).starts_with("Enter your Deepgram API Key..."));
        assert_eq!(buf[(0, 0)].style().fg, theme.placeholder_style().fg);
    }

    #[test]
    fn test_bordered_input_renders_inside_border() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        TextInput::new("https://x", &theme).render(area, &mut buf);

        assert!(row(&buf, 1).starts_with("│https://x"));
        assert!(row(&buf, 0).starts_with("┌"));
    }

    #[test]
    fn test_cursor_scrolls_long_values() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        TextInput::new("abcdefgh", &theme)
            .compact(true)
            .focused(true)
            .render(area, &mut buf);

        // Cursor at the end: the last four characters plus the cursor cell
        assert_eq!(row(&buf, 0), "efgh ");
        assert_eq!(buf[(4, 0)].style().bg, Some(theme.cursor_bg));
    }

    #[test]
    fn test_disabled_hides_cursor() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        TextInput::new("abc", &theme)
            .compact(true)
            .focused(true)
            .disabled(true)
            .render(area, &mut buf);

        assert_eq!(row(&buf, 0), "abc       ");
        assert_ne!(buf[(3, 0)].style().bg, Some(theme.cursor_bg));
    }
}
