use ratatui::prelude::Rect;

/// Content area plus an optional instructions strip at the bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub content_area: Rect,
    pub instructions_area: Option<Rect>,
}

/// Reserve room at the bottom of `area` for the wrapped `instructions` text
/// (plus its border) when `show_instructions` is set.
pub fn split_panel_area(area: Rect, show_instructions: bool, instructions: Option<&str>) -> PanelLayout {
    let Some(instructions) = instructions.filter(|text| show_instructions && !text.is_empty()) else {
        return PanelLayout {
            content_area: area,
            instructions_area: None,
        };
    };

    let wrap_width = area.width.saturating_sub(4).max(10) as usize;
    let wrapped_lines = textwrap::wrap(instructions, wrap_width);
    let instructions_height = ((wrapped_lines.len() as u16).max(1) + 2).min(area.height);

    let content_area = Rect {
        height: area.height - instructions_height,
        ..area
    };
    let instructions_area = Rect {
        y: area.y + content_area.height,
        height: instructions_height,
        ..area
    };
    PanelLayout {
        content_area,
        instructions_area: Some(instructions_area),
    }
}

/// Rectangle of `width` x `height` centered in `area`, clamped to fit
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_without_instructions() {
        let area = Rect::new(0, 0, 40, 20);
        let layout = split_panel_area(area, false, Some("Tab: Next"));
        assert_eq!(layout.content_area, area);
        assert!(layout.instructions_area.is_none());

        let empty = split_panel_area(area, true, Some(""));
        assert!(empty.instructions_area.is_none());
    }

    #[test]
    fn test_split_with_instructions() {
        let area = Rect::new(2, 1, 40, 20);
        let layout = split_panel_area(area, true, Some("Tab: Next  Esc: Leave"));
        let instructions = layout.instructions_area.unwrap();

        assert_eq!(instructions.height, 3);
        assert_eq!(layout.content_area.height, 17);
        assert_eq!(instructions.y, layout.content_area.y + layout.content_area.height);
        assert_eq!(instructions.x, area.x);
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(area, 50, 50), area);
    }
}
