use crate::tui::action::Action;
use color_eyre::Result;
use ratatui::{layout::Rect, Frame};

/// Base trait for all TUI components
///
/// All interactive UI elements implement this trait to provide consistent
/// behavior for action handling, text entry, rendering and per-tick updates.
pub trait Component {
    /// Handle an action
    ///
    /// Returns Ok(true) if the action was handled and consumed.
    /// Returns Ok(false) if the action was not handled and should propagate.
    fn handle_action(&mut self, action: Action) -> Result<bool>;

    /// Handle a typed character
    ///
    /// Returns Ok(true) if the character was consumed as text input.
    fn handle_input(&mut self, _c: char) -> Result<bool> {
        Ok(false)
    }

    /// Render the component within the given area
    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// Actions this component responds to (used for help and routing)
    fn supported_actions(&self) -> &[Action];

    /// Get component name for debugging/logging
    fn name(&self) -> &str;

    /// Update component state (called on every tick)
    ///
    /// Default implementation does nothing.
    fn update(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Components that can receive keyboard focus implement this trait.
/// Focus determines which component receives keyboard input.
pub trait Focusable: Component {
    fn is_focused(&self) -> bool;

    /// Set focus state. Losing focus is the component's blur event.
    fn set_focused(&mut self, focused: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockComponent {
        name: String,
        focused: bool,
        typed: String,
        actions: Vec<Action>,
    }

    impl MockComponent {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                focused: false,
                typed: String::new(),
                actions: vec![Action::FocusNext, Action::FocusPrev],
            }
        }
    }

    impl Component for MockComponent {
        fn handle_action(&mut self, action: Action) -> Result<bool> {
            Ok(self.supported_actions().contains(&action))
        }

        fn handle_input(&mut self, c: char) -> Result<bool> {
            if !self.focused {
                return Ok(false);
            }
            self.typed.push(c);
            Ok(true)
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect) {}

        fn supported_actions(&self) -> &[Action] {
            &self.actions
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    impl Focusable for MockComponent {
        fn is_focused(&self) -> bool {
            self.focused
        }

        fn set_focused(&mut self, focused: bool) {
            self.focused = focused;
        }
    }

    #[test]
    fn test_component_action_handling() {
        let mut comp = MockComponent::new("test");
        assert!(comp.handle_action(Action::FocusNext).unwrap());
        assert!(!comp.handle_action(Action::Quit).unwrap());
    }

    #[test]
    fn test_input_requires_focus() {
        let mut comp = MockComponent::new("test");
        assert!(!comp.handle_input('a').unwrap());

        comp.set_focused(true);
        assert!(comp.is_focused());
        assert!(comp.handle_input('a').unwrap());
        assert_eq!(comp.typed, "a");
    }

    #[test]
    fn test_component_metadata() {
        let mut comp = MockComponent::new("test_comp");
        assert_eq!(comp.name(), "test_comp");
        assert_eq!(comp.supported_actions().len(), 2);
        assert!(comp.update().is_ok());
    }
}
