use serde::{Deserialize, Serialize};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    // Navigation
    FocusNext,
    FocusPrev,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,

    // Editing
    DeleteBackward,
    DeleteForward,
    ClearField,

    // View
    ToggleDescriptions,
    ToggleHelp,
    Refresh,

    // Providers
    CheckProvider,
    CheckCompletion,

    // Application
    Quit,
    Confirm,
    Cancel,
}

impl Action {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Action::FocusNext => "Next field",
            Action::FocusPrev => "Previous field",
            Action::CursorLeft => "Move cursor left",
            Action::CursorRight => "Move cursor right",
            Action::CursorHome => "Go to start of field",
            Action::CursorEnd => "Go to end of field",
            Action::DeleteBackward => "Delete previous character",
            Action::DeleteForward => "Delete character under cursor",
            Action::ClearField => "Clear field",
            Action::ToggleDescriptions => "Toggle inline/tooltip descriptions",
            Action::ToggleHelp => "Toggle help screen",
            Action::Refresh => "Reload settings from disk",
            Action::CheckProvider => "List the provider's models",
            Action::CheckCompletion => "Send a test prompt to the provider",
            Action::Quit => "Quit application",
            Action::Confirm => "Save field and move on",
            Action::Cancel => "Leave field",
        }
    }

    /// Get category for grouping in help screen
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::FocusNext
            | Action::FocusPrev
            | Action::CursorLeft
            | Action::CursorRight
            | Action::CursorHome
            | Action::CursorEnd => ActionCategory::Navigation,

            Action::DeleteBackward | Action::DeleteForward | Action::ClearField => {
                ActionCategory::Editing
            }

            Action::ToggleDescriptions | Action::ToggleHelp | Action::Refresh => {
                ActionCategory::View
            }

            Action::CheckProvider | Action::CheckCompletion => ActionCategory::Providers,

            Action::Quit | Action::Confirm | Action::Cancel => ActionCategory::Application,
        }
    }

    /// True for actions that edit the focused field's buffer
    pub fn is_edit(&self) -> bool {
        self.category() == ActionCategory::Editing
    }

    /// Get all possible actions (for validation)
    pub fn all() -> Vec<Action> {
        vec![
            Action::FocusNext,
            Action::FocusPrev,
            Action::CursorLeft,
            Action::CursorRight,
            Action::CursorHome,
            Action::CursorEnd,
            Action::DeleteBackward,
            Action::DeleteForward,
            Action::ClearField,
            Action::ToggleDescriptions,
            Action::ToggleHelp,
            Action::Refresh,
            Action::CheckProvider,
            Action::CheckCompletion,
            Action::Quit,
            Action::Confirm,
            Action::Cancel,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Navigation,
    Editing,
    View,
    Providers,
    Application,
}

impl ActionCategory {
    pub fn all() -> [ActionCategory; 5] {
        [
            ActionCategory::Navigation,
            ActionCategory::Editing,
            ActionCategory::View,
            ActionCategory::Providers,
            ActionCategory::Application,
        ]
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::Navigation => write!(f, "Navigation"),
            ActionCategory::Editing => write!(f, "Editing"),
            ActionCategory::View => write!(f, "View"),
            ActionCategory::Providers => write!(f, "Providers"),
            ActionCategory::Application => write!(f, "Application"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_actions_have_descriptions() {
        for action in Action::all() {
            assert!(!action.description().is_empty());
        }
    }

    #[test]
    fn test_edit_actions() {
        assert!(Action::DeleteBackward.is_edit());
        assert!(Action::ClearField.is_edit());
        assert!(!Action::FocusNext.is_edit());
        assert!(!Action::CursorLeft.is_edit());
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::ToggleDescriptions;
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, "\"ToggleDescriptions\"");

        let restored: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, action);
    }
}
