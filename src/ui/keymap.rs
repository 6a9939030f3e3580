use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellKeyContext {
    /// Changes what Esc means: close the topmost overlay instead of quitting.
    pub overlay_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    Quit,
    CloseTopOverlay,
    ToggleSettingsOverlay,
    ToggleAgentEditOverlay,
    OpenPersonaWizard,
    ToggleMute,
    RequestReconnect,
    MovePrev,
    MoveNext,
    Submit,
    Backspace,
    Input(char),
}

/// Main-shell key mapping. Plain characters feed the chat input, so every
/// command is a control chord; Esc is screen-dependent like the rest of the
/// repo's navigation maps.
pub fn shell_action_from_key(key: KeyEvent, context: ShellKeyContext) -> Option<ShellAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(ShellAction::Quit),
            KeyCode::Char('s') => Some(ShellAction::ToggleSettingsOverlay),
            KeyCode::Char('e') => Some(ShellAction::ToggleAgentEditOverlay),
            KeyCode::Char('p') => Some(ShellAction::OpenPersonaWizard),
            KeyCode::Char('t') => Some(ShellAction::ToggleMute),
            KeyCode::Char('r') => Some(ShellAction::RequestReconnect),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(if context.overlay_open {
            ShellAction::CloseTopOverlay
        } else {
            ShellAction::Quit
        }),
        KeyCode::Up => Some(ShellAction::MovePrev),
        KeyCode::Down => Some(ShellAction::MoveNext),
        KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => Some(ShellAction::Submit),
        KeyCode::Backspace => Some(ShellAction::Backspace),
        KeyCode::Char(c) => Some(ShellAction::Input(c)),
        _ => None,
    }
}
