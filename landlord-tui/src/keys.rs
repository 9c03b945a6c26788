//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    JumpForward,
    JumpBack,
    /// Sort by the listing column at this index.
    Sort(usize),
    OpenDetails,
    Back,
    OpenJump,
    OpenHelp,
    Refresh,
}

/// Keys understood while the jump-to-landlord prompt is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Input(char),
    Backspace,
    Submit,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    if kind != KeyEventKind::Press {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('g') | KeyCode::Char('/') => Some(Action::OpenJump),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Enter => Some(Action::OpenDetails),
        KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevPage),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::NextPage),
        KeyCode::PageDown | KeyCode::Char(']') => Some(Action::JumpForward),
        KeyCode::PageUp | KeyCode::Char('[') => Some(Action::JumpBack),
        KeyCode::Char(c @ '1'..='9') => Some(Action::Sort(c as usize - '1' as usize)),
        _ => None,
    }
}

pub fn map_prompt_key(event: KeyEvent) -> Option<PromptAction> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    match event.code {
        KeyCode::Char(c) if c.is_ascii_digit() => Some(PromptAction::Input(c)),
        KeyCode::Backspace => Some(PromptAction::Backspace),
        KeyCode::Enter => Some(PromptAction::Submit),
        KeyCode::Esc => Some(PromptAction::Cancel),
        _ => None,
    }
}
