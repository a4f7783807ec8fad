//! Key routing for the dashboard.
//!
//! The confirmation overlay has precedence: while it is open only accept,
//! decline, and Ctrl-C resolve to actions and every other key is swallowed.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    NextFreezer,
    PrevFreezer,
    SelectFreezer(usize),
    Move(Direction),
    ToggleCursor,
    RequestClear,
    RequestReset,
    Share,
    Accept,
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// Key hints shown at the bottom of the dashboard.
pub const HELP_BINDINGS: [HelpBinding; 6] = [
    HelpBinding {
        keys: "Tab/[ ]",
        description: "freezer",
    },
    HelpBinding {
        keys: "Espaço",
        description: "alternar",
    },
    HelpBinding {
        keys: "c",
        description: "limpar",
    },
    HelpBinding {
        keys: "R",
        description: "zerar tudo",
    },
    HelpBinding {
        keys: "s",
        description: "compartilhar",
    },
    HelpBinding {
        keys: "q",
        description: "sair",
    },
];

/// Resolve a key event. `overlay_open` selects the confirmation key map.
#[must_use]
pub fn resolve_key_event(key: &KeyEvent, overlay_open: bool) -> Option<InputAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputAction::Quit);
    }
    if overlay_open {
        return resolve_overlay_key(key);
    }
    resolve_global_key(key)
}

fn resolve_overlay_key(key: &KeyEvent) -> Option<InputAction> {
    match key.code {
        KeyCode::Char('y' | 'Y' | 's' | 'S') | KeyCode::Enter => Some(InputAction::Accept),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(InputAction::Decline),
        _ => None,
    }
}

fn resolve_global_key(key: &KeyEvent) -> Option<InputAction> {
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => InputAction::Quit,
        KeyCode::Tab | KeyCode::Char(']') => InputAction::NextFreezer,
        KeyCode::BackTab | KeyCode::Char('[') => InputAction::PrevFreezer,
        KeyCode::Char(c @ '1'..='9') => {
            InputAction::SelectFreezer(c.to_digit(10).map_or(0, |d| d as usize - 1))
        }
        KeyCode::Up | KeyCode::Char('k') => InputAction::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => InputAction::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => InputAction::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => InputAction::Move(Direction::Right),
        KeyCode::Char(' ') | KeyCode::Enter => InputAction::ToggleCursor,
        KeyCode::Char('c') => InputAction::RequestClear,
        KeyCode::Char('R') => InputAction::RequestReset,
        KeyCode::Char('s') => InputAction::Share,
        _ => return None,
    };
    Some(action)
}
