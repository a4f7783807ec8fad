//! Pure update function for the dashboard.
//!
//! `update()` mutates the model and returns the command the runtime should
//! execute. No I/O happens here.

use crossterm::event::KeyEventKind;

use super::input::{Direction, InputAction, resolve_key_event};
use super::model::{
    CmdOutcome, ConfirmAction, DashboardCmd, DashboardModel, DashboardMsg, StatusLevel,
};
use crate::inventory::layout::SLOTS_PER_FREEZER;

/// Apply a message to the model and return the next command for the runtime.
pub fn update(model: &mut DashboardModel, msg: DashboardMsg) -> DashboardCmd {
    match msg {
        DashboardMsg::Key(key) => {
            if key.kind == KeyEventKind::Release {
                return DashboardCmd::None;
            }
            resolve_key_event(&key, model.pending.is_some())
                .map_or(DashboardCmd::None, |action| apply_input_action(model, action))
        }
        DashboardMsg::Resize { cols, rows } => {
            model.terminal_size = (cols, rows);
            DashboardCmd::None
        }
        DashboardMsg::Outcome(CmdOutcome::Done(text)) => {
            model.set_status(StatusLevel::Info, text);
            DashboardCmd::None
        }
        DashboardMsg::Outcome(CmdOutcome::Failed(text)) => {
            model.set_status(StatusLevel::Error, text);
            DashboardCmd::None
        }
    }
}

fn apply_input_action(model: &mut DashboardModel, action: InputAction) -> DashboardCmd {
    match action {
        InputAction::Quit => {
            model.quit = true;
            DashboardCmd::Quit
        }
        InputAction::NextFreezer => {
            let count = model.freezer_count();
            select(model, (model.active + 1) % count.max(1));
            DashboardCmd::None
        }
        InputAction::PrevFreezer => {
            let count = model.freezer_count().max(1);
            select(model, (model.active + count - 1) % count);
            DashboardCmd::None
        }
        InputAction::SelectFreezer(index) => {
            if index < model.freezer_count() {
                select(model, index);
            }
            DashboardCmd::None
        }
        InputAction::Move(direction) => {
            move_cursor(model, direction);
            DashboardCmd::None
        }
        InputAction::ToggleCursor => DashboardCmd::Toggle {
            freezer: model.active,
            slot: model.cursor,
        },
        InputAction::RequestClear => request(model, ConfirmAction::ClearFreezer(model.active)),
        InputAction::RequestReset => request(model, ConfirmAction::ResetAll),
        InputAction::Share => DashboardCmd::Share,
        InputAction::Accept => model.pending.take().map_or(DashboardCmd::None, command_for),
        InputAction::Decline => {
            if model.pending.take().is_some() {
                model.set_status(StatusLevel::Info, "Cancelado");
            }
            DashboardCmd::None
        }
    }
}

fn select(model: &mut DashboardModel, index: usize) {
    if model.active != index {
        model.active = index;
        model.status = None;
    }
}

fn request(model: &mut DashboardModel, action: ConfirmAction) -> DashboardCmd {
    if model.confirm_destructive {
        model.pending = Some(action);
        DashboardCmd::None
    } else {
        command_for(action)
    }
}

const fn command_for(action: ConfirmAction) -> DashboardCmd {
    match action {
        ConfirmAction::ClearFreezer(index) => DashboardCmd::Clear(index),
        ConfirmAction::ResetAll => DashboardCmd::ResetAll,
    }
}

fn move_cursor(model: &mut DashboardModel, direction: Direction) {
    let cols = model.active_cols();
    let cursor = model.cursor.min(SLOTS_PER_FREEZER - 1);
    model.cursor = match direction {
        Direction::Left if cursor % cols > 0 => cursor - 1,
        Direction::Right if cursor % cols + 1 < cols && cursor + 1 < SLOTS_PER_FREEZER => {
            cursor + 1
        }
        Direction::Up if cursor >= cols => cursor - cols,
        Direction::Down if cursor + cols < SLOTS_PER_FREEZER => cursor + cols,
        _ => cursor,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::layout::{Layout, LayoutPreset};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn model() -> DashboardModel {
        DashboardModel::new(&Layout::preset(LayoutPreset::Named), true)
    }

    fn press(model: &mut DashboardModel, code: KeyCode) -> DashboardCmd {
        update(model, DashboardMsg::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn selecting_freezer_never_mutates() {
        let mut m = model();
        assert_eq!(press(&mut m, KeyCode::Char('3')), DashboardCmd::None);
        assert_eq!(m.active, 2);
        assert_eq!(press(&mut m, KeyCode::BackTab), DashboardCmd::None);
        assert_eq!(m.active, 1);
    }

    #[test]
    fn freezer_navigation_wraps() {
        let mut m = model();
        press(&mut m, KeyCode::Char('['));
        assert_eq!(m.active, 12);
        press(&mut m, KeyCode::Tab);
        assert_eq!(m.active, 0);
    }

    #[test]
    fn toggle_targets_cursor_in_active_freezer() {
        let mut m = model();
        press(&mut m, KeyCode::Char('5'));
        press(&mut m, KeyCode::Right);
        press(&mut m, KeyCode::Down);
        // 6 columns: (row 1, col 1) = slot 7.
        assert_eq!(
            press(&mut m, KeyCode::Char(' ')),
            DashboardCmd::Toggle {
                freezer: 4,
                slot: 7
            }
        );
    }

    #[test]
    fn cursor_stays_inside_grid_edges() {
        let mut m = model();
        press(&mut m, KeyCode::Left);
        press(&mut m, KeyCode::Up);
        assert_eq!(m.cursor, 0);
        // Box freezer is 8 x 3.
        for _ in 0..10 {
            press(&mut m, KeyCode::Right);
            press(&mut m, KeyCode::Down);
        }
        assert_eq!(m.cursor, 23);
    }

    #[test]
    fn clear_waits_for_confirmation() {
        let mut m = model();
        press(&mut m, KeyCode::Char('2'));
        assert_eq!(press(&mut m, KeyCode::Char('c')), DashboardCmd::None);
        assert_eq!(m.pending, Some(ConfirmAction::ClearFreezer(1)));
        // Screen keys are swallowed while the overlay is open.
        assert_eq!(press(&mut m, KeyCode::Char(' ')), DashboardCmd::None);
        assert_eq!(press(&mut m, KeyCode::Char('y')), DashboardCmd::Clear(1));
        assert_eq!(m.pending, None);
    }

    #[test]
    fn declining_confirmation_does_nothing() {
        let mut m = model();
        press(&mut m, KeyCode::Char('R'));
        assert_eq!(m.pending, Some(ConfirmAction::ResetAll));
        assert_eq!(press(&mut m, KeyCode::Char('n')), DashboardCmd::None);
        assert_eq!(m.pending, None);
        assert_eq!(m.status.as_ref().map(|s| s.text.as_str()), Some("Cancelado"));
    }

    #[test]
    fn confirmation_can_be_disabled() {
        let mut m = DashboardModel::new(&Layout::default(), false);
        assert_eq!(press(&mut m, KeyCode::Char('R')), DashboardCmd::ResetAll);
        assert_eq!(press(&mut m, KeyCode::Char('c')), DashboardCmd::Clear(0));
    }

    #[test]
    fn outcomes_set_status_level() {
        let mut m = model();
        update(&mut m, DashboardMsg::Outcome(CmdOutcome::Failed("boom".into())));
        assert_eq!(m.status.as_ref().unwrap().level, StatusLevel::Error);
        update(&mut m, DashboardMsg::Outcome(CmdOutcome::Done("ok".into())));
        assert_eq!(m.status.as_ref().unwrap().level, StatusLevel::Info);
    }

    #[test]
    fn out_of_range_digit_is_ignored() {
        let layout = Layout::from_specs(&LayoutPreset::Named.specs()[..2]).unwrap();
        let mut m = DashboardModel::new(&layout, true);
        press(&mut m, KeyCode::Char('9'));
        assert_eq!(m.active, 0);
    }

    #[test]
    fn quit_sets_flag() {
        let mut m = model();
        assert_eq!(press(&mut m, KeyCode::Char('q')), DashboardCmd::Quit);
        assert!(m.quit);
    }
}
