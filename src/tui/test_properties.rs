//! Property-based tests for dashboard reducer invariants.
//!
//! Arbitrary key sequences must keep the active freezer and cursor in
//! bounds, and may only produce mutating commands the user asked for.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;

use super::model::{ConfirmAction, DashboardCmd, DashboardModel, DashboardMsg};
use super::update::update;
use crate::inventory::layout::{Layout, LayoutPreset, SLOTS_PER_FREEZER};

// ──────────────────── strategies ────────────────────

fn arb_key_code() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        (1u32..=9).prop_map(|d| KeyCode::Char(char::from_digit(d, 10).unwrap_or('1'))),
        Just(KeyCode::Tab),
        Just(KeyCode::BackTab),
        Just(KeyCode::Char('[')),
        Just(KeyCode::Char(']')),
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        Just(KeyCode::Left),
        Just(KeyCode::Right),
        Just(KeyCode::Char('h')),
        Just(KeyCode::Char('j')),
        Just(KeyCode::Char('k')),
        Just(KeyCode::Char('l')),
        Just(KeyCode::Char(' ')),
        Just(KeyCode::Enter),
        Just(KeyCode::Char('c')),
        Just(KeyCode::Char('R')),
        Just(KeyCode::Char('s')),
        Just(KeyCode::Char('y')),
        Just(KeyCode::Char('n')),
    ]
}

fn arb_preset() -> impl Strategy<Value = LayoutPreset> {
    prop_oneof![Just(LayoutPreset::Named), Just(LayoutPreset::Numbered)]
}

fn key(code: KeyCode) -> DashboardMsg {
    DashboardMsg::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// ──────────────────── properties ────────────────────

proptest! {
    #[test]
    fn active_and_cursor_stay_in_bounds(
        preset in arb_preset(),
        codes in prop::collection::vec(arb_key_code(), 0..200),
    ) {
        let layout = Layout::preset(preset);
        let mut model = DashboardModel::new(&layout, true);
        for code in codes {
            update(&mut model, key(code));
            prop_assert!(model.active < layout.len());
            prop_assert!(model.cursor < SLOTS_PER_FREEZER);
        }
    }

    #[test]
    fn destructive_commands_follow_confirmation(
        codes in prop::collection::vec(arb_key_code(), 0..200),
    ) {
        let layout = Layout::preset(LayoutPreset::Named);
        let mut model = DashboardModel::new(&layout, true);
        for code in codes {
            let pending_before = model.pending;
            let cmd = update(&mut model, key(code));
            match cmd {
                DashboardCmd::Clear(index) => {
                    prop_assert_eq!(pending_before, Some(ConfirmAction::ClearFreezer(index)));
                }
                DashboardCmd::ResetAll => {
                    prop_assert_eq!(pending_before, Some(ConfirmAction::ResetAll));
                }
                DashboardCmd::Toggle { freezer, slot } => {
                    prop_assert!(pending_before.is_none());
                    prop_assert_eq!(freezer, model.active);
                    prop_assert_eq!(slot, model.cursor);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn quit_key_always_quits(
        codes in prop::collection::vec(arb_key_code(), 0..50),
    ) {
        let layout = Layout::preset(LayoutPreset::Named);
        let mut model = DashboardModel::new(&layout, true);
        for code in codes {
            update(&mut model, key(code));
        }
        let ctrl_c = DashboardMsg::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        prop_assert_eq!(update(&mut model, ctrl_c), DashboardCmd::Quit);
        prop_assert!(model.quit);
    }
}
