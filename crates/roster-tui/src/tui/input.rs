// Keyboard input handling and command dispatch.
//
// Slider movement, focus, and scrolling mutate the ViewState directly.
// Drawing, rescanning, saving, and quitting become `UserCommand`s for the
// app layer.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::{SliderId, StatusMessage, UserCommand};

/// Rows moved by PageUp/PageDown in the selection table.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should go to the app
/// layer. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Tab | KeyCode::BackTab => {
            view_state.focus = view_state.focus.toggle();
            None
        }
        KeyCode::Left | KeyCode::Char('h') => {
            adjust_slider(view_state, -1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            adjust_slider(view_state, 1);
            None
        }

        KeyCode::Up | KeyCode::Char('k') => {
            view_state.table_scroll = view_state.table_scroll.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.table_scroll = view_state.table_scroll.saturating_add(1);
            None
        }
        KeyCode::PageUp => {
            view_state.table_scroll = view_state.table_scroll.saturating_sub(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            view_state.table_scroll = view_state.table_scroll.saturating_add(PAGE_SIZE);
            None
        }

        KeyCode::Char('g') | KeyCode::Enter => generate(view_state),
        KeyCode::Char('r') => Some(UserCommand::Rescan),
        KeyCode::Char('s') => Some(UserCommand::Save),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// `y`/`q` confirm, `n`/`Esc` cancel, everything else is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Move the focused slider by `delta`, staying within `0..=slider_max`.
fn adjust_slider(view_state: &mut ViewState, delta: isize) {
    let ceiling = view_state.slider_max;
    let value = match view_state.focus {
        SliderId::Min => &mut view_state.min,
        SliderId::Max => &mut view_state.max,
    };
    *value = value.saturating_add_signed(delta).min(ceiling);
}

/// Reject inverted bounds here so the app layer never sees them.
fn generate(view_state: &mut ViewState) -> Option<UserCommand> {
    if view_state.min > view_state.max {
        view_state.message = Some(StatusMessage::error("Minimum exceeds maximum"));
        return None;
    }
    Some(UserCommand::Generate {
        min: view_state.min,
        max: view_state.max,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
