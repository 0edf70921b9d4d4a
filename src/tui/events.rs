use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::state::{Tab, TuiState};

/// Handle a keyboard event, mutating TUI state and returning `true` if the loop should exit.
pub fn handle_key_event(key_event: KeyEvent, state: &mut TuiState) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }
    handle_key(key_event.code, state)
}

pub fn handle_key(code: KeyCode, state: &mut TuiState) -> bool {
    if state.show_help {
        if matches!(code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?')) {
            state.show_help = false;
        }
        return matches!(code, KeyCode::Char('q'));
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('h') | KeyCode::Char('?') => state.show_help = true,
        KeyCode::F(1) => state.tab = Tab::Snapshots,
        KeyCode::F(2) => state.tab = Tab::Graph,
        KeyCode::Tab | KeyCode::BackTab => state.tab = state.tab.toggle(),
        _ => match state.tab {
            Tab::Snapshots => handle_snapshots_key(code, state),
            Tab::Graph => handle_graph_key(code, state),
        },
    }

    false
}

fn handle_snapshots_key(code: KeyCode, state: &mut TuiState) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.snapshots_scroll = state.snapshots_scroll.saturating_sub(1)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.snapshots_scroll = state.snapshots_scroll.saturating_add(1)
        }
        KeyCode::PageUp => state.snapshots_scroll = state.snapshots_scroll.saturating_sub(10),
        KeyCode::PageDown => state.snapshots_scroll = state.snapshots_scroll.saturating_add(10),
        KeyCode::Home | KeyCode::Char('g') => state.snapshots_scroll = 0,
        _ => {}
    }
}

/// Up moves to the newer snapshot, Down to the older one.
fn handle_graph_key(code: KeyCode, state: &mut TuiState) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.context.newer();
            state.graph_scroll = 0;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.context.older();
            state.graph_scroll = 0;
        }
        KeyCode::Home | KeyCode::Char('g') => {
            state.context.oldest();
            state.graph_scroll = 0;
        }
        KeyCode::End | KeyCode::Char('G') => {
            state.context.newest();
            state.graph_scroll = 0;
        }
        KeyCode::PageUp => state.graph_scroll = state.graph_scroll.saturating_sub(10),
        KeyCode::PageDown => state.graph_scroll = state.graph_scroll.saturating_add(10),
        _ => {}
    }
}
