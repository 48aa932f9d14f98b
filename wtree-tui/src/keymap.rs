use crossterm::event::KeyEvent as CrosstermKeyEvent;
use wtree_core::{
    action::Action,
    config::{Command, KeysConfig},
    keyboard::{KeyCode, KeyEvent, KeyModifiers},
    state::{AppState, Mode},
};

/// Resolve a key event into an Action using the keymap of the current mode.
///
/// In text-entry modes an unbound printable key is typed into the input.
pub fn resolve_action(
    key: CrosstermKeyEvent,
    state: &AppState,
    keys: &KeysConfig,
) -> Option<Action> {
    let key = KeyEvent::from(key);
    let keymap = keys.keymap_for_mode(state.mode);

    if let Some(command) = keymap.get(&key) {
        return command_to_action(command);
    }

    if state.mode.is_text_entry()
        && let KeyCode::Char(c) = key.code
        && key.modifiers == KeyModifiers::NONE
    {
        return Some(Action::InputChar(c));
    }

    None
}

fn command_to_action(command: &Command) -> Option<Action> {
    let action = match command {
        Command::Noop => return None,
        Command::Quit => Action::Quit,
        Command::Select => Action::Select,
        Command::Cancel => Action::Cancel,
        Command::SwitchView => Action::SwitchView,
        Command::StartFilter => Action::StartFilter,
        Command::NewBranch => Action::StartNewBranch,
        Command::DeleteWorktree => Action::DeleteWorktree,
        Command::Refresh => Action::Refresh,
        Command::MoveUp => Action::MoveUp,
        Command::MoveDown => Action::MoveDown,
        Command::PageUp => Action::PageUp,
        Command::PageDown => Action::PageDown,
        Command::MoveTop => Action::MoveTop,
        Command::MoveBottom => Action::MoveBottom,
        Command::DeleteBackwardChar => Action::InputBackspace,
        Command::DeleteBackwardWord => Action::InputDeleteWord,
        Command::MoveCursorLeft => Action::CursorLeft,
        Command::MoveCursorRight => Action::CursorRight,
        Command::MoveCursorStart => Action::CursorStart,
        Command::MoveCursorEnd => Action::CursorEnd,
    };
    Some(action)
}

/// Footer hints for the current mode, as `(key, description)` pairs.
pub fn hints(mode: Mode, keys: &KeysConfig) -> Vec<(String, &'static str)> {
    let commands: &[Command] = match mode {
        Mode::WorktreeList => &[
            Command::Select,
            Command::DeleteWorktree,
            Command::SwitchView,
            Command::Refresh,
            Command::Quit,
        ],
        Mode::BranchList => &[
            Command::Select,
            Command::StartFilter,
            Command::NewBranch,
            Command::SwitchView,
            Command::Quit,
        ],
        Mode::Filtering | Mode::CreatingBranch => &[Command::Select, Command::Cancel],
    };

    let keymap = keys.keymap_for_mode(mode);
    commands
        .iter()
        .filter_map(|command| {
            KeysConfig::find_key(&keymap, command).map(|key| (key.to_string(), command.description()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode as CtKeyCode, KeyModifiers as CtKeyModifiers};

    fn key(code: CtKeyCode) -> CrosstermKeyEvent {
        CrosstermKeyEvent::new(code, CtKeyModifiers::NONE)
    }

    fn ctrl(c: char) -> CrosstermKeyEvent {
        CrosstermKeyEvent::new(CtKeyCode::Char(c), CtKeyModifiers::CONTROL)
    }

    fn state_in(mode: Mode) -> AppState {
        let mut state = AppState::new();
        state.mode = mode;
        state
    }

    #[test]
    fn test_worktree_list_bindings() {
        let keys = KeysConfig::default();
        let state = state_in(Mode::WorktreeList);
        assert_eq!(
            resolve_action(key(CtKeyCode::Enter), &state, &keys),
            Some(Action::Select)
        );
        assert_eq!(
            resolve_action(key(CtKeyCode::Char('d')), &state, &keys),
            Some(Action::DeleteWorktree)
        );
        assert_eq!(
            resolve_action(key(CtKeyCode::Tab), &state, &keys),
            Some(Action::SwitchView)
        );
        assert_eq!(
            resolve_action(key(CtKeyCode::Char('j')), &state, &keys),
            Some(Action::MoveDown)
        );
        assert_eq!(
            resolve_action(key(CtKeyCode::Char('q')), &state, &keys),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_branch_list_bindings() {
        let keys = KeysConfig::default();
        let state = state_in(Mode::BranchList);
        assert_eq!(
            resolve_action(key(CtKeyCode::Char('/')), &state, &keys),
            Some(Action::StartFilter)
        );
        assert_eq!(
            resolve_action(key(CtKeyCode::Char('n')), &state, &keys),
            Some(Action::StartNewBranch)
        );
        // Deleting only makes sense for worktrees
        assert_eq!(resolve_action(key(CtKeyCode::Char('d')), &state, &keys), None);
    }

    #[test]
    fn test_text_modes_type_letters() {
        let keys = KeysConfig::default();
        for mode in [Mode::Filtering, Mode::CreatingBranch] {
            let state = state_in(mode);
            assert_eq!(
                resolve_action(key(CtKeyCode::Char('q')), &state, &keys),
                Some(Action::InputChar('q'))
            );
            assert_eq!(
                resolve_action(key(CtKeyCode::Char('j')), &state, &keys),
                Some(Action::InputChar('j'))
            );
            assert_eq!(
                resolve_action(ctrl('c'), &state, &keys),
                Some(Action::Quit)
            );
            assert_eq!(
                resolve_action(key(CtKeyCode::Esc), &state, &keys),
                Some(Action::Cancel)
            );
            assert_eq!(
                resolve_action(key(CtKeyCode::Backspace), &state, &keys),
                Some(Action::InputBackspace)
            );
        }
    }

    #[test]
    fn test_shifted_letter_is_typed_uppercase() {
        let keys = KeysConfig::default();
        let state = state_in(Mode::CreatingBranch);
        let shifted = CrosstermKeyEvent::new(CtKeyCode::Char('F'), CtKeyModifiers::SHIFT);
        assert_eq!(
            resolve_action(shifted, &state, &keys),
            Some(Action::InputChar('F'))
        );
    }

    #[test]
    fn test_filtering_keeps_arrow_navigation() {
        let keys = KeysConfig::default();
        let state = state_in(Mode::Filtering);
        assert_eq!(
            resolve_action(key(CtKeyCode::Down), &state, &keys),
            Some(Action::MoveDown)
        );
        assert_eq!(
            resolve_action(key(CtKeyCode::Home), &state, &keys),
            Some(Action::CursorStart)
        );
    }

    #[test]
    fn test_unbound_control_key_in_text_mode_is_ignored() {
        let keys = KeysConfig::default();
        let state = state_in(Mode::Filtering);
        assert_eq!(resolve_action(ctrl('x'), &state, &keys), None);
    }

    #[test]
    fn test_noop_unbinds_default() {
        let mut keys = KeysConfig::default();
        keys.worktree_list.insert(KeyEvent::char('d'), Command::Noop);
        let state = state_in(Mode::WorktreeList);
        assert_eq!(resolve_action(key(CtKeyCode::Char('d')), &state, &keys), None);
    }

    #[test]
    fn test_hints_follow_bindings() {
        let keys = KeysConfig::default();
        let hints = hints(Mode::CreatingBranch, &keys);
        assert_eq!(
            hints,
            vec![
                ("enter".to_string(), Command::Select.description()),
                ("esc".to_string(), Command::Cancel.description()),
            ]
        );
    }
}
