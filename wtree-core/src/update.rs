//! The state machine: every change to [`AppState`] goes through [`update`].

use crate::{
    action::Action,
    constants::STATUS_TTL,
    event::{AppEvent, Operation},
    filter::{branch_matcher, filter_branches},
    git::{Branch, Worktree, model::dir_name},
    operations::{is_valid_branch_char, validate_branch_name},
    state::{AppState, Mode, StatusKind},
};
use std::time::Duration;

/// Work the state machine asks the dispatcher to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RefreshWorktrees,
    RefreshBranches,
    CreateWorktree(Branch),
    CreateNewBranchWorktree(String),
    DeleteWorktree(Worktree),
    OpenWorktree(Worktree),
    ExpireStatus { seq: u64, after: Duration },
    Quit,
}

/// Apply one event to the state. Never blocks and does no I/O.
pub fn update(state: &mut AppState, event: AppEvent) -> Vec<Effect> {
    match event {
        AppEvent::KeyInput(action) => handle_action(state, action),
        AppEvent::WorktreesRefreshed(result) => on_worktrees_refreshed(state, result),
        AppEvent::BranchesRefreshed(result) => on_branches_refreshed(state, result),
        AppEvent::OperationStarted(op) => {
            if !mark_pending(state, &op) {
                log::debug!("operation already marked pending: {op:?}");
            }
            Vec::new()
        }
        AppEvent::OperationFinished { op, result } => on_operation_finished(state, op, result),
        AppEvent::Resize { height, .. } => {
            state.viewport_height = AppState::viewport_for_terminal(height);
            state.adjust_scroll();
            Vec::new()
        }
        AppEvent::StatusExpired(seq) => {
            if seq == state.status_seq {
                resume_progress(state);
            }
            Vec::new()
        }
    }
}

fn handle_action(state: &mut AppState, action: Action) -> Vec<Effect> {
    let page = isize::try_from(state.viewport_height).unwrap_or(isize::MAX);
    match action {
        Action::Quit => vec![Effect::Quit],
        Action::MoveUp => {
            state.move_cursor(-1);
            Vec::new()
        }
        Action::MoveDown => {
            state.move_cursor(1);
            Vec::new()
        }
        Action::PageUp => {
            state.move_cursor(-page);
            Vec::new()
        }
        Action::PageDown => {
            state.move_cursor(page);
            Vec::new()
        }
        Action::MoveTop => {
            state.move_to(0);
            Vec::new()
        }
        Action::MoveBottom => {
            state.move_to(usize::MAX);
            Vec::new()
        }
        other => match state.mode {
            Mode::WorktreeList => worktree_list_action(state, other),
            Mode::BranchList => branch_list_action(state, other),
            Mode::Filtering => filtering_action(state, other),
            Mode::CreatingBranch => creating_branch_action(state, other),
        },
    }
}

fn worktree_list_action(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::Select => state
            .selected_worktree()
            .cloned()
            .map(Effect::OpenWorktree)
            .into_iter()
            .collect(),
        Action::DeleteWorktree => {
            let Some(worktree) = state.selected_worktree().cloned() else {
                return Vec::new();
            };
            if begin(state, Operation::DeleteWorktree(worktree.clone())) {
                vec![Effect::DeleteWorktree(worktree)]
            } else {
                Vec::new()
            }
        }
        Action::SwitchView => {
            set_mode(state, Mode::BranchList);
            state.reset_cursor();
            Vec::new()
        }
        Action::Refresh => refresh(state),
        _ => Vec::new(),
    }
}

fn branch_list_action(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::Select => match state.selected_branch().cloned() {
            Some(branch) => start_worktree_creation(state, branch),
            None => Vec::new(),
        },
        Action::StartFilter => {
            set_mode(state, Mode::Filtering);
            state.input.clear();
            Vec::new()
        }
        Action::StartNewBranch => {
            set_mode(state, Mode::CreatingBranch);
            state.input.clear();
            Vec::new()
        }
        Action::SwitchView => {
            set_mode(state, Mode::WorktreeList);
            state.reset_cursor();
            Vec::new()
        }
        Action::Refresh => refresh(state),
        _ => Vec::new(),
    }
}

fn filtering_action(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::Select => {
            let Some(branch) = state.selected_branch().cloned() else {
                return Vec::new();
            };
            leave_text_entry(state);
            // Keep the chosen branch highlighted in the unfiltered list
            let index = state
                .all_branches
                .iter()
                .position(|b| *b == branch)
                .unwrap_or(0);
            state.move_to(index);
            start_worktree_creation(state, branch)
        }
        Action::Cancel => {
            leave_text_entry(state);
            state.reset_cursor();
            Vec::new()
        }
        edit => {
            if edit_input(state, edit, |_| true) {
                refilter(state);
            }
            Vec::new()
        }
    }
}

fn creating_branch_action(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::Select => {
            let name = state.input.as_str().to_string();
            if name.is_empty() {
                return Vec::new();
            }
            if let Err(e) = validate_branch_name(&name) {
                return error_status(state, &e.to_string());
            }
            if begin(state, Operation::CreateBranch(name.clone())) {
                vec![Effect::CreateNewBranchWorktree(name)]
            } else {
                Vec::new()
            }
        }
        Action::Cancel => {
            leave_text_entry(state);
            Vec::new()
        }
        edit => {
            edit_input(state, edit, is_valid_branch_char);
            Vec::new()
        }
    }
}

/// Apply a text-editing action to the input buffer. Returns whether the text changed.
fn edit_input(state: &mut AppState, action: Action, accept: impl Fn(char) -> bool) -> bool {
    let input = &mut state.input;
    match action {
        Action::InputChar(c) if accept(c) => {
            input.insert_char(c);
            true
        }
        Action::InputChar(c) => {
            log::debug!("rejected input character {c:?}");
            false
        }
        Action::InputBackspace => input.backspace(),
        Action::InputDeleteWord => input.delete_word(),
        Action::CursorLeft => {
            input.cursor_left();
            false
        }
        Action::CursorRight => {
            input.cursor_right();
            false
        }
        Action::CursorStart => {
            input.cursor_start();
            false
        }
        Action::CursorEnd => {
            input.cursor_end();
            false
        }
        _ => false,
    }
}

fn refilter(state: &mut AppState) {
    state.visible_branches =
        filter_branches(&branch_matcher(), state.input.as_str(), &state.all_branches);
    if state.cursor >= state.visible_branches.len() {
        state.cursor = 0;
    }
    state.adjust_scroll();
}

/// Drop back to the plain branch list, discarding the text buffer and filter.
fn leave_text_entry(state: &mut AppState) {
    set_mode(state, Mode::BranchList);
    state.input.clear();
    state.visible_branches.clone_from(&state.all_branches);
}

fn set_mode(state: &mut AppState, mode: Mode) {
    if state.mode != mode {
        log::debug!("mode {:?} -> {:?}", state.mode, mode);
        state.mode = mode;
    }
}

fn refresh(state: &mut AppState) -> Vec<Effect> {
    state.loading_worktrees = true;
    state.loading_branches = true;
    vec![Effect::RefreshWorktrees, Effect::RefreshBranches]
}

fn start_worktree_creation(state: &mut AppState, branch: Branch) -> Vec<Effect> {
    if begin(state, Operation::CreateWorktree(branch.clone())) {
        vec![Effect::CreateWorktree(branch)]
    } else {
        Vec::new()
    }
}

/// Optimistically mark `op` as in flight. False means the same target is
/// already pending and nothing should be dispatched.
fn begin(state: &mut AppState, op: Operation) -> bool {
    let started = mark_pending(state, &op);
    if !started {
        log::warn!("ignoring repeated request while pending: {op:?}");
    }
    started
}

/// Record `op`'s target as in flight and show its progress status. Returns
/// false when that target is already pending.
fn mark_pending(state: &mut AppState, op: &Operation) -> bool {
    let pending = &mut state.pending;
    let (inserted, text) = match op {
        Operation::CreateWorktree(branch) => (
            pending.worktree_creation.insert(branch.name.clone()),
            creating_worktree_text(&branch.name),
        ),
        Operation::CreateBranch(name) => (
            pending.branch_creation.insert(name.clone()),
            creating_branch_text(name),
        ),
        Operation::DeleteWorktree(worktree) => (
            pending.worktree_deletion.insert(worktree.path.clone()),
            deleting_text(&worktree.dir_name()),
        ),
        Operation::OpenWorktree(_) => return true,
    };
    if inserted {
        state.set_status(StatusKind::Progress, text);
    }
    inserted
}

fn clear_pending(state: &mut AppState, op: &Operation) {
    let pending = &mut state.pending;
    match op {
        Operation::CreateWorktree(branch) => {
            pending.worktree_creation.remove(&branch.name);
        }
        Operation::CreateBranch(name) => {
            pending.branch_creation.remove(name);
        }
        Operation::DeleteWorktree(worktree) => {
            pending.worktree_deletion.remove(&worktree.path);
        }
        Operation::OpenWorktree(_) => {}
    }
}

fn creating_worktree_text(branch: &str) -> String {
    format!("Creating worktree for branch '{branch}'...")
}

fn creating_branch_text(name: &str) -> String {
    format!("Creating new branch '{name}' and worktree...")
}

fn deleting_text(dir: &str) -> String {
    format!("Deleting worktree '{dir}'...")
}

/// Replace an expired status with the progress of an operation that is still
/// running, or clear it when nothing is.
fn resume_progress(state: &mut AppState) {
    let pending = &state.pending;
    let text = pending
        .worktree_deletion
        .first()
        .map(|path| deleting_text(&dir_name(path)))
        .or_else(|| pending.worktree_creation.first().map(|b| creating_worktree_text(b)))
        .or_else(|| pending.branch_creation.first().map(|n| creating_branch_text(n)));
    match text {
        Some(text) => {
            state.set_status(StatusKind::Progress, text);
        }
        None => state.clear_status(),
    }
}

fn on_operation_finished(
    state: &mut AppState,
    op: Operation,
    result: Result<(), String>,
) -> Vec<Effect> {
    clear_pending(state, &op);

    if let Err(message) = result {
        log::warn!("operation failed: {op:?}: {message}");
        return error_status(state, &message);
    }

    let (text, mut effects) = match &op {
        Operation::CreateWorktree(branch) => {
            show_worktrees(state);
            (
                format!("Successfully created worktree for branch '{}'", branch.name),
                vec![Effect::RefreshWorktrees, Effect::RefreshBranches],
            )
        }
        Operation::CreateBranch(name) => {
            show_worktrees(state);
            (
                format!("Successfully created new branch '{name}' and worktree"),
                vec![Effect::RefreshWorktrees, Effect::RefreshBranches],
            )
        }
        Operation::DeleteWorktree(worktree) => (
            format!("Successfully deleted worktree '{}'", worktree.dir_name()),
            vec![Effect::RefreshWorktrees],
        ),
        Operation::OpenWorktree(worktree) => (format!("Opened '{}'", worktree.dir_name()), Vec::new()),
    };

    let seq = state.set_status(StatusKind::Success, text);
    effects.push(Effect::ExpireStatus {
        seq,
        after: STATUS_TTL,
    });
    effects
}

/// After a successful creation the new worktree is what the user wants to see.
fn show_worktrees(state: &mut AppState) {
    if state.mode.is_text_entry() {
        state.input.clear();
        state.visible_branches.clone_from(&state.all_branches);
    }
    set_mode(state, Mode::WorktreeList);
    state.reset_cursor();
}

fn error_status(state: &mut AppState, message: &str) -> Vec<Effect> {
    let seq = state.set_status(StatusKind::Error, format!("Error: {message}"));
    vec![Effect::ExpireStatus {
        seq,
        after: STATUS_TTL,
    }]
}

fn on_worktrees_refreshed(state: &mut AppState, result: Result<Vec<Worktree>, String>) -> Vec<Effect> {
    state.loading_worktrees = false;
    match result {
        Ok(worktrees) => {
            state.worktrees = worktrees;
            if state.mode == Mode::WorktreeList {
                state.clamp_cursor();
            }
            Vec::new()
        }
        Err(message) => error_status(state, &message),
    }
}

fn on_branches_refreshed(state: &mut AppState, result: Result<Vec<Branch>, String>) -> Vec<Effect> {
    state.loading_branches = false;
    match result {
        Ok(branches) => {
            state.all_branches = branches;
            state.visible_branches = if state.mode == Mode::Filtering {
                filter_branches(&branch_matcher(), state.input.as_str(), &state.all_branches)
            } else {
                state.all_branches.clone()
            };
            if state.mode.shows_branches() {
                state.clamp_cursor();
            }
            Vec::new()
        }
        Err(message) => error_status(state, &message),
    }
}
