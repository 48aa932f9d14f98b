use crate::{
    action::Action,
    git::{Branch, Worktree},
};

/// Work a background worker reports back on. The first three are tracked
/// by pending flags; opening in the editor is fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateWorktree(Branch),
    CreateBranch(String),
    DeleteWorktree(Worktree),
    OpenWorktree(Worktree),
}

/// Everything the event loop feeds into the state machine: key presses and
/// results arriving from background workers. Errors cross the worker boundary
/// as display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    KeyInput(Action),
    WorktreesRefreshed(Result<Vec<Worktree>, String>),
    BranchesRefreshed(Result<Vec<Branch>, String>),
    OperationStarted(Operation),
    OperationFinished {
        op: Operation,
        result: Result<(), String>,
    },
    Resize {
        width: u16,
        height: u16,
    },
    StatusExpired(u64),
}
