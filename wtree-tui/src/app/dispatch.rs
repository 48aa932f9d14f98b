use super::EventSender;
use std::{
    sync::{Arc, atomic::Ordering},
    thread,
    time::Duration,
};
use wtree_core::{
    event::{AppEvent, Operation},
    git::{self, Branch, GitProvider, Worktree},
    opener::Opener,
    operations,
    update::Effect,
};

/// Runs effects on background threads and reports back over the event channel.
pub struct Dispatcher {
    git: Arc<dyn GitProvider>,
    opener: Arc<dyn Opener>,
    sender: EventSender,
}

impl Dispatcher {
    pub fn new(git: &Arc<dyn GitProvider>, opener: &Arc<dyn Opener>, sender: &EventSender) -> Self {
        Self {
            git: Arc::clone(git),
            opener: Arc::clone(opener),
            sender: sender.clone(),
        }
    }

    /// Start `effect` without blocking. Returns `false` for [`Effect::Quit`].
    pub fn dispatch(&self, effect: Effect) -> bool {
        match effect {
            Effect::Quit => return false,
            Effect::RefreshWorktrees => self.spawn_worktree_refresh(),
            Effect::RefreshBranches => self.spawn_branch_refresh(),
            Effect::CreateWorktree(branch) => self.spawn_worktree_creation(branch),
            Effect::CreateNewBranchWorktree(name) => self.spawn_branch_and_worktree_creation(name),
            Effect::DeleteWorktree(worktree) => self.spawn_worktree_removal(worktree),
            Effect::OpenWorktree(worktree) => self.spawn_open(worktree),
            Effect::ExpireStatus { seq, after } => self.spawn_status_timer(seq, after),
        }
        true
    }

    fn spawn_worktree_refresh(&self) {
        let git = Arc::clone(&self.git);
        let sender = self.sender.clone();
        thread::spawn(move || {
            if sender.cancel.load(Ordering::Relaxed) {
                return;
            }
            let result = git.list_worktrees().map_err(|e| format!("{e:#}"));
            sender.send(AppEvent::WorktreesRefreshed(result));
        });
    }

    fn spawn_branch_refresh(&self) {
        let git = Arc::clone(&self.git);
        let sender = self.sender.clone();
        thread::spawn(move || {
            if sender.cancel.load(Ordering::Relaxed) {
                return;
            }
            let result = git::list_branches(git.as_ref()).map_err(|e| format!("{e:#}"));
            sender.send(AppEvent::BranchesRefreshed(result));
        });
    }

    fn spawn_worktree_creation(&self, branch: Branch) {
        let git = Arc::clone(&self.git);
        let sender = self.sender.clone();
        thread::spawn(move || {
            if sender.cancel.load(Ordering::Relaxed) {
                return;
            }
            let op = Operation::CreateWorktree(branch.clone());
            sender.send(AppEvent::OperationStarted(op.clone()));
            let result = operations::create_worktree_for_branch(git.as_ref(), &branch);
            sender.finish(op, result.map(|_| ()));
        });
    }

    fn spawn_branch_and_worktree_creation(&self, name: String) {
        let git = Arc::clone(&self.git);
        let sender = self.sender.clone();
        thread::spawn(move || {
            if sender.cancel.load(Ordering::Relaxed) {
                return;
            }
            let op = Operation::CreateBranch(name.clone());
            sender.send(AppEvent::OperationStarted(op.clone()));
            let result = operations::create_new_branch_worktree(git.as_ref(), &name);
            sender.finish(op, result.map(|_| ()));
        });
    }

    fn spawn_worktree_removal(&self, worktree: Worktree) {
        let git = Arc::clone(&self.git);
        let sender = self.sender.clone();
        thread::spawn(move || {
            if sender.cancel.load(Ordering::Relaxed) {
                return;
            }
            let op = Operation::DeleteWorktree(worktree.clone());
            sender.send(AppEvent::OperationStarted(op.clone()));
            let result = operations::delete_worktree(git.as_ref(), &worktree);
            sender.finish(op, result);
        });
    }

    fn spawn_open(&self, worktree: Worktree) {
        let opener = Arc::clone(&self.opener);
        let sender = self.sender.clone();
        thread::spawn(move || {
            if sender.cancel.load(Ordering::Relaxed) {
                return;
            }
            let result = opener.open(&worktree.path);
            sender.finish(Operation::OpenWorktree(worktree), result);
        });
    }

    fn spawn_status_timer(&self, seq: u64, after: Duration) {
        let sender = self.sender.clone();
        thread::spawn(move || {
            thread::sleep(after);
            if sender.cancel.load(Ordering::Relaxed) {
                return;
            }
            sender.send(AppEvent::StatusExpired(seq));
        });
    }
}

impl EventSender {
    fn finish(&self, op: Operation, result: anyhow::Result<()>) {
        if let Err(e) = &result {
            log::warn!("{op:?} failed: {e:#}");
        }
        self.send(AppEvent::OperationFinished {
            op,
            result: result.map_err(|e| format!("{e:#}")),
        });
    }
}
