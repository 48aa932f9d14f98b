use super::{
    model::{Branch, Worktree},
    provider::{CheckoutTarget, GitProvider},
};
use crate::error::WtreeError;
use anyhow::Result;
use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

#[derive(Default)]
pub struct MockGitProvider {
    pub worktrees: Vec<Worktree>,
    pub local_branches: Vec<Branch>,
    pub remote_branches: Vec<Branch>,
    /// Refs that `verify_ref` reports as existing
    pub refs: Vec<String>,
    pub remote_head: Option<String>,
    pub repo_root: Option<PathBuf>,
    pub not_a_repo: bool,
    pub list_worktrees_error: Option<String>,
    pub list_branches_error: Option<String>,
    pub create_worktree_result: Mutex<Option<Result<()>>>,
    pub remove_worktree_result: Mutex<Option<Result<()>>>,
    pub create_worktree_calls: Mutex<Vec<(PathBuf, CheckoutTarget)>>,
    pub remove_worktree_calls: Mutex<Vec<PathBuf>>,
    pub verify_ref_calls: Mutex<Vec<String>>,
    pub remote_head_calls: Mutex<usize>,
}

impl GitProvider for MockGitProvider {
    fn list_worktrees(&self) -> Result<Vec<Worktree>> {
        if let Some(err) = &self.list_worktrees_error {
            return Err(WtreeError::external("git worktree list", err).into());
        }
        Ok(self.worktrees.clone())
    }

    fn list_local_branches(&self) -> Result<Vec<Branch>> {
        if let Some(err) = &self.list_branches_error {
            return Err(WtreeError::external("git for-each-ref", err).into());
        }
        Ok(self.local_branches.clone())
    }

    fn list_remote_branches(&self) -> Result<Vec<Branch>> {
        Ok(self.remote_branches.clone())
    }

    fn create_worktree(&self, path: &Path, target: &CheckoutTarget) -> Result<()> {
        self.create_worktree_calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), target.clone()));
        self.create_worktree_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(()))
    }

    fn remove_worktree(&self, path: &Path) -> Result<()> {
        self.remove_worktree_calls
            .lock()
            .unwrap()
            .push(path.to_path_buf());
        self.remove_worktree_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(()))
    }

    fn verify_ref(&self, name: &str) -> bool {
        self.verify_ref_calls.lock().unwrap().push(name.to_string());
        self.refs.iter().any(|r| r == name)
    }

    fn remote_head(&self) -> Option<String> {
        *self.remote_head_calls.lock().unwrap() += 1;
        self.remote_head.clone()
    }

    fn repo_root(&self) -> Result<PathBuf> {
        if self.not_a_repo {
            return Err(WtreeError::NotARepository.into());
        }
        Ok(self
            .repo_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("/src/repo")))
    }

    fn is_inside_repo(&self) -> bool {
        !self.not_a_repo
    }
}
