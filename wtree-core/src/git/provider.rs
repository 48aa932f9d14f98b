use super::model::{Branch, Worktree};
use crate::{
    constants::{DEFAULT_BRANCH_CANDIDATES, REMOTES_REF_PREFIX},
    error::WtreeError,
};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// What a new worktree checks out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutTarget {
    /// An existing local branch
    Existing { branch: String },
    /// A new local branch started from a remote-tracking ref
    FromRemote { local: String, remote_ref: String },
    /// A brand-new branch with no upstream, started from `base`
    NewBranch { name: String, base: String },
}

pub trait GitProvider: Send + Sync {
    fn list_worktrees(&self) -> Result<Vec<Worktree>>;
    fn list_local_branches(&self) -> Result<Vec<Branch>>;
    fn list_remote_branches(&self) -> Result<Vec<Branch>>;
    fn create_worktree(&self, path: &Path, target: &CheckoutTarget) -> Result<()>;
    fn remove_worktree(&self, path: &Path) -> Result<()>;
    /// Whether `name` resolves to a commit.
    fn verify_ref(&self, name: &str) -> bool;
    /// Target of `refs/remotes/origin/HEAD`, e.g. `refs/remotes/origin/trunk`.
    fn remote_head(&self) -> Option<String>;
    fn repo_root(&self) -> Result<PathBuf>;
    fn is_inside_repo(&self) -> bool;

    /// Resolve the ref new branches start from: `origin/main`, then
    /// `origin/master`, then whatever `origin/HEAD` points at.
    fn resolve_default_remote_branch(&self) -> Result<String> {
        if let Some(candidate) = DEFAULT_BRANCH_CANDIDATES
            .iter()
            .find(|candidate| self.verify_ref(candidate))
        {
            return Ok((*candidate).to_string());
        }

        self.remote_head()
            .and_then(|target| {
                target
                    .trim()
                    .strip_prefix(REMOTES_REF_PREFIX)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .ok_or_else(|| WtreeError::NoDefaultBranch.into())
    }
}
