//! Worktree operations shared by the interactive dispatcher and batch mode.

use crate::{
    error::{EntityKind, WtreeError},
    git::{Branch, BranchKind, CheckoutTarget, GitProvider, Worktree, worktree_dir},
};
use anyhow::Result;
use regex::Regex;
use std::{path::PathBuf, sync::LazyLock};

static VALID_BRANCH_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_./-]+$").unwrap());

/// Characters accepted while typing a new branch name.
pub fn is_valid_branch_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.')
}

pub fn validate_branch_name(name: &str) -> Result<()> {
    if VALID_BRANCH_NAME.is_match(name) {
        Ok(())
    } else {
        Err(WtreeError::InvalidBranchName {
            name: name.to_string(),
        }
        .into())
    }
}

/// Check out `branch` in a fresh worktree next to the main checkout.
///
/// A remote branch gets a local tracking branch named without its remote prefix.
pub fn create_worktree_for_branch(git: &dyn GitProvider, branch: &Branch) -> Result<PathBuf> {
    let root = git.repo_root()?;
    let local = branch.local_name();
    let path = worktree_dir(&root, local)?;
    let target = match branch.kind {
        BranchKind::Local => CheckoutTarget::Existing {
            branch: branch.name.clone(),
        },
        BranchKind::Remote => CheckoutTarget::FromRemote {
            local: local.to_string(),
            remote_ref: branch.name.clone(),
        },
    };

    log::info!("creating worktree for {} at {}", branch.name, path.display());
    git.create_worktree(&path, &target)?;
    Ok(path)
}

/// Create `name` from the default remote branch, checked out in a new worktree.
pub fn create_new_branch_worktree(git: &dyn GitProvider, name: &str) -> Result<PathBuf> {
    validate_branch_name(name)?;
    let base = git.resolve_default_remote_branch()?;
    let root = git.repo_root()?;
    let path = worktree_dir(&root, name)?;

    log::info!("creating branch {name} from {base} at {}", path.display());
    git.create_worktree(
        &path,
        &CheckoutTarget::NewBranch {
            name: name.to_string(),
            base,
        },
    )?;
    Ok(path)
}

pub fn delete_worktree(git: &dyn GitProvider, worktree: &Worktree) -> Result<()> {
    log::info!("removing worktree at {}", worktree.path.display());
    git.remove_worktree(&worktree.path)
}

pub fn find_branch<'a>(branches: &'a [Branch], name: &str) -> Result<&'a Branch> {
    branches
        .iter()
        .find(|b| b.name == name)
        .ok_or_else(|| WtreeError::not_found(EntityKind::Branch, name).into())
}

/// Look a worktree up by its full path or by its directory name.
pub fn find_worktree<'a>(worktrees: &'a [Worktree], path_or_name: &str) -> Result<&'a Worktree> {
    let wanted = PathBuf::from(path_or_name);
    worktrees
        .iter()
        .find(|wt| wt.path == wanted)
        .or_else(|| worktrees.iter().find(|wt| wt.dir_name() == path_or_name))
        .ok_or_else(|| WtreeError::not_found(EntityKind::Worktree, path_or_name).into())
}
