use super::{
    model::{Branch, BranchKind, Worktree},
    parse_branch_refs, parse_worktree_porcelain,
    provider::{CheckoutTarget, GitProvider},
};
use crate::{constants::REMOTE_HEAD_REF, error::WtreeError};
use anyhow::Result;
use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

const BRANCH_FORMAT: &str = "--format=%(refname:short)|%(committerdate:unix)";

/// Runs the `git` binary inside `workdir`.
pub struct CliGitProvider {
    workdir: PathBuf,
}

impl CliGitProvider {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| WtreeError::external(describe(args), e.to_string()).into())
    }

    /// Run git and return stdout, failing on a non-zero exit.
    fn git_stdout(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WtreeError::external(describe(args), stderr).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn list_refs(&self, namespace: &str, kind: BranchKind) -> Result<Vec<Branch>> {
        let stdout = self.git_stdout(&["for-each-ref", BRANCH_FORMAT, namespace])?;
        Ok(parse_branch_refs(&stdout, kind))
    }
}

fn describe(args: &[&str]) -> String {
    let shown: Vec<&str> = args
        .iter()
        .copied()
        .filter(|arg| !arg.starts_with("--format"))
        .take(2)
        .collect();
    format!("git {}", shown.join(" "))
}

impl GitProvider for CliGitProvider {
    fn list_worktrees(&self) -> Result<Vec<Worktree>> {
        let stdout = self.git_stdout(&["worktree", "list", "--porcelain"])?;
        Ok(parse_worktree_porcelain(&stdout))
    }

    fn list_local_branches(&self) -> Result<Vec<Branch>> {
        self.list_refs("refs/heads/", BranchKind::Local)
    }

    fn list_remote_branches(&self) -> Result<Vec<Branch>> {
        self.list_refs("refs/remotes/", BranchKind::Remote)
    }

    fn create_worktree(&self, path: &Path, target: &CheckoutTarget) -> Result<()> {
        let path = path.to_string_lossy();
        let path = &*path;
        let args: Vec<&str> = match target {
            CheckoutTarget::Existing { branch } => vec!["worktree", "add", path, branch.as_str()],
            CheckoutTarget::FromRemote { local, remote_ref } => vec![
                "worktree",
                "add",
                "-b",
                local.as_str(),
                path,
                remote_ref.as_str(),
            ],
            CheckoutTarget::NewBranch { name, base } => vec![
                "worktree",
                "add",
                "--no-track",
                "-b",
                name.as_str(),
                path,
                base.as_str(),
            ],
        };
        self.git_stdout(&args)?;
        Ok(())
    }

    fn remove_worktree(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.git_stdout(&["worktree", "remove", &*path])?;
        Ok(())
    }

    fn verify_ref(&self, name: &str) -> bool {
        self.git(&["rev-parse", "--verify", "--quiet", name])
            .is_ok_and(|output| output.status.success())
    }

    fn remote_head(&self) -> Option<String> {
        let stdout = self.git_stdout(&["symbolic-ref", REMOTE_HEAD_REF]).ok()?;
        let target = stdout.trim();
        if target.is_empty() {
            None
        } else {
            Some(target.to_string())
        }
    }

    fn repo_root(&self) -> Result<PathBuf> {
        if !self.is_inside_repo() {
            return Err(WtreeError::NotARepository.into());
        }
        let stdout = self.git_stdout(&["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(stdout.trim()))
    }

    fn is_inside_repo(&self) -> bool {
        self.git(&["rev-parse", "--git-dir"])
            .is_ok_and(|output| output.status.success())
    }
}
