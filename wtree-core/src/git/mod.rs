pub mod cli;
pub mod mock;
pub mod model;
pub mod provider;

pub use cli::CliGitProvider;
pub use model::{Branch, BranchKind, Worktree, sort_branches};
pub use provider::{CheckoutTarget, GitProvider};

use crate::constants::{WORKTREE_DIR_DEDUP_MAX_ATTEMPTS, WORKTREE_NAME_SEPARATOR};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Parse `git worktree list --porcelain` output into worktrees.
///
/// A record starts at each `worktree` line; blank separator lines are optional.
pub fn parse_worktree_porcelain(output: &str) -> Vec<Worktree> {
    let mut worktrees = Vec::new();
    let mut current: Option<Worktree> = None;

    for line in output.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            worktrees.extend(current.take());
            current = Some(Worktree {
                path: PathBuf::from(path),
                branch: None,
                head: String::new(),
            });
        } else if let Some(wt) = current.as_mut() {
            if let Some(head) = line.strip_prefix("HEAD ") {
                wt.head = head.to_string();
            } else if let Some(branch) = line.strip_prefix("branch ") {
                let branch = branch.strip_prefix("refs/heads/").unwrap_or(branch);
                wt.branch = Some(branch.to_string());
            }
        }
    }

    worktrees.extend(current);
    worktrees
}

/// Parse `git for-each-ref --format=%(refname:short)|%(committerdate:unix)` output.
///
/// Symbolic remote HEADs (`origin/HEAD`, or a bare `origin` on newer git) are skipped.
pub fn parse_branch_refs(output: &str, kind: BranchKind) -> Vec<Branch> {
    output
        .lines()
        .filter_map(|line| {
            let (name, timestamp) = line.trim().split_once('|')?;
            if name.is_empty() {
                return None;
            }
            if kind == BranchKind::Remote && (name.ends_with("/HEAD") || !name.contains('/')) {
                return None;
            }
            Some(Branch {
                name: name.to_string(),
                kind,
                last_commit: timestamp.trim().parse().unwrap_or(0),
            })
        })
        .collect()
}

/// All branches, local before remote, newest first within each kind.
pub fn list_branches(git: &dyn GitProvider) -> Result<Vec<Branch>> {
    let mut branches = git.list_local_branches()?;
    branches.extend(git.list_remote_branches()?);
    sort_branches(&mut branches);
    Ok(branches)
}

/// Pick a directory for a new worktree next to the main checkout:
/// ```text
/// ~/Development/myrepo/
/// ~/Development/myrepo-feat-awesome/
/// ```
/// An existing directory gets a numeric suffix instead of being reused.
pub fn worktree_dir(repo_root: &Path, branch: &str) -> Result<PathBuf> {
    let parent = repo_root.parent().unwrap_or(repo_root);
    let repo_name = repo_root
        .file_name()
        .map_or_else(|| "repo".into(), |n| n.to_string_lossy());
    let safe_branch = branch.replace('/', "-");
    let base = format!("{repo_name}{WORKTREE_NAME_SEPARATOR}{safe_branch}");

    let candidate = parent.join(&base);
    if !candidate.exists() {
        return Ok(candidate);
    }
    for i in 2..WORKTREE_DIR_DEDUP_MAX_ATTEMPTS {
        let candidate = parent.join(format!("{base}-{i}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    anyhow::bail!(
        "Could not find an available worktree directory name after {WORKTREE_DIR_DEDUP_MAX_ATTEMPTS} attempts"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WtreeError;
    use mock::MockGitProvider;
    use std::fs;

    #[test]
    fn test_parse_worktree_porcelain_single() {
        let output = "worktree /r\nHEAD abc\nbranch refs/heads/main\n";
        let wts = parse_worktree_porcelain(output);
        assert_eq!(
            wts,
            vec![Worktree {
                path: PathBuf::from("/r"),
                branch: Some("main".to_string()),
                head: "abc".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_worktree_porcelain_multiple() {
        let output = "\
worktree /home/user/project
HEAD abc123
branch refs/heads/main

worktree /home/user/project-feat
HEAD def456
branch refs/heads/feat/thing

";
        let wts = parse_worktree_porcelain(output);
        assert_eq!(wts.len(), 2);
        assert_eq!(wts[0].head, "abc123");
        assert_eq!(wts[1].branch.as_deref(), Some("feat/thing"));
        assert_eq!(wts[1].path, PathBuf::from("/home/user/project-feat"));
    }

    #[test]
    fn test_parse_worktree_porcelain_detached() {
        let output = "worktree /home/user/project\nHEAD abc123\ndetached\n\n";
        let wts = parse_worktree_porcelain(output);
        assert_eq!(wts.len(), 1);
        assert!(wts[0].branch.is_none());
        assert_eq!(wts[0].head, "abc123");
    }

    #[test]
    fn test_parse_worktree_porcelain_without_blank_separators() {
        let output = "worktree /a\nHEAD 1\nbranch refs/heads/main\nworktree /b\nHEAD 2\ndetached";
        let wts = parse_worktree_porcelain(output);
        assert_eq!(wts.len(), 2);
        assert_eq!(wts[0].branch.as_deref(), Some("main"));
        assert_eq!(wts[1].path, PathBuf::from("/b"));
        assert!(wts[1].branch.is_none());
    }

    #[test]
    fn test_parse_worktree_porcelain_bare_and_locked() {
        let output = "worktree /repo.git\nbare\n\nworktree /wt\nHEAD 9\nbranch refs/heads/x\nlocked reason\n";
        let wts = parse_worktree_porcelain(output);
        assert_eq!(wts.len(), 2);
        assert!(wts[0].branch.is_none());
        assert_eq!(wts[1].branch.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_worktree_porcelain_empty() {
        assert!(parse_worktree_porcelain("").is_empty());
    }

    #[test]
    fn test_parse_branch_refs_local() {
        let output = "main|1700000000\nfeat/x|1700000500\n\nbroken-line\n";
        let branches = parse_branch_refs(output, BranchKind::Local);
        assert_eq!(
            branches,
            vec![
                Branch::local("main", 1_700_000_000),
                Branch::local("feat/x", 1_700_000_500),
            ]
        );
    }

    #[test]
    fn test_parse_branch_refs_remote_skips_head() {
        let output = "origin/HEAD|1\norigin|1\norigin/main|5\nupstream/dev|notanumber\n";
        let branches = parse_branch_refs(output, BranchKind::Remote);
        assert_eq!(
            branches,
            vec![
                Branch::remote("origin/main", 5),
                Branch::remote("upstream/dev", 0),
            ]
        );
    }

    #[test]
    fn test_list_branches_concatenates_and_sorts() {
        let git = MockGitProvider {
            local_branches: vec![Branch::local("old", 1), Branch::local("new", 9)],
            remote_branches: vec![Branch::remote("origin/main", 100)],
            ..Default::default()
        };
        let branches = list_branches(&git).unwrap();
        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old", "origin/main"]);
    }

    #[test]
    fn test_default_branch_prefers_origin_main() {
        let git = MockGitProvider {
            refs: vec!["origin/main".into(), "origin/master".into()],
            ..Default::default()
        };
        assert_eq!(git.resolve_default_remote_branch().unwrap(), "origin/main");
        assert_eq!(*git.verify_ref_calls.lock().unwrap(), vec!["origin/main"]);
        assert_eq!(*git.remote_head_calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_default_branch_falls_back_to_master_without_symbolic_ref() {
        let git = MockGitProvider {
            refs: vec!["origin/master".into()],
            remote_head: Some("refs/remotes/origin/trunk".into()),
            ..Default::default()
        };
        assert_eq!(
            git.resolve_default_remote_branch().unwrap(),
            "origin/master"
        );
        assert_eq!(
            *git.verify_ref_calls.lock().unwrap(),
            vec!["origin/main", "origin/master"]
        );
        assert_eq!(*git.remote_head_calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_default_branch_uses_remote_head_last() {
        let git = MockGitProvider {
            remote_head: Some("refs/remotes/origin/trunk\n".into()),
            ..Default::default()
        };
        assert_eq!(git.resolve_default_remote_branch().unwrap(), "origin/trunk");
        assert_eq!(*git.remote_head_calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_default_branch_exhausted() {
        let git = MockGitProvider {
            remote_head: Some("garbage".into()),
            ..Default::default()
        };
        let err = git.resolve_default_remote_branch().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WtreeError>(),
            Some(WtreeError::NoDefaultBranch)
        ));
    }

    #[test]
    fn test_worktree_dir_basic() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("myrepo");
        let dir = worktree_dir(&root, "main").unwrap();
        assert_eq!(dir, tmp.path().join("myrepo-main"));
    }

    #[test]
    fn test_worktree_dir_slash_in_branch() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("myrepo");
        let dir = worktree_dir(&root, "feat/awesome").unwrap();
        assert_eq!(dir, tmp.path().join("myrepo-feat-awesome"));
    }

    #[test]
    fn test_worktree_dir_dedup() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("myrepo");
        fs::create_dir_all(tmp.path().join("myrepo-main")).unwrap();
        fs::create_dir_all(tmp.path().join("myrepo-main-2")).unwrap();
        let dir = worktree_dir(&root, "main").unwrap();
        assert_eq!(dir, tmp.path().join("myrepo-main-3"));
    }

    #[test]
    fn test_worktree_dir_bounded_error() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("myrepo");
        fs::create_dir_all(tmp.path().join("myrepo-main")).unwrap();
        for i in 2..WORKTREE_DIR_DEDUP_MAX_ATTEMPTS {
            fs::create_dir_all(tmp.path().join(format!("myrepo-main-{i}"))).unwrap();
        }
        let result = worktree_dir(&root, "main");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Could not find an available worktree directory name")
        );
    }
}
