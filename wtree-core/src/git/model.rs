use serde::Serialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Worktree {
    pub path: PathBuf,
    /// `None` for a detached HEAD
    pub branch: Option<String>,
    pub head: String,
}

impl Worktree {
    /// Directory name of the worktree, used for display and for matching
    /// worktrees by name in batch mode.
    pub fn dir_name(&self) -> String {
        dir_name(&self.path)
    }

    pub fn branch_label(&self) -> &str {
        self.branch.as_deref().unwrap_or("detached")
    }
}

/// Last component of `path`, or the whole path when it has none.
pub fn dir_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    Local,
    Remote,
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub name: String,
    pub kind: BranchKind,
    /// Committer date of the tip, in unix seconds
    pub last_commit: i64,
}

impl Branch {
    pub fn local(name: impl Into<String>, last_commit: i64) -> Self {
        Self {
            name: name.into(),
            kind: BranchKind::Local,
            last_commit,
        }
    }

    pub fn remote(name: impl Into<String>, last_commit: i64) -> Self {
        Self {
            name: name.into(),
            kind: BranchKind::Remote,
            last_commit,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.kind == BranchKind::Remote
    }

    /// Name of the local branch a worktree for this branch checks out.
    /// Remote branches drop their remote prefix (`origin/feat` becomes `feat`).
    pub fn local_name(&self) -> &str {
        match self.kind {
            BranchKind::Local => &self.name,
            BranchKind::Remote => self
                .name
                .split_once('/')
                .map_or(self.name.as_str(), |(_, branch)| branch),
        }
    }
}

/// Local branches first, then remote; most recently committed first within each kind.
/// The sort is stable so equal timestamps keep their listing order.
pub fn sort_branches(branches: &mut [Branch]) {
    branches.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| b.last_commit.cmp(&a.last_commit))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_local_before_remote_then_recency() {
        let mut branches = vec![
            Branch::remote("origin/new", 500),
            Branch::local("old", 100),
            Branch::remote("origin/old", 50),
            Branch::local("new", 300),
        ];
        sort_branches(&mut branches);
        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old", "origin/new", "origin/old"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let mut branches = vec![
            Branch::local("b", 10),
            Branch::local("a", 10),
            Branch::local("c", 10),
        ];
        sort_branches(&mut branches);
        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_invariant_holds_for_mixed_input() {
        let mut branches: Vec<Branch> = (0..20)
            .map(|i| {
                let ts = (i * 37) % 11;
                if i % 3 == 0 {
                    Branch::remote(format!("origin/b{i}"), ts)
                } else {
                    Branch::local(format!("b{i}"), ts)
                }
            })
            .collect();
        sort_branches(&mut branches);

        let first_remote = branches
            .iter()
            .position(Branch::is_remote)
            .unwrap_or(branches.len());
        assert!(branches[..first_remote].iter().all(|b| !b.is_remote()));
        assert!(branches[first_remote..].iter().all(Branch::is_remote));
        for pair in branches.windows(2) {
            if pair[0].kind == pair[1].kind {
                assert!(pair[0].last_commit >= pair[1].last_commit);
            }
        }
    }

    #[test]
    fn test_local_name_strips_remote_prefix() {
        assert_eq!(Branch::remote("origin/feat/x", 0).local_name(), "feat/x");
        assert_eq!(Branch::local("feat/x", 0).local_name(), "feat/x");
    }

    #[test]
    fn test_worktree_labels() {
        let wt = Worktree {
            path: PathBuf::from("/src/repo-feat"),
            branch: None,
            head: "abc".into(),
        };
        assert_eq!(wt.dir_name(), "repo-feat");
        assert_eq!(wt.branch_label(), "detached");
    }
}
