use std::fmt;

use thiserror::Error;

/// What a `NotFound` error failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Branch,
    Worktree,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch => f.write_str("branch"),
            Self::Worktree => f.write_str("worktree"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WtreeError {
    #[error("{command} failed: {stderr}")]
    ExternalTool { command: String, stderr: String },

    #[error(
        "could not find a default branch (tried origin/main, origin/master and refs/remotes/origin/HEAD)"
    )]
    NoDefaultBranch,

    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("wtree must be run from within a git repository")]
    NotARepository,

    #[error("invalid branch name '{name}': only letters, digits, '-', '_', '/' and '.' are allowed")]
    InvalidBranchName { name: String },
}

impl WtreeError {
    pub fn external(command: impl Into<String>, stderr: impl AsRef<str>) -> Self {
        Self::ExternalTool {
            command: command.into(),
            stderr: stderr.as_ref().trim().to_string(),
        }
    }

    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Errors caused by user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::NotARepository | Self::InvalidBranchName { .. }
        )
    }
}
