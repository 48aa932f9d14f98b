use std::time::Duration;

pub const APP_NAME: &str = "wtree";

/// How long a success or error status stays on screen.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Rows used before the first terminal resize event arrives.
pub const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Rows taken by the header, status line, input line and footer.
pub const VIEWPORT_CHROME_ROWS: u16 = 8;

/// Candidates for the base of a brand-new branch, tried in order before
/// falling back to the remote's symbolic HEAD.
pub const DEFAULT_BRANCH_CANDIDATES: &[&str] = &["origin/main", "origin/master"];

pub const REMOTE_HEAD_REF: &str = "refs/remotes/origin/HEAD";
pub const REMOTES_REF_PREFIX: &str = "refs/remotes/";

pub const WORKTREE_NAME_SEPARATOR: &str = "-";
pub const WORKTREE_DIR_DEDUP_MAX_ATTEMPTS: usize = 100;

pub const DEFAULT_EDITOR: &str = "cursor";
