pub mod command;
pub mod mock;

pub use command::CommandOpener;

use anyhow::Result;
use std::path::Path;

/// Launches an external program on a worktree without waiting for it.
pub trait Opener: Send + Sync {
    fn open(&self, path: &Path) -> Result<()>;
}
