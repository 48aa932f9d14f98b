pub mod action;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod filter;
pub mod git;
pub mod keyboard;
pub mod opener;
pub mod operations;
pub mod state;
pub mod update;
pub mod viewport;

// Re-export commonly used types at crate root
pub use action::Action;
pub use config::Config;
pub use error::WtreeError;
pub use event::{AppEvent, Operation};
pub use git::{Branch, BranchKind, GitProvider, Worktree};
pub use keyboard::KeyEvent;
pub use opener::Opener;
pub use state::{AppState, Mode};
pub use update::{Effect, update};
