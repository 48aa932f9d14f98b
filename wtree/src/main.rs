mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{BatchArgs, CliError};
use std::{io, path::PathBuf, process::ExitCode, sync::Arc};
use wtree_core::{
    WtreeError,
    config::{self, Config},
    git::{CliGitProvider, GitProvider},
    opener::{CommandOpener, Opener},
    state::AppState,
};
use wtree_tui::Theme;

#[derive(Parser)]
#[command(version, about = "Interactive manager for the git worktrees of one repository")]
struct Cli {
    /// Override path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file verbosity (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// List all worktrees
    #[arg(long)]
    list_worktrees: bool,

    /// List local and remote branches
    #[arg(long)]
    list_branches: bool,

    /// Create a worktree for an existing local or remote branch
    #[arg(long, value_name = "BRANCH")]
    create_worktree: Option<String>,

    /// Delete the worktree with this path or directory name
    #[arg(long, value_name = "PATH|NAME")]
    delete_worktree: Option<String>,

    /// Create a new branch from the default remote branch, in a new worktree
    #[arg(long, value_name = "NAME")]
    create_new_branch: Option<String>,

    /// Print batch output as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn batch_args(&self) -> BatchArgs {
        BatchArgs {
            list_worktrees: self.list_worktrees,
            list_branches: self.list_branches,
            create_worktree: self.create_worktree.clone(),
            delete_worktree: self.delete_worktree.clone(),
            create_new_branch: self.create_new_branch.clone(),
            json: self.json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let batch = cli.batch_args();

    match run(&cli, &batch) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            cli::print_error(&error, batch.json);
            ExitCode::from(error.code())
        }
    }
}

fn run(cli: &Cli, batch: &BatchArgs) -> Result<(), CliError> {
    let config = config::load_config(cli.config.as_deref())
        .map_err(|e| CliError::system(format!("{e:#}")))?;

    let level = logging::resolve_level(cli.log_level.as_deref(), config.log_level.as_deref())
        .map_err(|e| CliError::user(format!("{e:#}")))?;
    if let Err(e) = logging::setup_logging(level) {
        eprintln!("Warning: logging disabled: {e:#}");
    }

    let cwd = std::env::current_dir()?;
    let cwd = dunce::canonicalize(&cwd).unwrap_or(cwd);
    let git: Arc<dyn GitProvider> = Arc::new(CliGitProvider::new(cwd));
    if !git.is_inside_repo() {
        return Err(anyhow::Error::from(WtreeError::NotARepository).into());
    }

    if batch.is_empty() {
        run_tui(&config, &git).map_err(CliError::from)
    } else {
        log::info!("running batch commands: {batch:?}");
        cli::run_batch(git.as_ref(), batch, &mut io::stdout().lock())
    }
}

fn run_tui(config: &Config, git: &Arc<dyn GitProvider>) -> Result<()> {
    let opener: Arc<dyn Opener> = Arc::new(CommandOpener::from_config(&config.editor));
    let theme = Theme::from_config(&config.theme);
    let mut state = AppState::new();

    let mut terminal = ratatui::init();
    let result = wtree_tui::run(
        &mut terminal,
        &mut state,
        git,
        &opener,
        &theme,
        &config.keys,
    );
    ratatui::restore();
    result
}
