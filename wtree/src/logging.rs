use anyhow::{Context, Result};
use log::LevelFilter;
use std::path::PathBuf;
use wtree_core::constants::APP_NAME;

const LOG_FILE_NAME: &str = "wtree.log";

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

pub fn cache_dir() -> Option<PathBuf> {
    if let Ok(xdg_cache_home) = std::env::var("XDG_CACHE_HOME")
        && !xdg_cache_home.is_empty()
    {
        return Some(PathBuf::from(xdg_cache_home).join(APP_NAME));
    }
    dirs::home_dir().map(|home| home.join(".cache").join(APP_NAME))
}

pub fn default_log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LOG_FILE_NAME))
}

/// Pick the log level: the command line wins over the config file.
pub fn resolve_level(cli: Option<&str>, config: Option<&str>) -> Result<LevelFilter> {
    match cli.or(config) {
        Some(level) => level
            .trim()
            .parse()
            .with_context(|| format!("Invalid log level '{level}'")),
        None => Ok(DEFAULT_LOG_LEVEL),
    }
}

/// Send `log` records to a rotating file. The terminal belongs to the TUI,
/// so nothing is written to stdout or stderr.
pub fn setup_logging(level: LevelFilter) -> Result<PathBuf> {
    let log_file = default_log_file().context("Unable to find home directory")?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    // Rotate at 10 MB, keeping 10 files
    simple_log::file(log_file.to_string_lossy().into_owned(), level, 10, 10)
        .map_err(|e| anyhow::anyhow!(e))?;
    log::info!("{APP_NAME} logging initialised (level={level})");
    Ok(log_file)
}
