use super::Opener;
use crate::{config::EditorConfig, error::WtreeError};
use anyhow::Result;
use std::{
    path::Path,
    process::{Command, Stdio},
    thread,
};

/// Runs `<program> <args...> <path>` detached from the terminal.
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
    args: Vec<String>,
}

impl CommandOpener {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(editor: &EditorConfig) -> Self {
        Self::new(editor.command.clone(), editor.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Opener for CommandOpener {
    fn open(&self, path: &Path) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| WtreeError::external(self.program.clone(), e.to_string()))?;

        log::info!("launched {} on {}", self.program, path.display());
        // Reap the child off-thread so the caller never waits on the editor
        thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}
