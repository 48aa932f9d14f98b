use super::Opener;
use anyhow::Result;
use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

#[derive(Default)]
pub struct MockOpener {
    pub opened: Mutex<Vec<PathBuf>>,
    pub open_result: Mutex<Option<Result<()>>>,
}

impl Opener for MockOpener {
    fn open(&self, path: &Path) -> Result<()> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        self.open_result.lock().unwrap().take().unwrap_or(Ok(()))
    }
}
