use std::fs;
use std::path::PathBuf;

use crate::config::stamped_file_name;
use crate::error::AppResult;

/// Drops each rendered message into a directory as an `.eml` file.
#[derive(Debug, Clone)]
pub struct FileTransport {
    dir: PathBuf,
}

impl FileTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn deliver(&self, rendered: &str) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self
            .dir
            .join(stamped_file_name(rendered.as_bytes(), "eml"));
        fs::write(&path, rendered)?;
        Ok(path)
    }
}
