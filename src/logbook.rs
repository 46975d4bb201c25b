use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("command log io: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only command log. One line per processed command:
///
/// `<timestamp> | Command: <text> | Action: <action-or-error-tag>`
///
/// Appends from concurrent background handlers are serialized behind a
/// single writer lock so lines never interleave. Entries are never mutated
/// or deleted here; rotation is someone else's job.
pub struct CommandLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl CommandLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn append(&self, command: &str, tag: &str) -> Result<(), LogError> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("{timestamp} | Command: {command} | Action: {tag}\n");
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
