//! Directory-backed spool of serialized message records.
//!
//! A record is written once on enqueue, read back once by [`Spool::flush`]
//! and removed after a successful send. Records that can never be sent are
//! moved aside into the dead-letter directory; anything else stays queued
//! for the next flush.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codec::record;
use crate::config::stamped_file_name;
use crate::error::AppResult;
use crate::mail::EmailMessage;
use crate::transport::Transport;

const RECORD_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct Spool {
    queue_dir: PathBuf,
    dead_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueuedRecord {
    pub id: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub sent: usize,
    pub dead_lettered: usize,
    pub deferred: usize,
}

impl Spool {
    pub fn new(queue_dir: impl Into<PathBuf>, dead_dir: impl Into<PathBuf>) -> Self {
        Self {
            queue_dir: queue_dir.into(),
            dead_dir: dead_dir.into(),
        }
    }

    pub fn queue_dir(&self) -> &Path {
        &self.queue_dir
    }

    pub fn dead_letter_dir(&self) -> &Path {
        &self.dead_dir
    }

    pub fn enqueue(&self, message: &EmailMessage) -> AppResult<QueuedRecord> {
        let payload = record::to_json(message)?;
        self.enqueue_raw(&payload)
    }

    /// Queues an already serialized record verbatim.
    pub fn enqueue_raw(&self, payload: &str) -> AppResult<QueuedRecord> {
        fs::create_dir_all(&self.queue_dir)?;

        let name = stamped_file_name(payload.as_bytes(), RECORD_EXTENSION);
        let path = self.queue_dir.join(&name);
        let staging = self.queue_dir.join(format!(".{name}.tmp"));
        fs::write(&staging, payload)?;
        fs::rename(&staging, &path)?;

        let id = name.trim_end_matches(".json").to_string();
        debug!(id = %id, "record queued");
        Ok(QueuedRecord { id, path })
    }

    /// Queued record paths, oldest first.
    pub fn pending(&self) -> AppResult<Vec<PathBuf>> {
        if !self.queue_dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.queue_dir)? {
            let path = entry?.path();
            let is_record = path
                .extension()
                .is_some_and(|extension| extension == RECORD_EXTENSION);
            let is_hidden = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.'));
            if path.is_file() && is_record && !is_hidden {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }

    pub async fn flush(
        &self,
        transport: &Transport,
        limit: Option<usize>,
    ) -> AppResult<FlushReport> {
        let mut report = FlushReport::default();
        let pending = self.pending()?;
        let take = limit.unwrap_or(pending.len());

        for path in pending.into_iter().take(take) {
            let outcome = match fs::read_to_string(&path) {
                Ok(raw) => deliver_record(&raw, transport).await,
                Err(err) => Err(err.into()),
            };

            match outcome {
                Ok(()) => {
                    fs::remove_file(&path)?;
                    report.sent += 1;
                }
                Err(err) if err.is_structural() => {
                    warn!(path = %path.display(), error = %err, "record dead-lettered");
                    self.dead_letter(&path)?;
                    report.dead_lettered += 1;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "send deferred");
                    report.deferred += 1;
                }
            }
        }

        info!(
            sent = report.sent,
            dead_lettered = report.dead_lettered,
            deferred = report.deferred,
            "spool flushed"
        );
        Ok(report)
    }

    fn dead_letter(&self, path: &Path) -> AppResult<()> {
        fs::create_dir_all(&self.dead_dir)?;
        let Some(name) = path.file_name() else {
            return Ok(());
        };
        fs::rename(path, self.dead_dir.join(name))?;
        Ok(())
    }
}

async fn deliver_record(raw: &str, transport: &Transport) -> AppResult<()> {
    let message = record::from_json(raw)?;
    transport.send(&message).await?;
    Ok(())
}
