use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "postbox";

#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
    profiles_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;
        let data_root = dirs::data_dir()
            .ok_or_else(|| AppError::Config("unable to resolve data directory".to_string()))?;

        Self::at(config_root.join(APP_DIR), data_root.join(APP_DIR))
    }

    pub fn at(config_dir: PathBuf, data_dir: PathBuf) -> AppResult<Self> {
        let profiles_dir = config_dir.join("profiles");
        fs::create_dir_all(&profiles_dir)?;
        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            data_dir,
            profiles_dir,
        })
    }

    pub fn settings_file(&self, profile: &str) -> PathBuf {
        self.profiles_dir.join(format!("{profile}.json"))
    }

    pub fn queue_dir(&self, profile: &str) -> PathBuf {
        self.data_dir.join(profile).join("queue")
    }

    pub fn dead_letter_dir(&self, profile: &str) -> PathBuf {
        self.data_dir.join(profile).join("dead")
    }

    pub fn outbox_dir(&self, profile: &str) -> PathBuf {
        self.data_dir.join(profile).join("outbox")
    }
}

/// `<unix-nanos>-<sha256 prefix>.<extension>`; sorts oldest first.
pub fn stamped_file_name(payload: &[u8], extension: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or_default();
    let digest = Sha256::digest(payload);
    let prefix = digest
        .iter()
        .take(6)
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    format!("{nanos:020}-{prefix}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamped_names_sort_by_time() {
        let first = stamped_file_name(b"a", "json");
        let second = stamped_file_name(b"a", "json");
        assert!(first <= second);
        assert!(first.ends_with(".json"));
        assert_eq!(first.split('-').next().map(str::len), Some(20));
    }
}
