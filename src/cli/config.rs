use std::fs;
use std::path::{Path, PathBuf};

use crate::api::error::ApiError;
use crate::session::{Session, SessionStorage};

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("PEMIRA_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("pemira").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Session persisted as `session.json` in the CLI config directory.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::at(&get_config_dir()?))
    }

    pub fn at(dir: &Path) -> Self {
        Self { path: dir.join("session.json") }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<Session>, ApiError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        let session =
            serde_json::from_str(&content).map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ApiError::Storage(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(session)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| ApiError::Storage(e.to_string()))?;
        }
        Ok(())
    }
}
