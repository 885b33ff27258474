//! Storage configuration types and utilities

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage backend type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// One JSON document per record under a base directory (default)
    #[default]
    File,
    /// Process-local maps, lost on restart
    Memory,
}

/// Main storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend type
    #[serde(default)]
    pub backend: BackendType,

    /// File backend configuration
    #[serde(default)]
    pub file: FileConfig,
}

/// File storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Base directory for collections
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Pretty-print stored documents
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            pretty: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::default(),
            file: FileConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Platform data directory, e.g. `~/.local/share/mentorhub/data` on Linux
pub fn default_base_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "mentorhub", "mentorhub")
        .map(|dirs| dirs.data_dir().join("data"))
        .unwrap_or_else(|| PathBuf::from(".mentorhub").join("data"))
}

impl StorageConfig {
    /// In-memory configuration, used by tests and `--ephemeral` runs
    pub fn memory() -> Self {
        Self {
            backend: BackendType::Memory,
            file: FileConfig::default(),
        }
    }

    /// File configuration rooted at `base_dir`
    pub fn file(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendType::File,
            file: FileConfig {
                base_dir: base_dir.into(),
                pretty: true,
            },
        }
    }

    /// Apply `MENTORHUB_STORAGE_TYPE` and `MENTORHUB_STORAGE_DIR` overrides
    pub fn merge_env_vars(&mut self) {
        if let Ok(kind) = std::env::var("MENTORHUB_STORAGE_TYPE") {
            match kind.to_lowercase().as_str() {
                "file" => self.backend = BackendType::File,
                "memory" => self.backend = BackendType::Memory,
                other => tracing::warn!("Ignoring unknown MENTORHUB_STORAGE_TYPE '{}'", other),
            }
        }

        if let Ok(dir) = std::env::var("MENTORHUB_STORAGE_DIR") {
            self.file.base_dir = PathBuf::from(dir);
        }
    }
}
