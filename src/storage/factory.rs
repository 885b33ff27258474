//! Storage factory for creating storage instances

use std::sync::Arc;

use super::backends::{FileBackend, MemoryBackend};
use super::config::{BackendType, StorageConfig};
use super::error::StorageResult;
use super::traits::UnifiedStorage;

/// Factory for creating storage instances
pub struct StorageFactory;

impl StorageFactory {
    /// Create storage from explicit configuration
    pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn UnifiedStorage>> {
        match &config.backend {
            BackendType::File => {
                let backend = FileBackend::new(config).await?;
                Ok(Arc::new(backend))
            }
            BackendType::Memory => Ok(Arc::new(MemoryBackend::new())),
        }
    }
}
