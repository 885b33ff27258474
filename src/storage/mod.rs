//! Storage abstraction layer for MentorHub
//!
//! One collection per entity behind [`UnifiedStorage`]. Backends enforce the
//! unique keys (mentor email, user uid and email) and report violations as
//! [`StorageError::Duplicate`].

pub mod backends;
pub mod config;
pub mod error;
pub mod factory;
pub mod traits;
pub mod types;


pub use backends::{FileBackend, MemoryBackend};
pub use config::{BackendType, FileConfig, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use factory::StorageFactory;
pub use traits::{BookingStore, IdeaStore, MentorStore, UnifiedStorage, UserStore};
pub use types::{BookingFilter, HealthStatus, IdeaFilter, MentorFilter, UserFilter};
