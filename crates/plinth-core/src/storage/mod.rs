//! # Plinth Core Storage
//!
//! Filesystem access for the framework: the [`StorageProvider`] abstraction
//! (used for entry-file discovery and metadata reads), its local
//! implementation, and loading of the [`FrameworkConfig`].
pub mod provider;
pub mod local;
pub mod config;
pub mod error;

/// Re-export key types
pub use provider::StorageProvider;
pub use local::LocalStorageProvider;
pub use config::{ConfigFormat, FrameworkConfig};
pub use error::StorageSystemError;
