//! # Plinth Core Host Environment
//!
//! What the framework expects from the environment it runs in: a filesystem,
//! a hook dispatcher, a metadata reader for entry descriptors, the framework
//! configuration and a table of named host functions. The container of a
//! plugin is obtained by calling the host function `{slug}_container`.
pub mod metadata;

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::hooks::{FilterRegistry, HookDispatcher};
use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::module_system::Container;
use crate::storage::{FrameworkConfig, LocalStorageProvider, StorageProvider};

pub use metadata::{HeaderMetadataReader, MetadataRegistry, PluginData, PLUGIN_HEADERS};

/// Named zero-argument function exposed by the host
pub type HostFunction = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// Name of the host function expected to return the container of `slug`
pub fn container_function_name(slug: &str) -> String {
    format!("{}{}", slug.replace('-', "_"), constants::CONTAINER_FUNCTION_SUFFIX)
}

/// Services the host provides to the framework
pub struct HostEnvironment {
    framework_dir: PathBuf,
    storage: Arc<dyn StorageProvider>,
    hooks: Arc<dyn HookDispatcher>,
    metadata: Arc<dyn MetadataRegistry>,
    custom_metadata: bool,
    config: FrameworkConfig,
    functions: HashMap<String, HostFunction>,
}

impl HostEnvironment {
    /// Environment rooted at the framework's own directory, backed by the
    /// local filesystem and an empty filter registry.
    pub fn new(framework_dir: impl Into<PathBuf>) -> Self {
        let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorageProvider::unrooted());
        Self {
            framework_dir: framework_dir.into(),
            metadata: Arc::new(HeaderMetadataReader::new(storage.clone())),
            storage,
            hooks: Arc::new(FilterRegistry::new()),
            custom_metadata: false,
            config: FrameworkConfig::default(),
            functions: HashMap::new(),
        }
    }

    /// Replace the storage. Unless a metadata registry was set explicitly, the
    /// header reader follows the new storage.
    pub fn with_storage(mut self, storage: Arc<dyn StorageProvider>) -> Self {
        if !self.custom_metadata {
            self.metadata = Arc::new(HeaderMetadataReader::new(storage.clone()));
        }
        self.storage = storage;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn HookDispatcher>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataRegistry>) -> Self {
        self.metadata = metadata;
        self.custom_metadata = true;
        self
    }

    pub fn with_config(mut self, config: FrameworkConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the framework configuration from `path` through the storage.
    /// A missing file leaves the defaults in place.
    pub fn load_config(mut self, path: &Path) -> Result<Self> {
        self.config = FrameworkConfig::load(self.storage.as_ref(), path)?;
        Ok(self)
    }

    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Any + Send + Sync> + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("Registering host function '{}'", name);
        self.functions.insert(name, Arc::new(function));
        self
    }

    /// Expose `container` as `{slug}_container`
    pub fn register_container(&mut self, slug: &str, container: Arc<dyn Container>) -> &mut Self {
        self.register_function(container_function_name(slug), move || {
            Box::new(container.clone()) as Box<dyn Any + Send + Sync>
        })
    }

    pub fn unregister_function(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    pub fn function_exists(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Invoke a host function; `None` if no function has that name
    pub fn call_function(&self, name: &str) -> Option<Box<dyn Any + Send + Sync>> {
        self.functions.get(name).map(|function| function())
    }

    pub fn framework_dir(&self) -> &Path {
        &self.framework_dir
    }

    pub fn storage(&self) -> &Arc<dyn StorageProvider> {
        &self.storage
    }

    pub fn hooks(&self) -> &Arc<dyn HookDispatcher> {
        &self.hooks
    }

    pub fn metadata(&self) -> &Arc<dyn MetadataRegistry> {
        &self.metadata
    }

    pub fn config(&self) -> &FrameworkConfig {
        &self.config
    }
}

impl Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut functions: Vec<&String> = self.functions.keys().collect();
        functions.sort();
        f.debug_struct("HostEnvironment")
            .field("framework_dir", &self.framework_dir)
            .field("storage", &self.storage.name())
            .field("config", &self.config)
            .field("functions", &functions)
            .finish_non_exhaustive()
    }
}
