//! # Plinth Core
//!
//! Component-composition framework for plugins. A plugin is a tree of
//! components rooted at an [`Application`]; [`Manager`] components load their
//! modules dynamically through a hook-filtered list and an injection
//! container the host provides.
pub mod hooks;
pub mod host;
pub mod kernel;
pub mod module_system;
pub mod storage;

pub use hooks::{FilterRegistry, HookDispatcher};
pub use host::{HostEnvironment, MetadataRegistry, PluginData};
pub use kernel::error::Error as KernelError;
pub use kernel::{
    Application, ApplicationBuilder, Component, ComponentCore, ComponentRef, ComponentRefExt,
    PluginDefinition, PluginInfo, PropertyTable,
};
pub use module_system::{Container, FactoryContainer, Manager};
pub use storage::{FrameworkConfig, StorageProvider};

#[cfg(test)]
mod tests;
