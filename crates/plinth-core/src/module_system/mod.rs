//! # Plinth Core Module System
//!
//! Dynamic module loading for managers.
//!
//! - **[`container`]**: the [`Container`] object-creation service that turns a
//!   qualified class name into a component, and [`FactoryContainer`], a
//!   factory-table implementation of it.
//! - **[`manager`]**: [`Manager`], a component that filters its module list
//!   through a hook, creates every module through the application's container
//!   and then parents and initializes them.
pub mod container;
pub mod manager;

pub use container::{ComponentFactory, Container, FactoryContainer};
pub use manager::{Manager, ManagerIdentity, ModuleMap};
