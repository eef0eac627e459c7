//! # Plinth Core Kernel
//!
//! The `kernel` module holds the component tree itself.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Component tree**: the [`Component`](component::Component) trait, the
//!   weak parent/root links every node carries ([`ComponentCore`](component::ComponentCore))
//!   and root resolution ([`ComponentRefExt::get_app`](component::ComponentRefExt::get_app)).
//! - **Application root**: [`Application`](bootstrap::Application) wraps a
//!   [`PluginDefinition`](bootstrap::PluginDefinition), resolves the entry
//!   descriptor and the container, and initializes the declared components in
//!   two passes (parent all, then init all).
//! - **Declared members**: [`PropertyTable`](properties::PropertyTable), the
//!   static list of a plugin's members.
//! - **Constants** and **errors** ([`Error`](error::Error), `Result`).
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod error;
pub mod properties;

pub use bootstrap::{Application, ApplicationBuilder, PluginDefinition, PluginInfo};
pub use component::{Component, ComponentCore, ComponentRef, ComponentRefExt};
pub use error::{Error, Result};
pub use properties::{Property, PropertyTable};
// Test module declaration
#[cfg(test)]
mod tests;
