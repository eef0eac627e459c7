//! # Plinth Core Hooks
//!
//! Extensibility hooks: named filters that transform a value before the
//! framework uses it. Managers pass their default module list through the
//! hook `{slug}_{component}_{class}_modules`, letting the host or other
//! components add, remove or reorder modules.
pub mod filter;

use std::fmt::Debug;

/// Type for filter identifiers
pub type FilterId = u64;

/// Priority of a filter; lower values run first
pub type FilterPriority = i32;

/// Priority used by [`FilterRegistry::add_filter`]
pub const DEFAULT_PRIORITY: FilterPriority = 10;

/// Filter callback over an ordered list of identifiers
pub type FilterCallback = Box<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;

/// Dispatcher applying registered filters to a value
pub trait HookDispatcher: Send + Sync + Debug {
    /// Run every filter registered for `hook` over `value`, in priority order
    fn apply_filters(&self, hook: &str, value: Vec<String>) -> Vec<String>;

    /// Whether any filter is registered for `hook`
    fn has_filter(&self, hook: &str) -> bool;
}

/// Helper to box a closure as a [`FilterCallback`]
pub fn filter_callback<F>(f: F) -> FilterCallback
where
    F: Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Helper filter appending `modules` that are not already listed
pub fn append_modules<I, S>(modules: I) -> FilterCallback
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let extra: Vec<String> = modules.into_iter().map(Into::into).collect();
    filter_callback(move |mut current| {
        for module in &extra {
            if !current.contains(module) {
                current.push(module.clone());
            }
        }
        current
    })
}

/// Helper filter removing every occurrence of `module`
pub fn remove_module(module: impl Into<String>) -> FilterCallback {
    let module = module.into();
    filter_callback(move |current| current.into_iter().filter(|m| *m != module).collect())
}

/// Re-export important types
pub use filter::FilterRegistry;
