use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::{Arc, RwLock};

use crate::kernel::component::{Component, ComponentRef};
use crate::kernel::error::{Error, Result};

/// Object-creation service resolving qualified class names to components
pub trait Container: Send + Sync + Debug {
    /// Create (or, for shared registrations, return) the component registered as `class`
    fn create(&self, class: &str) -> Result<ComponentRef>;

    /// Whether `class` can be created
    fn has(&self, class: &str) -> bool;
}

/// Factory producing a component. It receives the container so it can create
/// its own dependencies.
pub type ComponentFactory = Arc<dyn Fn(&FactoryContainer) -> Result<ComponentRef> + Send + Sync>;

#[derive(Clone)]
struct Rule {
    factory: ComponentFactory,
    shared: bool,
}

/// Container backed by a table of factories keyed by class name.
///
/// Shared registrations create their component once and hand out the same
/// instance on every later `create`.
#[derive(Default)]
pub struct FactoryContainer {
    rules: RwLock<HashMap<String, Rule>>,
    shared_instances: RwLock<HashMap<String, ComponentRef>>,
}

impl FactoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory creating a new instance per `create`
    pub fn register<F>(&self, class: impl Into<String>, factory: F) -> &Self
    where
        F: Fn(&FactoryContainer) -> Result<ComponentRef> + Send + Sync + 'static,
    {
        self.insert_rule(class.into(), Arc::new(factory), false);
        self
    }

    /// Register a factory whose instance is created once and then reused
    pub fn register_shared<F>(&self, class: impl Into<String>, factory: F) -> &Self
    where
        F: Fn(&FactoryContainer) -> Result<ComponentRef> + Send + Sync + 'static,
    {
        self.insert_rule(class.into(), Arc::new(factory), true);
        self
    }

    /// Register an existing instance, returned by every `create`
    pub fn register_instance<C: Component>(
        &self,
        class: impl Into<String>,
        instance: Arc<C>,
    ) -> &Self {
        let class = class.into();
        let instance: ComponentRef = instance;
        let factory_instance = instance.clone();
        self.insert_rule(class.clone(), Arc::new(move |_| Ok(factory_instance.clone())), true);
        self.shared_instances
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(class, instance);
        self
    }

    /// Remove a registration and any shared instance. Returns whether it existed.
    pub fn unregister(&self, class: &str) -> bool {
        self.shared_instances
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(class);
        self.rules
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(class)
            .is_some()
    }

    /// Registered class names, sorted
    pub fn registered_classes(&self) -> Vec<String> {
        let rules = self.rules.read().unwrap_or_else(|e| e.into_inner());
        let mut classes: Vec<String> = rules.keys().cloned().collect();
        classes.sort();
        classes
    }

    /// Handle usable wherever a `dyn Container` is expected
    pub fn into_handle(self) -> Arc<dyn Container> {
        Arc::new(self)
    }

    fn insert_rule(&self, class: String, factory: ComponentFactory, shared: bool) {
        let kind = if shared { "shared" } else { "per-call" };
        log::debug!("Registering {} factory for '{}'", kind, class);
        self.shared_instances
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&class);
        self.rules
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(class, Rule { factory, shared });
    }

    fn rule(&self, class: &str) -> Option<Rule> {
        self.rules
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(class)
            .cloned()
    }
}

impl Container for FactoryContainer {
    fn create(&self, class: &str) -> Result<ComponentRef> {
        let rule = self
            .rule(class)
            .ok_or_else(|| Error::UnknownClass { class: class.to_string() })?;

        if rule.shared {
            if let Some(instance) = self
                .shared_instances
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .get(class)
            {
                return Ok(instance.clone());
            }
        }

        // Factories run without any lock held; they may call back into the container
        let instance = (rule.factory)(self)?;

        if rule.shared {
            let mut shared = self.shared_instances.write().unwrap_or_else(|e| e.into_inner());
            return Ok(shared.entry(class.to_string()).or_insert(instance).clone());
        }
        Ok(instance)
    }

    fn has(&self, class: &str) -> bool {
        self.rules
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(class)
    }
}

impl Debug for FactoryContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryContainer")
            .field("classes", &self.registered_classes())
            .finish_non_exhaustive()
    }
}
