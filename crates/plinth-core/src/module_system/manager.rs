use std::fmt::{self, Debug};
use std::sync::{Arc, RwLock};

use crate::kernel::component::{
    namespace_of, short_name_of, Component, ComponentCore, ComponentRef, ComponentRefExt,
};
use crate::kernel::constants;
use crate::kernel::error::{Error, Result};

/// Ordered mapping from module identifier to component.
///
/// Iteration follows insertion order. Inserting an identifier that is already
/// present replaces its component but keeps its original position.
#[derive(Clone, Default)]
pub struct ModuleMap {
    entries: Vec<(String, ComponentRef)>,
}

impl ModuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, module: ComponentRef) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = module,
            None => self.entries.push((name, module)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ComponentRef> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, module)| module)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentRef)> {
        self.entries.iter().map(|(name, module)| (name.as_str(), module))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &ComponentRef> {
        self.entries.iter().map(|(_, module)| module)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Debug for ModuleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, module)| (name, module.class_name())))
            .finish()
    }
}

/// Identity parts a manager derives its hook name from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerIdentity {
    /// Lower-cased last segment of the manager's namespace
    pub component: String,
    /// Lower-cased short class name
    pub class: String,
}

impl ManagerIdentity {
    pub fn from_class_name(class_name: &str) -> Self {
        Self {
            component: short_name_of(namespace_of(class_name)).to_lowercase(),
            class: short_name_of(class_name).to_lowercase(),
        }
    }

    /// `{safe_slug}_{component}_{class}_modules`
    pub fn hook_name(&self, safe_slug: &str) -> String {
        format!(
            "{}_{}_{}_{}",
            safe_slug,
            self.component,
            self.class,
            constants::MODULES_HOOK_SUFFIX
        )
    }
}

/// Component owning a dynamically resolved set of modules.
///
/// A manager is identified by its qualified class name, e.g.
/// `sample_plugin::admin::Manager`. Unqualified module identifiers are
/// resolved inside the manager's namespace (`Settings` becomes
/// `sample_plugin::admin::Settings`).
pub struct Manager {
    core: ComponentCore,
    class_name: String,
    default_modules: Vec<String>,
    modules: RwLock<ModuleMap>,
}

impl Manager {
    pub fn new<I, S>(class_name: impl Into<String>, default_modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            core: ComponentCore::new(),
            class_name: class_name.into(),
            default_modules: default_modules.into_iter().map(Into::into).collect(),
            modules: RwLock::new(ModuleMap::new()),
        }
    }

    pub fn identity(&self) -> ManagerIdentity {
        ManagerIdentity::from_class_name(&self.class_name)
    }

    /// Hook name for a given safe slug
    pub fn hook_name_for(&self, safe_slug: &str) -> String {
        self.identity().hook_name(safe_slug)
    }

    /// Hook name under the application this manager is attached to
    pub fn hook_name(self: &Arc<Self>) -> Result<String> {
        let this: ComponentRef = self.clone();
        let app = this.application()?;
        Ok(self.hook_name_for(&app.get_safe_slug()))
    }

    pub fn default_modules(&self) -> &[String] {
        &self.default_modules
    }

    /// Class name a module identifier resolves to
    pub fn qualify(&self, module: &str) -> String {
        let namespace = self.namespace();
        if module.contains(constants::NAMESPACE_SEPARATOR) || namespace.is_empty() {
            module.to_string()
        } else {
            format!("{}{}{}", namespace, constants::NAMESPACE_SEPARATOR, module)
        }
    }

    /// The modules as built by the last successful `init`
    pub fn get_modules(&self) -> ModuleMap {
        self.modules.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// First module that is a [`qualify`](Manager::qualify)`(name)`. Names that
    /// cannot form a class name are reported as not found.
    pub fn get_module(&self, name: &str) -> Option<ComponentRef> {
        if !is_valid_module_name(name) {
            log::debug!("Module name '{}' cannot be resolved in '{}'", name, self.class_name);
            return None;
        }

        let qualified = self.qualify(name);
        let modules = self.modules.read().unwrap_or_else(|e| e.into_inner());
        modules.values().find(|module| module.is_a(&qualified)).cloned()
    }

    /// [`get_module`](Manager::get_module) downcast to its concrete type
    pub fn get_module_as<T: Component>(&self, name: &str) -> Option<Arc<T>> {
        self.get_module(name).and_then(|module| module.downcast::<T>())
    }
}

fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(char::is_whitespace)
        && name.split(constants::NAMESPACE_SEPARATOR).all(|segment| !segment.is_empty())
}

impl Component for Manager {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn init(self: Arc<Self>) -> Result<()> {
        let this: ComponentRef = self.clone();
        let app = this.application()?;
        let app_ref: ComponentRef = app.clone();

        let hook = self.hook_name_for(&app.get_safe_slug());
        let defaults = app
            .config()
            .modules_for(&self.class_name)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| self.default_modules.clone());
        let module_list = app.hooks().apply_filters(&hook, defaults);
        log::debug!(
            "Manager '{}' resolved modules {:?} via '{}'",
            self.class_name,
            module_list,
            hook
        );

        // Construct every module before any of them initializes
        let container = app.get_container();
        let mut modules = ModuleMap::new();
        for module in &module_list {
            let class = self.qualify(module);
            let instance = container.create(&class).map_err(|e| Error::ModuleResolution {
                module: module.clone(),
                class: class.clone(),
                source: Box::new(e),
            })?;
            modules.insert(module.clone(), instance);
        }

        for (name, module) in modules.iter() {
            module.set_parent(&this)?;
            module.core().seed_app(&app_ref);
            log::debug!("Initializing module '{}' of '{}'", name, self.class_name);
            module.clone().init()?;
        }

        log::info!("Manager '{}' loaded {} module(s)", self.class_name, modules.len());
        *self.modules.write().unwrap_or_else(|e| e.into_inner()) = modules;
        Ok(())
    }

    fn children(&self) -> Vec<ComponentRef> {
        self.get_modules().values().cloned().collect()
    }

    fn release(&self) {
        self.core.release();
        self.modules.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("class_name", &self.class_name)
            .field("default_modules", &self.default_modules)
            .field("modules", &*self.modules.read().unwrap_or_else(|e| e.into_inner()))
            .field("core", &self.core)
            .finish()
    }
}
