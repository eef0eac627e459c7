use std::any::Any;
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::hooks::{FilterRegistry, HookDispatcher};
use crate::host::metadata::{HeaderMetadataReader, MetadataRegistry, PluginData};
use crate::host::{container_function_name, HostEnvironment};
use crate::kernel::component::{Component, ComponentCore, ComponentRef};
use crate::kernel::constants;
use crate::kernel::error::{Error, LifecyclePhase, Result};
use crate::kernel::properties::PropertyTable;
use crate::module_system::Container;
use crate::storage::{FrameworkConfig, LocalStorageProvider, StorageProvider};

/// Identity and behaviour of a concrete plugin.
///
/// The definition is what a plugin author writes; the framework wraps it in an
/// [`Application`], which becomes the root of the component tree.
pub trait PluginDefinition: Send + Sync + Debug + 'static {
    /// Plugin slug, e.g. `my-plugin`
    fn slug(&self) -> &'static str;

    /// Plugin version
    fn version(&self) -> &'static str;

    /// Qualified class name of the application root
    fn class_name(&self) -> &'static str;

    /// Declare the plugin's members. Members whose accessor yields a component
    /// become children of the application on [`init`](Component::init).
    fn declare_properties(
        &self,
        properties: &mut PropertyTable,
        container: &dyn Container,
    ) -> Result<()>;

    /// Precondition checked before the tree is initialized
    fn dependencies_exist(&self, _app: &Application) -> bool {
        true
    }

    fn activate(&self, _app: &Application) -> Result<()> {
        Ok(())
    }

    fn deactivate(&self, _app: &Application) -> Result<()> {
        Ok(())
    }

    fn uninstall(&self, _app: &Application) -> Result<()> {
        Ok(())
    }
}

/// Result of [`Application::get_plugin_info`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginInfo {
    /// The requested field
    Field(String),
    /// Full metadata mapping
    All(PluginData),
}

/// Root component of a plugin
pub struct Application {
    core: ComponentCore,
    definition: Box<dyn PluginDefinition>,
    plugin_file: PathBuf,
    container: Arc<dyn Container>,
    hooks: Arc<dyn HookDispatcher>,
    metadata: Arc<dyn MetadataRegistry>,
    config: FrameworkConfig,
    properties: PropertyTable,
    initialized: AtomicBool,
}

impl Application {
    /// Creates the application the way a host does: the entry descriptor is
    /// discovered above the framework directory and the container is obtained
    /// from the host function `{slug}_container`.
    pub fn new<D: PluginDefinition>(definition: D, host: &HostEnvironment) -> Result<Arc<Self>> {
        let slug = definition.slug();
        log::info!(
            "Bootstrapping plugin '{}' v{} on {} {}",
            slug,
            definition.version(),
            constants::FRAMEWORK_NAME,
            constants::FRAMEWORK_VERSION
        );

        let file_name = entry_file_name(slug, &host.config().entry_extension);
        let plugin_file =
            find_plugin_file(host.storage().as_ref(), host.framework_dir(), &file_name);
        let container = resolve_container(host, slug)?;

        Self::builder(definition, container)
            .plugin_file(plugin_file)
            .hooks(host.hooks().clone())
            .metadata(host.metadata().clone())
            .config(host.config().clone())
            .build()
    }

    /// Explicit construction with an already resolved container
    pub fn builder<D: PluginDefinition>(
        definition: D,
        container: Arc<dyn Container>,
    ) -> ApplicationBuilder {
        ApplicationBuilder::new(Box::new(definition), container)
    }

    pub fn get_slug(&self) -> &'static str {
        self.definition.slug()
    }

    pub fn get_version(&self) -> &'static str {
        self.definition.version()
    }

    /// Version as semver
    pub fn parsed_version(&self) -> std::result::Result<semver::Version, semver::Error> {
        semver::Version::parse(self.get_version())
    }

    /// Slug usable in hook and function names: lower-case, `-` replaced by `_`
    pub fn get_safe_slug(&self) -> String {
        safe_slug(self.get_slug())
    }

    pub fn get_plugin_file(&self) -> &Path {
        &self.plugin_file
    }

    pub fn get_container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    pub fn hooks(&self) -> &Arc<dyn HookDispatcher> {
        &self.hooks
    }

    pub fn config(&self) -> &FrameworkConfig {
        &self.config
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    pub fn definition(&self) -> &dyn PluginDefinition {
        self.definition.as_ref()
    }

    /// Component behind the public accessor `name`
    pub fn get_component(&self, name: &str) -> Option<ComponentRef> {
        self.properties
            .accessor(name)
            .and_then(|property| property.as_component())
            .cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Metadata of the entry descriptor: the named field when `field` is given
    /// and present, the full mapping otherwise.
    pub fn get_plugin_info(&self, field: Option<&str>) -> Result<PluginInfo> {
        let mut info = self.metadata.plugin_data(&self.plugin_file)?;
        if let Some(value) = field.and_then(|name| info.remove(name)) {
            return Ok(PluginInfo::Field(value));
        }
        Ok(PluginInfo::All(info))
    }

    pub fn activate(&self) -> Result<()> {
        log::info!("Activating plugin '{}'", self.get_slug());
        self.definition
            .activate(self)
            .map_err(|e| Error::lifecycle(LifecyclePhase::Activate, self.class_name(), e))
    }

    pub fn deactivate(&self) -> Result<()> {
        log::info!("Deactivating plugin '{}'", self.get_slug());
        self.definition
            .deactivate(self)
            .map_err(|e| Error::lifecycle(LifecyclePhase::Deactivate, self.class_name(), e))
    }

    pub fn uninstall(&self) -> Result<()> {
        log::info!("Uninstalling plugin '{}'", self.get_slug());
        self.definition
            .uninstall(self)
            .map_err(|e| Error::lifecycle(LifecyclePhase::Uninstall, self.class_name(), e))
    }

    fn init_components(self: &Arc<Self>) -> Result<()> {
        let this: ComponentRef = self.clone();
        let components = self.properties.components();

        for (name, component) in &components {
            log::debug!(
                "Attaching '{}' ({}) to '{}'",
                name,
                component.class_name(),
                self.class_name()
            );
            component.set_parent(&this)?;
            component.core().seed_app(&this);
        }
        for (name, component) in &components {
            log::debug!("Initializing component '{}'", name);
            component.clone().init().map_err(|e| {
                Error::lifecycle(LifecyclePhase::Initialize, component.class_name(), e)
            })?;
        }

        log::info!(
            "Plugin '{}' initialized with {} component(s)",
            self.get_slug(),
            components.len()
        );
        Ok(())
    }

    /// Release every node of the tree, children first
    pub fn teardown(self: &Arc<Self>) {
        let this: ComponentRef = self.clone();
        crate::kernel::component::teardown(&this);
        self.initialized.store(false, Ordering::SeqCst);
        log::info!("Plugin '{}' torn down", self.get_slug());
    }
}

impl Component for Application {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn class_name(&self) -> &str {
        self.definition.class_name()
    }

    /// Parents every declared component, then initializes them in declaration
    /// order. A failing component leaves the application uninitialized so
    /// `init` can be retried.
    fn init(self: Arc<Self>) -> Result<()> {
        if !self.definition.dependencies_exist(&self) {
            log::warn!(
                "Dependencies of plugin '{}' are missing, skipping initialization",
                self.get_slug()
            );
            return Ok(());
        }
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyInitialized { class: self.class_name().to_string() });
        }

        if let Err(e) = self.init_components() {
            self.initialized.store(false, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    fn children(&self) -> Vec<ComponentRef> {
        self.properties
            .components()
            .into_iter()
            .map(|(_, component)| component)
            .collect()
    }
}

impl Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("slug", &self.get_slug())
            .field("version", &self.get_version())
            .field("plugin_file", &self.plugin_file)
            .field("properties", &self.properties.names().collect::<Vec<_>>())
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Application`] with explicitly injected collaborators
pub struct ApplicationBuilder {
    definition: Box<dyn PluginDefinition>,
    container: Arc<dyn Container>,
    plugin_file: Option<PathBuf>,
    hooks: Option<Arc<dyn HookDispatcher>>,
    metadata: Option<Arc<dyn MetadataRegistry>>,
    config: FrameworkConfig,
}

impl ApplicationBuilder {
    fn new(definition: Box<dyn PluginDefinition>, container: Arc<dyn Container>) -> Self {
        Self {
            definition,
            container,
            plugin_file: None,
            hooks: None,
            metadata: None,
            config: FrameworkConfig::default(),
        }
    }

    pub fn plugin_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.plugin_file = Some(path.into());
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn HookDispatcher>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn metadata(mut self, metadata: Arc<dyn MetadataRegistry>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn config(mut self, config: FrameworkConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare the plugin's properties and assemble the root
    pub fn build(self) -> Result<Arc<Application>> {
        let plugin_file = self.plugin_file.unwrap_or_else(|| {
            PathBuf::from(entry_file_name(self.definition.slug(), &self.config.entry_extension))
        });
        let hooks = self.hooks.unwrap_or_else(|| Arc::new(FilterRegistry::new()));
        let metadata = self.metadata.unwrap_or_else(|| {
            Arc::new(HeaderMetadataReader::new(Arc::new(LocalStorageProvider::unrooted())))
        });

        let mut properties = PropertyTable::new();
        self.definition
            .declare_properties(&mut properties, self.container.as_ref())
            .map_err(|e| {
                Error::lifecycle(LifecyclePhase::Construct, self.definition.class_name(), e)
            })?;

        log::debug!(
            "Plugin '{}' declared {} propert(ies), entry file {}",
            self.definition.slug(),
            properties.len(),
            plugin_file.display()
        );

        Ok(Arc::new(Application {
            core: ComponentCore::new(),
            definition: self.definition,
            plugin_file,
            container: self.container,
            hooks,
            metadata,
            config: self.config,
            properties,
            initialized: AtomicBool::new(false),
        }))
    }
}

/// `My-Plugin` -> `my_plugin`
pub fn safe_slug(slug: &str) -> String {
    slug.replace('-', "_").to_lowercase()
}

fn entry_file_name(slug: &str, extension: &str) -> String {
    format!("{}.{}", slug, extension)
}

/// Walks up from `start`, testing `{dir}/{file_name}` in each ancestor until the
/// file exists or the filesystem root is reached. The last candidate is
/// returned either way.
pub fn find_plugin_file(storage: &dyn StorageProvider, start: &Path, file_name: &str) -> PathBuf {
    let mut dir = start.to_path_buf();
    loop {
        let last_dir = dir.clone();
        if let Some(parent) = dir.parent() {
            dir = parent.to_path_buf();
        }
        let candidate = dir.join(file_name);
        if storage.is_file(&candidate) {
            log::debug!("Found entry file {}", candidate.display());
            return candidate;
        }
        if dir == last_dir {
            log::warn!("Entry file '{}' not found above {}", file_name, start.display());
            return candidate;
        }
    }
}

/// Calls the host function `{slug}_container` (hyphens replaced by underscores)
/// and checks that it yields a container handle.
fn resolve_container(host: &HostEnvironment, slug: &str) -> Result<Arc<dyn Container>> {
    let function = container_function_name(slug);
    let value: Box<dyn Any + Send + Sync> = host
        .call_function(&function)
        .ok_or_else(|| Error::ContainerMissing { function: function.clone() })?;

    match value.downcast::<Arc<dyn Container>>() {
        Ok(container) => {
            log::debug!("Container resolved through '{}'", function);
            Ok(*container)
        }
        Err(_) => Err(Error::ContainerInvalid { function }),
    }
}
