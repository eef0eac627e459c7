#![cfg(test)]

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::kernel::bootstrap::{Application, PluginDefinition};
use crate::kernel::component::{Component, ComponentCore, ComponentRef, ComponentRefExt};
use crate::kernel::error::{Error, Result};
use crate::kernel::properties::PropertyTable;
use crate::module_system::{Container, FactoryContainer, Manager};

/// Route framework logs to the test harness; safe to call from every test
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ===== RECORDER =====

/// Shared, ordered log of what happened to the test tree
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Entries starting with `prefix`, prefix stripped
    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .iter()
            .filter_map(|entry| entry.strip_prefix(prefix).map(str::to_string))
            .collect()
    }
}

// ===== MOCK COMPONENTS =====

/// Leaf component recording its own `init`
pub struct RecordingModule {
    core: ComponentCore,
    class_name: String,
    ancestors: &'static [&'static str],
    recorder: Recorder,
    fail_init: bool,
    seen_root: Mutex<Option<String>>,
}

impl RecordingModule {
    pub fn new(class_name: &str, recorder: Recorder) -> Self {
        Self {
            core: ComponentCore::new(),
            class_name: class_name.to_string(),
            ancestors: &[],
            recorder,
            fail_init: false,
            seen_root: Mutex::new(None),
        }
    }

    pub fn with_ancestors(mut self, ancestors: &'static [&'static str]) -> Self {
        self.ancestors = ancestors;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Class name of the root this module resolved during `init`
    pub fn seen_root(&self) -> Option<String> {
        self.seen_root.lock().unwrap().clone()
    }
}

impl fmt::Debug for RecordingModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingModule")
            .field("class_name", &self.class_name)
            .finish()
    }
}

impl Component for RecordingModule {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn ancestors(&self) -> &[&'static str] {
        self.ancestors
    }

    fn init(self: Arc<Self>) -> Result<()> {
        self.recorder.push(format!("init:{}", self.class_name));
        if self.fail_init {
            return Err(Error::Other(format!("{} refused to start", self.class_name)));
        }
        let this: ComponentRef = self.clone();
        let root = this.get_app()?;
        *self.seen_root.lock().unwrap() = Some(root.class_name().to_string());
        Ok(())
    }
}

/// Register a factory for `class` that records every creation
pub fn register_module(container: &FactoryContainer, class: &'static str, recorder: &Recorder) {
    let recorder = recorder.clone();
    container.register(class, move |_| {
        recorder.push(format!("create:{}", class));
        Ok(Arc::new(RecordingModule::new(class, recorder.clone())) as ComponentRef)
    });
}

/// Register a factory for `class` whose module fails to initialize
pub fn register_failing_module(container: &FactoryContainer, class: &'static str, recorder: &Recorder) {
    let recorder = recorder.clone();
    container.register(class, move |_| {
        recorder.push(format!("create:{}", class));
        Ok(Arc::new(RecordingModule::new(class, recorder.clone()).failing()) as ComponentRef)
    });
}

/// Register a manager class with its default modules
pub fn register_manager(container: &FactoryContainer, class: &'static str, defaults: &'static [&'static str]) {
    container.register(class, move |_| Ok(Arc::new(Manager::new(class, defaults.iter().copied())) as ComponentRef));
}

// ===== MOCK PLUGIN =====

type Declare = Arc<dyn Fn(&mut PropertyTable, &dyn Container) -> Result<()> + Send + Sync>;

/// Plugin definition whose members are supplied by the test
pub struct TestPlugin {
    slug: &'static str,
    class_name: &'static str,
    dependencies: bool,
    recorder: Recorder,
    declare: Declare,
}

impl TestPlugin {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            slug: "my-plugin",
            class_name: "my_plugin::Plugin",
            dependencies: true,
            recorder: recorder.clone(),
            declare: Arc::new(|_, _| Ok(())),
        }
    }

    pub fn with_slug(mut self, slug: &'static str) -> Self {
        self.slug = slug;
        self
    }

    pub fn without_dependencies(mut self) -> Self {
        self.dependencies = false;
        self
    }

    pub fn declaring<F>(mut self, declare: F) -> Self
    where
        F: Fn(&mut PropertyTable, &dyn Container) -> Result<()> + Send + Sync + 'static,
    {
        self.declare = Arc::new(declare);
        self
    }
}

impl fmt::Debug for TestPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestPlugin").field("slug", &self.slug).finish()
    }
}

impl PluginDefinition for TestPlugin {
    fn slug(&self) -> &'static str {
        self.slug
    }

    fn version(&self) -> &'static str {
        "1.2.3"
    }

    fn class_name(&self) -> &'static str {
        self.class_name
    }

    fn declare_properties(&self, properties: &mut PropertyTable, container: &dyn Container) -> Result<()> {
        (self.declare)(properties, container)
    }

    fn dependencies_exist(&self, _app: &Application) -> bool {
        self.dependencies
    }

    fn activate(&self, _app: &Application) -> Result<()> {
        self.recorder.push("activate");
        Ok(())
    }

    fn deactivate(&self, _app: &Application) -> Result<()> {
        self.recorder.push("deactivate");
        Ok(())
    }

    fn uninstall(&self, _app: &Application) -> Result<()> {
        self.recorder.push("uninstall");
        Err(Error::Other("uninstall is not supported".to_string()))
    }
}

/// Application over `container` with default collaborators
pub fn build_app(plugin: TestPlugin, container: FactoryContainer) -> Arc<Application> {
    Application::builder(plugin, container.into_handle())
        .build()
        .expect("Failed to build test application")
}
