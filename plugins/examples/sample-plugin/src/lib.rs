use std::sync::Arc;

use plinth_core::host::HostEnvironment;
use plinth_core::kernel::bootstrap::{Application, PluginDefinition};
use plinth_core::kernel::component::{Component, ComponentRef};
use plinth_core::kernel::error::Result as KernelResult;
use plinth_core::kernel::properties::PropertyTable;
use plinth_core::module_system::{Container, FactoryContainer, Manager};

pub mod admin;
pub mod logging;

use admin::{Notices, Settings};

pub const SLUG: &str = "sample-plugin";
pub const ADMIN_MANAGER: &str = "sample_plugin::admin::Manager";

/// Reference plugin: one admin manager loading `Settings` and `Notices`
#[derive(Debug, Default)]
pub struct SamplePlugin;

impl PluginDefinition for SamplePlugin {
    fn slug(&self) -> &'static str {
        SLUG
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn class_name(&self) -> &'static str {
        "sample_plugin::Plugin"
    }

    fn declare_properties(
        &self,
        properties: &mut PropertyTable,
        container: &dyn Container,
    ) -> KernelResult<()> {
        properties
            .component("admin", container.create(ADMIN_MANAGER)?)
            .value("text_domain", serde_json::Value::String(SLUG.to_string()))
            .private("installed_at");
        Ok(())
    }

    fn activate(&self, app: &Application) -> KernelResult<()> {
        logging::init_logging();
        log::info!("{} v{} activated", app.get_slug(), app.get_version());
        Ok(())
    }

    fn deactivate(&self, app: &Application) -> KernelResult<()> {
        log::info!("{} deactivated", app.get_slug());
        Ok(())
    }
}

/// Container with every class the plugin instantiates
pub fn container() -> FactoryContainer {
    let container = FactoryContainer::new();
    container
        .register(ADMIN_MANAGER, |_| {
            Ok(Arc::new(Manager::new(ADMIN_MANAGER, ["Settings", "Notices"])) as ComponentRef)
        })
        .register_shared(Settings::CLASS, |_| Ok(Arc::new(Settings::new()) as ComponentRef))
        .register(Notices::CLASS, |_| Ok(Arc::new(Notices::new()) as ComponentRef));
    container
}

/// Expose the plugin's container to the host as `sample_plugin_container`
pub fn register(host: &mut HostEnvironment) {
    host.register_container(SLUG, container().into_handle());
}

/// Create and initialize the plugin the way a host loads it
pub fn bootstrap(host: &HostEnvironment) -> KernelResult<Arc<Application>> {
    let app = Application::new(SamplePlugin, host)?;
    app.clone().init()?;
    let children: Vec<String> = app
        .children()
        .iter()
        .map(|child| child.class_name().to_string())
        .collect();
    log::debug!("{} tree ready: {:?}", SLUG, children);
    Ok(app)
}
