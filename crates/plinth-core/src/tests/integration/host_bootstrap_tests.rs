use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use crate::hooks::{remove_module, FilterRegistry, HookDispatcher};
use crate::host::HostEnvironment;
use crate::kernel::bootstrap::{Application, PluginInfo};
use crate::kernel::component::{Component, ComponentRefExt};
use crate::module_system::{FactoryContainer, Manager};
use crate::storage::{FrameworkConfig, LocalStorageProvider, StorageProvider};
use crate::tests::common::{init_test_logger, register_manager, register_module, Recorder, TestPlugin};

// Layout: {root}/my-plugin.plugin, {root}/vendor/plinth/{plinth.toml}
fn write_plugin_tree(root: &Path) -> std::path::PathBuf {
    let framework_dir = root.join("vendor").join("plinth");
    fs::create_dir_all(&framework_dir).expect("Failed to create framework dir");
    fs::write(
        root.join("my-plugin.plugin"),
        "/*\n * Plugin Name: Hosted Plugin\n * Version: 1.2.3\n * Text Domain: my-plugin\n */\n",
    )
    .expect("Failed to write entry file");
    framework_dir
}

#[test]
fn test_bootstrap_through_host_environment() {
    let dir = tempdir().expect("Failed to create temp dir");
    let framework_dir = write_plugin_tree(dir.path());

    let storage = Arc::new(LocalStorageProvider::new(framework_dir.clone()));
    let mut managers = BTreeMap::new();
    managers.insert(
        "my_plugin::admin::Manager".to_string(),
        vec!["Settings".to_string(), "Notices".to_string(), "Extra".to_string()],
    );
    let config = FrameworkConfig { entry_extension: "plugin".to_string(), managers };
    config.save(storage.as_ref(), Path::new("plinth.toml")).expect("save failed");

    init_test_logger();
    let recorder = Recorder::new();
    let container = FactoryContainer::new();
    register_manager(&container, "my_plugin::admin::Manager", &["Settings"]);
    register_module(&container, "my_plugin::admin::Settings", &recorder);
    register_module(&container, "my_plugin::admin::Notices", &recorder);
    register_module(&container, "my_plugin::admin::Extra", &recorder);

    let hooks = Arc::new(FilterRegistry::new());
    hooks.add_filter("my_plugin_admin_manager_modules", remove_module("Extra"));

    let mut host = HostEnvironment::new(&framework_dir)
        .with_hooks(hooks.clone())
        .with_storage(storage.clone())
        .load_config(Path::new("plinth.toml"))
        .expect("load_config failed");
    host.register_container("my-plugin", container.into_handle());

    let plugin = TestPlugin::new(&recorder).declaring(|properties, container| {
        properties.component("admin", container.create("my_plugin::admin::Manager")?);
        Ok(())
    });
    let app = Application::new(plugin, &host).expect("Application::new failed");

    assert_eq!(app.get_plugin_file(), dir.path().join("my-plugin.plugin"));
    assert!(storage.is_file(app.get_plugin_file()));
    assert!(app.hooks().has_filter("my_plugin_admin_manager_modules"));
    assert_eq!(
        app.get_plugin_info(Some("TextDomain")).expect("get_plugin_info failed"),
        PluginInfo::Field("my-plugin".to_string())
    );

    app.clone().init().expect("init failed");

    let admin = app
        .get_component("admin")
        .and_then(|component| component.downcast::<Manager>())
        .expect("admin manager should be declared");
    assert_eq!(admin.get_modules().names(), vec!["Settings", "Notices"]);
    let settings = admin.get_module("Settings").expect("Settings should be loaded");
    assert_eq!(settings.application().expect("application failed").get_slug(), "my-plugin");
    assert_eq!(settings.class_name(), "my_plugin::admin::Settings");
}
