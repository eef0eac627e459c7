use std::sync::Arc;

use crate::hooks::{append_modules, FilterRegistry};
use crate::kernel::bootstrap::Application;
use crate::kernel::component::{same_component, Component, ComponentRef, ComponentRefExt};
use crate::module_system::{FactoryContainer, Manager};
use crate::tests::common::{init_test_logger, register_manager, register_module, Recorder, RecordingModule, TestPlugin};

fn full_container(recorder: &Recorder) -> FactoryContainer {
    let container = FactoryContainer::new();
    register_manager(&container, "my_plugin::admin::Manager", &["Settings", "my_plugin::tools::Manager"]);
    register_manager(&container, "my_plugin::front::Manager", &["Shortcodes"]);
    register_manager(&container, "my_plugin::tools::Manager", &["Cleaner"]);
    register_module(&container, "my_plugin::admin::Settings", recorder);
    register_module(&container, "my_plugin::front::Shortcodes", recorder);
    register_module(&container, "my_plugin::front::Widgets", recorder);
    register_module(&container, "my_plugin::tools::Cleaner", recorder);
    register_module(&container, "my_plugin::Assets", recorder);
    container
}

fn full_plugin(recorder: &Recorder) -> TestPlugin {
    TestPlugin::new(recorder).declaring(|properties, container| {
        properties
            .component("admin", container.create("my_plugin::admin::Manager")?)
            .component("front", container.create("my_plugin::front::Manager")?)
            .component("assets", container.create("my_plugin::Assets")?);
        Ok(())
    })
}

fn manager(app: &Application, name: &str) -> Arc<Manager> {
    app.get_component(name)
        .and_then(|component| component.downcast::<Manager>())
        .expect("manager should be declared")
}

#[test]
fn test_whole_tree_initializes_depth_first_per_manager() {
    init_test_logger();
    let recorder = Recorder::new();
    let hooks = Arc::new(FilterRegistry::new());
    hooks.add_filter("my_plugin_front_manager_modules", append_modules(["Widgets"]));

    let app = Application::builder(full_plugin(&recorder), full_container(&recorder).into_handle())
        .hooks(hooks)
        .build()
        .expect("Failed to build application");
    app.clone().init().expect("init failed");

    assert_eq!(
        recorder.with_prefix("init:"),
        vec![
            "my_plugin::admin::Settings",
            "my_plugin::tools::Cleaner",
            "my_plugin::front::Shortcodes",
            "my_plugin::front::Widgets",
            "my_plugin::Assets",
        ]
    );
}

#[test]
fn test_every_node_resolves_the_same_root() {
    init_test_logger();
    let recorder = Recorder::new();
    let app = Application::builder(full_plugin(&recorder), full_container(&recorder).into_handle())
        .build()
        .expect("Failed to build application");
    let app_ref: ComponentRef = app.clone();
    app.clone().init().expect("init failed");

    let mut pending: Vec<ComponentRef> = app.children();
    let mut visited = 0;
    while let Some(node) = pending.pop() {
        assert!(same_component(&node.get_app().expect("root"), &app_ref));
        if let Some(module) = node.downcast::<RecordingModule>() {
            assert_eq!(module.seen_root().as_deref(), Some("my_plugin::Plugin"));
        }
        pending.extend(node.children());
        visited += 1;
    }
    // admin, tools, front and assets plus three leaf modules
    assert_eq!(visited, 7);
}

#[test]
fn test_nested_manager_is_addressable() {
    init_test_logger();
    let recorder = Recorder::new();
    let app = Application::builder(full_plugin(&recorder), full_container(&recorder).into_handle())
        .build()
        .expect("Failed to build application");
    app.clone().init().expect("init failed");

    let admin = manager(&app, "admin");
    let admin_ref: ComponentRef = admin.clone();
    let tools = admin
        .get_modules()
        .get("my_plugin::tools::Manager")
        .and_then(|module| module.downcast::<Manager>())
        .expect("tools manager should be loaded");

    assert!(same_component(&tools.get_parent().expect("parented"), &admin_ref));
    assert_eq!(tools.hook_name().expect("hook_name failed"), "my_plugin_tools_manager_modules");
    assert!(tools.get_module("Cleaner").is_some());
    assert!(admin.get_module("Settings").is_some());
    assert!(admin.get_module("Cleaner").is_none());
}

#[test]
fn test_teardown_then_rebuild() {
    init_test_logger();
    let recorder = Recorder::new();
    let app = Application::builder(full_plugin(&recorder), full_container(&recorder).into_handle())
        .build()
        .expect("Failed to build application");
    app.clone().init().expect("init failed");

    app.teardown();
    let front = manager(&app, "front");
    assert!(front.get_modules().is_empty());
    assert!(!front.has_parent());

    app.clone().init().expect("re-init after teardown failed");
    assert_eq!(front.get_modules().names(), vec!["Shortcodes"]);
}
