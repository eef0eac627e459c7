use std::sync::Arc;

use crate::kernel::component::{
    namespace_of, same_component, short_name_of, teardown, Component, ComponentRef, ComponentRefExt,
};
use crate::kernel::constants;
use crate::kernel::error::Error;
use crate::tests::common::{Recorder, RecordingModule};

fn node(class: &str) -> ComponentRef {
    Arc::new(RecordingModule::new(class, Recorder::new()))
}

#[test]
fn test_node_without_parent_is_its_own_root() {
    let lone = node("demo::Lone");
    let root = lone.get_app().expect("get_app failed");
    assert!(same_component(&root, &lone));
    assert!(!lone.has_parent());
}

#[test]
fn test_get_app_walks_to_topmost_ancestor() {
    let root = node("demo::Root");
    let middle = node("demo::Middle");
    let leaf = node("demo::Leaf");
    middle.set_parent(&root).expect("set_parent failed");
    leaf.set_parent(&middle).expect("set_parent failed");

    let resolved = leaf.get_app().expect("get_app failed");
    assert!(same_component(&resolved, &root));
    assert!(same_component(&leaf.get_parent().expect("leaf has a parent"), &middle));
}

#[test]
fn test_get_app_is_cached_after_first_resolution() {
    let root = node("demo::Root");
    let middle = node("demo::Middle");
    let leaf = node("demo::Leaf");
    middle.set_parent(&root).expect("set_parent failed");
    leaf.set_parent(&middle).expect("set_parent failed");

    let first = leaf.get_app().expect("get_app failed");
    middle.release();
    let second = leaf.get_app().expect("get_app failed");

    assert!(same_component(&first, &second));
    assert!(same_component(&second, &root));
}

#[test]
fn test_dropped_root_is_resolved_again() {
    let middle = node("demo::Middle");
    let leaf = node("demo::Leaf");
    {
        let root = node("demo::Root");
        middle.set_parent(&root).expect("set_parent failed");
        leaf.set_parent(&middle).expect("set_parent failed");
        leaf.get_app().expect("get_app failed");
    }

    let resolved = leaf.get_app().expect("get_app failed");
    assert!(same_component(&resolved, &middle));
}

#[test]
fn test_cycle_is_reported() {
    let a = node("demo::A");
    let b = node("demo::B");
    a.set_parent(&b).expect("set_parent failed");
    b.set_parent(&a).expect("set_parent failed");

    let err = a.get_app().expect_err("Cycle should be detected");
    assert!(matches!(
        err,
        Error::TreeCycle { ref class, depth } if class == "demo::A" && depth == constants::MAX_TREE_DEPTH
    ));
}

#[test]
fn test_set_parent_twice() {
    let parent = node("demo::Parent");
    let other = node("demo::Other");
    let child = node("demo::Child");

    child.set_parent(&parent).expect("set_parent failed");
    child.set_parent(&parent).expect("Re-linking to the same parent is allowed");
    let err = child.set_parent(&other).expect_err("A second parent should be rejected");
    assert!(matches!(err, Error::ParentAlreadySet { ref class } if class == "demo::Child"));
}

#[test]
fn test_application_on_plain_root_fails() {
    let root = node("demo::Root");
    let leaf = node("demo::Leaf");
    leaf.set_parent(&root).expect("set_parent failed");

    let err = leaf.application().expect_err("Root is not an application");
    assert!(matches!(err, Error::NotAnApplication { ref class } if class == "demo::Root"));
}

#[test]
fn test_class_name_helpers() {
    let module = RecordingModule::new("my_plugin::admin::Settings", Recorder::new())
        .with_ancestors(&["my_plugin::admin::Screen"]);

    assert_eq!(module.namespace(), "my_plugin::admin");
    assert_eq!(module.short_name(), "Settings");
    assert!(module.is_a("my_plugin::admin::Settings"));
    assert!(module.is_a("my_plugin::admin::Screen"));
    assert!(!module.is_a("my_plugin::admin::Notices"));

    assert_eq!(namespace_of("Unqualified"), "");
    assert_eq!(short_name_of("Unqualified"), "Unqualified");
}

#[test]
fn test_downcast_to_concrete_type() {
    let handle = node("demo::Leaf");
    let concrete = handle.downcast::<RecordingModule>().expect("downcast failed");
    assert_eq!(concrete.class_name(), "demo::Leaf");
    assert!(handle.downcast::<crate::module_system::Manager>().is_none());
}

#[test]
fn test_teardown_releases_links() {
    let root = node("demo::Root");
    let leaf = node("demo::Leaf");
    leaf.set_parent(&root).expect("set_parent failed");
    leaf.get_app().expect("get_app failed");

    teardown(&leaf);
    assert!(!leaf.has_parent());
    assert!(leaf.core().cached_app().is_none());
}
