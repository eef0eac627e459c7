use std::any::Any;
use std::fmt::{self, Debug};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::kernel::bootstrap::Application;
use crate::kernel::constants;
use crate::kernel::error::{Error, Result};

/// Shared handle to any node of the component tree
pub type ComponentRef = Arc<dyn Component>;

/// Tree links every component carries.
///
/// Both links are weak: the tree owns its nodes top-down (the application owns
/// its components, managers own their modules), so a leaf never keeps its
/// ancestors alive.
#[derive(Default)]
pub struct ComponentCore {
    parent: RwLock<Option<Weak<dyn Component>>>,
    app: RwLock<Option<Weak<dyn Component>>>,
}

impl ComponentCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live parent, if any
    pub fn parent(&self) -> Option<ComponentRef> {
        read(&self.parent).as_ref().and_then(Weak::upgrade)
    }

    /// Link to `parent`. Linking to the current parent again is a no-op.
    pub fn set_parent(&self, parent: &ComponentRef, class_name: &str) -> Result<()> {
        let mut slot = write(&self.parent);
        if let Some(current) = slot.as_ref().and_then(Weak::upgrade) {
            if same_component(&current, parent) {
                return Ok(());
            }
            return Err(Error::ParentAlreadySet { class: class_name.to_string() });
        }
        *slot = Some(Arc::downgrade(parent));
        Ok(())
    }

    /// Cached root, if it is still alive
    pub fn cached_app(&self) -> Option<ComponentRef> {
        read(&self.app).as_ref().and_then(Weak::upgrade)
    }

    /// Record the tree root for this node
    pub fn seed_app(&self, app: &ComponentRef) {
        *write(&self.app) = Some(Arc::downgrade(app));
    }

    /// Drop both links
    pub fn release(&self) {
        *write(&self.parent) = None;
        *write(&self.app) = None;
    }
}

impl Debug for ComponentCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCore")
            .field("parent", &self.parent().map(|p| p.class_name().to_string()))
            .field("app_cached", &self.cached_app().is_some())
            .finish()
    }
}

// Poisoning only means a panic happened mid-update of an Option; the value is still usable.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// A node of the plugin's object tree
pub trait Component: Any + Send + Sync + Debug {
    /// Tree links of this node
    fn core(&self) -> &ComponentCore;

    /// Fully qualified class name, segments separated by `::`
    fn class_name(&self) -> &str;

    /// Additional qualified names this component answers to in [`is_a`](Component::is_a)
    fn ancestors(&self) -> &[&'static str] {
        &[]
    }

    /// Make the component ready. What "ready" means is up to the component.
    fn init(self: Arc<Self>) -> Result<()>;

    /// Sub-components owned by this node
    fn children(&self) -> Vec<ComponentRef> {
        Vec::new()
    }

    fn get_parent(&self) -> Option<ComponentRef> {
        self.core().parent()
    }

    fn set_parent(&self, parent: &ComponentRef) -> Result<()> {
        self.core().set_parent(parent, self.class_name())
    }

    fn has_parent(&self) -> bool {
        self.get_parent().is_some()
    }

    /// Teardown: clear the parent and root links
    fn release(&self) {
        self.core().release();
    }

    /// Namespace part of the class name (empty for unqualified names)
    fn namespace(&self) -> &str {
        namespace_of(self.class_name())
    }

    /// Last segment of the class name
    fn short_name(&self) -> &str {
        short_name_of(self.class_name())
    }

    fn is_a(&self, qualified: &str) -> bool {
        self.class_name() == qualified || self.ancestors().iter().any(|name| *name == qualified)
    }
}

/// Operations that need the node as a shared handle
pub trait ComponentRefExt {
    /// Root of the tree: the first ancestor without a parent (the node itself
    /// when it has none). Cached after the first walk.
    fn get_app(&self) -> Result<ComponentRef>;

    /// Root of the tree as an [`Application`]
    fn application(&self) -> Result<Arc<Application>>;

    /// Concrete component behind the handle
    fn downcast<T: Component>(&self) -> Option<Arc<T>>;
}

impl ComponentRefExt for ComponentRef {
    fn get_app(&self) -> Result<ComponentRef> {
        if let Some(app) = self.core().cached_app() {
            return Ok(app);
        }

        let mut current = self.clone();
        let mut depth = 0;
        while let Some(parent) = current.get_parent() {
            depth += 1;
            if depth > constants::MAX_TREE_DEPTH {
                return Err(Error::TreeCycle {
                    class: self.class_name().to_string(),
                    depth: constants::MAX_TREE_DEPTH,
                });
            }
            current = parent;
        }

        log::debug!("Resolved root of '{}' to '{}'", self.class_name(), current.class_name());
        self.core().seed_app(&current);
        Ok(current)
    }

    fn application(&self) -> Result<Arc<Application>> {
        let root = self.get_app()?;
        root.downcast::<Application>().ok_or_else(|| Error::NotAnApplication {
            class: root.class_name().to_string(),
        })
    }

    fn downcast<T: Component>(&self) -> Option<Arc<T>> {
        let any: Arc<dyn Any + Send + Sync> = self.clone();
        any.downcast::<T>().ok()
    }
}

/// Whether two handles point at the same node
pub fn same_component(a: &ComponentRef, b: &ComponentRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Release `node` and everything below it, children first
pub fn teardown(node: &ComponentRef) {
    for child in node.children() {
        teardown(&child);
    }
    log::debug!("Releasing component '{}'", node.class_name());
    node.release();
}

/// `a::b::C` -> `a::b`
pub fn namespace_of(class_name: &str) -> &str {
    class_name
        .rsplit_once(constants::NAMESPACE_SEPARATOR)
        .map(|(namespace, _)| namespace)
        .unwrap_or("")
}

/// `a::b::C` -> `C`
pub fn short_name_of(class_name: &str) -> &str {
    class_name
        .rsplit_once(constants::NAMESPACE_SEPARATOR)
        .map(|(_, short)| short)
        .unwrap_or(class_name)
}
