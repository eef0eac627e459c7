//! Modules loaded by the admin manager
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use plinth_core::kernel::component::{Component, ComponentCore, ComponentRef, ComponentRefExt};
use plinth_core::kernel::error::Result as KernelResult;

/// Plugin options, seeded from the application on init
#[derive(Debug, Default)]
pub struct Settings {
    core: ComponentCore,
    options: RwLock<BTreeMap<String, String>>,
    ready: AtomicBool,
}

impl Settings {
    pub const CLASS: &'static str = "sample_plugin::admin::Settings";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.options.read().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.options
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), value.into());
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

impl Component for Settings {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn class_name(&self) -> &str {
        Self::CLASS
    }

    fn init(self: Arc<Self>) -> KernelResult<()> {
        let this: ComponentRef = self.clone();
        let app = this.application()?;
        self.set("slug", app.get_slug());
        self.set("version", app.get_version());
        self.ready.store(true, Ordering::SeqCst);
        log::debug!("Settings loaded for {}", app.get_slug());
        Ok(())
    }
}

/// Admin notices queued for display
#[derive(Debug, Default)]
pub struct Notices {
    core: ComponentCore,
    queue: Mutex<Vec<String>>,
}

impl Notices {
    pub const CLASS: &'static str = "sample_plugin::admin::Notices";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, notice: impl Into<String>) {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).push(notice.into());
    }

    pub fn notices(&self) -> Vec<String> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Component for Notices {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn class_name(&self) -> &str {
        Self::CLASS
    }

    fn ancestors(&self) -> &[&'static str] {
        &["sample_plugin::admin::Screen"]
    }

    fn init(self: Arc<Self>) -> KernelResult<()> {
        let this: ComponentRef = self.clone();
        let app = this.application()?;
        self.add(format!("{} {} is active.", app.get_slug(), app.get_version()));
        Ok(())
    }
}
