use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::hooks::{FilterCallback, FilterId, FilterPriority, HookDispatcher, DEFAULT_PRIORITY};

type SharedCallback = Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;

struct RegisteredFilter {
    id: FilterId,
    priority: FilterPriority,
    callback: SharedCallback,
}

#[derive(Default)]
struct FilterTable {
    filters: HashMap<String, Vec<RegisteredFilter>>,
    next_filter_id: FilterId,
}

/// Registry of named filters.
///
/// Filters for a hook run by ascending priority; filters with equal priority
/// run in registration order.
#[derive(Default)]
pub struct FilterRegistry {
    table: RwLock<FilterTable>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `hook` at [`DEFAULT_PRIORITY`]
    pub fn add_filter(&self, hook: &str, callback: FilterCallback) -> FilterId {
        self.add_filter_with_priority(hook, DEFAULT_PRIORITY, callback)
    }

    pub fn add_filter_with_priority(
        &self,
        hook: &str,
        priority: FilterPriority,
        callback: FilterCallback,
    ) -> FilterId {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        table.next_filter_id += 1;
        let id = table.next_filter_id;

        let filters = table.filters.entry(hook.to_string()).or_default();
        // Insert after every filter with priority <= ours to keep registration order
        let position = filters.iter().position(|f| f.priority > priority).unwrap_or(filters.len());
        filters.insert(position, RegisteredFilter { id, priority, callback: Arc::from(callback) });

        log::debug!("Registered filter {} on hook '{}' (priority {})", id, hook, priority);
        id
    }

    /// Remove a filter by id. Returns whether it was registered.
    pub fn remove_filter(&self, id: FilterId) -> bool {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        let mut found = false;
        table.filters.values_mut().for_each(|filters| {
            let len_before = filters.len();
            filters.retain(|f| f.id != id);
            if filters.len() < len_before {
                found = true;
            }
        });
        table.filters.retain(|_, filters| !filters.is_empty());
        found
    }

    /// Number of filters registered for `hook`
    pub fn filter_count(&self, hook: &str) -> usize {
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        table.filters.get(hook).map_or(0, Vec::len)
    }
}

impl HookDispatcher for FilterRegistry {
    fn apply_filters(&self, hook: &str, value: Vec<String>) -> Vec<String> {
        // Callbacks run outside the lock so they may register further filters
        let callbacks: Vec<SharedCallback> = {
            let table = self.table.read().unwrap_or_else(|e| e.into_inner());
            match table.filters.get(hook) {
                Some(filters) => filters.iter().map(|f| f.callback.clone()).collect(),
                None => return value,
            }
        };

        log::debug!("Applying {} filter(s) on hook '{}'", callbacks.len(), hook);
        callbacks.iter().fold(value, |acc, callback| callback(acc))
    }

    fn has_filter(&self, hook: &str) -> bool {
        self.filter_count(hook) > 0
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        let filter_count: usize = table.filters.values().map(Vec::len).sum();
        f.debug_struct("FilterRegistry")
            .field("hooks", &table.filters.len())
            .field("filters", &filter_count)
            .field("next_filter_id", &table.next_filter_id)
            .finish()
    }
}
