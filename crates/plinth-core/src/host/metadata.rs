use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::storage::error::StorageSystemError;
use crate::storage::StorageProvider;

/// Header fields of an entry descriptor, keyed by field name
pub type PluginData = BTreeMap<String, String>;

/// Field names and the header labels they are read from
pub const PLUGIN_HEADERS: &[(&str, &str)] = &[
    ("Name", "Plugin Name"),
    ("PluginURI", "Plugin URI"),
    ("Version", "Version"),
    ("Description", "Description"),
    ("Author", "Author"),
    ("AuthorURI", "Author URI"),
    ("TextDomain", "Text Domain"),
    ("DomainPath", "Domain Path"),
    ("License", "License"),
    ("RequiresAtLeast", "Requires at least"),
];

/// Source of plugin metadata
pub trait MetadataRegistry: Send + Sync + Debug {
    /// Metadata of the entry descriptor at `plugin_file`
    fn plugin_data(&self, plugin_file: &Path) -> Result<PluginData>;
}

/// Reads `Label: value` lines from the head of the entry descriptor.
///
/// Only the first [`HEADER_READ_LIMIT`](constants::HEADER_READ_LIMIT) bytes
/// are scanned. Every field of [`PLUGIN_HEADERS`] is present in the result,
/// empty when the header does not carry it.
pub struct HeaderMetadataReader {
    storage: Arc<dyn StorageProvider>,
}

impl HeaderMetadataReader {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }
}

impl MetadataRegistry for HeaderMetadataReader {
    fn plugin_data(&self, plugin_file: &Path) -> Result<PluginData> {
        let reader = self.storage.open_read(plugin_file)?;
        let mut head = Vec::new();
        reader
            .take(constants::HEADER_READ_LIMIT)
            .read_to_end(&mut head)
            .map_err(|e| StorageSystemError::io(e, "read_header", plugin_file.to_path_buf()))?;

        Ok(parse_header(&String::from_utf8_lossy(&head)))
    }
}

impl Debug for HeaderMetadataReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderMetadataReader")
            .field("storage", &self.storage.name())
            .finish()
    }
}

/// Extract every known header field from `text`
pub fn parse_header(text: &str) -> PluginData {
    PLUGIN_HEADERS
        .iter()
        .map(|(field, label)| {
            let value = header_value(text, label).unwrap_or_default();
            (field.to_string(), value)
        })
        .collect()
}

// First line of the form `[ \t/*#@]*{label}:{value}`, label matched case-insensitively
fn header_value(text: &str, label: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let rest = line.trim_start_matches([' ', '\t', '/', '*', '#', '@']);
        let head = rest.get(..label.len())?;
        if !head.eq_ignore_ascii_case(label) {
            return None;
        }
        let value = rest[label.len()..].strip_prefix(':')?;
        Some(cleanup_value(value))
    })
}

// Drop a closing comment or code marker and anything after it
fn cleanup_value(value: &str) -> String {
    let end = ["*/", "?>"]
        .iter()
        .filter_map(|marker| value.find(marker))
        .min()
        .unwrap_or(value.len());
    value[..end].trim().to_string()
}
