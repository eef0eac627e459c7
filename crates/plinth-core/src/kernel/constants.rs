/// Framework name
pub const FRAMEWORK_NAME: &str = "Plinth";

/// Framework version
pub const FRAMEWORK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Separator between path segments of a qualified class name
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Default extension of the entry descriptor (`{slug}.{ext}`)
pub const DEFAULT_ENTRY_EXTENSION: &str = "php";

/// Suffix of the host function expected to return the injection container
pub const CONTAINER_FUNCTION_SUFFIX: &str = "_container";

/// Suffix of the hook a manager filters its module list through
pub const MODULES_HOOK_SUFFIX: &str = "modules";

/// Maximum number of parent links followed when resolving a tree root
pub const MAX_TREE_DEPTH: usize = 64;

/// Number of bytes read from the entry descriptor when parsing its header
pub const HEADER_READ_LIMIT: u64 = 8 * 1024;
