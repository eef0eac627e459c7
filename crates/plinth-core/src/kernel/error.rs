//! # Plinth Core Kernel Errors
//!
//! Defines the crate-wide [`Error`] enum and the `Result` alias used by every
//! subsystem. Bootstrap failures (container resolution), tree wiring failures
//! and module resolution failures are reported here; storage problems are
//! wrapped from [`StorageSystemError`].
use std::result::Result as StdResult;

use crate::storage::error::StorageSystemError;
use thiserror::Error as ThisError;

/// Main error type of the framework
#[derive(Debug, ThisError)]
pub enum Error {
    /// The host does not expose the conventionally named container factory.
    #[error("Container function {function} does not exist.")]
    ContainerMissing { function: String },

    /// The container factory returned something that is not a container handle.
    #[error("Container function {function} does not return a container instance.")]
    ContainerInvalid { function: String },

    /// The container has no factory for the requested class.
    #[error("Unknown class '{class}': no factory registered in the container")]
    UnknownClass { class: String },

    /// A manager could not create one of its modules.
    #[error("Failed to resolve module '{module}' as '{class}': {source}")]
    ModuleResolution {
        module: String,
        class: String,
        #[source]
        source: Box<Error>,
    },

    /// The upward parent walk did not reach a root within the depth guard.
    #[error("Parent chain of '{class}' exceeds {depth} levels; the tree likely contains a cycle")]
    TreeCycle { class: String, depth: usize },

    #[error("Component '{class}' already has a different parent")]
    ParentAlreadySet { class: String },

    /// The tree root is not an [`Application`](crate::kernel::Application).
    #[error("Root of the tree is '{class}', which is not an application")]
    NotAnApplication { class: String },

    #[error("Component '{class}' is already initialized")]
    AlreadyInitialized { class: String },

    /// Error raised by component code during a lifecycle phase.
    #[error("Component lifecycle error during {phase} of '{component}': {message}")]
    ComponentLifecycle {
        phase: LifecyclePhase,
        component: String,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Specific, typed storage system error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in a component's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum LifecyclePhase {
    #[error("Construct")]
    Construct,
    #[error("Initialize")]
    Initialize,
    #[error("Activate")]
    Activate,
    #[error("Deactivate")]
    Deactivate,
    #[error("Uninstall")]
    Uninstall,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Wrap an error raised while running `phase` on `component`.
    pub fn lifecycle(phase: LifecyclePhase, component: impl Into<String>, source: Error) -> Self {
        Error::ComponentLifecycle {
            phase,
            component: component.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}
