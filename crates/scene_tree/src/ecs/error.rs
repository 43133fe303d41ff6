//! Errors raised by tree operations

use thiserror::Error;

use super::EntityId;

/// Errors returned by the entity registry
///
/// Lookup misses are not errors; they come back as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// `init_entity` was called a second time
    #[error("entity '{0}' is already initialized")]
    AlreadyInitialized(String),

    /// Parenting would make an entity its own ancestor
    #[error("cannot parent '{child}' under its own descendant '{parent}'")]
    ParentCycle {
        /// Entity being moved
        child: String,
        /// Requested parent
        parent: String,
    },

    /// The handle refers to a destroyed entity
    #[error("entity handle {0:?} is no longer valid")]
    StaleEntity(EntityId),

    /// The root entity lives as long as its registry
    #[error("the root entity cannot be destroyed")]
    CannotDestroyRoot,

    /// The global registry has not been created on this thread
    #[error("registry not initialized")]
    RegistryNotInitialized,

    /// The global registry is already borrowed further up the stack
    #[error("registry is already in use")]
    RegistryBusy,
}

/// Result alias for registry operations
pub type SceneResult<T> = Result<T, SceneError>;
