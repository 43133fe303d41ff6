//! Entity-component tree
//!
//! Entities form a tree owned by an [`EntityRegistry`]. Each entity carries
//! a local transform, named [`Component`]s updated in staged [`Pass`]es, an
//! attribute bag, and its own message bus.

pub mod attributes;
pub mod component;
pub mod context;
pub mod entity;
pub mod error;
pub mod global;
pub mod pass;
pub mod registry;

#[cfg(test)]
mod tests;

pub use attributes::{Attribute, AttributeKind, Attributes};
pub use component::{AsAny, Component};
pub use context::EntityContext;
pub use entity::{EntityId, EntityNode};
pub use error::{SceneError, SceneResult};
pub use pass::Pass;
pub use registry::{EntityRegistry, FrameStats};
