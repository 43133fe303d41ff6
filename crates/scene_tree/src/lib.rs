//! # Scene Tree
//!
//! A hierarchical entity-component runtime: a tree of named entities, each
//! owning behavior components that are updated in staged passes every frame
//! and that talk to each other through a per-entity message bus.
//!
//! ## Features
//!
//! - **Arena-backed tree**: Entities addressed by stable handles, lazy removal of dead nodes
//! - **Staged updates**: Input, camera, default and late passes selected by bitmask
//! - **Entity-scoped messaging**: Typed messages delivered synchronously to one entity's subscribers
//! - **Transform composition**: Local position/rotation composed with every ancestor on demand
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_tree::prelude::*;
//!
//! struct Spinner {
//!     speed: f32,
//! }
//!
//! impl Component for Spinner {
//!     fn name(&self) -> &'static str {
//!         "Spinner"
//!     }
//!
//!     fn update(&mut self, ctx: &mut EntityContext<'_>, time_elapsed: f32) {
//!         let step = Quat::from_axis_angle(&Vec3::y_axis(), self.speed * time_elapsed);
//!         let rotation = ctx.rotation() * step;
//!         ctx.set_rotation(rotation);
//!     }
//! }
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut registry = EntityRegistry::new(RuntimeConfig::default());
//!     let top = registry.create_entity(Some("top"));
//!     registry.add_component(top, Spinner { speed: 1.0 })?;
//!     registry.init_entity(top, None)?;
//!
//!     registry.update(1.0 / 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, RuntimeConfig},
        ecs::{
            global, Attribute, AttributeKind, Component, EntityContext, EntityId,
            EntityRegistry, FrameStats, Pass, SceneError, SceneResult,
        },
        events::{HandlerId, Message, MessageValue, Topic},
        foundation::math::{Mat4, Quat, Vec3},
    };
}
