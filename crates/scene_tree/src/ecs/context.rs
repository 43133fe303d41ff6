//! Access to the tree from inside component hooks and message handlers

use super::{Attribute, AttributeKind, Component, EntityId, EntityRegistry, Pass};
use crate::events::{HandlerId, Message, Topic};
use crate::foundation::math::{Quat, Vec3};

/// View of the registry bound to one entity
///
/// Hooks and handlers receive this instead of a reference to their owner.
/// While a component's hook runs, that component is lent out of its slot:
/// looking it up through the context returns `None`, siblings resolve
/// normally.
pub struct EntityContext<'a> {
    registry: &'a mut EntityRegistry,
    entity: EntityId,
    component: Option<&'static str>,
}

impl<'a> EntityContext<'a> {
    pub(crate) fn new(
        registry: &'a mut EntityRegistry,
        entity: EntityId,
        component: Option<&'static str>,
    ) -> Self {
        Self {
            registry,
            entity,
            component,
        }
    }

    /// The owning entity
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Name of the owning entity
    pub fn entity_name(&self) -> Option<&str> {
        self.registry.name(self.entity)
    }

    /// Shared access to the whole registry
    pub fn registry(&self) -> &EntityRegistry {
        &*self.registry
    }

    /// Mutable access to the whole registry
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut *self.registry
    }

    /// Sibling component by type
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.registry.component::<T>(self.entity)
    }

    /// Sibling component by type, mutably
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.registry.component_mut::<T>(self.entity)
    }

    /// Registry-wide lookup by name
    pub fn find_entity(&self, name: &str) -> Option<EntityId> {
        self.registry.find_entity(name)
    }

    /// Deliver `message` to the owning entity's subscribers
    pub fn broadcast(&mut self, message: &Message) {
        self.registry.broadcast(self.entity, message);
    }

    /// Subscribe to a topic on the owning entity
    pub fn register_handler<F>(&mut self, topic: impl Into<Topic>, handler: F) -> Option<HandlerId>
    where
        F: FnMut(&Message, &mut EntityContext<'_>) + 'static,
    {
        self.registry.register_handler(self.entity, topic, handler)
    }

    /// Remove one handler from the owning entity
    pub fn unregister_handler(&mut self, topic: impl Into<Topic>, handler: HandlerId) -> bool {
        self.registry.unregister_handler(self.entity, topic, handler)
    }

    /// Drop every handler for `topic` on the owning entity
    pub fn unregister_handlers(&mut self, topic: impl Into<Topic>) -> usize {
        self.registry.unregister_handlers(self.entity, topic)
    }

    /// Stage mask of the component whose hook is running
    ///
    /// `None` inside message handlers.
    pub fn pass(&self) -> Option<Pass> {
        self.component
            .and_then(|name| self.registry.component_pass(self.entity, name))
    }

    /// Change the stage mask of the component whose hook is running
    ///
    /// Ignored inside message handlers.
    pub fn set_pass(&mut self, pass: Pass) {
        match self.component {
            Some(name) => self.registry.set_component_pass(self.entity, name, pass),
            None => log::warn!("set_pass called outside a component hook; ignored"),
        }
    }

    /// Local position of the owning entity
    pub fn position(&self) -> Vec3 {
        self.registry.position(self.entity).unwrap_or_else(Vec3::zeros)
    }

    /// Move the owning entity
    pub fn set_position(&mut self, position: Vec3) {
        self.registry.set_position(self.entity, position);
    }

    /// Local rotation of the owning entity
    pub fn rotation(&self) -> Quat {
        self.registry.rotation(self.entity).unwrap_or_else(Quat::identity)
    }

    /// Rotate the owning entity
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.registry.set_rotation(self.entity, rotation);
    }

    /// Facing direction of the owning entity, local -Z
    pub fn forward(&self) -> Vec3 {
        self.rotation() * -Vec3::z()
    }

    /// Local -X axis of the owning entity
    pub fn left(&self) -> Vec3 {
        self.rotation() * -Vec3::x()
    }

    /// Local +Y axis of the owning entity
    pub fn up(&self) -> Vec3 {
        self.rotation() * Vec3::y()
    }

    /// Schedule the owning entity for removal
    pub fn set_dead(&mut self) {
        self.registry.set_dead(self.entity);
    }

    /// Publish an attribute on the owning entity
    pub fn set_attribute(&mut self, attribute: Attribute) -> Option<Attribute> {
        self.registry.set_attribute(self.entity, attribute)
    }

    /// Read an attribute of the owning entity
    pub fn attribute(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.registry.attribute(self.entity, kind)
    }
}
