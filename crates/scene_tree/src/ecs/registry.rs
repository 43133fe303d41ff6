//! # Entity Registry
//!
//! Owns every entity of one scene: an arena of [`EntityNode`]s addressed by
//! [`EntityId`], the distinguished root, and the name index. All operations
//! that touch more than one node (parenting, traversal, broadcast,
//! destruction) live here.
//!
//! ## Frame update
//!
//! [`EntityRegistry::update`] walks the tree once per [`Pass`], in
//! [`Pass::ORDERED`] order. Within a pass a node updates its own components
//! before visiting its active children (pre-order), and every node finishes
//! pass N before any node starts pass N+1.
//!
//! Dead children are pruned during the walk: the parent scans its active
//! child cache by index, removes dead entries from both child lists, notifies
//! its own subscribers with [`Message::ChildRemoved`] and rescans the same
//! index. A child marked dead at any point in a frame is gone by the end of
//! its parent's next sweep.
//!
//! ## Name index
//!
//! Names should be unique. Registering a second entity under a taken name
//! overwrites the mapping; lookups then resolve to the newer entity.

use std::collections::HashMap;

use slotmap::SlotMap;

use super::{
    Attribute, AttributeKind, Component, EntityContext, EntityId, EntityNode, Pass, SceneError,
    SceneResult,
};
use super::component::ComponentSlot;
use crate::config::RuntimeConfig;
use crate::events::{HandlerId, Message, Topic};
use crate::foundation::math::{translation_of, Mat4, Quat, Vec3};

/// Counters collected during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Node visits summed over all passes
    pub visited: usize,
    /// Component `update` calls
    pub component_updates: usize,
    /// Dead children removed
    pub pruned: usize,
}

/// Scene tree and name index
pub struct EntityRegistry {
    entities: SlotMap<EntityId, EntityNode>,
    names: HashMap<String, EntityId>,
    root: EntityId,
    config: RuntimeConfig,
}

impl EntityRegistry {
    /// Create a registry with an initialized root entity
    pub fn new(config: RuntimeConfig) -> Self {
        let mut entities = SlotMap::with_key();
        let root = entities.insert(EntityNode::new(
            Some(config.root_name.clone()),
            &config.name_prefix,
        ));
        let mut registry = Self {
            entities,
            names: HashMap::new(),
            root,
            config,
        };

        if let Err(e) = registry.init_entity(root, None) {
            log::error!("Failed to initialize root entity: {}", e);
        }
        log::debug!("Created entity registry with root '{}'", registry.config.root_name);
        registry
    }

    /// Settings this registry was created with
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The root entity
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Number of live entities, root included
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Whether `id` refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Node data of an entity
    pub fn entity(&self, id: EntityId) -> Option<&EntityNode> {
        self.entities.get(id)
    }

    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// Construct an entity outside the tree
    ///
    /// Without a name, one is generated from the entity serial. Attach
    /// components, then call [`EntityRegistry::init_entity`].
    pub fn create_entity(&mut self, name: Option<&str>) -> EntityId {
        let node = EntityNode::new(name.map(str::to_string), &self.config.name_prefix);
        log::trace!("Created entity '{}' (serial {})", node.name(), node.serial());
        self.entities.insert(node)
    }

    /// Attach a component and run its `init_component` hook
    ///
    /// A component with the same name is replaced in place. Components added
    /// after `init_entity` never receive `init_entity`.
    ///
    /// # Panics
    ///
    /// Panics if the component's name is empty.
    pub fn add_component<C: Component>(&mut self, id: EntityId, component: C) -> SceneResult<()> {
        self.add_boxed_component(id, Box::new(component))
    }

    /// Attach an already boxed component
    ///
    /// # Panics
    ///
    /// Panics if the component's name is empty.
    pub fn add_boxed_component(
        &mut self,
        id: EntityId,
        component: Box<dyn Component>,
    ) -> SceneResult<()> {
        let node = self.entities.get_mut(id).ok_or(SceneError::StaleEntity(id))?;
        let slot = ComponentSlot::new(component);
        let name = slot.name;

        if node.initialized {
            log::warn!(
                "Component '{}' added to initialized entity '{}'; it will not receive init_entity",
                name,
                node.name
            );
        }

        match node.components.iter().position(|existing| existing.name == name) {
            Some(index) => {
                log::debug!("Replacing component '{}' on entity '{}'", name, node.name);
                node.components[index] = slot;
            }
            None => node.components.push(slot),
        }

        self.with_component(id, name, |component, ctx| component.init_component(ctx));
        Ok(())
    }

    /// Register the entity and run `init_entity` on its components
    ///
    /// The entity goes under `parent`, or under the root when `parent` is
    /// `None`. Components are initialized in attachment order, then the
    /// entity's active flag is applied to its parent.
    pub fn init_entity(&mut self, id: EntityId, parent: Option<EntityId>) -> SceneResult<()> {
        let node = self.entities.get(id).ok_or(SceneError::StaleEntity(id))?;
        if node.initialized {
            return Err(SceneError::AlreadyInitialized(node.name.clone()));
        }

        self.add(id, parent)?;
        let names: Vec<&'static str> = match self.entities.get_mut(id) {
            Some(node) => {
                node.initialized = true;
                node.component_names().collect()
            }
            None => return Err(SceneError::StaleEntity(id)),
        };

        for &name in &names {
            self.with_component(id, name, |component, ctx| component.init_entity(ctx));
        }

        if let Some(active) = self.entities.get(id).map(|node| node.active) {
            self.set_active(id, active);
        }
        log::debug!(
            "Initialized entity '{}' with {} component(s)",
            self.name(id).unwrap_or("<destroyed>"),
            names.len()
        );
        Ok(())
    }

    /// Create, equip and initialize an entity in one call
    pub fn spawn(
        &mut self,
        name: Option<&str>,
        parent: Option<EntityId>,
        components: Vec<Box<dyn Component>>,
    ) -> SceneResult<EntityId> {
        let id = self.create_entity(name);
        for component in components {
            self.add_boxed_component(id, component)?;
        }
        self.init_entity(id, parent)?;
        Ok(id)
    }

    // ---------------------------------------------------------------------
    // Name index
    // ---------------------------------------------------------------------

    /// Index `child` by name and place it in the tree
    ///
    /// Without a parent the child goes under the root. The root itself is
    /// only indexed; any `parent` passed for it is ignored.
    pub fn add(&mut self, child: EntityId, parent: Option<EntityId>) -> SceneResult<()> {
        let name = self
            .entities
            .get(child)
            .map(|node| node.name.clone())
            .ok_or(SceneError::StaleEntity(child))?;

        let parent = if child == self.root {
            if parent.is_some() {
                log::debug!("Ignoring parent given for the root entity");
            }
            None
        } else {
            Some(parent.unwrap_or(self.root))
        };
        if let Some(parent) = parent {
            self.set_parent(child, Some(parent))?;
        }

        if let Some(previous) = self.names.insert(name.clone(), child) {
            if previous != child {
                log::warn!(
                    "Entity name '{}' registered twice; lookups now resolve to the newer entity",
                    name
                );
            }
        }
        Ok(())
    }

    /// Drop the name mapping; the tree is untouched
    pub fn remove(&mut self, name: &str) -> Option<EntityId> {
        self.names.remove(name)
    }

    /// Entity registered under `name`
    pub fn get(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// Registry-wide lookup by name
    pub fn find_entity(&self, name: &str) -> Option<EntityId> {
        self.get(name)
    }

    /// First child named `name`
    ///
    /// With `recursive`, each child's subtree is searched depth-first before
    /// moving on to the next sibling.
    pub fn find_child(&self, id: EntityId, name: &str, recursive: bool) -> Option<EntityId> {
        let node = self.entities.get(id)?;
        for &child in &node.children {
            let Some(child_node) = self.entities.get(child) else {
                continue;
            };
            if child_node.name == name {
                return Some(child);
            }
            if recursive {
                if let Some(found) = self.find_child(child, name, true) {
                    return Some(found);
                }
            }
        }
        None
    }

    // ---------------------------------------------------------------------
    // Tree structure
    // ---------------------------------------------------------------------

    /// Move `child` under `parent`, or detach it when `parent` is `None`
    ///
    /// The child is appended to the new parent's list even when the parent
    /// does not change.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> SceneResult<()> {
        if !self.entities.contains_key(child) {
            return Err(SceneError::StaleEntity(child));
        }
        if let Some(parent) = parent {
            if !self.entities.contains_key(parent) {
                return Err(SceneError::StaleEntity(parent));
            }
            if self.is_ancestor_or_self(child, parent) {
                return Err(SceneError::ParentCycle {
                    child: self.name(child).unwrap_or_default().to_string(),
                    parent: self.name(parent).unwrap_or_default().to_string(),
                });
            }
        }

        self.detach(child);
        if let Some(node) = self.entities.get_mut(child) {
            node.parent = parent;
        }
        if let Some(parent) = parent {
            if let Some(parent_node) = self.entities.get_mut(parent) {
                parent_node.children.push(child);
            }
            self.refresh_active_children(parent);
        }
        Ok(())
    }

    /// Parent of an entity
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(id)?.parent
    }

    /// Children of an entity, empty for stale handles
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.entities.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Active-child cache of an entity, empty for stale handles
    pub fn active_children(&self, id: EntityId) -> &[EntityId] {
        self.entities
            .get(id)
            .map_or(&[], |node| node.active_children.as_slice())
    }

    /// Name of an entity
    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.entities.get(id).map(EntityNode::name)
    }

    /// Set the active flag and refresh the parent's active-child cache
    ///
    /// Children keep their own flags; they are skipped because their
    /// ancestor is.
    pub fn set_active(&mut self, id: EntityId, active: bool) {
        let Some(node) = self.entities.get_mut(id) else {
            log::warn!("set_active on stale entity {:?}", id);
            return;
        };
        node.active = active;
        if let Some(parent) = node.parent {
            self.refresh_active_children(parent);
        }
    }

    /// Whether the entity's own active flag is set
    pub fn is_active(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(EntityNode::is_active)
    }

    /// Schedule the entity for removal by its parent's next update
    pub fn set_dead(&mut self, id: EntityId) {
        match self.entities.get_mut(id) {
            Some(node) => {
                log::trace!("Entity '{}' marked dead", node.name);
                node.dead = true;
            }
            None => log::warn!("set_dead on stale entity {:?}", id),
        }
    }

    /// Whether the entity is scheduled for removal
    pub fn is_dead(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(EntityNode::is_dead)
    }

    /// Destroy an entity and its whole subtree
    ///
    /// Components receive `destroy`, children before parents. The entity is
    /// detached, its name mapping dropped if it still points here, and its
    /// handle becomes stale.
    pub fn destroy(&mut self, id: EntityId) -> SceneResult<()> {
        if id == self.root {
            return Err(SceneError::CannotDestroyRoot);
        }
        if !self.entities.contains_key(id) {
            return Err(SceneError::StaleEntity(id));
        }
        self.destroy_subtree(id);
        Ok(())
    }

    fn destroy_subtree(&mut self, id: EntityId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.destroy_subtree(child);
        }

        self.detach(id);
        let Some(mut node) = self.entities.remove(id) else {
            return;
        };
        for slot in &mut node.components {
            if let Some(component) = slot.component.as_mut() {
                component.destroy();
            }
        }
        if self.names.get(&node.name) == Some(&id) {
            self.names.remove(&node.name);
        }
        log::debug!("Destroyed entity '{}'", node.name);
    }

    fn detach(&mut self, child: EntityId) {
        let Some(old_parent) = self.entities.get(child).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent_node) = self.entities.get_mut(old_parent) {
            parent_node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.entities.get_mut(child) {
            node.parent = None;
        }
        self.refresh_active_children(old_parent);
    }

    fn is_ancestor_or_self(&self, ancestor: EntityId, mut node: EntityId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.entities.get(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn refresh_active_children(&mut self, parent: EntityId) {
        let Some(node) = self.entities.get(parent) else {
            return;
        };
        let active: Vec<EntityId> = node
            .children
            .iter()
            .copied()
            .filter(|&child| self.entities.get(child).is_some_and(|c| c.active))
            .collect();
        if let Some(node) = self.entities.get_mut(parent) {
            node.active_children = active;
        }
    }

    // ---------------------------------------------------------------------
    // Transform
    // ---------------------------------------------------------------------

    /// Local position
    pub fn position(&self, id: EntityId) -> Option<Vec3> {
        Some(self.entities.get(id)?.transform.position())
    }

    /// Local rotation
    pub fn rotation(&self, id: EntityId) -> Option<Quat> {
        Some(self.entities.get(id)?.transform.rotation())
    }

    /// Local matrix
    pub fn local_transform(&self, id: EntityId) -> Option<Mat4> {
        Some(*self.entities.get(id)?.transform.matrix())
    }

    /// Set the local position and notify the entity's own subscribers
    pub fn set_position(&mut self, id: EntityId, position: Vec3) {
        let Some(node) = self.entities.get_mut(id) else {
            log::warn!("set_position on stale entity {:?}", id);
            return;
        };
        node.transform.set_position(position);
        self.broadcast(id, &Message::PositionChanged(position));
    }

    /// Set the local rotation and notify the entity's own subscribers
    pub fn set_rotation(&mut self, id: EntityId, rotation: Quat) {
        let Some(node) = self.entities.get_mut(id) else {
            log::warn!("set_rotation on stale entity {:?}", id);
            return;
        };
        node.transform.set_rotation(rotation);
        self.broadcast(id, &Message::RotationChanged(rotation));
    }

    /// Offset the local position
    pub fn translate(&mut self, id: EntityId, delta: Vec3) {
        if let Some(position) = self.position(id) {
            self.set_position(id, position + delta);
        }
    }

    /// Apply `delta` after the current local rotation
    pub fn rotate(&mut self, id: EntityId, delta: Quat) {
        if let Some(rotation) = self.rotation(id) {
            self.set_rotation(id, rotation * delta);
        }
    }

    /// Local -Z axis in parent space
    pub fn forward(&self, id: EntityId) -> Option<Vec3> {
        Some(self.rotation(id)? * -Vec3::z())
    }

    /// Local -X axis in parent space
    pub fn left(&self, id: EntityId) -> Option<Vec3> {
        Some(self.rotation(id)? * -Vec3::x())
    }

    /// Local +Y axis in parent space
    pub fn up(&self, id: EntityId) -> Option<Vec3> {
        Some(self.rotation(id)? * Vec3::y())
    }

    /// World matrix, recomputed through every ancestor on each call
    pub fn world_transform(&self, id: EntityId) -> Option<Mat4> {
        let node = self.entities.get(id)?;
        let local = *node.transform.matrix();
        match node.parent.and_then(|parent| self.world_transform(parent)) {
            Some(parent_world) => Some(parent_world * local),
            None => Some(local),
        }
    }

    /// World-space position
    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        self.world_transform(id).map(|m| translation_of(&m))
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    /// Component of type `T` on an entity
    pub fn component<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.entities
            .get(id)?
            .components
            .iter()
            .find_map(ComponentSlot::get::<T>)
    }

    /// Component of type `T` on an entity, mutably
    pub fn component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities
            .get_mut(id)?
            .components
            .iter_mut()
            .find_map(ComponentSlot::get_mut::<T>)
    }

    /// Component by its name
    pub fn component_by_name(&self, id: EntityId, name: &str) -> Option<&dyn Component> {
        self.entities.get(id)?.slot(name)?.component.as_deref()
    }

    /// Whether a component with this name is attached
    pub fn has_component(&self, id: EntityId, name: &str) -> bool {
        self.entities
            .get(id)
            .is_some_and(|node| node.slot(name).is_some())
    }

    /// Stage mask of an attached component
    pub fn component_pass(&self, id: EntityId, name: &str) -> Option<Pass> {
        Some(self.entities.get(id)?.slot(name)?.pass)
    }

    /// Change the stage mask of an attached component
    pub fn set_component_pass(&mut self, id: EntityId, name: &str, pass: Pass) {
        match self.entities.get_mut(id).and_then(|node| node.slot_mut(name)) {
            Some(slot) => slot.pass = pass,
            None => log::warn!("set_component_pass: no component '{}' on {:?}", name, id),
        }
    }

    /// Lend a component out of its slot for the duration of `f`
    fn with_component<R>(
        &mut self,
        id: EntityId,
        name: &'static str,
        f: impl FnOnce(&mut dyn Component, &mut EntityContext<'_>) -> R,
    ) -> Option<R> {
        let mut component = self
            .entities
            .get_mut(id)?
            .slot_mut(name)?
            .component
            .take()?;

        let result = {
            let mut ctx = EntityContext::new(self, id, Some(name));
            f(&mut *component, &mut ctx)
        };

        match self.entities.get_mut(id).and_then(|node| node.slot_mut(name)) {
            Some(slot) if slot.component.is_none() => slot.component = Some(component),
            Some(_) => log::debug!("Component '{}' was replaced during its own hook", name),
            None => component.destroy(),
        }
        Some(result)
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    /// Publish an attribute, returning the previous value of the same kind
    pub fn set_attribute(&mut self, id: EntityId, attribute: Attribute) -> Option<Attribute> {
        self.entities.get_mut(id)?.attributes.set(attribute)
    }

    /// Read an attribute
    pub fn attribute(&self, id: EntityId, kind: AttributeKind) -> Option<&Attribute> {
        self.entities.get(id)?.attributes.get(kind)
    }

    /// Remove an attribute
    pub fn remove_attribute(&mut self, id: EntityId, kind: AttributeKind) -> Option<Attribute> {
        self.entities.get_mut(id)?.attributes.remove(kind)
    }

    // ---------------------------------------------------------------------
    // Messaging
    // ---------------------------------------------------------------------

    /// Subscribe to a topic on one entity
    ///
    /// Returns `None` for a stale handle.
    pub fn register_handler<F>(
        &mut self,
        id: EntityId,
        topic: impl Into<Topic>,
        handler: F,
    ) -> Option<HandlerId>
    where
        F: FnMut(&Message, &mut EntityContext<'_>) + 'static,
    {
        match self.entities.get_mut(id) {
            Some(node) => Some(node.bus.subscribe(topic.into(), Box::new(handler))),
            None => {
                log::warn!("register_handler on stale entity {:?}", id);
                None
            }
        }
    }

    /// Remove one handler from one entity
    ///
    /// Takes effect immediately, also from inside a delivery on the same
    /// topic: a removed handler that has not run yet is skipped.
    pub fn unregister_handler(
        &mut self,
        id: EntityId,
        topic: impl Into<Topic>,
        handler: HandlerId,
    ) -> bool {
        self.entities
            .get_mut(id)
            .is_some_and(|node| node.bus.unsubscribe(&topic.into(), handler))
    }

    /// Drop every handler for `topic` on one entity
    ///
    /// Like [`EntityRegistry::unregister_handler`], this also covers
    /// handlers of a delivery in progress.
    pub fn unregister_handlers(&mut self, id: EntityId, topic: impl Into<Topic>) -> usize {
        self.entities
            .get_mut(id)
            .map_or(0, |node| node.bus.clear(&topic.into()))
    }

    pub(crate) fn handler_revoked(&self, id: EntityId, handler: HandlerId) -> bool {
        self.entities
            .get(id)
            .is_some_and(|node| node.bus.is_revoked(handler))
    }

    /// Deliver `message` to the entity's own subscribers
    ///
    /// Handlers run synchronously in registration order. Nothing happens
    /// when the entity is dead or no handler listens on the topic.
    ///
    /// Nested broadcasts of the same topic on the same entity are suppressed
    /// for every handler of the outer delivery: a handler re-broadcasting its
    /// own topic does not run again, and the nested message reaches only
    /// handlers registered since the outer delivery began.
    pub fn broadcast(&mut self, id: EntityId, message: &Message) {
        let topic = message.topic();
        let Some(node) = self.entities.get_mut(id) else {
            return;
        };
        if node.dead {
            return;
        }
        let Some(mut handlers) = node.bus.take(&topic) else {
            return;
        };

        {
            let mut ctx = EntityContext::new(self, id, None);
            for subscription in &mut handlers {
                if ctx.registry().handler_revoked(id, subscription.id) {
                    continue;
                }
                (subscription.handler)(message, &mut ctx);
            }
        }

        if let Some(node) = self.entities.get_mut(id) {
            node.bus.restore(topic, handlers);
        }
    }

    // ---------------------------------------------------------------------
    // Update
    // ---------------------------------------------------------------------

    /// Run one frame: a full traversal for each pass in order
    pub fn update(&mut self, time_elapsed: f32) -> FrameStats {
        let mut stats = FrameStats::default();
        for pass in Pass::ORDERED {
            log::trace!("Update pass {:?}", pass);
            self.update_node(self.root, time_elapsed, pass, &mut stats);
        }
        if stats.pruned > 0 {
            log::debug!("Frame pruned {} dead entit(ies)", stats.pruned);
        }
        stats
    }

    /// Update one subtree for a single pass
    pub fn update_entity(&mut self, id: EntityId, time_elapsed: f32, pass: Pass) -> FrameStats {
        let mut stats = FrameStats::default();
        self.update_node(id, time_elapsed, pass, &mut stats);
        stats
    }

    fn update_node(&mut self, id: EntityId, time_elapsed: f32, pass: Pass, stats: &mut FrameStats) {
        match self.entities.get(id) {
            Some(node) if !node.dead => {}
            _ => return,
        }
        stats.visited += 1;

        let mut index = 0;
        while let Some((name, mask)) = self
            .entities
            .get(id)
            .and_then(|node| node.components.get(index))
            .map(|slot| (slot.name, slot.pass))
        {
            index += 1;
            if mask.intersects(pass)
                && self
                    .with_component(id, name, |component, ctx| component.update(ctx, time_elapsed))
                    .is_some()
            {
                stats.component_updates += 1;
            }
        }

        let mut index = 0;
        while let Some(child) = self
            .entities
            .get(id)
            .and_then(|node| node.active_children.get(index).copied())
        {
            if self.entities.get(child).map_or(true, EntityNode::is_dead) {
                self.prune_child(id, child);
                stats.pruned += 1;
            } else {
                self.update_node(child, time_elapsed, pass, stats);
                index += 1;
            }
        }
    }

    fn prune_child(&mut self, parent: EntityId, child: EntityId) {
        if let Some(node) = self.entities.get_mut(parent) {
            node.active_children.retain(|&c| c != child);
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.entities.get_mut(child) {
            if node.parent == Some(parent) {
                node.parent = None;
            }
            log::trace!("Pruned dead entity '{}'", node.name);
        }
        self.broadcast(parent, &Message::ChildRemoved(child));
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.entities.len())
            .field("names", &self.names.len())
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_named_root() {
        let registry = EntityRegistry::default();
        let root = registry.root();
        assert_eq!(registry.get("root"), Some(root));
        assert_eq!(registry.parent(root), None);
        assert!(registry.entity(root).unwrap().is_initialized());
        assert_eq!(registry.entity_count(), 1);
    }

    #[test]
    fn test_init_defaults_parent_to_root() {
        let mut registry = EntityRegistry::default();
        let ship = registry.create_entity(Some("ship"));
        assert_eq!(registry.get("ship"), None);

        registry.init_entity(ship, None).unwrap();
        assert_eq!(registry.parent(ship), Some(registry.root()));
        assert_eq!(registry.children(registry.root()), &[ship]);
        assert_eq!(registry.active_children(registry.root()), &[ship]);
        assert_eq!(registry.find_entity("ship"), Some(ship));
    }

    #[test]
    fn test_double_init_is_rejected() {
        let mut registry = EntityRegistry::default();
        let ship = registry.spawn(Some("ship"), None, Vec::new()).unwrap();
        assert_eq!(
            registry.init_entity(ship, None),
            Err(SceneError::AlreadyInitialized("ship".to_string()))
        );
        assert_eq!(registry.children(registry.root()).len(), 1);
    }

    #[test]
    fn test_generated_names_use_prefix() {
        let mut registry = EntityRegistry::new(RuntimeConfig {
            name_prefix: "node-".to_string(),
            ..RuntimeConfig::default()
        });
        let id = registry.create_entity(None);
        let node = registry.entity(id).unwrap();
        assert_eq!(node.name(), format!("node-{}", node.serial()));
    }

    #[test]
    fn test_parent_cycle_rejected() {
        let mut registry = EntityRegistry::default();
        let a = registry.spawn(Some("a"), None, Vec::new()).unwrap();
        let b = registry.spawn(Some("b"), Some(a), Vec::new()).unwrap();

        let result = registry.set_parent(a, Some(b));
        assert!(matches!(result, Err(SceneError::ParentCycle { .. })));
        assert!(matches!(registry.set_parent(a, Some(a)), Err(SceneError::ParentCycle { .. })));
        assert_eq!(registry.parent(a), Some(registry.root()));
    }

    #[test]
    fn test_destroy_root_rejected() {
        let mut registry = EntityRegistry::default();
        let root = registry.root();
        assert_eq!(registry.destroy(root), Err(SceneError::CannotDestroyRoot));
    }

    #[test]
    fn test_stale_handle_operations_are_absorbed() {
        let mut registry = EntityRegistry::default();
        let ghost = registry.spawn(Some("ghost"), None, Vec::new()).unwrap();
        registry.destroy(ghost).unwrap();

        registry.set_position(ghost, Vec3::new(1.0, 0.0, 0.0));
        registry.set_active(ghost, false);
        registry.set_dead(ghost);
        registry.broadcast(ghost, &Message::PositionChanged(Vec3::zeros()));
        assert!(registry.position(ghost).is_none());
        assert!(registry.world_transform(ghost).is_none());
        assert_eq!(registry.init_entity(ghost, None), Err(SceneError::StaleEntity(ghost)));
        assert_eq!(registry.destroy(ghost), Err(SceneError::StaleEntity(ghost)));
        assert!(registry.get("ghost").is_none());
    }
}
