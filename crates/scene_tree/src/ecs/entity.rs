//! Entity node data
//!
//! Entities live in the registry's arena and refer to each other through
//! [`EntityId`] handles, so the parent/child relation never forms an
//! ownership cycle. Behavior that needs the whole tree (parenting, update,
//! broadcast) lives on [`EntityRegistry`](super::EntityRegistry).

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::new_key_type;

use super::attributes::Attributes;
use super::component::ComponentSlot;
use crate::events::MessageBus;
use crate::foundation::math::LocalTransform;

new_key_type! {
    /// Stable handle to an entity in the registry arena
    pub struct EntityId;
}

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Next process-wide entity serial; never reused
fn next_serial() -> u64 {
    NEXT_SERIAL.fetch_add(1, Ordering::Relaxed)
}

/// One node of the scene tree
#[derive(Debug)]
pub struct EntityNode {
    serial: u64,
    pub(crate) name: String,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) active_children: Vec<EntityId>,
    pub(crate) transform: LocalTransform,
    pub(crate) active: bool,
    pub(crate) dead: bool,
    pub(crate) initialized: bool,
    pub(crate) components: Vec<ComponentSlot>,
    pub(crate) bus: MessageBus,
    pub(crate) attributes: Attributes,
}

impl EntityNode {
    /// Create a detached node; `name_prefix` builds the name when none is given
    pub(crate) fn new(name: Option<String>, name_prefix: &str) -> Self {
        let serial = next_serial();
        Self {
            serial,
            name: name.unwrap_or_else(|| format!("{name_prefix}{serial}")),
            parent: None,
            children: Vec::new(),
            active_children: Vec::new(),
            transform: LocalTransform::default(),
            active: true,
            dead: false,
            initialized: false,
            components: Vec::new(),
            bus: MessageBus::new(),
            attributes: Attributes::default(),
        }
    }

    /// Process-unique serial number
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Registry name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent handle, `None` for the root and detached entities
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// All children in insertion order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Children whose active flag is set, in child order
    pub fn active_children(&self) -> &[EntityId] {
        &self.active_children
    }

    /// Local transform
    pub fn transform(&self) -> &LocalTransform {
        &self.transform
    }

    /// Whether the entity takes part in updates
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the entity is scheduled for removal
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Whether `init_entity` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Attribute bag
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Names of attached components in attachment order
    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.iter().map(|slot| slot.name)
    }

    pub(crate) fn slot(&self, name: &str) -> Option<&ComponentSlot> {
        self.components.iter().find(|slot| slot.name == name)
    }

    pub(crate) fn slot_mut(&mut self, name: &str) -> Option<&mut ComponentSlot> {
        self.components.iter_mut().find(|slot| slot.name == name)
    }
}
