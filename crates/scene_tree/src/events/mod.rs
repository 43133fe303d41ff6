//! Per-entity message bus
//!
//! Every entity owns one [`MessageBus`]. Messages are a closed enumeration;
//! each variant maps to one [`Topic`] and consumers may add their own topics
//! through [`Message::Custom`]. Delivery is synchronous, in registration
//! order, and never crosses to parents or children.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::ecs::{EntityContext, EntityId};
use crate::foundation::math::{Quat, Vec3};

/// Topic string broadcast after a position write
pub const TOPIC_POSITION: &str = "update.position";
/// Topic string broadcast after a rotation write
pub const TOPIC_ROTATION: &str = "update.rotation";
/// Topic string broadcast when a dead child is pruned
pub const TOPIC_REMOVED_CHILD: &str = "events.removedchild";

/// Message topic identification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// `update.position`
    Position,
    /// `update.rotation`
    Rotation,
    /// `events.removedchild`
    RemovedChild,
    /// Consumer-defined topic
    Custom(String),
}

impl Topic {
    /// Wire name of the topic
    pub fn as_str(&self) -> &str {
        match self {
            Self::Position => TOPIC_POSITION,
            Self::Rotation => TOPIC_ROTATION,
            Self::RemovedChild => TOPIC_REMOVED_CHILD,
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        match name {
            TOPIC_POSITION => Self::Position,
            TOPIC_ROTATION => Self::Rotation,
            TOPIC_REMOVED_CHILD => Self::RemovedChild,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by a message
#[derive(Debug, Clone, PartialEq)]
pub enum MessageValue {
    /// No payload
    None,
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Scalar value
    Float(f32),
    /// Free text
    Text(String),
    /// Vector value
    Vector(Vec3),
    /// Rotation value
    Rotation(Quat),
    /// Reference to another entity
    Entity(EntityId),
}

/// A message delivered to one entity's subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The entity's local position changed
    PositionChanged(Vec3),
    /// The entity's local rotation changed
    RotationChanged(Quat),
    /// A dead child was pruned from the entity's child list
    ChildRemoved(EntityId),
    /// Consumer-defined message
    Custom {
        /// Topic name
        topic: String,
        /// Payload
        value: MessageValue,
    },
}

impl Message {
    /// Build a consumer-defined message
    pub fn custom(topic: impl Into<String>, value: MessageValue) -> Self {
        Self::Custom {
            topic: topic.into(),
            value,
        }
    }

    /// Topic this message is delivered on
    pub fn topic(&self) -> Topic {
        match self {
            Self::PositionChanged(_) => Topic::Position,
            Self::RotationChanged(_) => Topic::Rotation,
            Self::ChildRemoved(_) => Topic::RemovedChild,
            Self::Custom { topic, .. } => Topic::from(topic.as_str()),
        }
    }

    /// Payload as an untyped value
    pub fn value(&self) -> MessageValue {
        match self {
            Self::PositionChanged(position) => MessageValue::Vector(*position),
            Self::RotationChanged(rotation) => MessageValue::Rotation(*rotation),
            Self::ChildRemoved(child) => MessageValue::Entity(*child),
            Self::Custom { value, .. } => value.clone(),
        }
    }
}

/// Subscriber callback
///
/// The context is scoped to the entity that owns the bus, so handlers can
/// reach sibling components and the rest of the registry.
pub type Handler = Box<dyn FnMut(&Message, &mut EntityContext<'_>)>;

/// Token for one subscription, used to remove just that handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// A handler together with its token
pub(crate) struct Subscription {
    pub(crate) id: HandlerId,
    pub(crate) handler: Handler,
}

/// Topic to handler mapping owned by a single entity
///
/// During delivery a topic's list is detached from the bus. Removals that
/// target a detached handler are remembered and applied when the list is
/// reattached.
#[derive(Default)]
pub struct MessageBus {
    handlers: HashMap<Topic, Vec<Subscription>>,
    /// Handlers currently detached for delivery, per topic
    in_flight: HashMap<Topic, Vec<HandlerId>>,
    /// Detached handlers removed before they were reattached
    revoked: HashSet<HandlerId>,
    next_id: u64,
}

impl MessageBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for `topic`
    pub fn subscribe(&mut self, topic: Topic, handler: Handler) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers
            .entry(topic)
            .or_default()
            .push(Subscription { id, handler });
        id
    }

    /// Remove one handler; `false` if it is not subscribed to `topic`
    pub fn unsubscribe(&mut self, topic: &Topic, id: HandlerId) -> bool {
        if let Some(list) = self.handlers.get_mut(topic) {
            if let Some(index) = list.iter().position(|s| s.id == id) {
                list.remove(index);
                if list.is_empty() {
                    self.handlers.remove(topic);
                }
                return true;
            }
        }
        self.in_flight.get(topic).is_some_and(|ids| ids.contains(&id)) && self.revoked.insert(id)
    }

    /// Whether any handler listens on `topic`
    pub fn has_subscribers(&self, topic: &Topic) -> bool {
        self.subscriber_count(topic) > 0
    }

    /// Number of handlers registered on `topic`, detached ones included
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        let attached = self.handlers.get(topic).map_or(0, Vec::len);
        let detached = self.in_flight.get(topic).map_or(0, |ids| {
            ids.iter().filter(|id| !self.revoked.contains(id)).count()
        });
        attached + detached
    }

    /// Drop every handler registered on `topic`
    pub fn clear(&mut self, topic: &Topic) -> usize {
        let mut removed = self.handlers.remove(topic).map_or(0, |list| list.len());
        if let Some(ids) = self.in_flight.get(topic) {
            for &id in ids {
                if self.revoked.insert(id) {
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Whether a detached handler was removed during the current delivery
    pub(crate) fn is_revoked(&self, id: HandlerId) -> bool {
        self.revoked.contains(&id)
    }

    /// Detach the handler list for dispatch
    pub(crate) fn take(&mut self, topic: &Topic) -> Option<Vec<Subscription>> {
        let list = self.handlers.remove(topic).filter(|list| !list.is_empty())?;
        self.in_flight
            .entry(topic.clone())
            .or_default()
            .extend(list.iter().map(|s| s.id));
        Some(list)
    }

    /// Reattach a list taken by [`MessageBus::take`]
    ///
    /// Handlers registered while the list was detached go after the taken
    /// ones. Taken handlers removed in the meantime are dropped.
    pub(crate) fn restore(&mut self, topic: Topic, mut taken: Vec<Subscription>) {
        if let Some(ids) = self.in_flight.get_mut(&topic) {
            ids.retain(|id| taken.iter().all(|s| s.id != *id));
            if ids.is_empty() {
                self.in_flight.remove(&topic);
            }
        }
        taken.retain(|s| !self.revoked.remove(&s.id));
        if let Some(added) = self.handlers.remove(&topic) {
            taken.extend(added);
        }
        if !taken.is_empty() {
            self.handlers.insert(topic, taken);
        }
    }
}

impl fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (topic, list) in &self.handlers {
            map.entry(&topic.as_str(), &list.len());
        }
        map.finish()
    }
}
