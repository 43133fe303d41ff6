//! Component trait and attachment slots
//!
//! A component is a unit of behavior owned by exactly one entity. The entity
//! drives its lifecycle:
//!
//! 1. [`Component::init_component`] runs inside `add_component`, before the
//!    entity is registered. Sibling components may not exist yet.
//! 2. [`Component::init_entity`] runs once when the entity is initialized,
//!    after every component has been attached. Sibling and registry lookups
//!    are safe from here on.
//! 3. [`Component::update`] runs once per matching pass per frame.
//! 4. [`Component::destroy`] runs when the entity is destroyed.
//!
//! No hook is retried or rolled back.

use std::any::Any;

use super::{EntityContext, Pass};

/// Upcast helper so trait objects can be downcast to their concrete type
pub trait AsAny: Any {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrow as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior attached to an entity
pub trait Component: AsAny {
    /// Type-level name, the lookup key on the owning entity
    ///
    /// Must be non-empty; attaching a component with an empty name panics.
    fn name(&self) -> &'static str;

    /// Stage mask used when the component is attached
    fn default_pass(&self) -> Pass {
        Pass::UPDATE
    }

    /// Called while the component is being attached
    fn init_component(&mut self, _ctx: &mut EntityContext<'_>) {}

    /// Called once when the owning entity is initialized
    fn init_entity(&mut self, _ctx: &mut EntityContext<'_>) {}

    /// Called once per matching pass per frame
    fn update(&mut self, _ctx: &mut EntityContext<'_>, _time_elapsed: f32) {}

    /// Release held resources; the owner is being destroyed
    fn destroy(&mut self) {}
}

/// A component together with its per-attachment state
pub(crate) struct ComponentSlot {
    pub(crate) name: &'static str,
    pub(crate) pass: Pass,
    /// `None` while the component is lent out to one of its own hooks
    pub(crate) component: Option<Box<dyn Component>>,
}

impl ComponentSlot {
    pub(crate) fn new(component: Box<dyn Component>) -> Self {
        let name = component.name();
        assert!(!name.is_empty(), "component attached without a name");
        Self {
            name,
            pass: component.default_pass(),
            component: Some(component),
        }
    }

    pub(crate) fn get<T: Component>(&self) -> Option<&T> {
        self.component.as_deref()?.as_any().downcast_ref::<T>()
    }

    pub(crate) fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.component.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }
}

impl std::fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentSlot")
            .field("name", &self.name)
            .field("pass", &self.pass)
            .field("lent", &self.component.is_none())
            .finish()
    }
}
