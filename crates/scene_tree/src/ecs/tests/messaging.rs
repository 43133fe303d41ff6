//! Entity-scoped message delivery

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;

use super::boxed;
use crate::ecs::{Component, EntityContext, EntityRegistry};
use crate::events::{Message, MessageValue, Topic};
use crate::foundation::math::{Quat, Vec3};

#[test]
fn test_position_message_reaches_own_handlers_only() {
    let mut registry = EntityRegistry::default();
    let parent = registry.spawn(Some("parent"), None, Vec::new()).unwrap();
    let e = registry.spawn(Some("e"), Some(parent), Vec::new()).unwrap();

    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    registry.register_handler(e, "update.position", move |message, _| {
        if let Message::PositionChanged(p) = message {
            sink.borrow_mut().push(*p);
        }
    });
    let parent_calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&parent_calls);
    registry.register_handler(parent, Topic::Position, move |_, _| {
        *counter.borrow_mut() += 1;
    });

    let p = Vec3::new(1.0, 2.0, 3.0);
    registry.set_position(e, p);
    registry.broadcast(e, &Message::PositionChanged(Vec3::zeros()));

    assert_eq!(*received.borrow(), vec![p, Vec3::zeros()]);
    assert_eq!(*parent_calls.borrow(), 0);
}

#[test]
fn test_rotation_message_carries_new_value() {
    let mut registry = EntityRegistry::default();
    let e = registry.spawn(None, None, Vec::new()).unwrap();
    let last = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&last);
    registry.register_handler(e, Topic::Rotation, move |message, _| {
        *sink.borrow_mut() = Some(message.value());
    });

    let q = Quat::from_axis_angle(&Vec3::x_axis(), 0.5);
    registry.set_rotation(e, q);
    let payload = last.borrow().clone();
    match payload {
        Some(MessageValue::Rotation(r)) => assert_relative_eq!(r.angle(), 0.5, epsilon = 1e-6),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_handlers_run_in_registration_order() {
    let mut registry = EntityRegistry::default();
    let e = registry.spawn(None, None, Vec::new()).unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        let sink = Rc::clone(&order);
        registry.register_handler(e, "ping", move |_, _| sink.borrow_mut().push(tag));
    }

    registry.broadcast(e, &Message::custom("ping", MessageValue::None));
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_unregistered_topic_is_ignored() {
    let mut registry = EntityRegistry::default();
    let e = registry.spawn(None, None, Vec::new()).unwrap();
    registry.broadcast(e, &Message::custom("nobody.listens", MessageValue::Int(1)));
    assert_eq!(registry.unregister_handlers(e, "nobody.listens"), 0);
}

#[test]
fn test_unregister_stops_delivery() {
    let mut registry = EntityRegistry::default();
    let e = registry.spawn(None, None, Vec::new()).unwrap();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    registry.register_handler(e, "tick", move |_, _| *counter.borrow_mut() += 1);

    registry.broadcast(e, &Message::custom("tick", MessageValue::None));
    assert_eq!(registry.unregister_handlers(e, "tick"), 1);
    registry.broadcast(e, &Message::custom("tick", MessageValue::None));
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_handler_registered_during_delivery_runs_next_time() {
    let mut registry = EntityRegistry::default();
    let e = registry.spawn(None, None, Vec::new()).unwrap();
    let calls = Rc::new(RefCell::new(Vec::new()));

    let outer = Rc::clone(&calls);
    registry.register_handler(e, "grow", move |_, ctx| {
        outer.borrow_mut().push("outer");
        let inner = Rc::clone(&outer);
        ctx.register_handler("grow", move |_, _| inner.borrow_mut().push("inner"));
    });

    registry.broadcast(e, &Message::custom("grow", MessageValue::None));
    assert_eq!(*calls.borrow(), vec!["outer"]);

    registry.broadcast(e, &Message::custom("grow", MessageValue::None));
    assert_eq!(*calls.borrow(), vec!["outer", "outer", "inner"]);
}

/// Counts hits delivered through the bus
struct Shield {
    hits: u32,
}

impl Component for Shield {
    fn name(&self) -> &'static str {
        "Shield"
    }

    fn init_entity(&mut self, ctx: &mut EntityContext<'_>) {
        ctx.register_handler("combat.hit", |message, ctx| {
            let damage = match message.value() {
                MessageValue::Int(damage) => damage,
                _ => 1,
            };
            if let Some(shield) = ctx.component_mut::<Shield>() {
                shield.hits += u32::try_from(damage).unwrap_or(0);
            }
            if ctx.component::<Shield>().is_some_and(|s| s.hits >= 5) {
                ctx.set_dead();
            }
        });
    }
}

#[test]
fn test_handler_mutates_owning_component() {
    let mut registry = EntityRegistry::default();
    let ship = registry
        .spawn(Some("ship"), None, vec![boxed(Shield { hits: 0 })])
        .unwrap();

    registry.broadcast(ship, &Message::custom("combat.hit", MessageValue::Int(2)));
    registry.broadcast(ship, &Message::custom("combat.hit", MessageValue::None));
    assert_eq!(registry.component::<Shield>(ship).unwrap().hits, 3);
    assert!(!registry.is_dead(ship));

    registry.broadcast(ship, &Message::custom("combat.hit", MessageValue::Int(2)));
    assert!(registry.is_dead(ship));

    // Dead entities ignore further messages
    registry.broadcast(ship, &Message::custom("combat.hit", MessageValue::Int(2)));
    assert_eq!(registry.component::<Shield>(ship).unwrap().hits, 5);
}

/// Re-publishes position changes from its entity under a custom topic
struct Relay;

impl Component for Relay {
    fn name(&self) -> &'static str {
        "Relay"
    }

    fn init_entity(&mut self, ctx: &mut EntityContext<'_>) {
        ctx.register_handler(Topic::Position, |message, ctx| {
            if let Message::PositionChanged(p) = message {
                ctx.broadcast(&Message::custom("relay.moved", MessageValue::Float(p.norm())));
            }
        });
    }
}

#[test]
fn test_handler_can_broadcast_other_topics() {
    let mut registry = EntityRegistry::default();
    let e = registry.spawn(None, None, vec![boxed(Relay)]).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    registry.register_handler(e, "relay.moved", move |message, _| {
        sink.borrow_mut().push(message.value());
    });

    registry.set_position(e, Vec3::new(3.0, 4.0, 0.0));
    assert_eq!(*seen.borrow(), vec![MessageValue::Float(5.0)]);
}

#[test]
fn test_handler_clearing_its_topic_runs_once() {
    let mut registry = EntityRegistry::default();
    let e = registry.spawn(None, None, Vec::new()).unwrap();
    let calls = Rc::new(RefCell::new(0));
    let removed = Rc::new(RefCell::new(None));

    let counter = Rc::clone(&calls);
    let report = Rc::clone(&removed);
    registry.register_handler(e, "once", move |_, ctx| {
        *counter.borrow_mut() += 1;
        *report.borrow_mut() = Some(ctx.unregister_handlers("once"));
    });

    registry.broadcast(e, &Message::custom("once", MessageValue::None));
    registry.broadcast(e, &Message::custom("once", MessageValue::None));

    assert_eq!(*calls.borrow(), 1);
    assert_eq!(*removed.borrow(), Some(1));
    assert_eq!(registry.unregister_handlers(e, "once"), 0);
}

#[test]
fn test_unregister_single_handler() {
    let mut registry = EntityRegistry::default();
    let e = registry.spawn(None, None, Vec::new()).unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&order);
    let first = registry
        .register_handler(e, "ping", move |_, _| sink.borrow_mut().push("first"))
        .unwrap();
    let sink = Rc::clone(&order);
    registry.register_handler(e, "ping", move |_, _| sink.borrow_mut().push("second"));

    assert!(registry.unregister_handler(e, "ping", first));
    assert!(!registry.unregister_handler(e, "ping", first));
    assert!(!registry.unregister_handler(e, "pong", first));

    registry.broadcast(e, &Message::custom("ping", MessageValue::None));
    assert_eq!(*order.borrow(), vec!["second"]);
}

#[test]
fn test_handler_removed_mid_delivery_is_skipped() {
    let mut registry = EntityRegistry::default();
    let e = registry.spawn(None, None, Vec::new()).unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));
    let victim = Rc::new(RefCell::new(None));

    let sink = Rc::clone(&order);
    let target = Rc::clone(&victim);
    registry.register_handler(e, "ping", move |_, ctx| {
        sink.borrow_mut().push("first");
        let pending = target.borrow_mut().take();
        if let Some(id) = pending {
            assert!(ctx.unregister_handler("ping", id));
        }
    });
    let sink = Rc::clone(&order);
    let second = registry.register_handler(e, "ping", move |_, _| sink.borrow_mut().push("second"));
    *victim.borrow_mut() = second;

    registry.broadcast(e, &Message::custom("ping", MessageValue::None));
    registry.broadcast(e, &Message::custom("ping", MessageValue::None));
    assert_eq!(*order.borrow(), vec!["first", "first"]);
}

#[test]
fn test_register_on_stale_entity_returns_none() {
    let mut registry = EntityRegistry::default();
    let e = registry.spawn(None, None, Vec::new()).unwrap();
    registry.destroy(e).unwrap();
    assert!(registry.register_handler(e, "ping", |_, _| {}).is_none());
}
