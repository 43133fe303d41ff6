//! Integration tests for the entity tree
//!
//! Shared probes live here; each submodule covers one area.

mod messaging;

use std::cell::RefCell;
use std::rc::Rc;

use crate::ecs::{Component, EntityContext, Pass};

/// Shared call journal
pub(crate) type Journal = Rc<RefCell<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Component that writes every hook call to a journal
pub(crate) struct Probe {
    pub(crate) name: &'static str,
    pub(crate) pass: Pass,
    pub(crate) journal: Journal,
    pub(crate) updates: u32,
}

impl Probe {
    pub(crate) fn new(name: &'static str, journal: &Journal) -> Self {
        Self::with_pass(name, Pass::UPDATE, journal)
    }

    pub(crate) fn with_pass(name: &'static str, pass: Pass, journal: &Journal) -> Self {
        Self {
            name,
            pass,
            journal: Rc::clone(journal),
            updates: 0,
        }
    }

    fn record(&self, ctx: &EntityContext<'_>, hook: &str) {
        let entity = ctx.entity_name().unwrap_or("?").to_string();
        self.journal
            .borrow_mut()
            .push(format!("{hook}:{entity}:{}", self.name));
    }
}

impl Component for Probe {
    fn name(&self) -> &'static str {
        self.name
    }

    fn default_pass(&self) -> Pass {
        self.pass
    }

    fn init_component(&mut self, ctx: &mut EntityContext<'_>) {
        self.record(ctx, "init_component");
    }

    fn init_entity(&mut self, ctx: &mut EntityContext<'_>) {
        self.record(ctx, "init_entity");
    }

    fn update(&mut self, ctx: &mut EntityContext<'_>, _time_elapsed: f32) {
        self.updates += 1;
        self.record(ctx, "update");
    }

    fn destroy(&mut self) {
        self.journal.borrow_mut().push(format!("destroy:{}", self.name));
    }
}

pub(crate) fn boxed<C: Component>(component: C) -> Box<dyn Component> {
    Box::new(component)
}

/// Drain the journal, keeping only entries that start with `prefix`
pub(crate) fn take_entries(journal: &Journal, prefix: &str) -> Vec<String> {
    journal
        .borrow_mut()
        .drain(..)
        .filter(|entry| entry.starts_with(prefix))
        .collect()
}
