//! Behaviors used by the orbit demo

use scene_tree::prelude::*;

/// Spins its entity about the Y axis
pub struct Spinner {
    /// Radians per second
    pub speed: f32,
}

impl Component for Spinner {
    fn name(&self) -> &'static str {
        "Spinner"
    }

    fn update(&mut self, ctx: &mut EntityContext<'_>, time_elapsed: f32) {
        let step = Quat::from_axis_angle(&Vec3::y_axis(), self.speed * time_elapsed);
        let rotation = ctx.rotation() * step;
        ctx.set_rotation(rotation);
    }
}

/// Moves its entity on a circle in the parent's XZ plane
pub struct Orbit {
    pub radius: f32,
    /// Radians per second
    pub speed: f32,
    pub angle: f32,
}

impl Orbit {
    fn offset(&self) -> Vec3 {
        Vec3::new(self.radius * self.angle.cos(), 0.0, self.radius * self.angle.sin())
    }
}

impl Component for Orbit {
    fn name(&self) -> &'static str {
        "Orbit"
    }

    fn init_component(&mut self, ctx: &mut EntityContext<'_>) {
        ctx.set_attribute(Attribute::BoundingRadius(self.radius));
        ctx.set_position(self.offset());
    }

    fn update(&mut self, ctx: &mut EntityContext<'_>, time_elapsed: f32) {
        self.angle = (self.angle + self.speed * time_elapsed) % std::f32::consts::TAU;
        ctx.set_position(self.offset());
    }
}

/// Keeps its entity at a fixed offset from a named target
///
/// Runs in the camera pass, before the target's own update, so it trails
/// the target by one frame.
pub struct CameraFollow {
    pub target_name: &'static str,
    pub offset: Vec3,
    target: Option<EntityId>,
}

impl CameraFollow {
    pub fn new(target_name: &'static str, offset: Vec3) -> Self {
        Self {
            target_name,
            offset,
            target: None,
        }
    }
}

impl Component for CameraFollow {
    fn name(&self) -> &'static str {
        "CameraFollow"
    }

    fn default_pass(&self) -> Pass {
        Pass::CAMERA
    }

    fn init_entity(&mut self, ctx: &mut EntityContext<'_>) {
        self.target = ctx.find_entity(self.target_name);
        if self.target.is_none() {
            log::warn!("Camera target '{}' not found", self.target_name);
        }
    }

    fn update(&mut self, ctx: &mut EntityContext<'_>, _time_elapsed: f32) {
        let Some(target) = self.target else {
            return;
        };
        match ctx.registry().world_position(target) {
            Some(position) => ctx.set_position(position + self.offset),
            None => {
                log::info!("Camera target '{}' is gone", self.target_name);
                self.target = None;
            }
        }
    }
}

/// Marks its entity dead once its time runs out
pub struct Lifetime {
    pub remaining: f32,
}

impl Component for Lifetime {
    fn name(&self) -> &'static str {
        "Lifetime"
    }

    fn default_pass(&self) -> Pass {
        Pass::UPDATE
    }

    fn update(&mut self, ctx: &mut EntityContext<'_>, time_elapsed: f32) {
        self.remaining -= time_elapsed;
        if self.remaining <= 0.0 {
            log::info!("'{}' expired", ctx.entity_name().unwrap_or_default());
            ctx.set_dead();
        }
    }
}
