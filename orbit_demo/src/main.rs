//! Orbit demo
//!
//! Builds a small solar system in the global registry and steps it at a
//! fixed rate, logging where everything ends up:
//!
//! ```text
//! root
//! ├── sun      (Spinner)
//! │   └── planet   (Orbit, Spinner)
//! │       └── moon     (Orbit)
//! ├── comet    (Orbit, Lifetime)
//! └── camera   (CameraFollow, camera pass)
//! ```
//!
//! Usage: `orbit_demo [runtime.toml|runtime.ron]`

mod components;

use scene_tree::foundation::logging;
use scene_tree::prelude::*;
use thiserror::Error;

use components::{CameraFollow, Lifetime, Orbit, Spinner};

const FRAMES: u32 = 180;
const TIME_STEP: f32 = 1.0 / 60.0;
const REPORT_EVERY: u32 = 60;
const COMET_LIFETIME: f32 = 1.5;

#[derive(Error, Debug)]
enum DemoError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("scene: {0}")]
    Scene(#[from] SceneError),
}

fn main() {
    if let Err(e) = run() {
        log::error!("Orbit demo failed: {}", e);
        eprintln!("orbit_demo: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => RuntimeConfig::load_from_file(&path)?,
        None => RuntimeConfig::default(),
    };
    logging::init_with_filter(&config.log_filter);
    log::info!("Starting orbit demo with root '{}'", config.root_name);

    global::init(config)?;
    global::with_instance(build_scene)??;

    for frame in 1..=FRAMES {
        let stats = global::with_instance(|registry| registry.update(TIME_STEP))?;
        log::trace!("Frame {}: {:?}", frame, stats);
        if frame % REPORT_EVERY == 0 {
            log::info!(
                "Frame {}: visited {} node(s), {} component update(s)",
                frame,
                stats.visited,
                stats.component_updates
            );
            global::with_instance(report)?;
        }
    }

    let remaining = global::with_instance(|registry| registry.entity_count())?;
    log::info!("Orbit demo finished with {} entit(ies)", remaining);
    Ok(())
}

fn boxed<C: Component>(component: C) -> Box<dyn Component> {
    Box::new(component)
}

fn build_scene(registry: &mut EntityRegistry) -> SceneResult<()> {
    let root = registry.root();
    registry.register_handler(root, Topic::RemovedChild, |message, ctx| {
        if let Message::ChildRemoved(child) = message {
            let name = ctx.registry().name(*child).unwrap_or("<destroyed>").to_string();
            log::info!("Removed '{}' from the scene", name);
        }
    });

    let sun = registry.spawn(Some("sun"), None, vec![boxed(Spinner { speed: 0.25 })])?;
    let planet = registry.spawn(
        Some("planet"),
        Some(sun),
        vec![
            boxed(Orbit {
                radius: 10.0,
                speed: 1.0,
                angle: 0.0,
            }),
            boxed(Spinner { speed: 2.0 }),
        ],
    )?;
    registry.set_attribute(planet, Attribute::Label("home".to_string()));
    registry.spawn(
        Some("moon"),
        Some(planet),
        vec![boxed(Orbit {
            radius: 2.0,
            speed: 4.0,
            angle: 0.0,
        })],
    )?;

    registry.spawn(
        Some("comet"),
        None,
        vec![
            boxed(Orbit {
                radius: 25.0,
                speed: 0.3,
                angle: 1.0,
            }),
            boxed(Lifetime {
                remaining: COMET_LIFETIME,
            }),
        ],
    )?;

    registry.spawn(
        Some("camera"),
        None,
        vec![boxed(CameraFollow::new("planet", Vec3::new(0.0, 5.0, -15.0)))],
    )?;

    log::info!("Scene built with {} entit(ies)", registry.entity_count());
    Ok(())
}

fn report(registry: &mut EntityRegistry) {
    for name in ["sun", "planet", "moon", "comet", "camera"] {
        let Some(id) = registry.get(name) else {
            continue;
        };
        if registry.is_dead(id) {
            log::info!("  {:<7} dead", name);
            continue;
        }
        if let Some(p) = registry.world_position(id) {
            log::info!("  {:<7} ({:>7.2}, {:>7.2}, {:>7.2})", name, p.x, p.y, p.z);
        }
    }
}
