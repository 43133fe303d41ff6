//! Process-wide registry for the outermost composition root
//!
//! Library code should take an [`EntityRegistry`] explicitly. Hosts that
//! want a single global scene can create it here once and reach it through
//! [`with_instance`]. The instance is thread-local: the runtime is
//! single-threaded and its components are not `Send`.

use std::cell::RefCell;

use super::{EntityRegistry, SceneError, SceneResult};
use crate::config::RuntimeConfig;

thread_local! {
    static INSTANCE: RefCell<Option<EntityRegistry>> = RefCell::new(None);
}

/// Create the global registry, replacing any previous one
pub fn init(config: RuntimeConfig) -> SceneResult<()> {
    INSTANCE.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| SceneError::RegistryBusy)?;
        if slot.is_some() {
            log::warn!("Replacing the global entity registry");
        }
        *slot = Some(EntityRegistry::new(config));
        Ok(())
    })
}

/// Whether [`init`] has run on this thread
pub fn is_initialized() -> bool {
    INSTANCE.with(|cell| cell.try_borrow().map_or(true, |slot| slot.is_some()))
}

/// Run `f` against the global registry
///
/// Fails when the registry was never created or when called from inside
/// another `with_instance` closure; hooks and handlers already hold an
/// [`EntityContext`](super::EntityContext) for that.
pub fn with_instance<R>(f: impl FnOnce(&mut EntityRegistry) -> R) -> SceneResult<R> {
    INSTANCE.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| SceneError::RegistryBusy)?;
        let registry = slot.as_mut().ok_or(SceneError::RegistryNotInitialized)?;
        Ok(f(registry))
    })
}
