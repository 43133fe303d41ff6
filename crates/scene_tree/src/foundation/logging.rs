//! Logging utilities
//!
//! The runtime logs through the `log` facade; hosts pick the backend. These
//! helpers install `env_logger`, honouring `RUST_LOG` when it is set.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    let _ = env_logger::try_init();
}

/// Initialize the logging system with a fallback filter
///
/// `RUST_LOG` still wins when present. Calling this twice is harmless.
pub fn init_with_filter(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
