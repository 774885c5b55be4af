//! Logging setup
//!
//! Thin wrapper over `env_logger`; the default level can be overridden with
//! the usual `RUST_LOG` environment variable.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with the given default level filter.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(default_level: log::LevelFilter) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level.as_str()),
    )
    .try_init();
}
