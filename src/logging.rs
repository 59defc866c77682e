//! Logging setup for the CLI and a tiny debug helper for library users.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the binary (see [`init`]).

use std::fmt::Debug;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Target used by [`log_value`].
pub const DEBUG_TARGET: &str = "dav-log";

/// Map a `-v` count to a default level.
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level comes from the
/// verbosity count. Calling this twice is harmless, the second install
/// is ignored.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose).as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

/// Dump any value at error level under the [`DEBUG_TARGET`] target.
pub fn log_value<T: Debug + ?Sized>(value: &T) {
    tracing::error!(target: DEBUG_TARGET, "{:?}", value);
}
