//! Public surface for Confab.
//!
//! This crate re-exports the building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use confab_config as config;
/// Re-export for convenience.
pub use confab_memory as memory;
/// Re-export for convenience.
pub use confab_server as server;

#[inline]
/// Initialize logging using env_logger.
///
/// Binaries are expected to call this early in startup so log output is
/// wired up before the first storage operation.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
