//! Public SDK surface for Jarvis.
//!
//! This crate re-exports the building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use jarvis_rs_config as config;
pub use jarvis_rs_core as core;
/// Re-export for convenience.
pub use jarvis_rs_memory as memory;
/// Re-export for convenience.
pub use jarvis_rs_tools as tools;
/// Re-export for convenience.
pub use jarvis_rs_voice as voice;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// Uses millisecond timestamps and honours `RUST_LOG`. Safe to call more
/// than once.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
