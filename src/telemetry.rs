//! `tracing` subscriber bootstrap for the demo binary.
//!
//! The library itself never installs a global subscriber — only a binary
//! gets to do that — so this module is a thin helper the CLI calls once at
//! startup, the same shape as the teacher's own `tracing-subscriber` dev
//! usage.

use tracing_subscriber::EnvFilter;

/// Install a `tracing_subscriber::fmt` subscriber honoring `RUST_LOG`,
/// defaulting to `info` when unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
