//! Tracing subscriber setup for embedders.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global `tracing` subscriber with env-filter support.
///
/// Reads `RUST_LOG` for the filter, falling back to the given directive.
/// Safe to call more than once: subsequent calls return an error instead
/// of panicking, which callers may ignore.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(default_directive: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent_enough() {
        // First call may or may not win the global slot depending on test
        // ordering; the second call must fail cleanly rather than panic.
        let _ = init("info");
        assert!(init("info").is_err());
    }
}
