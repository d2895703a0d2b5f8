use tracing_subscriber::EnvFilter;

/// Install a formatted `tracing` subscriber for the host process.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (e.g.
/// `"scrollnudge_core=debug"`) is used. Returns `false` if a global
/// subscriber was already installed, which is harmless.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
