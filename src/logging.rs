use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "supplier_sync=info";

/// Install a fmt subscriber honoring `RUST_LOG`.
/// Safe to call more than once; an already installed subscriber is left in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
