use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber for embedders that do not bring
/// their own. Honors `RUST_LOG`; safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .try_init();
}
