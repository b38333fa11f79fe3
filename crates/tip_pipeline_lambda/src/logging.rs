use tracing_subscriber::EnvFilter;

/// Installs the JSON event formatter used by both Lambda binaries.
///
/// Level defaults to `info` and can be overridden through `RUST_LOG`.
/// Timestamps are left to the Lambda log sink.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init();
}
