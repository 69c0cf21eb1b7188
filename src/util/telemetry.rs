//! Telemetry helpers for structured logging and tracing.

/// Load environment variables from a local `.env` file, if present.
///
/// Missing files are not an error; deployments without dotenv simply rely on
/// the process environment.
pub fn init_env() {
    let _ = dotenvy::dotenv();
}

/// Initialize tracing/telemetry. Users can install their own subscriber; this
/// helper installs a default env-based subscriber if none is set.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
