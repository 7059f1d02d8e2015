// ABOUTME: Tracing subscriber setup for hosts embedding beanpole.
// ABOUTME: RUST_LOG overrides the verbosity-based default filter.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber: `debug` when verbose, `warn` otherwise.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
