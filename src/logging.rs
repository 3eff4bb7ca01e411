use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Default log filter for the requested verbosity.
pub fn default_directive(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}

/// Install the global subscriber.
///
/// Lines look like `INFO message` on stderr, leaving stdout to the playbook
/// output. `RUST_LOG`, when set, takes precedence over `debug`.
pub fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .init();
}
