use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `--debug` wins over `RUST_LOG`, which wins over the `warn` default.
pub(crate) fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("kwhstats=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
