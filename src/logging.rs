use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides `default_filter`;
/// `verbose` forces debug.
pub fn init_logging(default_filter: &str, verbose: bool) {
    let fallback = if verbose { "debug" } else { default_filter };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .with_target(true)
        .compact()
        .try_init();
}
