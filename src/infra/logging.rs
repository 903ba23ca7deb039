use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. `RUST_LOG` wins, then `STANDUP_DEBUG`.
pub fn init_tracing() {
    let default_level = if std::env::var("STANDUP_DEBUG").is_ok() {
        "standup=debug"
    } else {
        "standup=warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
