//! Shared test setup.

/// Install a tracing subscriber for tests.
///
/// Honours `RUST_LOG`, defaulting to `triplestar=debug`. Safe to call from
/// every test: only the first call installs anything.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triplestar=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
