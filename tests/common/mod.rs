use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a fmt subscriber honoring `RUST_LOG` so test failures come with
/// the crate's structured logs. Safe to call from every test; only the
/// first call installs.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
