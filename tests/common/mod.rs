//! Shared integration-test setup: a once-per-process tracing subscriber,
//! grounded in the teacher's `services/forwarder`/`services/streamer`
//! `main.rs` pattern (`fmt()` + `EnvFilter` defaulting to `"info"`).

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
