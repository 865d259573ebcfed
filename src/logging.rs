// src/logging.rs

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init(default_filter: &str) {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
}

/// Subscriber for `cargo test` output. Safe to call from every test.
pub fn try_init_for_tests(filter: &str) {
    let _ = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_test_init_is_harmless() {
        try_init_for_tests("debug");
        try_init_for_tests("info");
        tracing::debug!("still logging");
    }
}
