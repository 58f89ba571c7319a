//! Observability setup.
//!
//! Structured logging via `tracing`, configured the same way for the demo
//! binary and for ad-hoc debugging in tests: level from `RUST_LOG`, compact
//! format, module paths hidden (the actors tag their own context fields).
//!
//! ```bash
//! RUST_LOG=info cargo run          # workflow storyline
//! RUST_LOG=debug cargo run         # full request/frame payloads
//! RUST_LOG=foodies_core=trace ...  # scope to this crate
//! ```

/// Initialize the global tracing subscriber. Call once per process.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
