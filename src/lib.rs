pub mod config;
pub mod fetch;
pub mod html;
pub mod identifier;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod verify;

/// Install the fmt subscriber, `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}
