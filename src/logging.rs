//! Log setup for the binary.
//!
//! Events go to stderr so stdout only ever carries the hash.

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LEVEL_ENV: &str = "BCRYPT_LOG";
const ALT_LEVEL_ENV: &str = "RUST_LOG";
const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber. Fails if one is already installed.
pub fn init() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .map_err(io::Error::other)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LEVEL_ENV)
        .or_else(|_| EnvFilter::try_from_env(ALT_LEVEL_ENV))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}
