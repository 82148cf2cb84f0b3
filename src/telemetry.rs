//! # Logging Setup
//!
//! Every module logs through `tracing`. Applications embedding the client
//! can install their own subscriber; [`init`] is the default one.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,passkey_client=debug";

/// Install a fmt subscriber filtered by `RUST_LOG`
///
/// Default: info level for most crates, debug level for this one.
/// Safe to call more than once; only the first call installs anything.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
