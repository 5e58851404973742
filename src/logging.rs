//! Diagnostic logging on stderr.

use tracing_subscriber::{EnvFilter, fmt};

pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install the global subscriber, honouring `RUST_LOG` (default `info`).
///
/// Fails when a global subscriber is already set. Callers cannot log that
/// failure through `tracing`, since no subscriber of theirs is listening.
pub fn init_tracing(json: bool) -> Result<(), InitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}
