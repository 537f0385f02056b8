use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the stderr subscriber. Later calls are no-ops.
/// An unparsable filter falls back to `airmobility=info`.
pub fn init_tracing(filter: &str) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("airmobility=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}
