//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Synthex tracing/logging system.
///
/// Reads `SYNTHEX_LOG` for per-module log levels.
/// Format: `SYNTHEX_LOG=synthex_analysis::pooling=debug,synthex_analysis::bias=warn`
///
/// Falls back to `synthex=info` if `SYNTHEX_LOG` is not set or is invalid.
/// Idempotent. The engine never calls this itself; hosts do.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("SYNTHEX_LOG")
            .unwrap_or_else(|_| EnvFilter::new("synthex=info"));

        // A host may already have installed a global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
