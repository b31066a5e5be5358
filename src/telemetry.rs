#[cfg(feature = "telemetry")]
use std::sync::OnceLock;

#[cfg(feature = "telemetry")]
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize tracing subscriber once per process.
#[cfg(feature = "telemetry")]
pub fn init_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();

    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ast2dot=info"));
        let _ = fmt().with_env_filter(filter).try_init();
    });
}

#[cfg(not(feature = "telemetry"))]
pub fn init_tracing() {}

/// Instrument an inline block with a span if telemetry is enabled.
#[macro_export]
macro_rules! instrument_block {
    ($name:expr, $block:block) => {{
        #[cfg(feature = "telemetry")]
        let _span_guard = tracing::info_span!("ast2dot", phase = $name).entered();
        (|| $block)()
    }};
}

/// Emit a debug-level event if telemetry is enabled.
#[macro_export]
macro_rules! debug_event {
    ($($arg:tt)*) => {{
        #[cfg(feature = "telemetry")]
        tracing::debug!($($arg)*);
    }};
}
