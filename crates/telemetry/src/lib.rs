//! Tracing subscriber bootstrap.

use productapp_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides `settings.filter`. Calling this more than once is a
/// no-op, so tests and binaries can both call it freely.
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(false)
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::info!(
            target: "productapp-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }
}
