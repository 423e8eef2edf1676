// Path: crates/telemetry/src/init.rs
use dagsel_types::config::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Initializes the global `tracing` subscriber.
///
/// Events go to stderr so that stdout stays reserved for command output.
/// The filter comes from `RUST_LOG` and defaults to `info`. Records from the
/// `log` facade are bridged in as well.
pub fn init_tracing(format: LogFormat) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = Registry::default().with(filter);
    tracing_log::LogTracer::init()?;
    match format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339());
            tracing::subscriber::set_global_default(registry.with(fmt_layer))?;
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339());
            tracing::subscriber::set_global_default(registry.with(fmt_layer))?;
        }
    }
    Ok(())
}
