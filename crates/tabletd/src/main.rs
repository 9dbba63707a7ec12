//! tabletd daemon entry point.
//!
//! Wires together the device transport, plugin registry, settings storage,
//! and the daemon facade, then waits for a shutdown signal.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ DriverDaemon::new()       -- facade over driver + registry + taps
//!  └─ import StandardPlugins    -- built-in modes and filters
//!  └─ detect_tablets()          -- walk descriptor configs, bind hardware
//!  └─ load + apply settings     -- persisted snapshot, if one exists
//!  └─ ctrl_c().await            -- run until shutdown
//! ```
//!
//! # Platform backends
//!
//! The transports used here are placeholders: [`NullDeviceProvider`] never
//! finds hardware, and the pointer/injector sinks log instead of moving the
//! OS cursor.  In a production build they are replaced by a HID transport
//! and per-platform pointer backends.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tabletd::application::daemon::DriverDaemon;
use tabletd::application::driver::Driver;
use tabletd::infrastructure::debug_tap::FileChannelFactory;
use tabletd::infrastructure::device::NullDeviceProvider;
use tabletd::infrastructure::pointer::{TracingInjector, TracingPointer};
use tabletd::infrastructure::storage::descriptors::FileDescriptorSource;
use tabletd::infrastructure::storage::settings;
use tablet_plugins::StandardPlugins;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("tabletd starting");

    let config_dir = settings::config_dir()?;

    // ── Daemon assembly ───────────────────────────────────────────────────
    let driver = Driver::new(
        Box::new(NullDeviceProvider),
        Box::new(TracingPointer),
        Box::new(TracingInjector),
    );
    let daemon = DriverDaemon::new(
        driver,
        Box::new(FileDescriptorSource::new(config_dir.join("descriptors"))),
        Box::new(FileChannelFactory::new(config_dir.join("taps"))),
    );

    daemon.import_plugin(&StandardPlugins).await;

    // ── Tablet detection ──────────────────────────────────────────────────
    match daemon.detect_tablets().await {
        Some(descriptor) => info!(tablet = descriptor.name.as_str(), "tablet bound"),
        None => info!("no tablet detected; running idle"),
    }

    // ── Persisted settings ────────────────────────────────────────────────
    match settings::load_settings() {
        Ok(Some(stored)) => daemon.set_settings(stored).await,
        Ok(None) => info!("no settings file; nothing applied"),
        Err(e) => warn!(error = %e, "settings file unusable, continuing unconfigured"),
    }

    // ── Run until shutdown ────────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    if let Some(applied) = daemon.settings().await {
        if let Err(e) = settings::save_settings(&applied) {
            warn!(error = %e, "could not persist settings on shutdown");
        }
    }
    daemon.shutdown().await;

    info!("tabletd stopped");
    Ok(())
}
