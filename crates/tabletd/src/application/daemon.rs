//! The daemon facade: the serialized surface every consumer calls into.
//!
//! [`DriverDaemon`] is shared as `Arc<DriverDaemon>` between the binary's
//! async tasks.  All fields are `Mutex<...>` (async Tokio mutex) because
//! the surface runs in an async Tokio context and the mutex suspends the
//! calling task instead of blocking the thread while another operation is
//! in flight.
//!
//! Operations acquire locks in a fixed order — driver, then taps, then
//! channel factory — so two concurrent facade calls can never deadlock.

use std::sync::Arc;

use tablet_core::{
    Capability, ImportOutcome, PluginModule, PluginRegistry, Settings, TabletDescriptor,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::apply_settings::apply_settings;
use super::driver::{Driver, DriverError};
use crate::infrastructure::debug_tap::{
    ChannelError, DebugTap, DiagnosticChannelFactory, TapStream,
};
use crate::infrastructure::storage::descriptors::DescriptorSource;

/// Error type for daemon surface operations.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("no tablet is attached")]
    NoTablet,
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

struct Taps {
    tablet: DebugTap,
    aux: DebugTap,
}

impl Taps {
    fn for_stream(&mut self, stream: TapStream) -> &mut DebugTap {
        match stream {
            TapStream::Tablet => &mut self.tablet,
            TapStream::Aux => &mut self.aux,
        }
    }
}

/// Daemon state shared between async tasks via `Arc<DriverDaemon>`.
pub struct DriverDaemon {
    driver: Mutex<Driver>,
    registry: Mutex<PluginRegistry>,
    settings: Mutex<Option<Settings>>,
    taps: Mutex<Taps>,
    channel_factory: Mutex<Box<dyn DiagnosticChannelFactory>>,
    descriptor_source: Mutex<Box<dyn DescriptorSource>>,
}

impl DriverDaemon {
    pub fn new(
        driver: Driver,
        descriptor_source: Box<dyn DescriptorSource>,
        channel_factory: Box<dyn DiagnosticChannelFactory>,
    ) -> Arc<Self> {
        Arc::new(Self {
            driver: Mutex::new(driver),
            registry: Mutex::new(PluginRegistry::new()),
            settings: Mutex::new(None),
            taps: Mutex::new(Taps {
                tablet: DebugTap::new(TapStream::Tablet),
                aux: DebugTap::new(TapStream::Aux),
            }),
            channel_factory: Mutex::new(channel_factory),
            descriptor_source: Mutex::new(descriptor_source),
        })
    }

    // ── Plugins ───────────────────────────────────────────────────────────

    /// Imports one plugin module.  Idempotent by module identity.
    pub async fn import_plugin(&self, module: &dyn PluginModule) -> ImportOutcome {
        self.registry.lock().await.import(module)
    }

    /// Imports several plugin modules in order.
    pub async fn import_plugins(&self, modules: &[&dyn PluginModule]) {
        let mut registry = self.registry.lock().await;
        for module in modules {
            registry.import(*module);
        }
    }

    /// Lists the registered implementations of `capability`, sorted.
    pub async fn list_implementations(&self, capability: Capability) -> Vec<String> {
        self.registry.lock().await.list_implementations(capability)
    }

    // ── Tablet lifecycle ──────────────────────────────────────────────────

    /// Binds the given tablet model, replacing any current binding, and
    /// reapplies the stored settings to the fresh pipeline.
    pub async fn set_tablet(&self, descriptor: TabletDescriptor) -> Result<(), DaemonError> {
        let mut driver = self.driver.lock().await;
        self.detach_all_taps(&driver).await;
        driver.open(descriptor)?;
        self.reapply_settings(&driver).await;
        Ok(())
    }

    /// The currently bound tablet model, if any.
    pub async fn tablet(&self) -> Option<TabletDescriptor> {
        self.driver.lock().await.descriptor().cloned()
    }

    /// Walks the descriptor source and binds the first attached model.
    ///
    /// Running detection again is safe: the current binding is released
    /// before the walk, and stored settings are reapplied on success.
    pub async fn detect_tablets(&self) -> Option<TabletDescriptor> {
        let mut driver = self.driver.lock().await;
        self.detach_all_taps(&driver).await;
        let detected = {
            let source = self.descriptor_source.lock().await;
            driver.detect(source.as_ref())
        };
        if detected.is_some() {
            self.reapply_settings(&driver).await;
        }
        detected
    }

    // ── Settings ──────────────────────────────────────────────────────────

    /// Applies and stores a complete settings snapshot.  Application is
    /// best-effort: unresolvable plugin names degrade with a warning, but
    /// the snapshot is stored either way and reapplied on the next bind.
    pub async fn set_settings(&self, settings: Settings) {
        let driver = self.driver.lock().await;
        let registry = self.registry.lock().await;
        apply_settings(&driver, &registry, &settings);
        *self.settings.lock().await = Some(settings);
    }

    /// The last successfully applied settings snapshot.
    pub async fn settings(&self) -> Option<Settings> {
        self.settings.lock().await.clone()
    }

    /// Replaces the current configuration with defaults.
    pub async fn reset_settings(&self) {
        info!("resetting settings to defaults");
        self.set_settings(Settings::default()).await;
    }

    // ── Input hook ────────────────────────────────────────────────────────

    /// Gates binding dispatch process-wide.
    pub async fn set_input_hook_enabled(&self, enabled: bool) {
        self.driver.lock().await.set_binding_enabled(enabled);
    }

    pub async fn input_hook_enabled(&self) -> bool {
        self.driver.lock().await.binding_enabled()
    }

    // ── Diagnostic taps ───────────────────────────────────────────────────

    /// Attaches or detaches the diagnostic tap on one endpoint stream.
    ///
    /// Idempotent: the returned flag is `true` when the call changed the
    /// tap state.  Enabling the aux tap on a tablet without an aux stream
    /// leaves the tap detached.
    pub async fn set_debug_tap_enabled(
        &self,
        stream: TapStream,
        enabled: bool,
    ) -> Result<bool, DaemonError> {
        let driver = self.driver.lock().await;
        let reader = match stream {
            TapStream::Tablet => driver.tablet_reader().ok_or(DaemonError::NoTablet)?,
            TapStream::Aux => {
                if driver.descriptor().is_none() {
                    return Err(DaemonError::NoTablet);
                }
                match driver.aux_reader() {
                    Some(reader) => reader,
                    None => {
                        warn!("tablet has no auxiliary stream, aux tap stays detached");
                        return Ok(false);
                    }
                }
            }
        };

        let mut taps = self.taps.lock().await;
        let tap = taps.for_stream(stream);
        if enabled {
            if tap.is_attached() {
                return Ok(false);
            }
            let channel = self.channel_factory.lock().await.open(stream)?;
            Ok(tap.attach(&reader, channel))
        } else {
            Ok(tap.detach(&reader))
        }
    }

    // ── Shutdown ──────────────────────────────────────────────────────────

    /// Releases the tablet binding and closes any attached taps.
    pub async fn shutdown(&self) {
        let mut driver = self.driver.lock().await;
        self.detach_all_taps(&driver).await;
        driver.close();
        info!("daemon shut down");
    }

    /// Detaches both taps against the current readers.  Called before any
    /// operation that replaces the readers, since subscriptions do not
    /// survive a rebind.
    async fn detach_all_taps(&self, driver: &Driver) {
        let mut taps = self.taps.lock().await;
        if let Some(reader) = driver.tablet_reader() {
            taps.tablet.detach(&reader);
        }
        if let Some(reader) = driver.aux_reader() {
            taps.aux.detach(&reader);
        }
    }

    async fn reapply_settings(&self, driver: &Driver) {
        if let Some(settings) = self.settings.lock().await.as_ref() {
            let registry = self.registry.lock().await;
            apply_settings(driver, &registry, settings);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::infrastructure::debug_tap::DiagnosticChannel;
    use crate::infrastructure::device::mock::MockDeviceProvider;
    use crate::infrastructure::pointer::{RecordingInjector, RecordingPointer};
    use crate::infrastructure::storage::descriptors::StaticDescriptorSource;
    use tablet_core::Report;
    use tablet_plugins::StandardPlugins;

    fn descriptor(vendor_id: u16, product_id: u16) -> TabletDescriptor {
        TabletDescriptor {
            name: format!("Tablet {vendor_id:04x}:{product_id:04x}"),
            vendor_id,
            product_id,
            width: 152.0,
            height: 95.0,
            max_x: 15200,
            max_y: 9500,
            max_pressure: 2047,
            pen_buttons: 2,
            aux_buttons: 4,
            report_id: 0x01,
            aux_report_id: 0x02,
        }
    }

    struct NullChannel;

    impl DiagnosticChannel for NullChannel {
        fn send(&mut self, _report: &Report) -> Result<(), ChannelError> {
            Ok(())
        }
        fn close(&mut self) {}
    }

    /// Factory counting how many channels it has opened.
    #[derive(Default)]
    struct CountingChannelFactory {
        opened: Arc<StdMutex<usize>>,
    }

    impl DiagnosticChannelFactory for CountingChannelFactory {
        fn open(&self, _stream: TapStream) -> Result<Box<dyn DiagnosticChannel>, ChannelError> {
            *self.opened.lock().unwrap() += 1;
            Ok(Box::new(NullChannel))
        }
    }

    fn daemon_with(
        provider: MockDeviceProvider,
        candidates: Vec<TabletDescriptor>,
    ) -> (Arc<DriverDaemon>, Arc<StdMutex<usize>>) {
        let driver = Driver::new(
            Box::new(provider),
            Box::new(RecordingPointer::new()),
            Box::new(RecordingInjector::new()),
        );
        let factory = CountingChannelFactory::default();
        let opened = Arc::clone(&factory.opened);
        let daemon = DriverDaemon::new(
            driver,
            Box::new(StaticDescriptorSource::new(candidates)),
            Box::new(factory),
        );
        (daemon, opened)
    }

    #[test]
    fn test_import_is_idempotent_through_the_facade() {
        tokio_test::block_on(async {
            let (daemon, _) = daemon_with(MockDeviceProvider::new(), Vec::new());

            assert_eq!(
                daemon.import_plugin(&StandardPlugins).await,
                ImportOutcome::Imported
            );
            assert_eq!(
                daemon.import_plugin(&StandardPlugins).await,
                ImportOutcome::AlreadyLoaded
            );
            assert_eq!(
                daemon.list_implementations(Capability::OutputMode).await,
                vec!["AbsoluteMode".to_string(), "RelativeMode".to_string()]
            );
        });
    }

    #[test]
    fn test_detect_binds_and_reapplies_stored_settings() {
        tokio_test::block_on(async {
            let provider = MockDeviceProvider::new();
            provider.attach(0xBBBB, 0x0002);
            let candidates = vec![descriptor(0xAAAA, 0x0001), descriptor(0xBBBB, 0x0002)];
            let (daemon, _) = daemon_with(provider, candidates);
            daemon.import_plugin(&StandardPlugins).await;
            daemon.set_settings(Settings::default()).await;

            let detected = daemon.detect_tablets().await;

            assert_eq!(detected.unwrap().vendor_id, 0xBBBB);
            assert_eq!(daemon.tablet().await.unwrap().vendor_id, 0xBBBB);
            // auto_hook in the stored settings re-enabled the gate
            assert!(daemon.input_hook_enabled().await);
        });
    }

    #[test]
    fn test_detect_without_hardware_reports_none() {
        tokio_test::block_on(async {
            let (daemon, _) =
                daemon_with(MockDeviceProvider::new(), vec![descriptor(0xAAAA, 0x0001)]);

            assert!(daemon.detect_tablets().await.is_none());
            assert!(daemon.tablet().await.is_none());
        });
    }

    #[test]
    fn test_set_settings_with_unknown_mode_still_stores_the_snapshot() {
        tokio_test::block_on(async {
            let (daemon, _) = daemon_with(MockDeviceProvider::new(), Vec::new());
            daemon.import_plugin(&StandardPlugins).await;
            let mut settings = Settings::default();
            settings.output_mode = "NoSuchMode".to_string();

            daemon.set_settings(settings.clone()).await;

            // Best-effort apply: stored for the next bind, pipeline empty now
            assert_eq!(daemon.settings().await.unwrap(), settings);
        });
    }

    #[test]
    fn test_tap_enable_requires_a_tablet() {
        tokio_test::block_on(async {
            let (daemon, _) = daemon_with(MockDeviceProvider::new(), Vec::new());

            let result = daemon.set_debug_tap_enabled(TapStream::Tablet, true).await;

            assert!(matches!(result, Err(DaemonError::NoTablet)));
        });
    }

    #[test]
    fn test_tap_enable_is_idempotent() {
        tokio_test::block_on(async {
            let provider = MockDeviceProvider::new();
            provider.attach(0x056A, 0x030E);
            let (daemon, opened) = daemon_with(provider, Vec::new());
            daemon.set_tablet(descriptor(0x056A, 0x030E)).await.unwrap();

            assert!(daemon.set_debug_tap_enabled(TapStream::Tablet, true).await.unwrap());
            assert!(!daemon.set_debug_tap_enabled(TapStream::Tablet, true).await.unwrap());

            // The second enable never opened a second channel
            assert_eq!(*opened.lock().unwrap(), 1);

            assert!(daemon.set_debug_tap_enabled(TapStream::Tablet, false).await.unwrap());
            assert!(!daemon.set_debug_tap_enabled(TapStream::Tablet, false).await.unwrap());
        });
    }

    #[test]
    fn test_aux_tap_stays_detached_without_an_aux_stream() {
        tokio_test::block_on(async {
            let provider = MockDeviceProvider::new();
            provider.attach(0x056A, 0x030E);
            let (daemon, opened) = daemon_with(provider, Vec::new());
            daemon.set_tablet(descriptor(0x056A, 0x030E)).await.unwrap();

            let changed = daemon
                .set_debug_tap_enabled(TapStream::Aux, true)
                .await
                .unwrap();

            assert!(!changed, "aux tap must silently stay detached");
            assert_eq!(*opened.lock().unwrap(), 0, "no channel is opened");
        });
    }

    #[test]
    fn test_input_hook_toggle_round_trips() {
        tokio_test::block_on(async {
            let (daemon, _) = daemon_with(MockDeviceProvider::new(), Vec::new());

            assert!(!daemon.input_hook_enabled().await);
            daemon.set_input_hook_enabled(true).await;
            assert!(daemon.input_hook_enabled().await);
        });
    }

    #[test]
    fn test_reset_settings_restores_defaults() {
        tokio_test::block_on(async {
            let (daemon, _) = daemon_with(MockDeviceProvider::new(), Vec::new());
            daemon.import_plugin(&StandardPlugins).await;
            let mut settings = Settings::default();
            settings.output_mode = "RelativeMode".to_string();
            daemon.set_settings(settings).await;

            daemon.reset_settings().await;

            assert_eq!(daemon.settings().await.unwrap(), Settings::default());
        });
    }
}
