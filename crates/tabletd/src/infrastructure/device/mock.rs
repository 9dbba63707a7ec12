//! Mock device transport for unit and integration testing.
//!
//! [`MockSampleSource`] lets tests inject synthetic raw samples as if they
//! were read from hardware; [`MockDeviceProvider`] simulates which tablet
//! models are attached.  Both are `Clone`: the clone handed to the driver
//! and the clone kept by the test share the same underlying channel, so a
//! test can keep injecting after the driver has taken ownership.

use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};

use tablet_core::TabletDescriptor;

use super::{DeviceError, DeviceProvider, RawSample, SampleSource, TabletEndpoints};

/// A mock implementation of [`SampleSource`] that allows tests to inject
/// raw samples.
#[derive(Clone, Default)]
pub struct MockSampleSource {
    sender: Arc<Mutex<Option<Sender<RawSample>>>>,
}

impl MockSampleSource {
    /// Creates a new mock sample source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects a synthetic raw sample, as if read from hardware.
    ///
    /// Panics if `start()` has not been called or `stop()` has been called.
    pub fn inject(&self, sample: RawSample) {
        let guard = self.sender.lock().expect("lock poisoned");
        if let Some(ref sender) = *guard {
            sender
                .send(sample)
                .expect("receiver has been dropped; call start() first");
        } else {
            panic!("MockSampleSource::inject called before start()");
        }
    }

    /// Convenience wrapper building a pen report in the structured layout
    /// understood by the default parser.
    pub fn inject_pen(&self, report_id: u8, timestamp_us: u64, x: u16, y: u16, pressure: u16, buttons: u8) {
        let mut data = vec![0u8; 8];
        data[0] = report_id;
        data[1..3].copy_from_slice(&x.to_le_bytes());
        data[3..5].copy_from_slice(&y.to_le_bytes());
        data[5..7].copy_from_slice(&pressure.to_le_bytes());
        data[7] = buttons;
        self.inject(RawSample { timestamp_us, data });
    }

    /// Convenience wrapper building an auxiliary report.
    pub fn inject_aux(&self, report_id: u8, timestamp_us: u64, buttons: u8) {
        self.inject(RawSample {
            timestamp_us,
            data: vec![report_id, buttons],
        });
    }

    /// Returns `true` while the source is started.
    pub fn is_started(&self) -> bool {
        self.sender.lock().expect("lock poisoned").is_some()
    }
}

impl SampleSource for MockSampleSource {
    fn start(&self) -> Result<mpsc::Receiver<RawSample>, DeviceError> {
        let (tx, rx) = mpsc::channel();
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Drop the sender to close the channel
        *self.sender.lock().expect("lock poisoned") = None;
    }
}

/// A mock [`DeviceProvider`] exposing a configurable set of attached tablets.
#[derive(Clone, Default)]
pub struct MockDeviceProvider {
    attached: Arc<Mutex<Vec<AttachedTablet>>>,
}

#[derive(Clone)]
struct AttachedTablet {
    vendor_id: u16,
    product_id: u16,
    tablet: MockSampleSource,
    aux: Option<MockSampleSource>,
}

impl MockDeviceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates attaching a tablet without an auxiliary stream.
    ///
    /// Returns the pen source the test can inject into.
    pub fn attach(&self, vendor_id: u16, product_id: u16) -> MockSampleSource {
        let tablet = MockSampleSource::new();
        self.attached.lock().expect("lock poisoned").push(AttachedTablet {
            vendor_id,
            product_id,
            tablet: tablet.clone(),
            aux: None,
        });
        tablet
    }

    /// Simulates attaching a tablet with an auxiliary stream.
    pub fn attach_with_aux(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> (MockSampleSource, MockSampleSource) {
        let tablet = MockSampleSource::new();
        let aux = MockSampleSource::new();
        self.attached.lock().expect("lock poisoned").push(AttachedTablet {
            vendor_id,
            product_id,
            tablet: tablet.clone(),
            aux: Some(aux.clone()),
        });
        (tablet, aux)
    }
}

impl DeviceProvider for MockDeviceProvider {
    fn open(&self, descriptor: &TabletDescriptor) -> Result<TabletEndpoints, DeviceError> {
        let attached = self.attached.lock().expect("lock poisoned");
        let device = attached
            .iter()
            .find(|t| t.vendor_id == descriptor.vendor_id && t.product_id == descriptor.product_id)
            .ok_or(DeviceError::NotFound {
                vendor_id: descriptor.vendor_id,
                product_id: descriptor.product_id,
            })?;

        Ok(TabletEndpoints {
            tablet: Box::new(device.tablet.clone()),
            aux: device.aux.clone().map(|aux| Box::new(aux) as Box<dyn SampleSource>),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(vendor_id: u16, product_id: u16) -> TabletDescriptor {
        TabletDescriptor {
            name: "Mock".to_string(),
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

    #[test]
    fn test_mock_source_starts_and_receives_samples() {
        // Arrange
        let source = MockSampleSource::new();
        let rx = source.start().expect("start should succeed");

        // Act
        source.inject(RawSample {
            timestamp_us: 7,
            data: vec![0x01, 0x02],
        });

        // Assert
        let sample = rx.recv().expect("should receive sample");
        assert_eq!(sample.timestamp_us, 7);
        assert_eq!(sample.data, vec![0x01, 0x02]);
    }

    #[test]
    fn test_mock_source_stop_closes_channel() {
        // Arrange
        let source = MockSampleSource::new();
        let rx = source.start().expect("start should succeed");

        // Act
        source.stop();

        // Assert – channel should be disconnected
        assert!(rx.recv().is_err(), "channel should be closed after stop()");
    }

    #[test]
    fn test_clones_share_the_started_channel() {
        let source = MockSampleSource::new();
        let handed_to_driver = source.clone();
        let rx = handed_to_driver.start().expect("start should succeed");

        // The test's clone injects into the channel the driver's clone opened
        source.inject(RawSample {
            timestamp_us: 1,
            data: vec![0xFF],
        });

        assert!(rx.recv().is_ok());
    }

    #[test]
    fn test_provider_opens_only_attached_devices() {
        let provider = MockDeviceProvider::new();
        provider.attach(0x056A, 0x030E);

        assert!(provider.open(&descriptor(0x056A, 0x030E)).is_ok());
        assert!(matches!(
            provider.open(&descriptor(0xDEAD, 0xBEEF)),
            Err(DeviceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_provider_exposes_aux_endpoint_when_attached_with_aux() {
        let provider = MockDeviceProvider::new();
        provider.attach_with_aux(0x056A, 0x030E);

        let endpoints = provider.open(&descriptor(0x056A, 0x030E)).unwrap();

        assert!(endpoints.aux.is_some());
    }
}
