//! Hardware sample transport for the daemon.
//!
//! The byte-level USB/HID transport is an external collaborator: the daemon
//! only requires a stream of raw samples per endpoint.  Raw bytes are placed
//! into an `mpsc` channel by the transport and consumed by a dedicated
//! reader thread (see [`crate::infrastructure::reader`]).
//!
//! # Testability
//!
//! The [`SampleSource`] and [`DeviceProvider`] traits allow unit tests to
//! inject synthetic samples and simulate attached hardware without any
//! device access.

use std::sync::mpsc;

use tablet_core::TabletDescriptor;
use tracing::debug;

pub mod mock;

/// One raw sample as read from a digitizer endpoint, before parsing.
#[derive(Debug, Clone)]
pub struct RawSample {
    /// Microseconds since the stream's epoch (monotonic per stream).
    pub timestamp_us: u64,
    /// The raw report bytes.
    pub data: Vec<u8>,
}

/// Error type for device transport operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("no device matches {vendor_id:04x}:{product_id:04x}")]
    NotFound { vendor_id: u16, product_id: u16 },
    #[error("sample source has already been stopped")]
    AlreadyStopped,
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Trait abstracting one endpoint's raw sample production.
///
/// The production implementation reads a HID endpoint on a dedicated
/// thread; tests use [`mock::MockSampleSource`].
pub trait SampleSource: Send {
    /// Starts the source and returns a receiver for its raw samples.
    fn start(&self) -> Result<mpsc::Receiver<RawSample>, DeviceError>;
    /// Stops the source and releases its transport resources.  The sample
    /// channel closes, which ends the reader thread consuming it.
    fn stop(&self);
}

/// The endpoints a successfully opened tablet exposes.
pub struct TabletEndpoints {
    /// The pen report stream.
    pub tablet: Box<dyn SampleSource>,
    /// The auxiliary (express-key) stream, for models that have one.
    pub aux: Option<Box<dyn SampleSource>>,
}

/// Trait abstracting device enumeration and opening.
pub trait DeviceProvider: Send {
    /// Attempts to bind to hardware matching `descriptor`.
    fn open(&self, descriptor: &TabletDescriptor) -> Result<TabletEndpoints, DeviceError>;
}

/// A provider for transports that are not wired up.
///
/// Every open attempt fails with [`DeviceError::NotFound`]; the daemon
/// still runs its full surface (plugin import, settings, taps) without
/// hardware attached.
pub struct NullDeviceProvider;

impl DeviceProvider for NullDeviceProvider {
    fn open(&self, descriptor: &TabletDescriptor) -> Result<TabletEndpoints, DeviceError> {
        debug!(tablet = descriptor.name.as_str(), "no transport available for device");
        Err(DeviceError::NotFound {
            vendor_id: descriptor.vendor_id,
            product_id: descriptor.product_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> TabletDescriptor {
        TabletDescriptor {
            name: "Test Tablet S".to_string(),
            vendor_id: 0x056A,
            product_id: 0x030E,
            width: 152.0,
            height: 95.0,
            max_x: 15200,
            max_y: 9500,
            max_pressure: 2047,
            pen_buttons: 2,
            aux_buttons: 0,
            report_id: 0x01,
            aux_report_id: 0x02,
        }
    }

    #[test]
    fn test_null_provider_rejects_every_descriptor() {
        let provider = NullDeviceProvider;

        let result = provider.open(&descriptor());

        assert!(matches!(
            result,
            Err(DeviceError::NotFound {
                vendor_id: 0x056A,
                product_id: 0x030E
            })
        ));
    }
}
