//! Raw sample to report translation.
//!
//! Each tablet model reports in its own byte layout; a [`ReportParser`]
//! turns one [`RawSample`] into a normalized [`Report`] in raw device
//! units, or rejects the sample entirely.  Rejection is silent at the
//! pipeline level (vendor endpoints interleave unrelated report IDs), so
//! the parser logs at trace level only.

use tablet_core::{Report, TabletDescriptor};
use tracing::trace;

use super::device::RawSample;

/// Translates raw endpoint bytes into normalized reports.
///
/// Implementations are shared with the reader thread, hence `Sync`.
pub trait ReportParser: Send + Sync {
    /// Parses one sample.  Returns `None` when the sample does not carry a
    /// report this parser understands.
    fn parse(&self, sample: &RawSample) -> Option<Report>;
}

/// Parser for the structured 8-byte pen layout:
///
/// ```text
/// byte 0      report ID
/// bytes 1..3  X coordinate, little-endian u16, device units
/// bytes 3..5  Y coordinate, little-endian u16, device units
/// bytes 5..7  pressure, little-endian u16, device units
/// byte 7      pen button bitmask
/// ```
pub struct StructuredReportParser {
    report_id: u8,
}

impl StructuredReportParser {
    /// Creates a parser accepting the descriptor's pen report ID.
    pub fn new(descriptor: &TabletDescriptor) -> Self {
        Self {
            report_id: descriptor.report_id,
        }
    }
}

impl ReportParser for StructuredReportParser {
    fn parse(&self, sample: &RawSample) -> Option<Report> {
        if sample.data.len() < 8 {
            trace!(len = sample.data.len(), "sample too short for pen layout");
            return None;
        }
        if sample.data[0] != self.report_id {
            trace!(id = sample.data[0], "sample carries a foreign report ID");
            return None;
        }

        let x = u16::from_le_bytes([sample.data[1], sample.data[2]]);
        let y = u16::from_le_bytes([sample.data[3], sample.data[4]]);
        let pressure = u16::from_le_bytes([sample.data[5], sample.data[6]]);
        let buttons = sample.data[7];

        Some(Report {
            timestamp_us: sample.timestamp_us,
            x: f32::from(x),
            y: f32::from(y),
            pressure: u32::from(pressure),
            buttons: u32::from(buttons),
        })
    }
}

/// Parser for the 2-byte auxiliary (express-key) layout:
///
/// ```text
/// byte 0  report ID
/// byte 1  auxiliary button bitmask
/// ```
///
/// Auxiliary reports carry no position or pressure, so those fields are
/// zeroed in the produced [`Report`].
pub struct AuxReportParser {
    report_id: u8,
}

impl AuxReportParser {
    /// Creates a parser accepting the descriptor's auxiliary report ID.
    pub fn new(descriptor: &TabletDescriptor) -> Self {
        Self {
            report_id: descriptor.aux_report_id,
        }
    }
}

impl ReportParser for AuxReportParser {
    fn parse(&self, sample: &RawSample) -> Option<Report> {
        if sample.data.len() < 2 {
            trace!(len = sample.data.len(), "sample too short for aux layout");
            return None;
        }
        if sample.data[0] != self.report_id {
            return None;
        }

        Some(Report {
            timestamp_us: sample.timestamp_us,
            x: 0.0,
            y: 0.0,
            pressure: 0,
            buttons: u32::from(sample.data[1]),
        })
    }
}
