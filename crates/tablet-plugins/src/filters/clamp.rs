//! Position clamping against the descriptor's raw coordinate range.
//!
//! Some digitizers report positions slightly past their nominal range near
//! the surface edges (sensor overscan).  This filter pins such samples back
//! into `[0, max_x] x [0, max_y]` so downstream transforms see well-formed
//! coordinates.

use tablet_core::domain::descriptor::TabletDescriptor;
use tablet_core::domain::report::Report;
use tablet_core::plugin::ReportFilter;

/// Clamps raw positions into the descriptor range.  Registered as `"Clamp"`.
///
/// Without a bound descriptor the filter is a passthrough.
#[derive(Default)]
pub struct ClampFilter {
    range: Option<(f32, f32)>,
}

impl ClampFilter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportFilter for ClampFilter {
    fn set_descriptor(&mut self, descriptor: &TabletDescriptor) {
        self.range = Some((descriptor.max_x as f32, descriptor.max_y as f32));
    }

    fn filter(&mut self, mut report: Report) -> Option<Report> {
        if let Some((max_x, max_y)) = self.range {
            report.x = report.x.clamp(0.0, max_x);
            report.y = report.y.clamp(0.0, max_y);
        }
        Some(report)
    }
}
