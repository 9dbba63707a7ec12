//! Exponential-moving-average position smoothing.
//!
//! Hardware position samples carry sensor noise that shows up as jitter on
//! fine pen strokes.  This filter blends each sample with the previous
//! output position, trading a small amount of latency for stability.

use tablet_core::domain::report::Report;
use tablet_core::plugin::ReportFilter;

/// Blend factor applied to each incoming sample. 1.0 disables smoothing;
/// values toward 0.0 smooth harder at the cost of lag.
const DEFAULT_WEIGHT: f32 = 0.5;

/// EMA smoothing over report positions.  Registered as `"Smoothing"`.
pub struct SmoothingFilter {
    weight: f32,
    last: Option<(f32, f32)>,
}

impl SmoothingFilter {
    pub fn new() -> Self {
        Self::with_weight(DEFAULT_WEIGHT)
    }

    pub fn with_weight(weight: f32) -> Self {
        Self {
            weight: weight.clamp(0.0, 1.0),
            last: None,
        }
    }
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFilter for SmoothingFilter {
    fn filter(&mut self, mut report: Report) -> Option<Report> {
        match self.last {
            None => {
                self.last = Some((report.x, report.y));
            }
            Some((lx, ly)) => {
                report.x = lx + self.weight * (report.x - lx);
                report.y = ly + self.weight * (report.y - ly);
                self.last = Some((report.x, report.y));
            }
        }
        Some(report)
    }
}
