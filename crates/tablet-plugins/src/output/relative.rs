//! Relative output mode: accumulates pen motion scaled by per-axis
//! sensitivity.
//!
//! Deltas are computed in millimetres between consecutive reports and scaled
//! by the sensitivity (pixels per millimetre).  When the gap between two
//! reports exceeds the reset time — the pen left proximity and came back
//! somewhere else — motion restarts from the new sample instead of jumping
//! across the gap.

use std::time::Duration;

use tablet_core::binding::Binding;
use tablet_core::domain::descriptor::TabletDescriptor;
use tablet_core::domain::report::Report;
use tablet_core::plugin::{
    BindingHandler, FilterChain, OutputContext, OutputMode, RelativeMode,
};

use crate::bindings::BindingDispatcher;

#[derive(Clone, Copy)]
struct LastSample {
    x: f32,
    y: f32,
    timestamp_us: u64,
}

/// The standard relative-motion output mode.
///
/// Registered as `"RelativeMode"`; implements the `OutputMode`,
/// `RelativeMode`, and `BindingHandler` capabilities.
pub struct RelativeOutputMode {
    descriptor: Option<TabletDescriptor>,
    filters: FilterChain,
    x_sensitivity: f32,
    y_sensitivity: f32,
    reset_time: Duration,
    last: Option<LastSample>,
    bindings: BindingDispatcher,
}

impl RelativeOutputMode {
    pub fn new() -> Self {
        Self {
            descriptor: None,
            filters: FilterChain::new(),
            x_sensitivity: 10.0,
            y_sensitivity: 10.0,
            reset_time: Duration::from_millis(100),
            last: None,
            bindings: BindingDispatcher::new(),
        }
    }
}

impl Default for RelativeOutputMode {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputMode for RelativeOutputMode {
    fn set_descriptor(&mut self, descriptor: &TabletDescriptor) {
        self.filters.set_descriptor(descriptor);
        self.descriptor = Some(descriptor.clone());
    }

    fn filters_mut(&mut self) -> &mut FilterChain {
        &mut self.filters
    }

    fn handle_report(&mut self, report: Report, ctx: &mut OutputContext<'_>) {
        let Some(report) = self.filters.process(report) else {
            return;
        };

        if let (Some(descriptor), Some(last)) = (&self.descriptor, self.last) {
            let elapsed_us = report.timestamp_us.saturating_sub(last.timestamp_us);
            if elapsed_us <= self.reset_time.as_micros() as u64 {
                let dx = (report.x - last.x) * descriptor.x_unit_mm() * self.x_sensitivity;
                let dy = (report.y - last.y) * descriptor.y_unit_mm() * self.y_sensitivity;
                ctx.pointer.move_by(dx, dy);
            }
        }
        self.last = Some(LastSample {
            x: report.x,
            y: report.y,
            timestamp_us: report.timestamp_us,
        });

        let max_pressure = self.descriptor.as_ref().map_or(0, |d| d.max_pressure);
        self.bindings.handle_pen(&report, max_pressure, ctx);
    }

    fn handle_aux_report(&mut self, report: Report, ctx: &mut OutputContext<'_>) {
        self.bindings.handle_aux(&report, ctx);
    }

    fn as_relative_mut(&mut self) -> Option<&mut dyn RelativeMode> {
        Some(self)
    }

    fn as_binding_handler_mut(&mut self) -> Option<&mut dyn BindingHandler> {
        Some(self)
    }
}

impl RelativeMode for RelativeOutputMode {
    fn set_sensitivity(&mut self, x: f32, y: f32) {
        self.x_sensitivity = x;
        self.y_sensitivity = y;
    }

    fn set_reset_time(&mut self, reset: Duration) {
        self.reset_time = reset;
    }

    fn sensitivity(&self) -> (f32, f32) {
        (self.x_sensitivity, self.y_sensitivity)
    }

    fn reset_time(&self) -> Duration {
        self.reset_time
    }
}

impl BindingHandler for RelativeOutputMode {
    fn set_tip_binding(&mut self, binding: Option<Binding>) {
        self.bindings.set_tip_binding(binding);
    }

    fn tip_binding(&self) -> Option<&Binding> {
        self.bindings.tip_binding()
    }

    fn set_tip_activation_pressure(&mut self, percent: f32) {
        self.bindings.set_tip_activation_pressure(percent);
    }

    fn tip_activation_pressure(&self) -> f32 {
        self.bindings.tip_activation_pressure()
    }

    fn set_pen_binding(&mut self, index: usize, binding: Option<Binding>) {
        self.bindings.set_pen_binding(index, binding);
    }

    fn pen_binding(&self, index: usize) -> Option<&Binding> {
        self.bindings.pen_binding(index)
    }

    fn set_aux_binding(&mut self, index: usize, binding: Option<Binding>) {
        self.bindings.set_aux_binding(index, binding);
    }

    fn aux_binding(&self, index: usize) -> Option<&Binding> {
        self.bindings.aux_binding(index)
    }
}
