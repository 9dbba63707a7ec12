//! Absolute output mode: maps a fixed tablet area onto a fixed display area.
//!
//! The transform works in millimetres: the descriptor converts raw device
//! units to physical position, the input area selects the active region of
//! the tablet surface, and the normalised position is projected onto the
//! output (display) area.  With clipping enabled, positions outside the
//! input area pin to the display area's edges; with it disabled they
//! extrapolate past them.

use tablet_core::binding::Binding;
use tablet_core::domain::descriptor::TabletDescriptor;
use tablet_core::domain::geometry::{Area, Point};
use tablet_core::domain::report::Report;
use tablet_core::plugin::{
    AbsoluteMode, BindingHandler, FilterChain, OutputContext, OutputMode,
};

use crate::bindings::BindingDispatcher;

/// The standard absolute-positioning output mode.
///
/// Registered as `"AbsoluteMode"`; implements the `OutputMode`,
/// `AbsoluteMode`, and `BindingHandler` capabilities.
pub struct AbsoluteOutputMode {
    descriptor: Option<TabletDescriptor>,
    filters: FilterChain,
    output: Area,
    input: Area,
    clipping: bool,
    bindings: BindingDispatcher,
}

impl AbsoluteOutputMode {
    pub fn new() -> Self {
        Self {
            descriptor: None,
            filters: FilterChain::new(),
            output: Area::default(),
            input: Area::default(),
            clipping: true,
            bindings: BindingDispatcher::new(),
        }
    }

    /// Projects a raw report position onto the display.
    ///
    /// Returns `None` until the mode has a descriptor and non-degenerate
    /// areas; reports arriving before configuration completes simply do not
    /// move the pointer.
    fn transform(&self, report: &Report) -> Option<Point> {
        let descriptor = self.descriptor.as_ref()?;
        if self.input.is_degenerate() || self.output.is_degenerate() {
            return None;
        }

        let mm_x = report.x * descriptor.x_unit_mm();
        let mm_y = report.y * descriptor.y_unit_mm();

        let mut tx = (mm_x - self.input.position.x) / self.input.width;
        let mut ty = (mm_y - self.input.position.y) / self.input.height;
        if self.clipping {
            tx = tx.clamp(0.0, 1.0);
            ty = ty.clamp(0.0, 1.0);
        }

        Some(Point::new(
            self.output.position.x + tx * self.output.width,
            self.output.position.y + ty * self.output.height,
        ))
    }
}

impl Default for AbsoluteOutputMode {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputMode for AbsoluteOutputMode {
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
        if let Some(position) = self.transform(&report) {
            ctx.pointer.set_position(position.x, position.y);
        }
        let max_pressure = self.descriptor.as_ref().map_or(0, |d| d.max_pressure);
        self.bindings.handle_pen(&report, max_pressure, ctx);
    }

    fn handle_aux_report(&mut self, report: Report, ctx: &mut OutputContext<'_>) {
        self.bindings.handle_aux(&report, ctx);
    }

    fn as_absolute_mut(&mut self) -> Option<&mut dyn AbsoluteMode> {
        Some(self)
    }

    fn as_binding_handler_mut(&mut self) -> Option<&mut dyn BindingHandler> {
        Some(self)
    }
}

impl AbsoluteMode for AbsoluteOutputMode {
    fn set_output_area(&mut self, area: Area) {
        self.output = area;
    }

    fn set_input_area(&mut self, area: Area) {
        self.input = area;
    }

    fn set_clipping(&mut self, enabled: bool) {
        self.clipping = enabled;
    }

    fn output_area(&self) -> Area {
        self.output
    }

    fn input_area(&self) -> Area {
        self.input
    }

    fn clipping(&self) -> bool {
        self.clipping
    }
}

impl BindingHandler for AbsoluteOutputMode {
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
