//! Plugin capability contracts.
//!
//! An output-mode plugin is a single object that may implement any subset of
//! a fixed capability set.  Instead of downcasting or type introspection,
//! each instance *reports* the capabilities it supports through the
//! `as_*_mut` query methods on [`OutputMode`]: the settings applier asks for
//! a capability view and configures it only when one is returned.
//!
//! # Capability set
//!
//! - [`OutputMode`] (base): consumes the active [`TabletDescriptor`] and owns
//!   an ordered [`FilterChain`]; every report the reader delivers flows
//!   through the chain and then into the mode.
//! - [`AbsoluteMode`]: maps a fixed tablet area onto a fixed display area,
//!   optionally clipping.
//! - [`RelativeMode`]: accumulates motion scaled by per-axis sensitivity,
//!   resetting after a configurable idle time.
//! - [`BindingHandler`]: evaluates tip/pen/aux button state against
//!   configured [`Binding`]s.
//! - [`ReportFilter`]: a separately-constructible pipeline stage that
//!   transforms or drops a report before it reaches the mode.
//!
//! These are orthogonal contracts, not variants: one instance frequently
//! implements `OutputMode + AbsoluteMode + BindingHandler` simultaneously.

pub mod registry;

use std::time::Duration;

use crate::binding::{Binding, InputInjector};
use crate::domain::descriptor::TabletDescriptor;
use crate::domain::geometry::Area;
use crate::domain::report::Report;

/// Trait abstracting OS pointer motion.
///
/// Absolute modes call [`set_position`](VirtualPointer::set_position);
/// relative modes call [`move_by`](VirtualPointer::move_by).  The production
/// implementation injects into the OS pointer; tests record calls.
pub trait VirtualPointer: Send {
    /// Places the pointer at an absolute display position, in pixels.
    fn set_position(&mut self, x: f32, y: f32);
    /// Moves the pointer by a relative amount, in pixels.
    fn move_by(&mut self, dx: f32, dy: f32);
}

/// Per-report execution context handed to the output mode.
///
/// The driver pipeline owns the pointer and injector sinks and lends them to
/// the mode for the duration of one report, so plugin instances never hold
/// global state.
pub struct OutputContext<'a> {
    pub pointer: &'a mut dyn VirtualPointer,
    pub injector: &'a mut dyn InputInjector,
    /// Process-wide binding gate.  When `false` the mode still moves the
    /// pointer but must not dispatch any binding action.
    pub binding_enabled: bool,
}

/// An optional pipeline stage that transforms or drops a report before it
/// reaches the output mode.
pub trait ReportFilter: Send {
    /// Receives the active tablet descriptor when the chain is (re)bound.
    ///
    /// Most filters ignore it; filters that clamp or normalise against the
    /// device's raw ranges keep a copy.
    fn set_descriptor(&mut self, _descriptor: &TabletDescriptor) {}

    /// Transforms `report`, or returns `None` to drop it.  A dropped report
    /// short-circuits the remaining chain and the output mode.
    fn filter(&mut self, report: Report) -> Option<Report>;
}

/// The ordered filter chain owned by an output mode.
///
/// Application order is strictly the configured order; the first filter to
/// return `None` consumes the report.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn ReportFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the chain wholesale, preserving the order of `filters`.
    pub fn set(&mut self, filters: Vec<Box<dyn ReportFilter>>) {
        self.filters = filters;
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Forwards the descriptor to every filter in the chain.
    pub fn set_descriptor(&mut self, descriptor: &TabletDescriptor) {
        for filter in &mut self.filters {
            filter.set_descriptor(descriptor);
        }
    }

    /// Runs `report` through the chain in order.
    pub fn process(&mut self, report: Report) -> Option<Report> {
        let mut current = report;
        for filter in &mut self.filters {
            current = filter.filter(current)?;
        }
        Some(current)
    }
}

/// Base capability: the pipeline stage that turns reports into pointer
/// motion and binding actions.
///
/// Exactly one instance is active in the driver at any time; replacing it
/// discards the previous instance together with its filter chain.
pub trait OutputMode: Send {
    /// Binds the active tablet descriptor.  All output modes consume the
    /// descriptor; it defines the raw ranges the mode transforms from.
    fn set_descriptor(&mut self, descriptor: &TabletDescriptor);

    /// The mode's ordered filter chain.
    fn filters_mut(&mut self) -> &mut FilterChain;

    /// Consumes one pen report: runs the filter chain, computes pointer
    /// motion from the surviving report, and evaluates bindings when the
    /// mode is also a [`BindingHandler`].
    fn handle_report(&mut self, report: Report, ctx: &mut OutputContext<'_>);

    /// Consumes one auxiliary (express-key) report.  Modes without aux
    /// handling ignore it.
    fn handle_aux_report(&mut self, _report: Report, _ctx: &mut OutputContext<'_>) {}

    /// Capability query: the absolute-positioning view of this instance.
    fn as_absolute_mut(&mut self) -> Option<&mut dyn AbsoluteMode> {
        None
    }

    /// Capability query: the relative-motion view of this instance.
    fn as_relative_mut(&mut self) -> Option<&mut dyn RelativeMode> {
        None
    }

    /// Capability query: the binding-handling view of this instance.
    fn as_binding_handler_mut(&mut self) -> Option<&mut dyn BindingHandler> {
        None
    }
}

/// Capability: maps a fixed tablet area to a fixed display area.
pub trait AbsoluteMode {
    /// Sets the mapped display region, in pixels.
    fn set_output_area(&mut self, area: Area);
    /// Sets the active tablet-surface region, in millimetres.
    fn set_input_area(&mut self, area: Area);
    /// Enables or disables clipping of out-of-area positions.
    fn set_clipping(&mut self, enabled: bool);

    fn output_area(&self) -> Area;
    fn input_area(&self) -> Area;
    fn clipping(&self) -> bool;
}

/// Capability: accumulates motion scaled by per-axis sensitivity.
pub trait RelativeMode {
    /// Sets the horizontal and vertical sensitivity, in pixels per
    /// millimetre of pen travel.
    fn set_sensitivity(&mut self, x: f32, y: f32);
    /// Sets the idle time after which motion restarts from the next sample
    /// instead of jumping across the gap.
    fn set_reset_time(&mut self, reset: Duration);

    fn sensitivity(&self) -> (f32, f32);
    fn reset_time(&self) -> Duration;
}

/// Capability: evaluates tip and button state against configured bindings.
///
/// The indexed arrays are unbounded against the physical device's button
/// count: settings may assign more entries than the hardware exposes, and
/// the excess is stored but never fires.
pub trait BindingHandler {
    fn set_tip_binding(&mut self, binding: Option<Binding>);
    fn tip_binding(&self) -> Option<&Binding>;

    /// Sets the percentage of maximum pressure at which the tip fires.
    fn set_tip_activation_pressure(&mut self, percent: f32);
    fn tip_activation_pressure(&self) -> f32;

    fn set_pen_binding(&mut self, index: usize, binding: Option<Binding>);
    fn pen_binding(&self, index: usize) -> Option<&Binding>;

    fn set_aux_binding(&mut self, index: usize, binding: Option<Binding>);
    fn aux_binding(&self, index: usize) -> Option<&Binding>;
}
