//! Shared binding-dispatch state for the built-in output modes.
//!
//! Both standard output modes implement [`BindingHandler`] by delegating to
//! a [`BindingDispatcher`]: it stores the configured bindings and the last
//! observed tip/button states, and fires press/release edges against the
//! pipeline's [`InputInjector`].
//!
//! Binding arrays are unbounded against the physical device's button count:
//! settings may assign index 5 on a two-button pen, and the entry is stored
//! but can never fire because the report bitmask never sets that bit.

use tablet_core::binding::{Binding, InputInjector};
use tablet_core::domain::report::Report;
use tablet_core::plugin::OutputContext;
use tracing::trace;

/// Edge-detecting binding evaluation state.
#[derive(Default)]
pub struct BindingDispatcher {
    tip_binding: Option<Binding>,
    tip_activation_pressure: f32,
    pen_bindings: Vec<Option<Binding>>,
    aux_bindings: Vec<Option<Binding>>,

    tip_pressed: bool,
    pen_pressed: Vec<bool>,
    aux_pressed: Vec<bool>,
}

impl BindingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors backing the BindingHandler capability ──────────────────────

    pub fn set_tip_binding(&mut self, binding: Option<Binding>) {
        self.tip_binding = binding;
    }

    pub fn tip_binding(&self) -> Option<&Binding> {
        self.tip_binding.as_ref()
    }

    pub fn set_tip_activation_pressure(&mut self, percent: f32) {
        self.tip_activation_pressure = percent;
    }

    pub fn tip_activation_pressure(&self) -> f32 {
        self.tip_activation_pressure
    }

    pub fn set_pen_binding(&mut self, index: usize, binding: Option<Binding>) {
        Self::assign(&mut self.pen_bindings, index, binding);
    }

    pub fn pen_binding(&self, index: usize) -> Option<&Binding> {
        self.pen_bindings.get(index).and_then(Option::as_ref)
    }

    pub fn set_aux_binding(&mut self, index: usize, binding: Option<Binding>) {
        Self::assign(&mut self.aux_bindings, index, binding);
    }

    pub fn aux_binding(&self, index: usize) -> Option<&Binding> {
        self.aux_bindings.get(index).and_then(Option::as_ref)
    }

    fn assign(slots: &mut Vec<Option<Binding>>, index: usize, binding: Option<Binding>) {
        if slots.len() <= index {
            slots.resize(index + 1, None);
        }
        slots[index] = binding;
    }

    // ── Evaluation ────────────────────────────────────────────────────────────

    /// Evaluates a pen report: tip pressure against the activation threshold
    /// plus every pen-barrel button edge.
    ///
    /// When binding dispatch is disabled the report is ignored entirely;
    /// state is not advanced, so re-enabling mid-press fires a clean edge.
    pub fn handle_pen(&mut self, report: &Report, max_pressure: u32, ctx: &mut OutputContext<'_>) {
        if !ctx.binding_enabled {
            return;
        }

        let tip_down = report.pressure_percent(max_pressure) >= self.tip_activation_pressure;
        if tip_down != self.tip_pressed {
            trace!(down = tip_down, "tip edge");
            if let Some(binding) = &self.tip_binding {
                if tip_down {
                    binding.press(ctx.injector);
                } else {
                    binding.release(ctx.injector);
                }
            }
            self.tip_pressed = tip_down;
        }

        Self::dispatch_indexed(&self.pen_bindings, &mut self.pen_pressed, report, ctx.injector);
    }

    /// Evaluates an auxiliary (express-key) report against the aux array.
    pub fn handle_aux(&mut self, report: &Report, ctx: &mut OutputContext<'_>) {
        if !ctx.binding_enabled {
            return;
        }
        Self::dispatch_indexed(&self.aux_bindings, &mut self.aux_pressed, report, ctx.injector);
    }

    fn dispatch_indexed(
        bindings: &[Option<Binding>],
        pressed: &mut Vec<bool>,
        report: &Report,
        injector: &mut dyn InputInjector,
    ) {
        if pressed.len() < bindings.len() {
            pressed.resize(bindings.len(), false);
        }
        for (index, binding) in bindings.iter().enumerate() {
            let down = report.button(index);
            if down == pressed[index] {
                continue;
            }
            if let Some(binding) = binding {
                trace!(index, down, "button edge");
                if down {
                    binding.press(injector);
                } else {
                    binding.release(injector);
                }
            }
            pressed[index] = down;
        }
    }
}
