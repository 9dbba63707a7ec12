//! Settings application: translating one [`Settings`] snapshot into
//! pipeline state.
//!
//! The snapshot is applied transactionally with respect to the report
//! stream: a new output mode is constructed and fully configured *before*
//! it is installed, so the reader threads only ever see the old pipeline
//! or the complete new one, never a half-configured mode.
//!
//! Each configuration facet is applied only when the constructed mode
//! reports the matching capability; a mode without, say, the absolute
//! capability simply skips the geometry facet.

use std::time::Duration;

use tablet_core::{binding, Area, Capability, PluginReference, PluginRegistry, Settings};
use tracing::{info, warn};

use super::driver::Driver;

/// Applies `settings` wholesale: constructs and configures the named
/// output mode, installs it, and enables binding dispatch when the
/// snapshot's auto-hook flag is set.  A cleared flag leaves the gate
/// alone, so an explicitly enabled hook survives a re-apply.
///
/// Total and best-effort: an unknown output mode empties the pipeline
/// (reports are still read but produce no action), and unknown filter
/// names are skipped.  Both degrade with a logged warning instead of
/// failing the caller.
pub fn apply_settings(driver: &Driver, registry: &PluginRegistry, settings: &Settings) {
    let reference = PluginReference::new(&settings.output_mode, Capability::OutputMode);
    let Some(mut mode) = reference.construct_output_mode(registry) else {
        warn!(
            mode = settings.output_mode.as_str(),
            "output mode unresolvable, pipeline emptied"
        );
        driver.set_output_mode(None);
        if settings.auto_hook {
            driver.set_binding_enabled(true);
        }
        return;
    };
    info!(mode = settings.output_mode.as_str(), "output mode constructed");

    // Filters first: the descriptor push below must reach them through the
    // chain.
    let mut filters = Vec::new();
    for name in &settings.filters {
        let reference = PluginReference::new(name, Capability::Filter);
        match reference.construct_filter(registry) {
            Some(filter) => filters.push(filter),
            None => warn!(filter = name.as_str(), "skipping unresolvable filter"),
        }
    }
    let filter_count = filters.len();
    mode.filters_mut().set(filters);
    info!(
        configured = filter_count,
        requested = settings.filters.len(),
        "filter chain set"
    );

    if let Some(descriptor) = driver.descriptor() {
        mode.set_descriptor(descriptor);
    }

    if let Some(absolute) = mode.as_absolute_mut() {
        absolute.set_output_area(Area::new(
            settings.display_width,
            settings.display_height,
            settings.display_x,
            settings.display_y,
        ));
        absolute.set_input_area(Area::new(
            settings.tablet_width,
            settings.tablet_height,
            settings.tablet_x,
            settings.tablet_y,
        ));
        absolute.set_clipping(settings.enable_clipping);
        info!(
            output = %absolute.output_area(),
            input = %absolute.input_area(),
            clipping = settings.enable_clipping,
            "absolute facet applied"
        );
    }

    if let Some(relative) = mode.as_relative_mut() {
        relative.set_sensitivity(settings.x_sensitivity, settings.y_sensitivity);
        relative.set_reset_time(Duration::from_millis(settings.reset_time_ms));
        info!(
            x = settings.x_sensitivity,
            y = settings.y_sensitivity,
            reset_ms = settings.reset_time_ms,
            "relative facet applied"
        );
    }

    if let Some(handler) = mode.as_binding_handler_mut() {
        handler.set_tip_binding(binding::parse(&settings.tip_button));
        handler.set_tip_activation_pressure(settings.tip_activation_pressure);
        for (index, text) in settings.pen_buttons.iter().enumerate() {
            handler.set_pen_binding(index, binding::parse(text));
        }
        for (index, text) in settings.aux_buttons.iter().enumerate() {
            handler.set_aux_binding(index, binding::parse(text));
        }
        info!(
            tip = settings.tip_button.as_str(),
            pen = settings.pen_buttons.len(),
            aux = settings.aux_buttons.len(),
            "binding facet applied"
        );
    }

    // Only now does the pipeline see the new mode.
    driver.set_output_mode(Some(mode));
    if settings.auto_hook {
        driver.set_binding_enabled(true);
        info!("binding dispatch auto-enabled");
    }
    info!("settings applied");
}
