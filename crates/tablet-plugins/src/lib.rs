//! # tablet-plugins
//!
//! The standard plugin module shipped with tabletd: the two built-in output
//! modes and the built-in report filters.
//!
//! Exported types (by the names the settings record refers to):
//!
//! - **`AbsoluteMode`** — maps a fixed tablet area onto a fixed display area
//!   ([`output::absolute::AbsoluteOutputMode`]); also a binding handler.
//! - **`RelativeMode`** — accumulates pen motion scaled by per-axis
//!   sensitivity ([`output::relative::RelativeOutputMode`]); also a binding
//!   handler.
//! - **`Smoothing`** — exponential-moving-average position filter.
//! - **`Clamp`** — clamps raw positions into the descriptor's coordinate
//!   range.
//!
//! The daemon imports this crate like any other plugin module: through
//! [`tablet_core::plugin::PluginModule`], so the registry treats built-ins
//! and externally loaded modules identically.

pub mod bindings;
pub mod filters;
pub mod output;

use std::path::Path;

use tablet_core::plugin::registry::{PluginModule, PluginRegistry};
use tablet_core::plugin::{OutputMode, ReportFilter};

use filters::clamp::ClampFilter;
use filters::smoothing::SmoothingFilter;
use output::absolute::AbsoluteOutputMode;
use output::relative::RelativeOutputMode;

/// The built-in plugin module.
///
/// Its identity is a reserved virtual path so it can never collide with a
/// module loaded from disk.
pub struct StandardPlugins;

fn absolute_mode() -> Box<dyn OutputMode> {
    Box::new(AbsoluteOutputMode::new())
}

fn relative_mode() -> Box<dyn OutputMode> {
    Box::new(RelativeOutputMode::new())
}

fn smoothing_filter() -> Box<dyn ReportFilter> {
    Box::new(SmoothingFilter::new())
}

fn clamp_filter() -> Box<dyn ReportFilter> {
    Box::new(ClampFilter::new())
}

impl PluginModule for StandardPlugins {
    fn identity(&self) -> &Path {
        Path::new("builtin/standard-plugins")
    }

    fn register(&self, registry: &mut PluginRegistry) {
        registry.register_output_mode("AbsoluteMode", absolute_mode);
        registry.register_output_mode("RelativeMode", relative_mode);
        registry.register_filter("Smoothing", smoothing_filter);
        registry.register_filter("Clamp", clamp_filter);
    }
}
