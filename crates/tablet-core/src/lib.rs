//! # tablet-core
//!
//! Shared library for tabletd containing the domain entities, the binding
//! codec, and the plugin capability registry.
//!
//! This crate is used by the daemon and by every plugin crate.
//! It has zero dependencies on OS APIs, UI frameworks, or hardware transports.
//!
//! # Architecture overview (for beginners)
//!
//! tabletd is a graphics-tablet driver daemon: it turns the stream of
//! hardware-sampled reports coming from a digitizer (pen position, pressure,
//! button state) into cursor motion and key/mouse actions, shaped by a
//! user-supplied settings record.
//!
//! This crate (`tablet-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure data types with no OS dependencies: the geometric
//!   [`Area`], the [`TabletDescriptor`] identifying a tablet model, the
//!   parsed [`Report`] sample, and the [`Settings`] configuration snapshot.
//!
//! - **`binding`** – The codec that converts between human-readable binding
//!   strings (`"Key:A"`, `"Mouse:Left"`) and executable [`Binding`] actions,
//!   plus the [`InputInjector`] seam behind which OS key/mouse injection lives.
//!
//! - **`plugin`** – The capability contracts an output-mode plugin may
//!   implement ([`OutputMode`], [`AbsoluteMode`], [`RelativeMode`],
//!   [`BindingHandler`], [`ReportFilter`]) and the [`PluginRegistry`] that
//!   resolves a plugin name to a constructible implementation at runtime.

pub mod binding;
pub mod domain;
pub mod plugin;

// Re-export the most-used types at the crate root so callers can write
// `tablet_core::Report` instead of `tablet_core::domain::report::Report`.
pub use binding::{Binding, InputInjector, MouseButton};
pub use domain::descriptor::TabletDescriptor;
pub use domain::geometry::{Area, Point};
pub use domain::report::Report;
pub use domain::settings::Settings;
pub use plugin::registry::{Capability, ImportOutcome, PluginModule, PluginReference, PluginRegistry};
pub use plugin::{
    AbsoluteMode, BindingHandler, FilterChain, OutputContext, OutputMode, RelativeMode,
    ReportFilter, VirtualPointer,
};
