//! Application layer: driver lifecycle and the daemon facade.
//!
//! - `driver` owns the attached tablet, its reader threads, and the shared
//!   report pipeline.
//! - `apply_settings` translates a [`tablet_core::Settings`] snapshot into
//!   pipeline state.
//! - `daemon` is the serialized facade the daemon surface calls into.

pub mod apply_settings;
pub mod daemon;
pub mod driver;
