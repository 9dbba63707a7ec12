//! Domain entities for tabletd.
//!
//! This module contains pure data types with no infrastructure dependencies.
//!
//! # What is "domain" here? (for beginners)
//!
//! The daemon is organised into concentric layers.  The innermost layer is
//! the **domain**: the data types that make the system what it is, free of
//! any OS API, file format, or hardware transport concern.  Domain code:
//!
//! - Can be compiled and tested on any platform without external setup.
//! - Is consumed by every outer layer (plugins, daemon application logic,
//!   infrastructure) but never depends on them.
//!
//! For tabletd the domain is small and concrete: a rectangle on a display or
//! a tablet surface ([`geometry::Area`]), the identity of a tablet model
//! ([`descriptor::TabletDescriptor`]), one parsed hardware sample
//! ([`report::Report`]), and the user's configuration snapshot
//! ([`settings::Settings`]).

pub mod descriptor;
pub mod geometry;
pub mod report;
pub mod settings;
