//! Storage infrastructure: settings and descriptor persistence.
//!
//! This module provides a thin adapter between the application and the
//! file system:
//!
//! - `settings` reads and writes the TOML settings file from the
//!   platform-appropriate directory.
//! - `descriptors` loads tablet model descriptors from a configuration
//!   directory of JSON files.
//!
//! Keeping storage concerns here — rather than scattered throughout the
//! application — means we can change the file formats without touching
//! any other part of the codebase.

pub mod descriptors;
pub mod settings;
