//! The standard report filters.
//!
//! Filters sit between the reader and the output mode; each may transform a
//! report or drop it entirely.  Chain order is the order configured in the
//! settings record.

pub mod clamp;
pub mod smoothing;
