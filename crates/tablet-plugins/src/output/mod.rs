//! The standard output modes.
//!
//! An output mode is the terminal pipeline stage: it consumes filtered
//! reports and produces pointer motion plus binding actions.  Both built-in
//! modes also implement the `BindingHandler` capability through the shared
//! [`crate::bindings::BindingDispatcher`].

pub mod absolute;
pub mod relative;
