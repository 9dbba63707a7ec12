//! Infrastructure layer: everything that touches a boundary.
//!
//! Hardware sample transport, report parsing, the reader fan-out threads,
//! the debug tap and its diagnostic channels, the pointer/injector sinks,
//! and settings/descriptor persistence.  The application layer depends on
//! the traits defined here ([`device::SampleSource`],
//! [`device::DeviceProvider`], [`debug_tap::DiagnosticChannel`], ...) and
//! never on a concrete transport.

pub mod debug_tap;
pub mod device;
pub mod pointer;
pub mod reader;
pub mod report_parser;
pub mod storage;
