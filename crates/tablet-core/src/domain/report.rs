//! One parsed hardware sample emitted by a report reader.
//!
//! A `Report` is the unit of work for the whole pipeline: readers produce
//! them, filters transform or drop them, output modes consume them, and the
//! debug tap forwards them verbatim to its diagnostic channel (hence the
//! `serde` derives).

use serde::{Deserialize, Serialize};

/// A timestamped, parsed digitizer sample.
///
/// `x`/`y` are raw device units (`0..=max_x`, `0..=max_y` per the active
/// descriptor); `pressure` is raw (`0..=max_pressure`); `buttons` is a
/// bitmask where bit `i` is the state of physical button `i`.  Pen reports
/// carry pen-barrel buttons; auxiliary reports carry express-key buttons in
/// the same field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Microseconds since an arbitrary per-stream epoch (monotonic).
    pub timestamp_us: u64,
    pub x: f32,
    pub y: f32,
    pub pressure: u32,
    pub buttons: u32,
}

impl Report {
    /// Returns the state of physical button `index`.
    ///
    /// Indices beyond the bitmask width read as released.
    pub fn button(&self, index: usize) -> bool {
        if index >= 32 {
            return false;
        }
        self.buttons & (1 << index) != 0
    }

    /// The sampled pressure as a percentage of `max_pressure`.
    ///
    /// Returns `0.0` when `max_pressure` is zero (descriptor without a
    /// pressure range), so tip bindings never fire on such devices.
    pub fn pressure_percent(&self, max_pressure: u32) -> f32 {
        if max_pressure == 0 {
            return 0.0;
        }
        self.pressure as f32 / max_pressure as f32 * 100.0
    }
}
