//! Tablet descriptor: the immutable record identifying a supported tablet
//! model.
//!
//! One descriptor file exists per supported model (JSON, loaded by the
//! daemon's storage layer).  The daemon matches descriptors against connected
//! hardware during detection; exactly one descriptor is active at a time and,
//! together with the active output mode, it fully determines pipeline
//! behaviour.

use serde::{Deserialize, Serialize};

/// Identity, geometry, and report-parsing metadata for one tablet model.
///
/// `width`/`height` are the physical dimensions of the active surface in
/// millimetres; `max_x`/`max_y`/`max_pressure` are the raw ranges the
/// digitizer reports over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabletDescriptor {
    /// Human-readable model name, e.g. `"Wacom CTL-480"`.
    pub name: String,
    /// USB vendor ID of the digitizer.
    pub vendor_id: u16,
    /// USB product ID of the digitizer.
    pub product_id: u16,
    /// Active surface width in millimetres.
    pub width: f32,
    /// Active surface height in millimetres.
    pub height: f32,
    /// Maximum raw X coordinate reported by the digitizer.
    pub max_x: u32,
    /// Maximum raw Y coordinate reported by the digitizer.
    pub max_y: u32,
    /// Maximum raw pressure value reported by the pen tip.
    pub max_pressure: u32,
    /// Number of physical buttons on the pen barrel.
    #[serde(default)]
    pub pen_buttons: u8,
    /// Number of auxiliary (express-key) buttons on the tablet body.
    /// A non-zero count means the tablet exposes a second report stream.
    #[serde(default)]
    pub aux_buttons: u8,
    /// Report ID byte expected at the start of each pen report.
    #[serde(default = "default_report_id")]
    pub report_id: u8,
    /// Report ID byte expected at the start of each auxiliary report.
    #[serde(default = "default_aux_report_id")]
    pub aux_report_id: u8,
}

fn default_report_id() -> u8 {
    0x01
}

fn default_aux_report_id() -> u8 {
    0x02
}

impl TabletDescriptor {
    /// Returns `true` when the model exposes an auxiliary report stream.
    pub fn has_aux(&self) -> bool {
        self.aux_buttons > 0
    }

    /// Millimetres per raw X unit; `0.0` when the descriptor reports no range.
    pub fn x_unit_mm(&self) -> f32 {
        if self.max_x == 0 {
            0.0
        } else {
            self.width / self.max_x as f32
        }
    }

    /// Millimetres per raw Y unit; `0.0` when the descriptor reports no range.
    pub fn y_unit_mm(&self) -> f32 {
        if self.max_y == 0 {
            0.0
        } else {
            self.height / self.max_y as f32
        }
    }
}
