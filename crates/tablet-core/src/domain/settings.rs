//! The user's configuration snapshot.
//!
//! A `Settings` record is immutable once applied: the settings applier
//! translates it into pipeline state wholesale, and a new record replaces
//! the old one entirely.  The daemon's storage layer persists it as TOML.
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the persisted file.  This
//! keeps old settings files loadable when new fields are introduced, and
//! gives a sensible configuration on first run.

use serde::{Deserialize, Serialize};

/// A complete configuration snapshot for the driver pipeline.
///
/// Binding fields hold canonical binding strings (`"Key:A"`, `"Mouse:Left"`,
/// `""` for unbound); the settings applier runs them through the binding
/// codec.  `pen_buttons[i]`/`aux_buttons[i]` always map to binding-array
/// index `i`, unbounded against the physical device's button count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Fully-qualified name of the output-mode plugin.
    #[serde(default = "default_output_mode")]
    pub output_mode: String,
    /// Ordered list of filter plugin names; chain order equals list order.
    #[serde(default)]
    pub filters: Vec<String>,

    // ── Absolute-mode geometry ────────────────────────────────────────────
    #[serde(default = "default_display_width")]
    pub display_width: f32,
    #[serde(default = "default_display_height")]
    pub display_height: f32,
    #[serde(default)]
    pub display_x: f32,
    #[serde(default)]
    pub display_y: f32,
    #[serde(default = "default_tablet_width")]
    pub tablet_width: f32,
    #[serde(default = "default_tablet_height")]
    pub tablet_height: f32,
    #[serde(default)]
    pub tablet_x: f32,
    #[serde(default)]
    pub tablet_y: f32,
    /// Whether positions outside the tablet area are clipped onto the
    /// display area instead of extrapolating past its edges.
    #[serde(default = "default_true")]
    pub enable_clipping: bool,

    // ── Relative-mode parameters ──────────────────────────────────────────
    #[serde(default = "default_sensitivity")]
    pub x_sensitivity: f32,
    #[serde(default = "default_sensitivity")]
    pub y_sensitivity: f32,
    /// Milliseconds without a report after which relative motion restarts
    /// from the next sample instead of jumping.
    #[serde(default = "default_reset_time_ms")]
    pub reset_time_ms: u64,

    // ── Bindings ──────────────────────────────────────────────────────────
    /// Canonical binding string for the pen tip; empty = unbound.
    #[serde(default)]
    pub tip_button: String,
    /// Percentage of maximum pressure at which the tip binding fires.
    #[serde(default = "default_tip_activation_pressure")]
    pub tip_activation_pressure: f32,
    /// Canonical binding strings for the pen-barrel buttons, by index.
    #[serde(default)]
    pub pen_buttons: Vec<String>,
    /// Canonical binding strings for the auxiliary (express-key) buttons.
    #[serde(default)]
    pub aux_buttons: Vec<String>,

    /// When set, applying the settings also enables binding dispatch.
    #[serde(default = "default_true")]
    pub auto_hook: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_output_mode() -> String {
    "AbsoluteMode".to_string()
}
fn default_display_width() -> f32 {
    1920.0
}
fn default_display_height() -> f32 {
    1080.0
}
fn default_tablet_width() -> f32 {
    152.0
}
fn default_tablet_height() -> f32 {
    95.0
}
fn default_true() -> bool {
    true
}
fn default_sensitivity() -> f32 {
    10.0
}
fn default_reset_time_ms() -> u64 {
    100
}
fn default_tip_activation_pressure() -> f32 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_mode: default_output_mode(),
            filters: Vec::new(),
            display_width: default_display_width(),
            display_height: default_display_height(),
            display_x: 0.0,
            display_y: 0.0,
            tablet_width: default_tablet_width(),
            tablet_height: default_tablet_height(),
            tablet_x: 0.0,
            tablet_y: 0.0,
            enable_clipping: default_true(),
            x_sensitivity: default_sensitivity(),
            y_sensitivity: default_sensitivity(),
            reset_time_ms: default_reset_time_ms(),
            tip_button: String::new(),
            tip_activation_pressure: default_tip_activation_pressure(),
            pen_buttons: Vec::new(),
            aux_buttons: Vec::new(),
            auto_hook: default_true(),
        }
    }
}
