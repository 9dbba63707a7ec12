//! Binding codec: conversion between canonical binding strings and
//! executable binding actions.
//!
//! The canonical representation is `<Kind>:<Property>` — `"Key:A"` binds a
//! keyboard key, `"Mouse:Left"` binds a mouse button.  The empty string means
//! "unbound".  This mirrors how bindings are stored in the settings record
//! and shown in configuration UIs.
//!
//! # Round-trip law
//!
//! `parse(&format(Some(&b))) == Some(b)` for every constructible binding
//! `b`, and `format(parse(s)) == s` for every string produced by `format`.
//! Unrecognised strings are "unbound" (`None`), never an error: a settings
//! file edited by hand must not be able to crash the daemon.
//!
//! # Execution
//!
//! Pressing or releasing a binding goes through the [`InputInjector`] trait.
//! OS-level key/mouse injection lives behind that seam in the daemon's
//! infrastructure layer; this crate only defines the contract.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mouse button identifier usable in a [`Binding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Backward,
    Forward,
}

impl MouseButton {
    /// The canonical property string for this button.
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "Left",
            MouseButton::Right => "Right",
            MouseButton::Middle => "Middle",
            MouseButton::Backward => "Backward",
            MouseButton::Forward => "Forward",
        }
    }

    fn from_str(text: &str) -> Option<Self> {
        match text {
            "Left" => Some(MouseButton::Left),
            "Right" => Some(MouseButton::Right),
            "Middle" => Some(MouseButton::Middle),
            "Backward" => Some(MouseButton::Backward),
            "Forward" => Some(MouseButton::Forward),
            _ => None,
        }
    }
}

/// An executable action associated with a physical tip or button event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Binding {
    /// Press/release a keyboard key, identified by its key name (`"A"`,
    /// `"Escape"`, ...).  The name is passed through to the injector
    /// verbatim; validity is the injector's concern.
    Key(String),
    /// Press/release a mouse button.
    Mouse(MouseButton),
}

/// Trait abstracting OS key and mouse-button injection.
///
/// The production implementation talks to the OS input stack; tests use
/// recording doubles.  Injection mechanics are out of scope for the core.
pub trait InputInjector: Send {
    /// Presses (`true`) or releases (`false`) the named keyboard key.
    fn key(&mut self, key: &str, pressed: bool);
    /// Presses (`true`) or releases (`false`) a mouse button.
    fn mouse_button(&mut self, button: MouseButton, pressed: bool);
}

impl Binding {
    /// Dispatches the press edge of this binding to `injector`.
    pub fn press(&self, injector: &mut dyn InputInjector) {
        match self {
            Binding::Key(key) => injector.key(key, true),
            Binding::Mouse(button) => injector.mouse_button(*button, true),
        }
    }

    /// Dispatches the release edge of this binding to `injector`.
    pub fn release(&self, injector: &mut dyn InputInjector) {
        match self {
            Binding::Key(key) => injector.key(key, false),
            Binding::Mouse(button) => injector.mouse_button(*button, false),
        }
    }
}

/// Parses a canonical binding string.
///
/// Returns `None` ("unbound") for the empty string and for any string that
/// does not name a known binding kind or property.  Parse failures are
/// logged at debug level, never raised.
pub fn parse(text: &str) -> Option<Binding> {
    if text.is_empty() {
        return None;
    }
    let Some((kind, property)) = text.split_once(':') else {
        debug!(binding = text, "binding string has no kind separator");
        return None;
    };
    match kind {
        "Key" if !property.is_empty() => Some(Binding::Key(property.to_string())),
        "Mouse" => {
            let button = MouseButton::from_str(property);
            if button.is_none() {
                debug!(binding = text, "unknown mouse button in binding string");
            }
            button.map(Binding::Mouse)
        }
        _ => {
            debug!(binding = text, "unknown binding kind");
            None
        }
    }
}

/// Formats a binding back into its canonical string; `None` formats as `""`.
pub fn format(binding: Option<&Binding>) -> String {
    match binding {
        None => String::new(),
        Some(Binding::Key(key)) => format!("Key:{key}"),
        Some(Binding::Mouse(button)) => format!("Mouse:{}", button.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_binding() {
        assert_eq!(parse("Key:A"), Some(Binding::Key("A".to_string())));
        assert_eq!(parse("Key:Escape"), Some(Binding::Key("Escape".to_string())));
    }

    #[test]
    fn test_parse_mouse_binding() {
        assert_eq!(parse("Mouse:Left"), Some(Binding::Mouse(MouseButton::Left)));
        assert_eq!(parse("Mouse:Forward"), Some(Binding::Mouse(MouseButton::Forward)));
    }

    #[test]
    fn test_empty_string_is_unbound() {
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_unrecognised_strings_are_unbound_not_errors() {
        assert_eq!(parse("Gamepad:South"), None);
        assert_eq!(parse("Mouse:SideButton9"), None);
        assert_eq!(parse("Key:"), None);
        assert_eq!(parse("just-text"), None);
    }

    #[test]
    fn test_format_none_is_empty_string() {
        assert_eq!(format(None), "");
    }

    #[test]
    fn test_round_trip_for_constructible_bindings() {
        let bindings = [
            Binding::Key("A".to_string()),
            Binding::Key("F13".to_string()),
            Binding::Mouse(MouseButton::Left),
            Binding::Mouse(MouseButton::Middle),
            Binding::Mouse(MouseButton::Backward),
        ];

        for binding in bindings {
            let text = format(Some(&binding));
            assert_eq!(parse(&text), Some(binding), "format->parse must invert on {text}");
        }
    }

    #[test]
    fn test_round_trip_for_accepted_strings() {
        for text in ["Key:A", "Key:Space", "Mouse:Right", "Mouse:Forward"] {
            let parsed = parse(text);
            assert!(parsed.is_some(), "{text} must be accepted");
            assert_eq!(format(parsed.as_ref()), text);
        }
    }

    // ── Binding execution ─────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingInjector {
        keys: Vec<(String, bool)>,
        buttons: Vec<(MouseButton, bool)>,
    }

    impl InputInjector for RecordingInjector {
        fn key(&mut self, key: &str, pressed: bool) {
            self.keys.push((key.to_string(), pressed));
        }
        fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
            self.buttons.push((button, pressed));
        }
    }

    #[test]
    fn test_key_binding_press_release_reaches_injector() {
        let binding = Binding::Key("A".to_string());
        let mut injector = RecordingInjector::default();

        binding.press(&mut injector);
        binding.release(&mut injector);

        assert_eq!(
            injector.keys,
            vec![("A".to_string(), true), ("A".to_string(), false)]
        );
    }

    #[test]
    fn test_mouse_binding_press_reaches_injector() {
        let binding = Binding::Mouse(MouseButton::Right);
        let mut injector = RecordingInjector::default();

        binding.press(&mut injector);

        assert_eq!(injector.buttons, vec![(MouseButton::Right, true)]);
    }
}
