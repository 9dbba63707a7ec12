//! Pointer and input-event sinks.
//!
//! The platform cursor and keyboard injection are external collaborators
//! behind [`VirtualPointer`] and [`InputInjector`].  This module provides
//! the logging sinks the daemon binary uses when no platform backend is
//! wired up, and recording sinks for tests that assert on the event
//! stream an output mode produced.

use std::sync::{Arc, Mutex};

use tablet_core::{InputInjector, MouseButton, VirtualPointer};
use tracing::trace;

/// A pointer sink that logs every motion at trace level.
pub struct TracingPointer;

impl VirtualPointer for TracingPointer {
    fn set_position(&mut self, x: f32, y: f32) {
        trace!(x, y, "pointer absolute position");
    }

    fn move_by(&mut self, dx: f32, dy: f32) {
        trace!(dx, dy, "pointer relative motion");
    }
}

/// An injector sink that logs every event at trace level.
pub struct TracingInjector;

impl InputInjector for TracingInjector {
    fn key(&mut self, key: &str, pressed: bool) {
        trace!(key, pressed, "key event");
    }

    fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
        trace!(button = button.as_str(), pressed, "mouse button event");
    }
}

/// One pointer motion observed by [`RecordingPointer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    SetPosition { x: f32, y: f32 },
    MoveBy { dx: f32, dy: f32 },
}

/// A pointer sink recording every motion, shared with the test through
/// clones.
#[derive(Clone, Default)]
pub struct RecordingPointer {
    events: Arc<Mutex<Vec<PointerEvent>>>,
}

impl RecordingPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PointerEvent> {
        self.events.lock().expect("lock poisoned").clone()
    }
}

impl VirtualPointer for RecordingPointer {
    fn set_position(&mut self, x: f32, y: f32) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(PointerEvent::SetPosition { x, y });
    }

    fn move_by(&mut self, dx: f32, dy: f32) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(PointerEvent::MoveBy { dx, dy });
    }
}

/// One injected event observed by [`RecordingInjector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedEvent {
    Key { key: String, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
}

/// An injector sink recording every event, shared with the test through
/// clones.
#[derive(Clone, Default)]
pub struct RecordingInjector {
    events: Arc<Mutex<Vec<InjectedEvent>>>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<InjectedEvent> {
        self.events.lock().expect("lock poisoned").clone()
    }
}

impl InputInjector for RecordingInjector {
    fn key(&mut self, key: &str, pressed: bool) {
        self.events.lock().expect("lock poisoned").push(InjectedEvent::Key {
            key: key.to_string(),
            pressed,
        });
    }

    fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(InjectedEvent::MouseButton { button, pressed });
    }
}
