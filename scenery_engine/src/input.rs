// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard, mouse-button, and wheel input state.

use alloc::string::String;
use alloc::vec::Vec;

use scenery_graph::{KeyEvent, Modifiers, Phase};

/// Mouse button identifier. Only [`MouseButton::Primary`] starts a press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button.
    Primary,
    /// Right button.
    Secondary,
    /// Wheel button.
    Middle,
    /// Any other button by index.
    Other(u16),
}

/// A raw key press or release as reported by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyInput {
    /// Logical key value.
    pub key: String,
    /// Physical key code; held keys are tracked by code, falling back to `key`.
    pub code: String,
    /// Modifier state.
    pub modifiers: Modifiers,
}

impl KeyInput {
    /// A key with matching `key` and `code` and no modifiers.
    pub fn new(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            modifiers: Modifiers::default(),
        }
    }

    fn slot(&self) -> &str {
        if self.code.is_empty() {
            &self.key
        } else {
            &self.code
        }
    }

    pub(crate) fn event(&self, phase: Phase, frame: u64) -> KeyEvent {
        KeyEvent {
            key: self.key.clone(),
            code: self.code.clone(),
            modifiers: self.modifiers,
            phase,
            frame,
        }
    }
}

#[derive(Clone, Debug)]
struct HeldKey {
    input: KeyInput,
    frames: u64,
}

/// Keys currently held down, in press order.
#[derive(Clone, Debug, Default)]
pub struct KeyboardState {
    held: Vec<HeldKey>,
}

impl KeyboardState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press. Returns the `Began` event, or `None` for auto-repeat of
    /// a key already held.
    pub fn press(&mut self, input: KeyInput) -> Option<KeyEvent> {
        if self.is_held(input.slot()) {
            return None;
        }
        let event = input.event(Phase::Began, 0);
        self.held.push(HeldKey { input, frames: 0 });
        Some(event)
    }

    /// Record a release. Returns the `Ended` event carrying the number of
    /// frames the key was held (0 if it was not tracked).
    pub fn release(&mut self, input: &KeyInput) -> KeyEvent {
        let frames = match self.held.iter().position(|h| h.input.slot() == input.slot()) {
            Some(pos) => self.held.remove(pos).frames,
            None => 0,
        };
        input.event(Phase::Ended, frames)
    }

    /// Advance held keys by one frame, returning the `Hold` events due.
    ///
    /// A key emits `Hold` from the second tick it is held on.
    pub fn advance(&mut self) -> Vec<KeyEvent> {
        let mut due = Vec::new();
        for held in &mut self.held {
            if held.frames > 0 {
                due.push(held.input.event(Phase::Hold, held.frames));
            }
            held.frames += 1;
        }
        due
    }

    /// Returns `true` if the key with this code (or key value) is down.
    pub fn is_held(&self, code: &str) -> bool {
        self.held.iter().any(|h| h.input.slot() == code)
    }
}
