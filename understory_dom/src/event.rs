// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events handed to interaction handlers and state-change notifiers.

use crate::NodeId;

/// Kind of a document-level event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Pointer click (press and release on the same element).
    Click,
    /// Pointer press.
    MouseDown,
    /// Key press.
    KeyDown,
    /// Focus moved to `target`.
    Focus,
    /// Window resize.
    Resize,
}

/// Keys the interaction core reacts to.
///
/// Everything else is reported as [`Key::Other`] and ignored by the core.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Down arrow.
    ArrowDown,
    /// Up arrow.
    ArrowUp,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Escape.
    Escape,
    /// Tab (with or without Shift).
    Tab,
    /// Enter.
    Enter,
    /// Any other key.
    Other,
}

/// An input event as seen by the interaction core.
///
/// Handlers receive `&mut UiEvent` so they can record [`UiEvent::prevent_default`]
/// and [`UiEvent::stop_propagation`]; notifiers receive `&UiEvent` as the
/// "original event" of a state change.
///
/// A handler that consumed the event stops its propagation. Handlers running
/// later for the same physical event, element handlers and document listeners
/// alike, leave a stopped event alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiEvent {
    /// What happened.
    pub kind: EventKind,
    /// Element the event was dispatched to, if any.
    pub target: Option<NodeId>,
    /// Key for [`EventKind::KeyDown`] events.
    pub key: Option<Key>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl UiEvent {
    /// Create an event of `kind` targeted at `target`.
    pub fn new(kind: EventKind, target: Option<NodeId>) -> Self {
        Self {
            kind,
            target,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// A click on `target`.
    pub fn click(target: NodeId) -> Self {
        Self::new(EventKind::Click, Some(target))
    }

    /// A pointer press on `target`.
    pub fn mouse_down(target: NodeId) -> Self {
        Self::new(EventKind::MouseDown, Some(target))
    }

    /// A key press dispatched to `target`.
    pub fn key_down(target: NodeId, key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyDown, Some(target))
        }
    }

    /// Focus arriving at `target`.
    pub fn focus(target: NodeId) -> Self {
        Self::new(EventKind::Focus, Some(target))
    }

    /// A window resize.
    pub fn resize() -> Self {
        Self::new(EventKind::Resize, None)
    }

    /// Suppress the host's default action for this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a handler suppressed the default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Mark the event as consumed.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether a handler already consumed the event.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Whether this is a key press of `key`.
    pub fn is_key(&self, key: Key) -> bool {
        self.kind == EventKind::KeyDown && self.key == Some(key)
    }
}
