// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Roving focus for tab lists.
//!
//! In a `tablist`, only the active tab is a Tab stop; arrow keys select the
//! neighboring enabled tab. Selection changes are reported to the owner, who
//! re-renders with the new active key; focus then follows the selection via
//! [`RovingTabs::refocus`] once the new active tab exists in the document.
//!
//! ```rust
//! use understory_dom::{Key, NodeId, UiEvent};
//! use understory_focus::roving::{RovingTabs, TabItem};
//!
//! let tabs = [
//!     TabItem::new(1_u32),
//!     TabItem::disabled(2),
//!     TabItem::new(3),
//! ];
//! let mut roving = RovingTabs::new();
//! let mut ev = UiEvent::key_down(NodeId(0, 1), Key::ArrowRight);
//! // The disabled tab is skipped.
//! assert_eq!(roving.handle_key_down(&tabs, Some(&1), &mut ev), Some(3));
//! assert!(ev.default_prevented());
//! assert!(roving.needs_refocus());
//! ```

use understory_dom::{Dom, Key, NodeId, UiEvent};

/// A tab as seen by keyboard navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabItem<K> {
    /// Selection key of the tab.
    pub key: K,
    /// Disabled tabs are never selected by arrow keys.
    pub disabled: bool,
}

impl<K> TabItem<K> {
    /// An enabled tab.
    pub fn new(key: K) -> Self {
        Self {
            key,
            disabled: false,
        }
    }

    /// A disabled tab.
    pub fn disabled(key: K) -> Self {
        Self {
            key,
            disabled: true,
        }
    }
}

/// Arrow-key selection state for a tab list.
#[derive(Clone, Debug, Default)]
pub struct RovingTabs {
    needs_refocus: bool,
}

impl RovingTabs {
    /// Create a tab-list navigator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press on a tab.
    ///
    /// Left/Up select the previous enabled tab and Right/Down the next one,
    /// wrapping at both ends. If the active key is not among the enabled tabs,
    /// the first enabled tab is selected. Handled keys prevent the default
    /// action and schedule a refocus; other keys return `None` untouched.
    pub fn handle_key_down<K: Clone + PartialEq>(
        &mut self,
        items: &[TabItem<K>],
        active: Option<&K>,
        event: &mut UiEvent,
    ) -> Option<K> {
        let offset: isize = match event.key {
            Some(Key::ArrowLeft | Key::ArrowUp) => -1,
            Some(Key::ArrowRight | Key::ArrowDown) => 1,
            _ => return None,
        };
        event.prevent_default();
        self.needs_refocus = true;
        next_active(items, active, offset)
    }

    /// Whether a handled key press is waiting for the re-rendered tab to be focused.
    pub fn needs_refocus(&self) -> bool {
        self.needs_refocus
    }

    /// Run after the owner re-rendered: focus `active_node` once if a refocus is pending.
    ///
    /// Returns whether focus moved. The pending flag is cleared either way, so
    /// a missing node does not leave a stale refocus behind.
    pub fn refocus<D: Dom + ?Sized>(&mut self, dom: &mut D, active_node: Option<NodeId>) -> bool {
        if !core::mem::take(&mut self.needs_refocus) {
            return false;
        }
        let Some(node) = active_node else {
            return false;
        };
        match dom.focus(node) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(?node, %err, "active tab refused focus");
                false
            }
        }
    }

    /// Tab index for a tab: `0` for the active tab, `-1` for the others.
    pub fn tab_index<K: PartialEq>(key: &K, active: Option<&K>) -> i32 {
        if active == Some(key) { 0 } else { -1 }
    }
}

fn next_active<K: Clone + PartialEq>(
    items: &[TabItem<K>],
    active: Option<&K>,
    offset: isize,
) -> Option<K> {
    let valid: alloc::vec::Vec<&TabItem<K>> = items.iter().filter(|t| !t.disabled).collect();
    let first = valid.first()?;
    let Some(pos) = active.and_then(|a| valid.iter().position(|t| t.key == *a)) else {
        return Some(first.key.clone());
    };
    #[allow(
        clippy::cast_possible_wrap,
        reason = "Tab lists are far smaller than isize::MAX."
    )]
    let len = valid.len() as isize;
    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        reason = "Index is reduced modulo a positive length."
    )]
    let next = (pos as isize + offset).rem_euclid(len) as usize;
    Some(valid[next].key.clone())
}
