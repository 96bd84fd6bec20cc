// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Focus: keyboard focus navigation primitives.
//!
//! This crate models arrow-key navigation inside floating content as a
//! combination of:
//! - **Navigation intents** ([`Navigation`]) such as [`Navigation::Next`] and
//!   [`Navigation::Prev`].
//! - A **registry query** ([`focusable_items`]) that finds the ordered menu items of a
//!   container: descendants that accept programmatic focus but are not Tab stops.
//! - A **cursor** ([`FocusCursor`]) that derives the active index from the
//!   document's focused element on every call and moves focus circularly.
//! - A **roving tab list** ([`roving::RovingTabs`]) for tab strips, where arrow keys
//!   select the next enabled tab and focus follows the selection after re-render.
//!
//! Items are never cached: the cursor re-queries the [`Dom`] each time, so
//! children added, removed, or disabled between key presses are honored.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_dom::{Dom, MemoryDom, NodeFlags};
//! use understory_focus::FocusCursor;
//!
//! let mut dom = MemoryDom::new();
//! let root = dom.create_root();
//! let menu = dom.insert(Some(root), NodeFlags::empty());
//! let a = dom.insert(Some(menu), NodeFlags::MENU_ITEM);
//! let b = dom.insert(Some(menu), NodeFlags::MENU_ITEM);
//!
//! let cursor = FocusCursor::default();
//!
//! // Nothing focused inside the menu yet: Next lands on the first item…
//! assert_eq!(cursor.focus_next(&mut dom, menu), Some(a));
//! assert_eq!(cursor.focus_next(&mut dom, menu), Some(b));
//! // …and wraps back around.
//! assert_eq!(cursor.focus_next(&mut dom, menu), Some(a));
//! assert_eq!(dom.active_element(), Some(a));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod roving;

use alloc::vec::Vec;

use understory_dom::{Dom, NodeId};

/// Direction of focus navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move to the next item (for example, ArrowDown).
    Next,
    /// Move to the previous item (for example, ArrowUp).
    Prev,
}

/// Wrap mode configuration for focus traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Do not wrap; reaching either end yields no candidate.
    Never,
    /// Wrap around: past the last item is the first, before the first is the last.
    #[default]
    Wrap,
}

/// Ordered focusable items of `container`.
///
/// Returns the descendants that are focusable but not tab-stoppable and not
/// disabled, in document order. Returns an empty list if the container is not
/// currently attached.
pub fn focusable_items<D: Dom + ?Sized>(dom: &D, container: NodeId) -> Vec<NodeId> {
    dom.descendants(container)
        .into_iter()
        .filter(|&n| dom.flags(n).is_some_and(|f| f.is_menu_item()))
        .collect()
}

/// Circular focus cursor over the focusable items of a container.
///
/// The cursor holds no per-menu state: `items` and the active index are
/// derived from the [`Dom`] on each call.
#[derive(Copy, Clone, Debug, Default)]
pub struct FocusCursor {
    /// Wrap behavior at either end of the item list.
    pub wrap: WrapMode,
}

impl FocusCursor {
    /// Create a cursor with the given wrap behavior.
    pub fn new(wrap: WrapMode) -> Self {
        Self { wrap }
    }

    /// Index of the document's focused element within `items`, if any.
    pub fn active_index<D: Dom + ?Sized>(dom: &D, items: &[NodeId]) -> Option<usize> {
        let active = dom.active_element()?;
        items.iter().position(|&n| n == active)
    }

    /// Compute the item `direction` would focus, without moving focus.
    pub fn target<D: Dom + ?Sized>(
        &self,
        dom: &D,
        container: NodeId,
        direction: Navigation,
    ) -> Option<NodeId> {
        let items = focusable_items(dom, container);
        let active = Self::active_index(dom, &items);
        step(active, items.len(), direction, self.wrap).map(|i| items[i])
    }

    /// Move focus in `direction` and return the newly focused item.
    ///
    /// Returns `None` (and leaves focus alone) when there are no items, when
    /// [`WrapMode::Never`] stops at an edge, or when the host refuses focus.
    pub fn navigate<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        container: NodeId,
        direction: Navigation,
    ) -> Option<NodeId> {
        let target = self.target(dom, container, direction)?;
        match dom.focus(target) {
            Ok(()) => Some(target),
            Err(err) => {
                tracing::debug!(?target, %err, "menu item refused focus");
                None
            }
        }
    }

    /// Focus the item after the active one; the first item when none is active.
    pub fn focus_next<D: Dom + ?Sized>(&self, dom: &mut D, container: NodeId) -> Option<NodeId> {
        self.navigate(dom, container, Navigation::Next)
    }

    /// Focus the item before the active one; the last item when none is active.
    pub fn focus_previous<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        container: NodeId,
    ) -> Option<NodeId> {
        self.navigate(dom, container, Navigation::Prev)
    }
}

fn step(active: Option<usize>, len: usize, direction: Navigation, wrap: WrapMode) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match (direction, active) {
        (Navigation::Next, None) => Some(0),
        (Navigation::Prev, None) => Some(len - 1),
        (Navigation::Next, Some(i)) if i + 1 < len => Some(i + 1),
        (Navigation::Prev, Some(i)) if i > 0 => Some(i - 1),
        (Navigation::Next, Some(_)) => (wrap == WrapMode::Wrap).then_some(0),
        (Navigation::Prev, Some(_)) => (wrap == WrapMode::Wrap).then_some(len - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_dom::{MemoryDom, NodeFlags};

    fn menu(flags: &[NodeFlags]) -> (MemoryDom, NodeId, NodeId, Vec<NodeId>) {
        let mut dom = MemoryDom::new();
        let root = dom.create_root();
        let trigger = dom.insert(Some(root), NodeFlags::CONTROL);
        let menu = dom.insert(Some(root), NodeFlags::empty());
        let items = flags
            .iter()
            .map(|&f| {
                // Menu markup wraps each anchor in a list item.
                let li = dom.insert(Some(menu), NodeFlags::empty());
                dom.insert(Some(li), f)
            })
            .collect();
        (dom, trigger, menu, items)
    }

    #[test]
    fn registry_skips_tab_stops_and_disabled() {
        let (dom, _, menu, items) = menu(&[
            NodeFlags::MENU_ITEM,
            NodeFlags::CONTROL,
            NodeFlags::MENU_ITEM | NodeFlags::DISABLED,
            NodeFlags::MENU_ITEM,
        ]);
        assert_eq!(focusable_items(&dom, menu), vec![items[0], items[3]]);
    }

    #[test]
    fn registry_is_empty_for_unmounted_container() {
        let (mut dom, _, menu, _) = menu(&[NodeFlags::MENU_ITEM]);
        dom.detach(menu);
        assert!(focusable_items(&dom, menu).is_empty());
        assert_eq!(FocusCursor::default().focus_next(&mut dom, menu), None);
    }

    #[test]
    fn next_from_outside_focuses_first() {
        let (mut dom, trigger, menu, items) = menu(&[NodeFlags::MENU_ITEM; 3]);
        dom.focus(trigger).unwrap();
        let cursor = FocusCursor::default();
        assert_eq!(cursor.focus_next(&mut dom, menu), Some(items[0]));
        assert_eq!(dom.active_element(), Some(items[0]));
    }

    #[test]
    fn previous_from_first_wraps_to_last() {
        let (mut dom, _, menu, items) = menu(&[NodeFlags::MENU_ITEM; 3]);
        dom.focus(items[0]).unwrap();
        let cursor = FocusCursor::default();
        assert_eq!(cursor.focus_previous(&mut dom, menu), Some(items[2]));
    }

    #[test]
    fn previous_from_outside_focuses_last() {
        let (mut dom, _, menu, items) = menu(&[NodeFlags::MENU_ITEM; 3]);
        let cursor = FocusCursor::default();
        assert_eq!(cursor.focus_previous(&mut dom, menu), Some(items[2]));
    }

    #[test]
    fn navigation_skips_disabled_item() {
        let (mut dom, _, menu, items) = menu(&[
            NodeFlags::MENU_ITEM,
            NodeFlags::MENU_ITEM | NodeFlags::DISABLED,
            NodeFlags::MENU_ITEM,
        ]);
        let cursor = FocusCursor::default();
        dom.focus(items[0]).unwrap();
        assert_eq!(cursor.focus_next(&mut dom, menu), Some(items[2]));
        assert_eq!(cursor.focus_previous(&mut dom, menu), Some(items[0]));
    }

    #[test]
    fn items_are_recomputed_between_calls() {
        let (mut dom, _, menu, items) = menu(&[NodeFlags::MENU_ITEM; 3]);
        let cursor = FocusCursor::default();
        dom.focus(items[0]).unwrap();
        dom.set_flags(items[1], NodeFlags::MENU_ITEM | NodeFlags::DISABLED);
        assert_eq!(cursor.focus_next(&mut dom, menu), Some(items[2]));
    }

    #[test]
    fn no_wrap_stops_at_edges() {
        let (mut dom, _, menu, items) = menu(&[NodeFlags::MENU_ITEM; 2]);
        let cursor = FocusCursor::new(WrapMode::Never);
        dom.focus(items[1]).unwrap();
        assert_eq!(cursor.focus_next(&mut dom, menu), None);
        assert_eq!(dom.active_element(), Some(items[1]));
        dom.focus(items[0]).unwrap();
        assert_eq!(cursor.focus_previous(&mut dom, menu), None);
    }

    #[test]
    fn empty_menu_is_a_no_op() {
        let (mut dom, trigger, menu, _) = menu(&[]);
        dom.focus(trigger).unwrap();
        let cursor = FocusCursor::default();
        assert_eq!(cursor.focus_next(&mut dom, menu), None);
        assert_eq!(cursor.focus_previous(&mut dom, menu), None);
        assert_eq!(dom.active_element(), Some(trigger));
    }

    #[test]
    fn step_math() {
        assert_eq!(step(None, 0, Navigation::Next, WrapMode::Wrap), None);
        assert_eq!(step(Some(2), 3, Navigation::Next, WrapMode::Wrap), Some(0));
        assert_eq!(step(Some(0), 3, Navigation::Prev, WrapMode::Wrap), Some(2));
        assert_eq!(step(Some(1), 3, Navigation::Prev, WrapMode::Never), Some(0));
    }
}
