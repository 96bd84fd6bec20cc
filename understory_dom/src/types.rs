// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document seam: node identifiers, flags, and dimensions.

/// Identifier for an element in a host document (generational).
///
/// The first field is the slot index, the second the slot generation. A host
/// that reuses a slot bumps the generation, so a handle held across a removal
/// never aliases the element that replaced it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32, pub u32);

impl NodeId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element flags controlling focus eligibility.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Element accepts programmatic focus.
        const FOCUSABLE = 0b0000_0001;
        /// Element participates in sequential Tab traversal.
        const TAB_STOP  = 0b0000_0010;
        /// Element is disabled and must never receive focus.
        const DISABLED  = 0b0000_0100;
    }
}

impl NodeFlags {
    /// Flags for a menu item: focusable by arrow keys, skipped by Tab.
    pub const MENU_ITEM: Self = Self::FOCUSABLE;

    /// Flags for a regular control such as a button (focusable and a Tab stop).
    pub const CONTROL: Self = Self::FOCUSABLE.union(Self::TAB_STOP);

    /// Whether an element with these flags may receive focus at all.
    pub fn accepts_focus(self) -> bool {
        self.intersects(Self::FOCUSABLE | Self::TAB_STOP) && !self.contains(Self::DISABLED)
    }

    /// Whether these flags describe a focusable-but-not-tab-stoppable element.
    pub fn is_menu_item(self) -> bool {
        self.contains(Self::FOCUSABLE) && !self.intersects(Self::TAB_STOP | Self::DISABLED)
    }
}

/// Axis along which a collapse transition measures and animates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Animate the element's height.
    #[default]
    Height,
    /// Animate the element's width.
    Width,
}
