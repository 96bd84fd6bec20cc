// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Disclosure: the interaction core behind dropdowns, overlays and modals.
//!
//! ## Overview
//!
//! A disclosure is a trigger plus floating content whose visibility it
//! toggles. This crate owns the parts of that pairing that carry real
//! invariants:
//!
//! - [`Disclosure`]: the open/close state machine for a toggle and its menu,
//!   keyboard routing, focus handoff into the menu and back to the toggle.
//! - [`Overlay`]: positioned floating content with an enter/exit transition
//!   and optional root close.
//! - [`Modal`]: focus trapping, backdrop dismissal and scrollbar padding.
//! - [`OverlayPositioner`]: placement through a [`PlacementStrategy`].
//!
//! Everything is sans-IO. Components read and focus nodes through the
//! [`Dom`](understory_dom::Dom) seam, share one
//! [`ListenerRegistry`](understory_root_close::ListenerRegistry) for
//! document-level listeners, and report outward through notifier callbacks
//! and return values.
//!
//! ## Example
//!
//! ```rust
//! use understory_disclosure::{Disclosure, DisclosureParts, DisclosureProps};
//! use understory_dom::{Dom, Key, MemoryDom, NodeFlags, UiEvent};
//! use understory_root_close::ListenerRegistry;
//!
//! let mut dom = MemoryDom::new();
//! let body = dom.create_root();
//! let root = dom.insert(Some(body), NodeFlags::empty());
//! let toggle = dom.insert(Some(root), NodeFlags::CONTROL);
//! let menu = dom.insert(Some(root), NodeFlags::empty());
//! let first = dom.insert(Some(menu), NodeFlags::MENU_ITEM);
//! let _second = dom.insert(Some(menu), NodeFlags::MENU_ITEM);
//!
//! let registry = ListenerRegistry::new();
//! let props = DisclosureProps { id: Some("actions".into()), ..DisclosureProps::default() };
//! let mut dropdown = Disclosure::new(props, DisclosureParts::new(root, toggle, menu), registry.clone());
//! dropdown.mount(&mut dom);
//! dom.focus(toggle).unwrap();
//!
//! // ArrowDown on a closed toggle opens and moves focus into the menu.
//! let mut key = UiEvent::key_down(toggle, Key::ArrowDown);
//! dropdown.handle_keydown(&mut dom, &mut key);
//! assert!(dropdown.is_open());
//! assert_eq!(dom.active_element(), Some(first));
//!
//! // Escape closes and hands focus back to the toggle.
//! let mut key = UiEvent::key_down(first, Key::Escape);
//! dropdown.handle_keydown(&mut dom, &mut key);
//! assert!(!dropdown.is_open());
//! assert_eq!(dom.active_element(), Some(toggle));
//! assert_eq!(registry.attached_listener_count(), 0);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` floating-point support for `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod disclosure;
mod modal;
mod overlay;
mod parts;
pub mod placement;

pub use disclosure::{
    ClassNames, CloseSource, Disclosure, DisclosureContext, DisclosurePhase, DisclosureProps, EventSource,
    ExitMode, MenuAttributes, OpenSource, Role, SelectNotifier, ToggleAttributes, ToggleDetails, ToggleNotifier,
    ToggleSource,
};
pub use modal::{Backdrop, Modal, ModalMetrics, ModalOptions, ModalStyle};
pub use overlay::{HideNotifier, Overlay, OverlayGeometry, OverlayOptions};
pub use parts::{DisclosureParts, PartRole, StructureError};
pub use placement::{CenteredStrategy, OverlayPosition, OverlayPositioner, Placement, PlacementStrategy};
