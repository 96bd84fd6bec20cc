// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DOM: the host document seam for interaction cores.
//!
//! The disclosure, root-close, focus, and transition crates never talk to a
//! concrete toolkit. They talk to a [`Dom`]: a small trait that answers tree
//! questions (parent, children, containment), tracks keyboard focus, and
//! exposes the handful of layout reads and inline dimension styles that
//! collapse-style transitions need.
//!
//! - [`NodeId`]: generational handle of an element. Stale once removed.
//! - [`NodeFlags`]: focusability controls. Menu items are
//!   [`NodeFlags::FOCUSABLE`] without [`NodeFlags::TAB_STOP`]: reachable by
//!   arrow keys or programmatic focus, skipped by sequential Tab traversal.
//! - [`UiEvent`]: the originating event handed to handlers and notifiers.
//! - [`MemoryDom`]: an in-memory [`Dom`] for tests, demos, and headless hosts.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_dom::{Dom, MemoryDom, NodeFlags};
//!
//! let mut dom = MemoryDom::new();
//! let root = dom.create_root();
//! let menu = dom.insert(Some(root), NodeFlags::empty());
//! let item = dom.insert(Some(menu), NodeFlags::FOCUSABLE);
//!
//! assert!(dom.contains(menu, item));
//! dom.focus(item).unwrap();
//! assert_eq!(dom.active_element(), Some(item));
//!
//! // Removing the menu takes focus with it.
//! dom.remove(menu);
//! assert!(!dom.contains(root, item));
//! assert_eq!(dom.active_element(), None);
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

mod dom;
mod event;
mod memory;
mod types;

pub use dom::{Dom, DomError};
pub use event::{EventKind, Key, UiEvent};
pub use memory::{MemoryDom, Metrics};
pub use types::{Dimension, NodeFlags, NodeId};
