// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Root Close: outside-interaction detection for floating content.
//!
//! ## Overview
//!
//! A floating element (dropdown menu, popover, modal) is dismissed when the
//! user interacts *outside* of it: a click or press elsewhere in the document,
//! or Escape. This crate decides which open overlay, if any, that interaction
//! dismisses. It never runs callbacks itself; [`ListenerRegistry::dispatch`]
//! returns a [`Delivery`] the host routes to the owning component.
//!
//! ## Listeners
//!
//! Document-level listeners are a shared resource. The [`ListenerRegistry`]
//! keeps one real listener per [`EventKind`](understory_dom::EventKind) and
//! any number of logical subscribers, reference counted. A
//! [`ListenerHost`] is told to attach exactly when a kind gains its first
//! subscriber and to detach when it loses its last one.
//!
//! Subscriptions are disposal objects: dropping a [`RootCloseSubscription`]
//! or [`ListenerSubscription`] (or calling `deactivate`) releases its
//! listener references, so every activation is structurally paired with a
//! release.
//!
//! ## Ordering
//!
//! Subscriptions are consulted most-recently-activated first, so a nested
//! overlay opened from within another one sees the event before its parent.
//! For each root-close subscription listening for the event's kind:
//!
//! - target inside its boundary: the overlay keeps the event and stays open;
//! - target outside (or the boundary left the document): that overlay is dismissed;
//! - boundary encloses an overlay already visited: skipped, so the parent of
//!   a nested overlay outlives its child.
//!
//! The result does not depend on whether the host runs element handlers
//! before or after the document listeners. Escape dismisses only the
//! innermost overlay and stops the event's propagation; a handler that
//! consumed an event first (see
//! [`UiEvent::stop_propagation`](understory_dom::UiEvent::stop_propagation))
//! keeps it from reaching the registry.
//!
//! ## Example
//!
//! ```rust
//! use understory_dom::{MemoryDom, NodeFlags, UiEvent};
//! use understory_root_close::{Delivery, ListenerRegistry, RootCloseEvent};
//!
//! let mut dom = MemoryDom::new();
//! let body = dom.create_root();
//! let dropdown = dom.insert(Some(body), NodeFlags::empty());
//! let toggle = dom.insert(Some(dropdown), NodeFlags::CONTROL);
//! let elsewhere = dom.insert(Some(body), NodeFlags::CONTROL);
//!
//! let registry = ListenerRegistry::new();
//! let sub = registry.activate([dropdown], RootCloseEvent::Click);
//!
//! // Clicking the toggle is not a root close: the toggle handles itself.
//! assert_eq!(registry.dispatch(&mut UiEvent::click(toggle), &dom), Delivery::Inside(sub.id()));
//! // Clicking elsewhere dismisses the dropdown.
//! let delivery = registry.dispatch(&mut UiEvent::click(elsewhere), &dom);
//! assert!(delivery.dismisses(sub.id()));
//!
//! drop(sub);
//! assert_eq!(registry.attached_listener_count(), 0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod registry;
mod subscription;

pub use registry::{Delivery, Dismissed, ListenerHost, ListenerRegistry, RootCloseEvent, SubscriptionId};
pub use subscription::{ListenerSubscription, RootCloseSubscription};
