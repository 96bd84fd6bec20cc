// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Transition: enter/exit sequencing for floating content.
//!
//! A [`Transition`] wraps a shown/hidden boolean into animation phases so that
//! content is not unmounted mid-animation and completion fires exactly once
//! per phase. It does not animate anything itself: a [`TransitionStyle`]
//! applies the start and end styles, the host's CSS (or equivalent) does the
//! animating, and the host reports back with
//! [`Transition::on_transition_end`] or lets [`Transition::poll`] fire the
//! timeout fallback.
//!
//! ## Sequencing
//!
//! - [`Transition::enter`]: emits [`TransitionEvent::Enter`], forces a layout
//!   read so the starting style is registered, then emits
//!   [`TransitionEvent::Entering`]. [`TransitionEvent::Entered`] follows on the
//!   transition-end signal or once the timeout elapses, whichever comes first.
//! - [`Transition::exit`]: the same with `Exit`, `Exiting`, and `Exited`.
//! - With [`TransitionConfig::enabled`] off, all three events are returned
//!   synchronously.
//! - Entering while an exit is in flight supersedes it: the exit's completion
//!   never fires. The reverse holds too.
//!
//! ## Example
//!
//! ```rust
//! use understory_dom::{MemoryDom, NodeFlags};
//! use understory_transition::{Fade, Transition, TransitionConfig, TransitionEvent};
//!
//! let mut dom = MemoryDom::new();
//! let body = dom.create_root();
//! let popover = dom.insert(Some(body), NodeFlags::empty());
//!
//! let mut fade = Transition::new(Fade, TransitionConfig::default());
//! let events = fade.enter(&mut dom, popover, 0);
//! assert_eq!(events.as_slice(), &[TransitionEvent::Enter, TransitionEvent::Entering]);
//!
//! // No transition-end arrived: the 300ms fallback completes the phase.
//! assert_eq!(fade.poll(&mut dom, 299), None);
//! assert_eq!(fade.poll(&mut dom, 300), Some(TransitionEvent::Entered));
//! assert_eq!(fade.poll(&mut dom, 600), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod coordinator;
mod styles;

pub use coordinator::{Transition, TransitionConfig, TransitionEvent, TransitionEvents, TransitionStatus};
pub use styles::{ClassList, Collapse, Fade, TransitionStyle};
