// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference-counted document listener registry.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use hashbrown::HashMap;
use smallvec::SmallVec;
use understory_dom::{Dom, EventKind, Key, NodeId, UiEvent};

use crate::subscription::{Handle, ListenerSubscription, RootCloseSubscription};

/// Identifier of a logical subscriber.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Which pointer event counts as a root close.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RootCloseEvent {
    /// Dismiss on click (press and release).
    #[default]
    Click,
    /// Dismiss on press, before the click completes.
    MouseDown,
}

impl RootCloseEvent {
    /// The document event kind this maps to.
    pub fn kind(self) -> EventKind {
        match self {
            Self::Click => EventKind::Click,
            Self::MouseDown => EventKind::MouseDown,
        }
    }
}

/// Receives real listener attach/detach requests.
///
/// Implementations must not call back into the registry.
pub trait ListenerHost {
    /// Attach the single document listener for `kind`.
    fn attach(&mut self, kind: EventKind);
    /// Detach the document listener for `kind`.
    fn detach(&mut self, kind: EventKind);
}

/// Root-close subscriptions dismissed by one event, innermost first.
pub type Dismissed = SmallVec<[SubscriptionId; 2]>;

/// Outcome of dispatching one document event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// No subscriber listens for this event.
    Unhandled,
    /// The event landed inside the boundary of this subscription; nothing is dismissed.
    Inside(SubscriptionId),
    /// The owners of these subscriptions must dismiss their overlays.
    Dismiss(Dismissed),
    /// Plain subscribers to notify, most recently subscribed first.
    Notify(SmallVec<[SubscriptionId; 4]>),
}

impl Delivery {
    /// Whether the owner of `id` must dismiss its overlay.
    pub fn dismisses(&self, id: SubscriptionId) -> bool {
        matches!(self, Self::Dismiss(ids) if ids.contains(&id))
    }
}

#[derive(Debug)]
enum Interest {
    RootClose {
        boundary: SmallVec<[NodeId; 2]>,
        event: RootCloseEvent,
    },
    Plain(EventKind),
}

impl Interest {
    fn kinds(&self) -> SmallVec<[EventKind; 2]> {
        match self {
            Self::RootClose { event, .. } => [event.kind(), EventKind::KeyDown].into_iter().collect(),
            Self::Plain(kind) => [*kind].into_iter().collect(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    id: SubscriptionId,
    interest: Interest,
}

#[derive(Default)]
pub(crate) struct RegistryState {
    next_id: u64,
    /// Activation order; dispatch walks it back to front.
    entries: Vec<Entry>,
    counts: HashMap<EventKind, usize>,
    host: Option<Box<dyn ListenerHost>>,
}

impl RegistryState {
    fn add(&mut self, interest: Interest) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        for kind in interest.kinds() {
            let count = self.counts.entry(kind).or_insert(0);
            *count += 1;
            if *count == 1 {
                tracing::trace!(?kind, "attaching document listener");
                if let Some(host) = self.host.as_mut() {
                    host.attach(kind);
                }
            }
        }
        self.entries.push(Entry { id, interest });
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) {
        let Some(pos) = self.entries.iter().position(|e| e.id == id) else {
            return;
        };
        let entry = self.entries.remove(pos);
        for kind in entry.interest.kinds() {
            let Some(count) = self.counts.get_mut(&kind) else {
                continue;
            };
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&kind);
                tracing::trace!(?kind, "detaching document listener");
                if let Some(host) = self.host.as_mut() {
                    host.detach(kind);
                }
            }
        }
    }
}

/// Shared registry of document-level listeners.
///
/// Cloning yields another handle to the same registry. The registry is meant
/// for a single-threaded UI event loop.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryState>>,
}

impl core::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("ListenerRegistry")
            .field("subscribers", &state.entries.len())
            .field("attached", &state.counts.len())
            .finish_non_exhaustive()
    }
}

impl ListenerRegistry {
    /// Create a registry without a listener host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that forwards attach/detach requests to `host`.
    pub fn with_host(host: impl ListenerHost + 'static) -> Self {
        let state = RegistryState {
            host: Some(Box::new(host)),
            ..RegistryState::default()
        };
        Self {
            inner: Rc::new(RefCell::new(state)),
        }
    }

    /// Start listening for root-close interactions outside `boundary`.
    ///
    /// The subscription listens for `event` pointer interactions and for
    /// Escape. It stays active until deactivated or dropped.
    pub fn activate(
        &self,
        boundary: impl IntoIterator<Item = NodeId>,
        event: RootCloseEvent,
    ) -> RootCloseSubscription {
        let boundary: SmallVec<[NodeId; 2]> = boundary.into_iter().collect();
        let id = self
            .inner
            .borrow_mut()
            .add(Interest::RootClose { boundary, event });
        RootCloseSubscription::new(Handle::new(id, &self.inner))
    }

    /// Subscribe to every event of `kind` without boundary filtering.
    pub fn subscribe(&self, kind: EventKind) -> ListenerSubscription {
        let id = self.inner.borrow_mut().add(Interest::Plain(kind));
        ListenerSubscription::new(Handle::new(id, &self.inner))
    }

    /// Decide who handles a document-level `event`.
    ///
    /// Pointer events are checked against every root-close subscription
    /// listening for their kind, innermost first. A subscription whose
    /// boundary holds the target claims the event; any other is dismissed,
    /// unless its boundary encloses a subscription already visited for this
    /// event. Parents of a nested overlay thus stay open while unrelated
    /// overlays close.
    ///
    /// Escape dismisses the innermost subscription and stops the event's
    /// propagation so element handlers leave it alone. An event whose
    /// propagation was already stopped is not delivered at all.
    pub fn dispatch<D: Dom + ?Sized>(&self, event: &mut UiEvent, dom: &D) -> Delivery {
        if event.propagation_stopped() {
            return Delivery::Unhandled;
        }
        let state = self.inner.borrow();
        match event.kind {
            EventKind::Click | EventKind::MouseDown => {
                let mut owner = None;
                let mut dismissed = Dismissed::new();
                let mut visited: SmallVec<[&[NodeId]; 4]> = SmallVec::new();
                for e in state.entries.iter().rev() {
                    let Interest::RootClose {
                        boundary,
                        event: listen,
                    } = &e.interest
                    else {
                        continue;
                    };
                    if listen.kind() != event.kind {
                        continue;
                    }
                    let encloses_visited = visited
                        .iter()
                        .any(|inner| inner.iter().any(|&n| boundary.iter().any(|&b| dom.contains(b, n))));
                    visited.push(boundary.as_slice());
                    if encloses_visited {
                        continue;
                    }
                    let inside = event
                        .target
                        .is_some_and(|t| boundary.iter().any(|&b| dom.contains(b, t)));
                    if inside {
                        owner.get_or_insert(e.id);
                    } else {
                        tracing::debug!(subscription = e.id.get(), "root close");
                        dismissed.push(e.id);
                    }
                }
                if !dismissed.is_empty() {
                    return Delivery::Dismiss(dismissed);
                }
                if let Some(id) = owner {
                    return Delivery::Inside(id);
                }
            }
            EventKind::KeyDown if event.key == Some(Key::Escape) => {
                let innermost = state
                    .entries
                    .iter()
                    .rev()
                    .find(|e| matches!(e.interest, Interest::RootClose { .. }));
                if let Some(e) = innermost {
                    tracing::debug!(subscription = e.id.get(), "root close on escape");
                    event.stop_propagation();
                    return Delivery::Dismiss([e.id].into_iter().collect());
                }
            }
            _ => {}
        }
        let notify: SmallVec<[SubscriptionId; 4]> = state
            .entries
            .iter()
            .rev()
            .filter(|e| matches!(e.interest, Interest::Plain(kind) if kind == event.kind))
            .map(|e| e.id)
            .collect();
        if notify.is_empty() {
            Delivery::Unhandled
        } else {
            Delivery::Notify(notify)
        }
    }

    /// Number of event kinds that currently hold a real document listener.
    pub fn attached_listener_count(&self) -> usize {
        self.inner.borrow().counts.len()
    }

    /// Number of logical subscribers for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner.borrow().counts.get(&kind).copied().unwrap_or(0)
    }

    /// Number of live subscriptions of any kind.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether `id` is still subscribed.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().entries.iter().any(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_dom::{MemoryDom, NodeFlags};

    struct Fixture {
        dom: MemoryDom,
        outer: NodeId,
        outer_item: NodeId,
        inner: NodeId,
        inner_item: NodeId,
        outside: NodeId,
    }

    fn fixture() -> Fixture {
        let mut dom = MemoryDom::new();
        let body = dom.create_root();
        let outer = dom.insert(Some(body), NodeFlags::empty());
        let outer_item = dom.insert(Some(outer), NodeFlags::MENU_ITEM);
        let inner = dom.insert(Some(outer), NodeFlags::empty());
        let inner_item = dom.insert(Some(inner), NodeFlags::MENU_ITEM);
        let outside = dom.insert(Some(body), NodeFlags::CONTROL);
        Fixture {
            dom,
            outer,
            outer_item,
            inner,
            inner_item,
            outside,
        }
    }

    fn dismiss(ids: &[SubscriptionId]) -> Delivery {
        Delivery::Dismiss(ids.iter().copied().collect())
    }

    #[derive(Clone, Default)]
    struct Log(Rc<RefCell<Vec<(bool, EventKind)>>>);

    impl ListenerHost for Log {
        fn attach(&mut self, kind: EventKind) {
            self.0.borrow_mut().push((true, kind));
        }
        fn detach(&mut self, kind: EventKind) {
            self.0.borrow_mut().push((false, kind));
        }
    }

    #[test]
    fn one_real_listener_per_kind() {
        let log = Log::default();
        let registry = ListenerRegistry::with_host(log.clone());
        let a = registry.activate([NodeId(1, 1)], RootCloseEvent::Click);
        let b = registry.activate([NodeId(2, 1)], RootCloseEvent::Click);
        assert_eq!(registry.attached_listener_count(), 2);
        assert_eq!(registry.listener_count(EventKind::Click), 2);
        assert_eq!(
            *log.0.borrow(),
            vec![(true, EventKind::Click), (true, EventKind::KeyDown)]
        );

        drop(a);
        assert_eq!(log.0.borrow().len(), 2, "b still holds both kinds");
        drop(b);
        assert_eq!(registry.attached_listener_count(), 0);
        assert_eq!(
            log.0.borrow()[2..],
            [(false, EventKind::Click), (false, EventKind::KeyDown)]
        );
    }

    #[test]
    fn inside_boundary_is_not_a_root_close() {
        let f = fixture();
        let registry = ListenerRegistry::new();
        let sub = registry.activate([f.outer], RootCloseEvent::Click);
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outer_item), &f.dom),
            Delivery::Inside(sub.id())
        );
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outer), &f.dom),
            Delivery::Inside(sub.id())
        );
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outside), &f.dom),
            dismiss(&[sub.id()])
        );
    }

    #[test]
    fn event_kind_must_match() {
        let f = fixture();
        let registry = ListenerRegistry::new();
        let sub = registry.activate([f.outer], RootCloseEvent::MouseDown);
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outside), &f.dom),
            Delivery::Unhandled
        );
        assert_eq!(
            registry.dispatch(&mut UiEvent::mouse_down(f.outside), &f.dom),
            dismiss(&[sub.id()])
        );
    }

    #[test]
    fn nested_overlays_close_innermost_first() {
        let f = fixture();
        let registry = ListenerRegistry::new();
        let _outer = registry.activate([f.outer], RootCloseEvent::Click);
        let inner = registry.activate([f.inner], RootCloseEvent::Click);

        // Outside both: only the inner overlay is dismissed.
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outside), &f.dom),
            dismiss(&[inner.id()])
        );
        // Inside the outer overlay but outside the inner one: inner closes.
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outer_item), &f.dom),
            dismiss(&[inner.id()])
        );
        // Inside the inner overlay: nothing closes.
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.inner_item), &f.dom),
            Delivery::Inside(inner.id())
        );
    }

    #[test]
    fn escape_dismisses_innermost() {
        let f = fixture();
        let registry = ListenerRegistry::new();
        let outer = registry.activate([f.outer], RootCloseEvent::Click);
        let inner = registry.activate([f.inner], RootCloseEvent::MouseDown);
        let esc = || UiEvent::key_down(f.inner_item, Key::Escape);
        assert_eq!(registry.dispatch(&mut esc(), &f.dom), dismiss(&[inner.id()]));
        drop(inner);
        assert_eq!(registry.dispatch(&mut esc(), &f.dom), dismiss(&[outer.id()]));
        let mut other = UiEvent::key_down(f.inner_item, Key::Enter);
        assert_eq!(registry.dispatch(&mut other, &f.dom), Delivery::Unhandled);
    }

    #[test]
    fn escape_is_consumed_by_the_dismissal() {
        let f = fixture();
        let registry = ListenerRegistry::new();
        let _outer = registry.activate([f.outer], RootCloseEvent::Click);
        let inner = registry.activate([f.inner], RootCloseEvent::Click);
        let mut esc = UiEvent::key_down(f.inner_item, Key::Escape);
        assert_eq!(registry.dispatch(&mut esc, &f.dom), dismiss(&[inner.id()]));
        assert!(esc.propagation_stopped());
        // Redelivering the same physical event closes nothing else.
        assert_eq!(registry.dispatch(&mut esc, &f.dom), Delivery::Unhandled);
    }

    #[test]
    fn stopped_events_are_not_delivered() {
        let f = fixture();
        let registry = ListenerRegistry::new();
        let _sub = registry.activate([f.outer], RootCloseEvent::Click);
        let _clicks = registry.subscribe(EventKind::Click);
        let mut click = UiEvent::click(f.outside);
        click.stop_propagation();
        assert_eq!(registry.dispatch(&mut click, &f.dom), Delivery::Unhandled);
    }

    #[test]
    fn unrelated_overlays_close_when_another_claims_the_event() {
        let mut f = fixture();
        let sibling = f.dom.insert(f.dom.parent_of(f.outside), NodeFlags::empty());
        let sibling_item = f.dom.insert(Some(sibling), NodeFlags::MENU_ITEM);
        let registry = ListenerRegistry::new();
        let first = registry.activate([f.outer], RootCloseEvent::Click);
        let second = registry.activate([sibling], RootCloseEvent::Click);

        let delivery = registry.dispatch(&mut UiEvent::click(sibling_item), &f.dom);
        assert_eq!(delivery, dismiss(&[first.id()]));
        assert!(!delivery.dismisses(second.id()));
    }

    #[test]
    fn every_unrelated_overlay_is_dismissed_once() {
        let mut f = fixture();
        let body = f.dom.parent_of(f.outside);
        let other = f.dom.insert(body, NodeFlags::empty());
        let registry = ListenerRegistry::new();
        let a = registry.activate([f.outer], RootCloseEvent::Click);
        let _inner = registry.activate([f.inner], RootCloseEvent::MouseDown);
        let b = registry.activate([other], RootCloseEvent::Click);
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outside), &f.dom),
            dismiss(&[b.id(), a.id()])
        );
    }

    #[test]
    fn three_levels_close_only_the_deepest() {
        let mut f = fixture();
        let deepest = f.dom.insert(Some(f.inner), NodeFlags::empty());
        let registry = ListenerRegistry::new();
        let _outer = registry.activate([f.outer], RootCloseEvent::Click);
        let _inner = registry.activate([f.inner], RootCloseEvent::Click);
        let third = registry.activate([deepest], RootCloseEvent::Click);
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outside), &f.dom),
            dismiss(&[third.id()])
        );
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outer_item), &f.dom),
            dismiss(&[third.id()])
        );
    }

    #[test]
    fn detached_boundary_counts_as_outside() {
        let mut f = fixture();
        let registry = ListenerRegistry::new();
        let sub = registry.activate([f.inner], RootCloseEvent::Click);
        f.dom.remove(f.inner);
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outer_item), &f.dom),
            dismiss(&[sub.id()])
        );
    }

    #[test]
    fn extra_boundary_nodes_count_as_inside() {
        let f = fixture();
        let registry = ListenerRegistry::new();
        let sub = registry.activate([f.inner, f.outside], RootCloseEvent::Click);
        assert_eq!(
            registry.dispatch(&mut UiEvent::click(f.outside), &f.dom),
            Delivery::Inside(sub.id())
        );
    }

    #[test]
    fn plain_subscribers_are_notified_latest_first() {
        let f = fixture();
        let registry = ListenerRegistry::new();
        let a = registry.subscribe(EventKind::Resize);
        let b = registry.subscribe(EventKind::Resize);
        let _focus = registry.subscribe(EventKind::Focus);
        let delivered = registry.dispatch(&mut UiEvent::resize(), &f.dom);
        assert_eq!(
            delivered,
            Delivery::Notify([b.id(), a.id()].into_iter().collect())
        );
        assert_eq!(registry.attached_listener_count(), 2);
    }

    #[test]
    fn missing_target_counts_as_outside() {
        let f = fixture();
        let registry = ListenerRegistry::new();
        let sub = registry.activate([f.outer], RootCloseEvent::Click);
        let mut ev = UiEvent::new(EventKind::Click, None);
        assert_eq!(registry.dispatch(&mut ev, &f.dom), dismiss(&[sub.id()]));
    }
}
