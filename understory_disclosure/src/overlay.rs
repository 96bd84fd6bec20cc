// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioned floating content with optional root close.

use alloc::boxed::Box;
use kurbo::{Rect, Size};
use understory_dom::{Dom, NodeId, UiEvent};
use understory_root_close::{Delivery, ListenerRegistry, RootCloseEvent, RootCloseSubscription};
use understory_transition::{
    ClassList, Fade, Transition, TransitionConfig, TransitionEvent, TransitionEvents, TransitionStyle,
};

use crate::placement::{CenteredStrategy, OverlayPosition, OverlayPositioner, Placement, PlacementStrategy};

/// Options for an [`Overlay`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Ask to hide on interaction outside the overlay and its target.
    pub root_close: bool,
    /// Pointer event used for root close.
    pub root_close_event: RootCloseEvent,
    /// Requested placement.
    pub placement: Placement,
}

/// Geometry an overlay is placed against.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayGeometry {
    /// Target bounds.
    pub target: Rect,
    /// Visible container region.
    pub container: Rect,
    /// Overlay size.
    pub overlay: Size,
}

/// Callback invoked when the overlay wants to be hidden.
pub type HideNotifier = Box<dyn FnMut(&UiEvent)>;

/// Floating content (tooltip, popover) attached to a target node.
///
/// Showing computes a position, starts the enter transition and, with
/// [`OverlayOptions::root_close`], starts listening for outside
/// interaction. The overlay never hides itself: outside interaction goes to
/// the [`HideNotifier`] and the owner calls [`Overlay::hide`]. Content stays
/// mounted until the exit transition completes.
pub struct Overlay<S = Fade, P = CenteredStrategy> {
    node: NodeId,
    target: NodeId,
    options: OverlayOptions,
    registry: ListenerRegistry,
    positioner: OverlayPositioner<P>,
    transition: Transition<S>,
    root_close: Option<RootCloseSubscription>,
    on_hide: Option<HideNotifier>,
    shown: bool,
}

impl<S: core::fmt::Debug, P: core::fmt::Debug> core::fmt::Debug for Overlay<S, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Overlay")
            .field("node", &self.node)
            .field("target", &self.target)
            .field("options", &self.options)
            .field("positioner", &self.positioner)
            .field("transition", &self.transition)
            .field("shown", &self.shown)
            .finish_non_exhaustive()
    }
}

impl Overlay {
    /// A fading overlay using centered placement.
    ///
    /// The content unmounts once hidden.
    pub fn new(node: NodeId, target: NodeId, options: OverlayOptions, registry: ListenerRegistry) -> Self {
        let config = TransitionConfig {
            unmount_on_exit: true,
            ..TransitionConfig::default()
        };
        Self::with_parts(
            node,
            target,
            options,
            registry,
            Transition::new(Fade, config),
            OverlayPositioner::new(CenteredStrategy::default()),
        )
    }
}

impl<S: TransitionStyle, P: PlacementStrategy> Overlay<S, P> {
    /// An overlay with a custom transition and placement strategy.
    pub fn with_parts(
        node: NodeId,
        target: NodeId,
        options: OverlayOptions,
        registry: ListenerRegistry,
        transition: Transition<S>,
        positioner: OverlayPositioner<P>,
    ) -> Self {
        Self {
            node,
            target,
            options,
            registry,
            positioner,
            transition,
            root_close: None,
            on_hide: None,
            shown: false,
        }
    }

    /// Register the hide notifier.
    pub fn set_on_hide(&mut self, on_hide: impl FnMut(&UiEvent) + 'static) {
        self.on_hide = Some(Box::new(on_hide));
    }

    /// The overlay node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Whether the overlay was asked to show.
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Whether the content should be in the document.
    pub fn is_mounted(&self) -> bool {
        self.transition.is_mounted()
    }

    /// The enter/exit transition.
    pub fn transition(&self) -> &Transition<S> {
        &self.transition
    }

    /// Last computed position.
    pub fn position(&self) -> Option<OverlayPosition> {
        self.positioner.position()
    }

    /// Class names: the resolved placement followed by the transition classes.
    pub fn classes(&self) -> ClassList {
        let mut classes = ClassList::new();
        classes.extend(self.positioner.placement_class());
        classes.extend(self.transition.classes());
        classes
    }

    /// Show the overlay.
    pub fn show<D: Dom + ?Sized>(&mut self, dom: &mut D, geometry: &OverlayGeometry, now: u64) -> TransitionEvents {
        if self.shown {
            return TransitionEvents::new();
        }
        self.shown = true;
        self.reposition(geometry);
        if self.options.root_close {
            self.root_close = Some(
                self.registry
                    .activate([self.node, self.target], self.options.root_close_event),
            );
        }
        self.transition.enter(dom, self.node, now)
    }

    /// Hide the overlay.
    pub fn hide<D: Dom + ?Sized>(&mut self, dom: &mut D, now: u64) -> TransitionEvents {
        if !self.shown {
            return TransitionEvents::new();
        }
        self.shown = false;
        self.root_close = None;
        self.transition.exit(dom, self.node, now)
    }

    /// Recompute the position, e.g. after the target moved.
    pub fn reposition(&mut self, geometry: &OverlayGeometry) -> OverlayPosition {
        self.positioner.compute_position(
            geometry.target,
            geometry.container,
            geometry.overlay,
            self.options.placement,
        )
    }

    /// Route a registry delivery; returns whether it was addressed to this overlay.
    pub fn handle_delivery(&mut self, event: &UiEvent, delivery: &Delivery) -> bool {
        let Some(id) = self.root_close.as_ref().map(RootCloseSubscription::id) else {
            return false;
        };
        if !delivery.dismisses(id) {
            return false;
        }
        match self.on_hide.as_mut() {
            Some(on_hide) => on_hide(event),
            None => tracing::warn!(node = ?self.node, "root-close overlay has no hide notifier"),
        }
        true
    }

    /// Transition-end signal for the overlay node.
    pub fn on_transition_end<D: Dom + ?Sized>(&mut self, dom: &mut D, node: NodeId) -> Option<TransitionEvent> {
        self.transition.on_transition_end(dom, node)
    }

    /// Fire the transition timeout fallback.
    pub fn poll<D: Dom + ?Sized>(&mut self, dom: &mut D, now: u64) -> Option<TransitionEvent> {
        self.transition.poll(dom, now)
    }

    /// Release the subscription and drop any pending completion.
    pub fn unmount(&mut self) {
        self.root_close = None;
        self.shown = false;
        self.transition.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use understory_dom::{MemoryDom, NodeFlags};

    fn geometry() -> OverlayGeometry {
        OverlayGeometry {
            target: Rect::new(100.0, 100.0, 140.0, 120.0),
            container: Rect::new(0.0, 0.0, 400.0, 300.0),
            overlay: Size::new(60.0, 30.0),
        }
    }

    fn setup(root_close: bool) -> (MemoryDom, NodeId, NodeId, NodeId, ListenerRegistry, Overlay) {
        let mut dom = MemoryDom::new();
        let body = dom.create_root();
        let target = dom.insert(Some(body), NodeFlags::CONTROL);
        let node = dom.insert(Some(body), NodeFlags::empty());
        let outside = dom.insert(Some(body), NodeFlags::CONTROL);
        let registry = ListenerRegistry::new();
        let options = OverlayOptions {
            root_close,
            placement: Placement::Top,
            ..OverlayOptions::default()
        };
        let overlay = Overlay::new(node, target, options, registry.clone());
        (dom, target, node, outside, registry, overlay)
    }

    #[test]
    fn show_positions_and_enters() {
        let (mut dom, _, node, _, _, mut overlay) = setup(false);
        assert!(!overlay.is_mounted());

        let events = overlay.show(&mut dom, &geometry(), 0);
        assert_eq!(events.as_slice(), &[TransitionEvent::Enter, TransitionEvent::Entering]);
        assert!(overlay.is_mounted());
        let pos = overlay.position().unwrap();
        assert_eq!((pos.top, pos.left), (70.0, 90.0));
        assert_eq!(overlay.classes().as_slice(), &["top", "fade", "in"]);

        assert_eq!(overlay.on_transition_end(&mut dom, node), Some(TransitionEvent::Entered));
        assert!(overlay.show(&mut dom, &geometry(), 10).is_empty());
    }

    #[test]
    fn stays_mounted_until_exit_completes() {
        let (mut dom, _, _, _, _, mut overlay) = setup(false);
        let _ = overlay.show(&mut dom, &geometry(), 0);
        let _ = overlay.poll(&mut dom, 300);

        let events = overlay.hide(&mut dom, 1_000);
        assert_eq!(events.as_slice(), &[TransitionEvent::Exit, TransitionEvent::Exiting]);
        assert!(overlay.is_mounted());
        assert_eq!(overlay.poll(&mut dom, 1_300), Some(TransitionEvent::Exited));
        assert!(!overlay.is_mounted());
    }

    #[test]
    fn root_close_requests_hide() {
        let (mut dom, target, node, outside, registry, mut overlay) = setup(true);
        let hides = Rc::new(Cell::new(0));
        let sink = hides.clone();
        overlay.set_on_hide(move |_| sink.set(sink.get() + 1));
        let _ = overlay.show(&mut dom, &geometry(), 0);
        assert_eq!(registry.subscriber_count(), 1);

        for inside in [node, target] {
            let mut click = UiEvent::click(inside);
            let delivery = registry.dispatch(&mut click, &dom);
            assert!(!overlay.handle_delivery(&click, &delivery));
        }
        assert_eq!(hides.get(), 0);

        let mut click = UiEvent::click(outside);
        let delivery = registry.dispatch(&mut click, &dom);
        assert!(overlay.handle_delivery(&click, &delivery));
        assert_eq!(hides.get(), 1);
        // The overlay waits for its owner.
        assert!(overlay.is_shown());

        let _ = overlay.hide(&mut dom, 10);
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn unmount_releases_everything() {
        let (mut dom, _, _, _, registry, mut overlay) = setup(true);
        let _ = overlay.show(&mut dom, &geometry(), 0);
        overlay.unmount();
        assert_eq!(registry.attached_listener_count(), 0);
        assert_eq!(overlay.poll(&mut dom, 10_000), None);
    }

    #[test]
    fn disabled_animation_is_immediately_in() {
        let mut dom = MemoryDom::new();
        let body = dom.create_root();
        let target = dom.insert(Some(body), NodeFlags::CONTROL);
        let node = dom.insert(Some(body), NodeFlags::empty());
        let mut overlay = Overlay::with_parts(
            node,
            target,
            OverlayOptions::default(),
            ListenerRegistry::new(),
            Transition::new(Fade, TransitionConfig::disabled()),
            OverlayPositioner::new(CenteredStrategy::default()),
        );
        let events = overlay.show(&mut dom, &geometry(), 0);
        assert_eq!(events.last(), Some(&TransitionEvent::Entered));
        assert_eq!(overlay.classes().as_slice(), &["right", "fade", "in"]);
    }
}
