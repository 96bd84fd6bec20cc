// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modal dialogs: focus trapping, backdrop dismissal and scrollbar padding.

use understory_dom::{Dom, EventKind, Key, NodeId, UiEvent};
use understory_root_close::{Delivery, ListenerRegistry, ListenerSubscription};
use understory_transition::{Fade, Transition, TransitionConfig, TransitionEvent, TransitionEvents, TransitionStyle};

use crate::overlay::HideNotifier;

/// What a click on the backdrop does.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Backdrop {
    /// No backdrop.
    None,
    /// A backdrop that ignores clicks.
    Static,
    /// A backdrop whose click asks to hide.
    #[default]
    Dismiss,
}

/// Behavior switches for a [`Modal`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ModalOptions {
    /// Backdrop behavior.
    pub backdrop: Backdrop,
    /// Escape asks to hide.
    pub keyboard: bool,
    /// Move focus into the dialog when shown.
    pub auto_focus: bool,
    /// Pull focus back when it leaves the dialog.
    pub enforce_focus: bool,
    /// Return focus to the previously focused node once hidden.
    pub restore_focus: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            backdrop: Backdrop::Dismiss,
            keyboard: true,
            auto_focus: true,
            enforce_focus: true,
            restore_focus: true,
        }
    }
}

/// Measurements needed to pad the dialog around scrollbars.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ModalMetrics {
    /// Whether the page body overflows its viewport.
    pub body_overflowing: bool,
    /// Full content height of the dialog.
    pub dialog_scroll_height: f64,
    /// Visible height of the document.
    pub client_height: f64,
    /// Width of a platform scrollbar.
    pub scrollbar_size: f64,
}

/// Inline padding compensating for a scrollbar appearing or disappearing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ModalStyle {
    /// Set when only the dialog overflows.
    pub padding_left: Option<f64>,
    /// Set when only the page body overflows.
    pub padding_right: Option<f64>,
}

impl ModalStyle {
    /// Padding for the given measurements.
    pub fn compute(metrics: &ModalMetrics) -> Self {
        let dialog_overflowing = metrics.dialog_scroll_height > metrics.client_height;
        let body = metrics.body_overflowing;
        Self {
            padding_left: (!body && dialog_overflowing).then_some(metrics.scrollbar_size),
            padding_right: (body && !dialog_overflowing).then_some(metrics.scrollbar_size),
        }
    }
}

/// A modal dialog.
///
/// While shown the modal subscribes to document focus (with
/// [`ModalOptions::enforce_focus`]) and keydown (with
/// [`ModalOptions::keyboard`]). The resize subscription is held from the
/// start of the enter transition until the exit transition completes, and
/// never outlives an unmount. Like [`Overlay`](crate::Overlay), the modal
/// asks its owner to hide through a [`HideNotifier`].
pub struct Modal<S = Fade> {
    dialog: NodeId,
    options: ModalOptions,
    registry: ListenerRegistry,
    transition: Transition<S>,
    resize: Option<ListenerSubscription>,
    focus_guard: Option<ListenerSubscription>,
    keyboard: Option<ListenerSubscription>,
    last_focus: Option<NodeId>,
    style: ModalStyle,
    on_hide: Option<HideNotifier>,
    shown: bool,
}

impl<S: core::fmt::Debug> core::fmt::Debug for Modal<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Modal")
            .field("dialog", &self.dialog)
            .field("options", &self.options)
            .field("transition", &self.transition)
            .field("style", &self.style)
            .field("shown", &self.shown)
            .finish_non_exhaustive()
    }
}

impl Modal {
    /// A fading modal that unmounts once hidden.
    pub fn new(dialog: NodeId, options: ModalOptions, registry: ListenerRegistry) -> Self {
        let config = TransitionConfig {
            unmount_on_exit: true,
            ..TransitionConfig::default()
        };
        Self::with_transition(dialog, options, registry, Transition::new(Fade, config))
    }
}

impl<S: TransitionStyle> Modal<S> {
    /// A modal with a custom transition.
    pub fn with_transition(
        dialog: NodeId,
        options: ModalOptions,
        registry: ListenerRegistry,
        transition: Transition<S>,
    ) -> Self {
        Self {
            dialog,
            options,
            registry,
            transition,
            resize: None,
            focus_guard: None,
            keyboard: None,
            last_focus: None,
            style: ModalStyle::default(),
            on_hide: None,
            shown: false,
        }
    }

    /// Register the hide notifier.
    pub fn set_on_hide(&mut self, on_hide: impl FnMut(&UiEvent) + 'static) {
        self.on_hide = Some(alloc::boxed::Box::new(on_hide));
    }

    /// Whether the modal was asked to show.
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Whether the content should be in the document.
    pub fn is_mounted(&self) -> bool {
        self.transition.is_mounted()
    }

    /// Whether the resize subscription is held.
    pub fn is_listening_for_resize(&self) -> bool {
        self.resize.is_some()
    }

    /// Current scrollbar padding.
    pub fn style(&self) -> ModalStyle {
        self.style
    }

    /// The enter/exit transition.
    pub fn transition(&self) -> &Transition<S> {
        &self.transition
    }

    /// Show the modal.
    pub fn show<D: Dom + ?Sized>(&mut self, dom: &mut D, metrics: &ModalMetrics, now: u64) -> TransitionEvents {
        if self.shown {
            return TransitionEvents::new();
        }
        self.shown = true;
        self.last_focus = dom.active_element();
        if self.options.keyboard {
            self.keyboard = Some(self.registry.subscribe(EventKind::KeyDown));
        }
        if self.options.enforce_focus {
            self.focus_guard = Some(self.registry.subscribe(EventKind::Focus));
        }

        let events = self.transition.enter(dom, self.dialog, now);
        if events.contains(&TransitionEvent::Entering) {
            self.resize = Some(self.registry.subscribe(EventKind::Resize));
            self.style = ModalStyle::compute(metrics);
        }
        if self.options.auto_focus && !self.focus_inside(dom) {
            self.focus_dialog(dom);
        }
        events
    }

    /// Hide the modal.
    pub fn hide<D: Dom + ?Sized>(&mut self, dom: &mut D, now: u64) -> TransitionEvents {
        if !self.shown {
            return TransitionEvents::new();
        }
        self.shown = false;
        self.keyboard = None;
        self.focus_guard = None;
        let events = self.transition.exit(dom, self.dialog, now);
        if events.contains(&TransitionEvent::Exited) {
            self.on_exited(dom);
        }
        events
    }

    /// Transition-end signal for the dialog node.
    pub fn on_transition_end<D: Dom + ?Sized>(&mut self, dom: &mut D, node: NodeId) -> Option<TransitionEvent> {
        let event = self.transition.on_transition_end(dom, node);
        if event == Some(TransitionEvent::Exited) {
            self.on_exited(dom);
        }
        event
    }

    /// Fire the transition timeout fallback.
    pub fn poll<D: Dom + ?Sized>(&mut self, dom: &mut D, now: u64) -> Option<TransitionEvent> {
        let event = self.transition.poll(dom, now);
        if event == Some(TransitionEvent::Exited) {
            self.on_exited(dom);
        }
        event
    }

    /// Window resized; recompute padding if listening.
    pub fn handle_resize(&mut self, delivery: &Delivery, metrics: &ModalMetrics) -> bool {
        let Some(id) = self.resize.as_ref().map(ListenerSubscription::id) else {
            return false;
        };
        match delivery {
            Delivery::Notify(ids) if ids.contains(&id) => {
                self.style = ModalStyle::compute(metrics);
                true
            }
            _ => false,
        }
    }

    /// Route a focus or keydown delivery; returns whether it was handled.
    pub fn handle_delivery<D: Dom + ?Sized>(&mut self, dom: &mut D, event: &UiEvent, delivery: &Delivery) -> bool {
        let Delivery::Notify(ids) = delivery else {
            return false;
        };
        let addressed = |sub: &Option<ListenerSubscription>| sub.as_ref().is_some_and(|s| ids.contains(&s.id()));
        match event.kind {
            EventKind::KeyDown if addressed(&self.keyboard) => self.handle_keydown(event),
            EventKind::Focus if addressed(&self.focus_guard) => self.handle_focus(dom, event),
            _ => false,
        }
    }

    /// Escape asks to hide when the keyboard option is on.
    pub fn handle_keydown(&mut self, event: &UiEvent) -> bool {
        if self.shown && self.options.keyboard && event.is_key(Key::Escape) && !event.propagation_stopped() {
            self.request_hide(event);
            return true;
        }
        false
    }

    /// Focus moved somewhere; pull it back into the dialog if enforcing.
    pub fn handle_focus<D: Dom + ?Sized>(&mut self, dom: &mut D, event: &UiEvent) -> bool {
        if !self.shown || !self.options.enforce_focus {
            return false;
        }
        let inside = event.target.is_some_and(|t| dom.contains(self.dialog, t));
        if inside {
            return false;
        }
        self.focus_dialog(dom);
        true
    }

    /// Click on the dialog container; only a click on the backdrop itself
    /// (not on its content) asks to hide.
    pub fn handle_dialog_click(&mut self, event: &UiEvent) -> bool {
        if self.options.backdrop != Backdrop::Dismiss || event.target != Some(self.dialog) {
            return false;
        }
        self.request_hide(event);
        true
    }

    /// Release every subscription and drop any pending completion.
    pub fn unmount(&mut self) {
        self.shown = false;
        self.keyboard = None;
        self.focus_guard = None;
        self.resize = None;
        self.last_focus = None;
        self.transition.cancel();
    }

    fn on_exited<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        self.resize = None;
        let last = self.last_focus.take();
        if self.options.restore_focus
            && let Some(node) = last
            && !dom.focus_if_attached(node)
        {
            tracing::debug!(?node, "previously focused node gone; focus not restored");
        }
    }

    fn focus_inside<D: Dom + ?Sized>(&self, dom: &D) -> bool {
        dom.active_element()
            .is_some_and(|active| dom.contains(self.dialog, active))
    }

    fn focus_dialog<D: Dom + ?Sized>(&self, dom: &mut D) {
        if let Err(err) = dom.focus(self.dialog) {
            tracing::debug!(%err, "could not focus modal dialog");
        }
    }

    fn request_hide(&mut self, event: &UiEvent) {
        match self.on_hide.as_mut() {
            Some(on_hide) => on_hide(event),
            None => tracing::warn!(dialog = ?self.dialog, "modal has no hide notifier"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use understory_dom::{MemoryDom, NodeFlags};

    struct Fixture {
        dom: MemoryDom,
        opener: NodeId,
        dialog: NodeId,
        content: NodeId,
        registry: ListenerRegistry,
        hides: Rc<Cell<u32>>,
        modal: Modal,
    }

    fn fixture(options: ModalOptions) -> Fixture {
        let mut dom = MemoryDom::new();
        let body = dom.create_root();
        let opener = dom.insert(Some(body), NodeFlags::CONTROL);
        let dialog = dom.insert(Some(body), NodeFlags::FOCUSABLE);
        let content = dom.insert(Some(dialog), NodeFlags::CONTROL);
        let registry = ListenerRegistry::new();
        let hides = Rc::new(Cell::new(0));
        let mut modal = Modal::new(dialog, options, registry.clone());
        let sink = hides.clone();
        modal.set_on_hide(move |_| sink.set(sink.get() + 1));
        dom.focus(opener).unwrap();
        Fixture {
            dom,
            opener,
            dialog,
            content,
            registry,
            hides,
            modal,
        }
    }

    const FITS: ModalMetrics = ModalMetrics {
        body_overflowing: true,
        dialog_scroll_height: 200.0,
        client_height: 600.0,
        scrollbar_size: 15.0,
    };

    #[test]
    fn padding_rules() {
        assert_eq!(
            ModalStyle::compute(&FITS),
            ModalStyle {
                padding_left: None,
                padding_right: Some(15.0)
            }
        );
        let tall = ModalMetrics {
            body_overflowing: false,
            dialog_scroll_height: 900.0,
            ..FITS
        };
        assert_eq!(
            ModalStyle::compute(&tall),
            ModalStyle {
                padding_left: Some(15.0),
                padding_right: None
            }
        );
        let both = ModalMetrics {
            dialog_scroll_height: 900.0,
            ..FITS
        };
        assert_eq!(ModalStyle::compute(&both), ModalStyle::default());
    }

    #[test]
    fn focus_moves_in_and_is_restored_after_exit() {
        let mut f = fixture(ModalOptions::default());
        let _ = f.modal.show(&mut f.dom, &FITS, 0);
        assert_eq!(f.dom.active_element(), Some(f.dialog));

        let _ = f.modal.hide(&mut f.dom, 500);
        assert_eq!(f.dom.active_element(), Some(f.dialog), "not before exited");
        assert_eq!(f.modal.poll(&mut f.dom, 800), Some(TransitionEvent::Exited));
        assert_eq!(f.dom.active_element(), Some(f.opener));
    }

    #[test]
    fn resize_listener_spans_entering_to_exited() {
        let mut f = fixture(ModalOptions::default());
        assert_eq!(f.registry.listener_count(EventKind::Resize), 0);

        let _ = f.modal.show(&mut f.dom, &FITS, 0);
        assert!(f.modal.is_listening_for_resize());
        assert_eq!(f.registry.listener_count(EventKind::Resize), 1);
        assert_eq!(f.modal.style().padding_right, Some(15.0));

        let resized = ModalMetrics {
            body_overflowing: false,
            ..FITS
        };
        let delivery = f.registry.dispatch(&mut UiEvent::resize(), &f.dom);
        assert!(f.modal.handle_resize(&delivery, &resized));
        assert_eq!(f.modal.style(), ModalStyle::default());

        let _ = f.modal.hide(&mut f.dom, 100);
        assert_eq!(f.registry.listener_count(EventKind::Resize), 1, "held while exiting");
        let _ = f.modal.on_transition_end(&mut f.dom, f.dialog);
        assert_eq!(f.registry.listener_count(EventKind::Resize), 0);
        assert!(!f.modal.handle_resize(&delivery, &FITS));
    }

    #[test]
    fn unmount_mid_exit_releases_resize() {
        let mut f = fixture(ModalOptions::default());
        let _ = f.modal.show(&mut f.dom, &FITS, 0);
        let _ = f.modal.hide(&mut f.dom, 100);
        f.modal.unmount();
        assert_eq!(f.registry.attached_listener_count(), 0);
        assert_eq!(f.modal.poll(&mut f.dom, 10_000), None);
    }

    #[test]
    fn enforce_focus_pulls_focus_back() {
        let mut f = fixture(ModalOptions::default());
        let _ = f.modal.show(&mut f.dom, &FITS, 0);

        f.dom.focus(f.content).unwrap();
        let mut ev = UiEvent::focus(f.content);
        let delivery = f.registry.dispatch(&mut ev, &f.dom);
        assert!(!f.modal.handle_delivery(&mut f.dom, &ev, &delivery));
        assert_eq!(f.dom.active_element(), Some(f.content));

        f.dom.focus(f.opener).unwrap();
        let mut ev = UiEvent::focus(f.opener);
        let delivery = f.registry.dispatch(&mut ev, &f.dom);
        assert!(f.modal.handle_delivery(&mut f.dom, &ev, &delivery));
        assert_eq!(f.dom.active_element(), Some(f.dialog));
    }

    #[test]
    fn escape_and_backdrop_request_hide() {
        let mut f = fixture(ModalOptions::default());
        let _ = f.modal.show(&mut f.dom, &FITS, 0);

        let mut esc = UiEvent::key_down(f.content, Key::Escape);
        let delivery = f.registry.dispatch(&mut esc, &f.dom);
        assert!(f.modal.handle_delivery(&mut f.dom, &esc, &delivery));
        assert_eq!(f.hides.get(), 1);

        assert!(!f.modal.handle_dialog_click(&UiEvent::click(f.content)));
        assert!(f.modal.handle_dialog_click(&UiEvent::click(f.dialog)));
        assert_eq!(f.hides.get(), 2);
    }

    #[test]
    fn escape_consumed_inside_the_dialog_keeps_it_open() {
        let mut f = fixture(ModalOptions::default());
        let _ = f.modal.show(&mut f.dom, &FITS, 0);

        let mut esc = UiEvent::key_down(f.content, Key::Escape);
        esc.stop_propagation();
        let delivery = f.registry.dispatch(&mut esc, &f.dom);
        assert!(!f.modal.handle_delivery(&mut f.dom, &esc, &delivery));
        assert!(!f.modal.handle_keydown(&esc));
        assert_eq!(f.hides.get(), 0);
    }

    #[test]
    fn static_backdrop_and_no_keyboard() {
        let options = ModalOptions {
            backdrop: Backdrop::Static,
            keyboard: false,
            ..ModalOptions::default()
        };
        let mut f = fixture(options);
        let _ = f.modal.show(&mut f.dom, &FITS, 0);

        assert!(!f.modal.handle_dialog_click(&UiEvent::click(f.dialog)));
        assert!(!f.modal.handle_keydown(&UiEvent::key_down(f.content, Key::Escape)));
        assert_eq!(f.registry.listener_count(EventKind::KeyDown), 0);
        assert_eq!(f.hides.get(), 0);
    }

    #[test]
    fn disabled_animation_still_pairs_resize() {
        let mut dom = MemoryDom::new();
        let body = dom.create_root();
        let dialog = dom.insert(Some(body), NodeFlags::FOCUSABLE);
        let registry = ListenerRegistry::new();
        let mut modal = Modal::with_transition(
            dialog,
            ModalOptions::default(),
            registry.clone(),
            Transition::new(Fade, TransitionConfig::disabled()),
        );
        let _ = modal.show(&mut dom, &FITS, 0);
        assert!(modal.is_listening_for_resize());
        let _ = modal.hide(&mut dom, 0);
        assert!(!modal.is_listening_for_resize());
        assert_eq!(registry.attached_listener_count(), 0);
    }
}
