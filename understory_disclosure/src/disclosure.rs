// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The open/close state machine for a toggle and its menu.

use alloc::boxed::Box;
use alloc::string::String;
use smallvec::SmallVec;
use understory_dom::{Dom, Key, NodeFlags, NodeId, UiEvent};
use understory_focus::FocusCursor;
use understory_root_close::{Delivery, ListenerRegistry, RootCloseEvent, RootCloseSubscription, SubscriptionId};

use crate::parts::DisclosureParts;

/// Class names attached to a rendered part.
pub type ClassNames = SmallVec<[&'static str; 3]>;

/// What kind of control the disclosure is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// A menu button.
    #[default]
    Button,
    /// A submenu entry inside another menu; focus moves into the menu on
    /// every open.
    MenuItem,
}

/// Interaction asking to flip the open state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ToggleSource {
    /// Pointer activation of the toggle.
    Click,
    /// Keyboard activation (ArrowDown while closed).
    KeyDown,
}

/// Interaction asking to close.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CloseSource {
    /// Escape or Tab.
    KeyDown,
    /// Interaction outside the disclosure.
    RootClose,
    /// An item in the menu was chosen.
    Select,
}

/// Source reported to the toggle notifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// See [`ToggleSource::Click`].
    Click,
    /// See [`ToggleSource::KeyDown`] and [`CloseSource::KeyDown`].
    KeyDown,
    /// See [`CloseSource::RootClose`].
    RootClose,
    /// See [`CloseSource::Select`].
    Select,
}

impl From<ToggleSource> for EventSource {
    fn from(source: ToggleSource) -> Self {
        match source {
            ToggleSource::Click => Self::Click,
            ToggleSource::KeyDown => Self::KeyDown,
        }
    }
}

impl From<CloseSource> for EventSource {
    fn from(source: CloseSource) -> Self {
        match source {
            CloseSource::KeyDown => Self::KeyDown,
            CloseSource::RootClose => Self::RootClose,
            CloseSource::Select => Self::Select,
        }
    }
}

/// Extra information handed to the toggle notifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToggleDetails {
    /// What asked for the change.
    pub source: EventSource,
}

/// What last opened the disclosure.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OpenSource {
    /// Never opened by an interaction.
    #[default]
    None,
    /// Opened by a click.
    Click,
    /// Opened from the keyboard.
    KeyDown,
}

/// Lifecycle phase.
///
/// `Opening` and `Closing` only persist with [`ExitMode::Deferred`], until
/// [`Disclosure::on_entered`] or [`Disclosure::on_exited`] is called.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisclosurePhase {
    /// Hidden.
    #[default]
    Closed,
    /// Open requested, content becoming visible.
    Opening,
    /// Fully open.
    Open,
    /// Close committed, content still leaving.
    Closing,
}

/// When a close is considered complete.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExitMode {
    /// As soon as it is committed.
    #[default]
    Immediate,
    /// When the host reports the exit transition finished.
    Deferred,
}

/// Inputs supplied by the owner on every render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisclosureProps {
    /// `Some` when the open state is owned by the caller.
    pub open: Option<bool>,
    /// Initial state when uncontrolled.
    pub default_open: bool,
    /// Ignore click and keyboard input.
    pub disabled: bool,
    /// Button or submenu entry.
    pub role: Role,
    /// Which pointer event outside the disclosure closes it.
    pub root_close_event: RootCloseEvent,
    /// Menu opens above the toggle.
    pub dropup: bool,
    /// Menu is aligned to the right edge of the toggle.
    pub pull_right: bool,
    /// Id of the toggle; labels the menu for assistive technologies.
    pub id: Option<String>,
    /// When a close completes.
    pub exit_mode: ExitMode,
}

impl DisclosureProps {
    /// Whether the open state is owned by the caller.
    pub fn is_controlled(&self) -> bool {
        self.open.is_some()
    }
}

/// Callback receiving every requested open-state change.
pub type ToggleNotifier = Box<dyn FnMut(bool, &UiEvent, ToggleDetails)>;

/// Callback receiving the key of a chosen menu item.
pub type SelectNotifier = Box<dyn FnMut(&str, &UiEvent)>;

/// Attribute values for the toggle element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleAttributes<'a> {
    /// Element id.
    pub id: Option<&'a str>,
    /// Always `"button"`.
    pub role: &'static str,
    /// Always true.
    pub aria_haspopup: bool,
    /// Current open state.
    pub aria_expanded: bool,
    /// Whether the toggle is disabled.
    pub disabled: bool,
}

/// Attribute values for the menu element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuAttributes<'a> {
    /// Always `"menu"`.
    pub role: &'static str,
    /// Id of the toggle labelling the menu.
    pub aria_labelledby: Option<&'a str>,
    /// Class names for the menu.
    pub classes: ClassNames,
}

/// Immutable view of a disclosure handed to its descendants.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisclosureContext<'a> {
    /// Toggle id.
    pub id: Option<&'a str>,
    /// Role of the disclosure.
    pub role: Role,
    /// Menu node; descendants close the disclosure through
    /// [`Disclosure::handle_select`].
    pub menu: NodeId,
    /// Current open state.
    pub open: bool,
    /// Active root-close subscription.
    pub subscription: Option<SubscriptionId>,
}

/// A toggle/menu pair and its open state.
///
/// The host forwards toggle clicks to [`Disclosure::handle_click`], key
/// presses on the toggle or menu to [`Disclosure::handle_keydown`], and
/// document-level deliveries to [`Disclosure::handle_delivery`]. Lifecycle
/// hooks map onto [`Disclosure::mount`], [`Disclosure::update`] and
/// [`Disclosure::unmount`].
///
/// Uncontrolled disclosures commit every request themselves. Controlled
/// ones only notify, and the owner feeds the new value back through
/// [`Disclosure::update`].
pub struct Disclosure {
    props: DisclosureProps,
    parts: DisclosureParts,
    registry: ListenerRegistry,
    cursor: FocusCursor,
    notifier: Option<ToggleNotifier>,
    on_select: Option<SelectNotifier>,
    open: bool,
    phase: DisclosurePhase,
    last_open_source: OpenSource,
    focus_was_in_menu: bool,
    root_close: Option<RootCloseSubscription>,
    mounted: bool,
}

impl core::fmt::Debug for Disclosure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Disclosure")
            .field("props", &self.props)
            .field("parts", &self.parts)
            .field("open", &self.open)
            .field("phase", &self.phase)
            .field("last_open_source", &self.last_open_source)
            .field("root_close", &self.subscription_id())
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl Disclosure {
    /// Create an unmounted disclosure.
    pub fn new(props: DisclosureProps, parts: DisclosureParts, registry: ListenerRegistry) -> Self {
        let open = props.open.unwrap_or(props.default_open);
        Self {
            props,
            parts,
            registry,
            cursor: FocusCursor::default(),
            notifier: None,
            on_select: None,
            open,
            phase: if open {
                DisclosurePhase::Open
            } else {
                DisclosurePhase::Closed
            },
            last_open_source: OpenSource::None,
            focus_was_in_menu: false,
            root_close: None,
            mounted: false,
        }
    }

    /// Builder form of [`Disclosure::set_notifier`].
    pub fn with_notifier(mut self, notifier: impl FnMut(bool, &UiEvent, ToggleDetails) + 'static) -> Self {
        self.set_notifier(notifier);
        self
    }

    /// Register the toggle notifier.
    pub fn set_notifier(&mut self, notifier: impl FnMut(bool, &UiEvent, ToggleDetails) + 'static) {
        self.notifier = Some(Box::new(notifier));
    }

    /// Remove the toggle notifier.
    pub fn clear_notifier(&mut self) {
        self.notifier = None;
    }

    /// Register the select notifier.
    pub fn set_on_select(&mut self, on_select: impl FnMut(&str, &UiEvent) + 'static) {
        self.on_select = Some(Box::new(on_select));
    }

    /// Current props.
    pub fn props(&self) -> &DisclosureProps {
        &self.props
    }

    /// Parts of this disclosure.
    pub fn parts(&self) -> &DisclosureParts {
        &self.parts
    }

    /// Whether the menu is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> DisclosurePhase {
        self.phase
    }

    /// What last opened the disclosure.
    pub fn last_open_source(&self) -> OpenSource {
        self.last_open_source
    }

    /// Whether the disclosure is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The active root-close subscription, present exactly while open and mounted.
    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        self.root_close.as_ref().map(RootCloseSubscription::id)
    }

    /// Mount hook.
    ///
    /// An initially open disclosure starts listening for root close and runs
    /// the open effect.
    pub fn mount<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        if self.props.id.is_none() {
            tracing::warn!(
                toggle = ?self.parts.toggle,
                "disclosure has no id; its menu cannot be labelled for assistive technologies"
            );
        }
        if self.open {
            self.phase = DisclosurePhase::Open;
            self.activate_root_close();
            self.on_open_effect(dom);
        }
    }

    /// Update hook: apply the owner's next props.
    ///
    /// A changed controlled `open` value runs the close bookkeeping before
    /// committing and the open/close effect after.
    pub fn update<D: Dom + ?Sized>(&mut self, dom: &mut D, next: DisclosureProps) {
        if self.props.is_controlled() != next.is_controlled() {
            tracing::warn!(
                toggle = ?self.parts.toggle,
                controlled = next.is_controlled(),
                "disclosure switched between controlled and uncontrolled"
            );
        }
        let next_open = next.open.unwrap_or(self.open);
        let event_changed = next.root_close_event != self.props.root_close_event;
        self.props = next;
        if !self.mounted {
            self.open = next_open;
            return;
        }
        if event_changed && self.root_close.is_some() {
            self.activate_root_close();
        }
        self.commit(dom, next_open);
    }

    /// Unmount hook: release every document listener.
    pub fn unmount(&mut self) {
        self.root_close = None;
        self.focus_was_in_menu = false;
        self.mounted = false;
        if !self.open {
            self.phase = DisclosurePhase::Closed;
        }
    }

    /// Ask to flip the open state.
    ///
    /// Returns the requested state, or `None` when unmounted.
    pub fn request_toggle<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        event: &UiEvent,
        source: ToggleSource,
    ) -> Option<bool> {
        if !self.mounted {
            return None;
        }
        let next = !self.open;
        if next {
            self.last_open_source = match source {
                ToggleSource::Click => OpenSource::Click,
                ToggleSource::KeyDown => OpenSource::KeyDown,
            };
        }
        self.request(dom, next, event, source.into());
        Some(next)
    }

    /// Ask to close. No-op when already closed.
    pub fn request_close<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        event: &UiEvent,
        source: CloseSource,
    ) -> Option<bool> {
        if !self.mounted || !self.open {
            return None;
        }
        self.request(dom, false, event, source.into());
        Some(false)
    }

    /// Click on the toggle.
    pub fn handle_click<D: Dom + ?Sized>(&mut self, dom: &mut D, event: &UiEvent) -> Option<bool> {
        if self.props.disabled {
            return None;
        }
        self.request_toggle(dom, event, ToggleSource::Click)
    }

    /// Key press on the toggle or inside the menu.
    ///
    /// A key the disclosure acts on stops the event's propagation, so an
    /// enclosing disclosure or the root-close registry seeing the same press
    /// afterwards leaves it alone. Already stopped events are ignored.
    pub fn handle_keydown<D: Dom + ?Sized>(&mut self, dom: &mut D, event: &mut UiEvent) {
        if self.props.disabled || !self.mounted || event.propagation_stopped() {
            return;
        }
        match event.key {
            Some(Key::ArrowDown) => {
                if self.open {
                    let _ = self.focus_next(dom);
                } else {
                    let _ = self.request_toggle(dom, event, ToggleSource::KeyDown);
                }
                event.prevent_default();
                event.stop_propagation();
            }
            Some(Key::ArrowUp) if self.open => {
                let _ = self.focus_previous(dom);
                event.prevent_default();
                event.stop_propagation();
            }
            Some(Key::Escape | Key::Tab) => {
                if self.request_close(dom, event, CloseSource::KeyDown).is_some() {
                    event.stop_propagation();
                }
            }
            _ => {}
        }
    }

    /// Outside interaction reported by the root-close registry.
    pub fn handle_root_close<D: Dom + ?Sized>(&mut self, dom: &mut D, event: &UiEvent) -> Option<bool> {
        self.request_close(dom, event, CloseSource::RootClose)
    }

    /// A menu item was chosen.
    pub fn handle_select<D: Dom + ?Sized>(&mut self, dom: &mut D, event: &UiEvent) -> Option<bool> {
        self.request_close(dom, event, CloseSource::Select)
    }

    /// A menu item identified by `key` was chosen.
    ///
    /// The select notifier learns the key, then the disclosure closes with
    /// [`CloseSource::Select`]. Disabled items are ignored.
    pub fn select_item<D: Dom + ?Sized>(&mut self, dom: &mut D, event: &UiEvent, key: &str) -> Option<bool> {
        if event
            .target
            .and_then(|t| dom.flags(t))
            .is_some_and(|f| f.contains(NodeFlags::DISABLED))
        {
            return None;
        }
        if let Some(on_select) = self.on_select.as_mut() {
            on_select(key, event);
        }
        self.handle_select(dom, event)
    }

    /// Route a registry delivery; returns whether it was addressed to this disclosure.
    pub fn handle_delivery<D: Dom + ?Sized>(&mut self, dom: &mut D, event: &UiEvent, delivery: &Delivery) -> bool {
        match self.subscription_id() {
            Some(id) if delivery.dismisses(id) => {
                let _ = self.handle_root_close(dom, event);
                true
            }
            _ => false,
        }
    }

    /// The enter transition finished.
    pub fn on_entered(&mut self) {
        if self.phase == DisclosurePhase::Opening {
            self.phase = DisclosurePhase::Open;
        }
    }

    /// The exit transition finished; runs the deferred close effect.
    pub fn on_exited<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if self.phase == DisclosurePhase::Closing {
            self.on_close_effect(dom);
        }
    }

    /// Focus the toggle.
    pub fn focus<D: Dom + ?Sized>(&self, dom: &mut D) -> bool {
        dom.focus_if_attached(self.parts.toggle)
    }

    /// Move focus to the next menu item, wrapping.
    pub fn focus_next<D: Dom + ?Sized>(&self, dom: &mut D) -> Option<NodeId> {
        self.cursor.focus_next(dom, self.parts.menu)
    }

    /// Move focus to the previous menu item, wrapping.
    pub fn focus_previous<D: Dom + ?Sized>(&self, dom: &mut D) -> Option<NodeId> {
        self.cursor.focus_previous(dom, self.parts.menu)
    }

    /// Attributes for the toggle.
    pub fn toggle_attributes(&self) -> ToggleAttributes<'_> {
        ToggleAttributes {
            id: self.props.id.as_deref(),
            role: "button",
            aria_haspopup: true,
            aria_expanded: self.open,
            disabled: self.props.disabled,
        }
    }

    /// Attributes for the menu.
    pub fn menu_attributes(&self) -> MenuAttributes<'_> {
        let mut classes = ClassNames::new();
        classes.push("dropdown-menu");
        if self.props.pull_right {
            classes.push("dropdown-menu-right");
        }
        MenuAttributes {
            role: "menu",
            aria_labelledby: self.props.id.as_deref(),
            classes,
        }
    }

    /// Class names for the root.
    pub fn root_classes(&self) -> ClassNames {
        let mut classes = ClassNames::new();
        classes.push(if self.props.dropup { "dropup" } else { "dropdown" });
        if self.open {
            classes.push("open");
        }
        if self.props.disabled {
            classes.push("disabled");
        }
        classes
    }

    /// Context for descendants.
    pub fn context(&self) -> DisclosureContext<'_> {
        DisclosureContext {
            id: self.props.id.as_deref(),
            role: self.props.role,
            menu: self.parts.menu,
            open: self.open,
            subscription: self.subscription_id(),
        }
    }

    fn request<D: Dom + ?Sized>(&mut self, dom: &mut D, next: bool, event: &UiEvent, source: EventSource) {
        match self.notifier.as_mut() {
            Some(notify) => notify(next, event, ToggleDetails { source }),
            None => tracing::trace!(?source, "no toggle notifier registered"),
        }
        if !self.props.is_controlled() {
            self.commit(dom, next);
        }
    }

    fn commit<D: Dom + ?Sized>(&mut self, dom: &mut D, next: bool) {
        if self.open == next {
            return;
        }
        if self.open {
            self.focus_was_in_menu = dom
                .active_element()
                .is_some_and(|active| dom.contains(self.parts.menu, active));
        }
        self.open = next;
        tracing::trace!(open = next, toggle = ?self.parts.toggle, "disclosure committed");

        if next {
            self.focus_was_in_menu = false;
            self.phase = DisclosurePhase::Opening;
            self.activate_root_close();
            self.on_open_effect(dom);
            if self.props.exit_mode == ExitMode::Immediate {
                self.phase = DisclosurePhase::Open;
            }
        } else {
            self.root_close = None;
            self.phase = DisclosurePhase::Closing;
            if self.props.exit_mode == ExitMode::Immediate {
                self.on_close_effect(dom);
            }
        }
    }

    fn activate_root_close(&mut self) {
        self.root_close = Some(
            self.registry
                .activate(self.parts.boundary(), self.props.root_close_event),
        );
    }

    fn on_open_effect<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if self.last_open_source == OpenSource::KeyDown || self.props.role == Role::MenuItem {
            let _ = self.focus_next(dom);
        }
    }

    fn on_close_effect<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        self.phase = DisclosurePhase::Closed;
        if core::mem::take(&mut self.focus_was_in_menu) && !self.focus(dom) {
            tracing::debug!(toggle = ?self.parts.toggle, "toggle gone; focus not restored");
        }
    }
}
