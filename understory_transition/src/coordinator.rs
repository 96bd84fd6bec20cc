// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The enter/exit state machine.

use smallvec::SmallVec;
use understory_dom::{Dimension, Dom, NodeId};

use crate::styles::{ClassList, TransitionStyle};

/// Where the content is in its show/hide cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionStatus {
    /// Hidden (and possibly unmounted).
    #[default]
    Exited,
    /// Enter animation running.
    Entering,
    /// Fully shown.
    Entered,
    /// Exit animation running.
    Exiting,
}

/// Phase notifications reported to the host, in emission order.
///
/// `Enter`/`Exit` are the start of a phase, `Entering`/`Exiting` mark the
/// point where the end-state style has been applied, and `Entered`/`Exited`
/// mark completion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransitionEvent {
    /// Enter phase started.
    Enter,
    /// Enter animation in progress.
    Entering,
    /// Enter phase complete.
    Entered,
    /// Exit phase started.
    Exit,
    /// Exit animation in progress.
    Exiting,
    /// Exit phase complete.
    Exited,
}

/// Events produced by a single call, at most three.
pub type TransitionEvents = SmallVec<[TransitionEvent; 3]>;

/// Configuration for a [`Transition`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransitionConfig {
    /// When false every phase completes synchronously.
    pub enabled: bool,
    /// Upper bound on how long a phase waits for a transition-end signal.
    pub timeout_ms: u64,
    /// Content is not mounted until the first enter.
    pub mount_on_enter: bool,
    /// Content is unmounted once an exit completes.
    pub unmount_on_exit: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 300,
            mount_on_enter: false,
            unmount_on_exit: false,
        }
    }
}

impl TransitionConfig {
    /// A configuration whose phases complete synchronously.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Enter,
    Exit,
}

impl Phase {
    fn events(self) -> [TransitionEvent; 3] {
        match self {
            Self::Enter => [
                TransitionEvent::Enter,
                TransitionEvent::Entering,
                TransitionEvent::Entered,
            ],
            Self::Exit => [
                TransitionEvent::Exit,
                TransitionEvent::Exiting,
                TransitionEvent::Exited,
            ],
        }
    }

    fn statuses(self) -> (TransitionStatus, TransitionStatus) {
        match self {
            Self::Enter => (TransitionStatus::Entering, TransitionStatus::Entered),
            Self::Exit => (TransitionStatus::Exiting, TransitionStatus::Exited),
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Pending {
    phase: Phase,
    node: NodeId,
    deadline: u64,
}

/// Sequences enter/exit phases for one node.
///
/// Time is supplied by the caller as monotonic milliseconds, the same way
/// pointer timestamps are. Completion of an animated phase is delivered at
/// most once, by whichever of [`Transition::on_transition_end`] or
/// [`Transition::poll`] observes it first.
#[derive(Clone, Debug)]
pub struct Transition<S> {
    config: TransitionConfig,
    style: S,
    status: TransitionStatus,
    mounted: bool,
    pending: Option<Pending>,
}

impl<S: TransitionStyle> Transition<S> {
    /// A transition starting hidden.
    pub fn new(style: S, config: TransitionConfig) -> Self {
        Self {
            mounted: !(config.mount_on_enter || config.unmount_on_exit),
            config,
            style,
            status: TransitionStatus::Exited,
            pending: None,
        }
    }

    /// A transition starting fully shown.
    pub fn shown(style: S, config: TransitionConfig) -> Self {
        Self {
            config,
            style,
            status: TransitionStatus::Entered,
            mounted: true,
            pending: None,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// The style applied around each phase.
    pub fn style(&self) -> &S {
        &self.style
    }

    /// Current status.
    pub fn status(&self) -> TransitionStatus {
        self.status
    }

    /// Whether the content should currently be in the document.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether a phase is waiting for completion.
    pub fn is_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending completion fallback, if any.
    pub fn deadline(&self) -> Option<u64> {
        self.pending.map(|p| p.deadline)
    }

    /// Class names for the current status.
    pub fn classes(&self) -> ClassList {
        self.style.classes(self.status)
    }

    /// Show the content.
    ///
    /// Returns nothing when already entering or entered. A pending exit is
    /// superseded and its completion never fires.
    pub fn enter<D: Dom + ?Sized>(&mut self, dom: &mut D, node: NodeId, now: u64) -> TransitionEvents {
        if self.heading_to(Phase::Enter) {
            return TransitionEvents::new();
        }
        self.mounted = true;
        self.start(dom, node, now, Phase::Enter)
    }

    /// Hide the content.
    ///
    /// Returns nothing when already exiting or exited. A pending enter is
    /// superseded and its completion never fires.
    pub fn exit<D: Dom + ?Sized>(&mut self, dom: &mut D, node: NodeId, now: u64) -> TransitionEvents {
        if self.heading_to(Phase::Exit) {
            return TransitionEvents::new();
        }
        self.start(dom, node, now, Phase::Exit)
    }

    /// Transition-end signal from the host for `node`.
    ///
    /// Completes the pending phase if it belongs to `node`.
    pub fn on_transition_end<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        node: NodeId,
    ) -> Option<TransitionEvent> {
        let pending = self.pending.filter(|p| p.node == node)?;
        Some(self.finish(dom, pending.node, pending.phase))
    }

    /// Fire the timeout fallback once `now` reaches the deadline.
    pub fn poll<D: Dom + ?Sized>(&mut self, dom: &mut D, now: u64) -> Option<TransitionEvent> {
        let pending = self.pending.filter(|p| now >= p.deadline)?;
        Some(self.finish(dom, pending.node, pending.phase))
    }

    /// Drop the pending completion without firing it.
    ///
    /// Used when the node is destroyed. Returns whether anything was pending.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.pending.take();
        if let Some(p) = cancelled {
            tracing::trace!(phase = ?p.phase, node = ?p.node, "transition cancelled");
        }
        cancelled.is_some()
    }

    fn heading_to(&self, phase: Phase) -> bool {
        match self.pending {
            Some(p) => p.phase == phase,
            None => self.status == phase.statuses().1,
        }
    }

    fn start<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        node: NodeId,
        now: u64,
        phase: Phase,
    ) -> TransitionEvents {
        if let Some(superseded) = self.pending.take() {
            tracing::trace!(phase = ?superseded.phase, "pending transition superseded");
        }
        let [begin, progress, _] = phase.events();
        let mut out = TransitionEvents::new();

        self.style.apply(dom, node, begin);
        out.push(begin);

        if self.config.enabled {
            // Read layout so the starting style is registered before the end style.
            let _ = dom.offset_size(node, Dimension::Height);
        }

        self.status = phase.statuses().0;
        self.style.apply(dom, node, progress);
        out.push(progress);

        if self.config.enabled {
            self.pending = Some(Pending {
                phase,
                node,
                deadline: now.saturating_add(self.config.timeout_ms),
            });
        } else {
            out.push(self.finish(dom, node, phase));
        }
        out
    }

    fn finish<D: Dom + ?Sized>(&mut self, dom: &mut D, node: NodeId, phase: Phase) -> TransitionEvent {
        self.pending = None;
        let done = phase.events()[2];
        self.status = phase.statuses().1;
        self.style.apply(dom, node, done);
        if phase == Phase::Exit && self.config.unmount_on_exit {
            self.mounted = false;
        }
        tracing::trace!(?done, ?node, "transition complete");
        done
    }
}
