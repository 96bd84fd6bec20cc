// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in transition styles.

use smallvec::SmallVec;
use understory_dom::{Dimension, Dom, NodeId};

use crate::coordinator::{TransitionEvent, TransitionStatus};

/// Class names a style wants on the transitioning node for a given status.
pub type ClassList = SmallVec<[&'static str; 3]>;

/// Applies start and end styles around each transition phase.
///
/// Hooks run before the matching [`TransitionEvent`] is reported to the host.
pub trait TransitionStyle {
    /// Called once per emitted event with the transitioning node.
    fn apply<D: Dom + ?Sized>(&self, dom: &mut D, node: NodeId, event: TransitionEvent) {
        let _ = (dom, node, event);
    }

    /// Class names for `status`, in the order they should be rendered.
    fn classes(&self, status: TransitionStatus) -> ClassList;
}

/// Opacity fade driven purely by class names.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Fade;

impl TransitionStyle for Fade {
    fn classes(&self, status: TransitionStatus) -> ClassList {
        let mut out = ClassList::new();
        out.push("fade");
        if matches!(status, TransitionStatus::Entering | TransitionStatus::Entered) {
            out.push("in");
        }
        out
    }
}

/// Height (or width) collapse.
///
/// The dimension is pinned to an explicit value for the duration of each
/// phase so the host can animate between concrete sizes, and cleared once
/// the content is fully shown.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Collapse {
    /// The collapsing dimension.
    pub dimension: Dimension,
}

impl Collapse {
    /// A collapse along `dimension`.
    pub const fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }
}

impl TransitionStyle for Collapse {
    fn apply<D: Dom + ?Sized>(&self, dom: &mut D, node: NodeId, event: TransitionEvent) {
        let dim = self.dimension;
        let value = match event {
            TransitionEvent::Enter | TransitionEvent::Exiting => Some(0.0),
            TransitionEvent::Entering => dom.scroll_size(node, dim),
            TransitionEvent::Entered => None,
            TransitionEvent::Exit => dom.offset_size(node, dim),
            TransitionEvent::Exited => return,
        };
        dom.set_dimension_style(node, dim, value);
    }

    fn classes(&self, status: TransitionStatus) -> ClassList {
        let mut out = ClassList::new();
        match status {
            TransitionStatus::Exited => out.push("collapse"),
            TransitionStatus::Entering | TransitionStatus::Exiting => out.push("collapsing"),
            TransitionStatus::Entered => {
                out.push("collapse");
                out.push("in");
            }
        }
        if self.dimension == Dimension::Width {
            out.push("width");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use understory_dom::{MemoryDom, Metrics, NodeFlags};

    fn panel() -> (MemoryDom, NodeId) {
        let mut dom = MemoryDom::new();
        let root = dom.create_root();
        let node = dom.insert(Some(root), NodeFlags::empty());
        dom.set_metrics(
            node,
            Metrics {
                offset: Size::new(200.0, 80.0),
                scroll: Size::new(240.0, 120.0),
            },
        );
        (dom, node)
    }

    #[test]
    fn fade_classes() {
        assert_eq!(Fade.classes(TransitionStatus::Exited).as_slice(), &["fade"]);
        assert_eq!(Fade.classes(TransitionStatus::Exiting).as_slice(), &["fade"]);
        assert_eq!(
            Fade.classes(TransitionStatus::Entering).as_slice(),
            &["fade", "in"]
        );
        assert_eq!(
            Fade.classes(TransitionStatus::Entered).as_slice(),
            &["fade", "in"]
        );
    }

    #[test]
    fn collapse_classes_mark_width() {
        let h = Collapse::default();
        assert_eq!(h.classes(TransitionStatus::Exited).as_slice(), &["collapse"]);
        assert_eq!(h.classes(TransitionStatus::Entering).as_slice(), &["collapsing"]);
        assert_eq!(h.classes(TransitionStatus::Entered).as_slice(), &["collapse", "in"]);

        let w = Collapse::new(Dimension::Width);
        assert_eq!(
            w.classes(TransitionStatus::Exiting).as_slice(),
            &["collapsing", "width"]
        );
    }

    #[test]
    fn collapse_enter_pins_then_clears_height() {
        let (mut dom, node) = panel();
        let c = Collapse::default();

        c.apply(&mut dom, node, TransitionEvent::Enter);
        assert_eq!(dom.dimension_style(node, Dimension::Height), Some(0.0));
        c.apply(&mut dom, node, TransitionEvent::Entering);
        assert_eq!(dom.dimension_style(node, Dimension::Height), Some(120.0));
        c.apply(&mut dom, node, TransitionEvent::Entered);
        assert_eq!(dom.dimension_style(node, Dimension::Height), None);
    }

    #[test]
    fn collapse_exit_starts_from_rendered_size() {
        let (mut dom, node) = panel();
        let c = Collapse::new(Dimension::Width);

        c.apply(&mut dom, node, TransitionEvent::Exit);
        assert_eq!(dom.dimension_style(node, Dimension::Width), Some(200.0));
        c.apply(&mut dom, node, TransitionEvent::Exiting);
        assert_eq!(dom.dimension_style(node, Dimension::Width), Some(0.0));
        c.apply(&mut dom, node, TransitionEvent::Exited);
        assert_eq!(dom.dimension_style(node, Dimension::Width), Some(0.0));
        assert_eq!(dom.dimension_style(node, Dimension::Height), None);
    }
}
