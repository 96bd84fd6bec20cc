// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Dom`] trait implemented by hosts.

use alloc::vec::Vec;

use crate::{Dimension, NodeFlags, NodeId};

/// Errors a host reports from imperative DOM calls.
///
/// Interaction code treats every one of these as transient: the element went
/// away or changed between scheduling and execution, so the call degrades to a
/// no-op instead of propagating through event dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The handle refers to an element that was removed.
    #[error("node {0:?} is stale")]
    StaleNode(NodeId),
    /// The element is alive but not connected to a document.
    #[error("node {0:?} is not attached to a document")]
    Detached(NodeId),
    /// The element is disabled or not focusable.
    #[error("node {0:?} does not accept focus")]
    NotFocusable(NodeId),
}

/// Read/write access to a host document.
///
/// Implementations answer structural questions in document order and own the
/// single "active element" of the document. The provided methods
/// ([`Dom::contains`], [`Dom::descendants`], [`Dom::focus_if_attached`]) are
/// defined in terms of the required ones.
pub trait Dom {
    /// Whether `node` is live and connected to a document root.
    fn is_attached(&self, node: NodeId) -> bool;

    /// Parent of `node`, or `None` for roots, detached subtrees, and stale ids.
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// Children of `node` in document order; empty for stale ids.
    fn children_of(&self, node: NodeId) -> Vec<NodeId>;

    /// Flags of `node`, or `None` for stale ids.
    fn flags(&self, node: NodeId) -> Option<NodeFlags>;

    /// The element that currently holds keyboard focus.
    fn active_element(&self) -> Option<NodeId>;

    /// Move keyboard focus to `node`.
    fn focus(&mut self, node: NodeId) -> Result<(), DomError>;

    /// Rendered outer size of `node` along `dim`, including margins.
    ///
    /// Reading it forces style recalculation in hosts that defer layout.
    fn offset_size(&self, node: NodeId, dim: Dimension) -> Option<f64>;

    /// Full content size of `node` along `dim`, including overflow.
    fn scroll_size(&self, node: NodeId, dim: Dimension) -> Option<f64>;

    /// Set (or clear with `None`) the inline size style of `node` along `dim`.
    fn set_dimension_style(&mut self, node: NodeId, dim: Dimension, value: Option<f64>);

    /// Current inline size style of `node` along `dim`.
    fn dimension_style(&self, node: NodeId, dim: Dimension) -> Option<f64>;

    /// Whether `node` is `ancestor` or one of its descendants.
    ///
    /// Returns `false` whenever either element is detached, so an interaction
    /// against a boundary that left the document counts as "outside".
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_attached(ancestor) || !self.is_attached(node) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent_of(n);
        }
        false
    }

    /// Pre-order descendants of `root`, excluding `root` itself.
    ///
    /// Empty when `root` is not attached.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_attached(root) {
            return out;
        }
        let mut stack: Vec<NodeId> = self.children_of(root);
        stack.reverse();
        while let Some(n) = stack.pop() {
            out.push(n);
            let mut children = self.children_of(n);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Focus `node` if it is still attached, reporting whether focus moved.
    fn focus_if_attached(&mut self, node: NodeId) -> bool {
        self.is_attached(node) && self.focus(node).is_ok()
    }
}
