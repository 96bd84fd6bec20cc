// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`Dom`] implementation.

use alloc::vec::Vec;
use core::cell::Cell;

use hashbrown::HashMap;
use kurbo::Size;

use crate::{Dimension, Dom, DomError, NodeFlags, NodeId};

/// Layout metrics of an in-memory element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Metrics {
    /// Rendered outer size (including margins).
    pub offset: Size,
    /// Full content size (including overflow).
    pub scroll: Size,
}

#[derive(Clone, Debug)]
struct Element {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    flags: NodeFlags,
    is_root: bool,
    metrics: Metrics,
    styles: HashMap<Dimension, f64>,
}

impl Element {
    fn new(generation: u32, flags: NodeFlags) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            flags,
            is_root: false,
            metrics: Metrics::default(),
            styles: HashMap::new(),
        }
    }
}

/// A document held entirely in memory.
///
/// Element slots are generational: removing an element frees its slot and any
/// later element reusing the slot gets a higher generation, so stale handles
/// never resolve. Elements may also be detached (unlinked but alive), which is
/// how a host models content that left the document but may come back.
///
/// ```rust
/// use understory_dom::{Dom, MemoryDom, NodeFlags};
///
/// let mut dom = MemoryDom::new();
/// let root = dom.create_root();
/// let a = dom.insert(Some(root), NodeFlags::CONTROL);
/// dom.remove(a);
/// let b = dom.insert(Some(root), NodeFlags::CONTROL);
/// assert!(dom.is_attached(b));
/// assert!(!dom.is_attached(a));
/// ```
#[derive(Default)]
pub struct MemoryDom {
    /// slots
    nodes: Vec<Option<Element>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    active: Option<NodeId>,
    layout_reads: Cell<u64>,
}

impl core::fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("MemoryDom")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl MemoryDom {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document root (the equivalent of `<body>`).
    pub fn create_root(&mut self) -> NodeId {
        let id = self.insert(None, NodeFlags::empty());
        self.node_mut(id).is_root = true;
        id
    }

    /// Insert a new element as the last child of `parent`, or detached if `None`.
    pub fn insert(&mut self, parent: Option<NodeId>, flags: NodeFlags) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Element::new(generation, flags));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Element::new(generation, flags)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId(idx as u32, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove an element and its subtree. Handles into the subtree become stale.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        if self.active == Some(id) {
            self.active = None;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Unlink an element from its parent while keeping the subtree alive.
    pub fn detach(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
    }

    /// Move `id` to be the last child of `new_parent` (or detached if `None`).
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        self.detach(id);
        if let Some(p) = new_parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Replace the flags of a live element.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags = flags;
        }
    }

    /// Replace the layout metrics of a live element.
    pub fn set_metrics(&mut self, id: NodeId, metrics: Metrics) {
        if let Some(n) = self.node_opt_mut(id) {
            n.metrics = metrics;
        }
    }

    /// Drop keyboard focus (the document body becomes active).
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Number of layout reads performed through [`Dom::offset_size`].
    pub fn layout_reads(&self) -> u64 {
        self.layout_reads.get()
    }

    /// Live element access; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Element {
        self.nodes[id.idx()]
            .as_ref()
            .expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Element {
        self.nodes[id.idx()]
            .as_mut()
            .expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Element> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

impl Dom for MemoryDom {
    fn is_attached(&self, node: NodeId) -> bool {
        let mut cur = node;
        loop {
            let Some(n) = self.node_opt(cur) else {
                return false;
            };
            match n.parent {
                Some(p) => cur = p,
                None => return n.is_root,
            }
        }
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node_opt(node).and_then(|n| n.parent)
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.node_opt(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn flags(&self, node: NodeId) -> Option<NodeFlags> {
        self.node_opt(node).map(|n| n.flags)
    }

    fn active_element(&self) -> Option<NodeId> {
        // Focus held by a subtree that left the document falls back to the body.
        self.active.filter(|&n| self.is_attached(n))
    }

    fn focus(&mut self, node: NodeId) -> Result<(), DomError> {
        let Some(n) = self.node_opt(node) else {
            return Err(DomError::StaleNode(node));
        };
        if !n.flags.accepts_focus() {
            return Err(DomError::NotFocusable(node));
        }
        if !self.is_attached(node) {
            return Err(DomError::Detached(node));
        }
        self.active = Some(node);
        Ok(())
    }

    fn offset_size(&self, node: NodeId, dim: Dimension) -> Option<f64> {
        let n = self.node_opt(node)?;
        self.layout_reads.set(self.layout_reads.get() + 1);
        Some(match dim {
            Dimension::Height => n.metrics.offset.height,
            Dimension::Width => n.metrics.offset.width,
        })
    }

    fn scroll_size(&self, node: NodeId, dim: Dimension) -> Option<f64> {
        let n = self.node_opt(node)?;
        Some(match dim {
            Dimension::Height => n.metrics.scroll.height,
            Dimension::Width => n.metrics.scroll.width,
        })
    }

    fn set_dimension_style(&mut self, node: NodeId, dim: Dimension, value: Option<f64>) {
        if let Some(n) = self.node_opt_mut(node) {
            match value {
                Some(v) => {
                    n.styles.insert(dim, v);
                }
                None => {
                    n.styles.remove(&dim);
                }
            }
        }
    }

    fn dimension_style(&self, node: NodeId, dim: Dimension) -> Option<f64> {
        self.node_opt(node).and_then(|n| n.styles.get(&dim).copied())
    }
}
