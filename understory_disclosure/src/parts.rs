// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The nodes a disclosure is made of.

use understory_dom::NodeId;

/// Role a child plays inside a disclosure root.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PartRole {
    /// The trigger that opens and closes the menu.
    Toggle,
    /// The floating content.
    Menu,
    /// Anything else (split-button halves, decorations).
    Other,
}

/// A disclosure's children do not have the required shape.
///
/// At least one toggle and exactly one menu are required.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// No child has [`PartRole::Toggle`].
    #[error("disclosure {0:?} is missing a child with the toggle role")]
    MissingToggle(NodeId),
    /// No child has [`PartRole::Menu`].
    #[error("disclosure {0:?} is missing a child with the menu role")]
    MissingMenu(NodeId),
    /// More than one child has [`PartRole::Menu`].
    #[error("disclosure {root:?} has {count} children with the menu role, expected exactly one")]
    DuplicateMenu {
        /// The disclosure root.
        root: NodeId,
        /// How many menu children were found.
        count: usize,
    },
}

/// Root, toggle and menu nodes of one disclosure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DisclosureParts {
    /// Container of the toggle and the menu.
    pub root: NodeId,
    /// The trigger; focus returns here on close.
    pub toggle: NodeId,
    /// The floating content holding the focusable items.
    pub menu: NodeId,
}

impl DisclosureParts {
    /// Parts from known nodes.
    pub const fn new(root: NodeId, toggle: NodeId, menu: NodeId) -> Self {
        Self { root, toggle, menu }
    }

    /// Validate a root's role-tagged children.
    ///
    /// The first toggle is the one focus returns to. Failures are also
    /// logged as development warnings.
    pub fn from_children(
        root: NodeId,
        children: impl IntoIterator<Item = (NodeId, PartRole)>,
    ) -> Result<Self, StructureError> {
        let mut toggle = None;
        let mut menu = None;
        let mut menus = 0_usize;
        for (node, role) in children {
            match role {
                PartRole::Toggle => {
                    toggle.get_or_insert(node);
                }
                PartRole::Menu => {
                    menus += 1;
                    menu.get_or_insert(node);
                }
                PartRole::Other => {}
            }
        }
        let result = match (toggle, menu) {
            (None, _) => Err(StructureError::MissingToggle(root)),
            (_, None) => Err(StructureError::MissingMenu(root)),
            _ if menus > 1 => Err(StructureError::DuplicateMenu { root, count: menus }),
            (Some(toggle), Some(menu)) => Ok(Self { root, toggle, menu }),
        };
        if let Err(err) = &result {
            tracing::warn!(%err, "invalid disclosure structure");
        }
        result
    }

    /// Nodes inside which an interaction is not a root close.
    ///
    /// Includes the toggle, whose own click handler already toggles.
    pub fn boundary(&self) -> [NodeId; 2] {
        [self.toggle, self.menu]
    }
}
