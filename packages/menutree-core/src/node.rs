#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{MenuId, Timestamp};

/// Depth assigned to nodes without a parent.
pub const ROOT_DEPTH: u32 = 1;

/// A stored menu entry. Never carries children; see [`MenuView`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MenuNode {
    pub id: MenuId,
    pub name: String,
    pub label: String,
    pub depth: u32,
    pub order: u32,
    pub parent_id: Option<MenuId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MenuNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A node together with its derived, ordered children.
///
/// Built on demand by [`crate::forest::build_forest`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MenuView {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub node: MenuNode,
    pub children: Vec<MenuView>,
}

impl MenuView {
    pub fn leaf(node: MenuNode) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &MenuId {
        &self.node.id
    }

    /// Number of nodes in this view, itself included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(MenuView::size).sum::<usize>()
    }

    /// Pre-order iterator over every node in the view.
    pub fn iter(&self) -> impl Iterator<Item = &MenuNode> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(&next.node)
        })
    }
}
