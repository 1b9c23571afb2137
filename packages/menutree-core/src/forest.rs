//! Derives the nested view of a flat node collection.
//!
//! The nested shape is never stored. Every read that needs children calls [`build_forest`]
//! over the current flat collection, so the view can't drift from the stored parent links.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::ids::MenuId;
use crate::node::{MenuNode, MenuView};

/// Display order among siblings. Ties (only possible after reparenting) fall back to creation
/// time and then id so the output is deterministic.
pub fn sibling_order(a: &MenuNode, b: &MenuNode) -> Ordering {
    a.order
        .cmp(&b.order)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Build the ordered forest hanging below `root_parent` (`None` = the real roots).
///
/// Nodes whose parent is missing from `nodes` are not reachable and are left out; use
/// [`find_orphans`] to report them.
pub fn build_forest<'a>(nodes: &'a [MenuNode], root_parent: Option<&'a MenuId>) -> Vec<MenuView> {
    let mut groups: HashMap<Option<&MenuId>, Vec<&MenuNode>> = HashMap::new();
    for node in nodes {
        groups.entry(node.parent_id.as_ref()).or_default().push(node);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| sibling_order(a, b));
    }

    let mut visited = HashSet::new();
    if let Some(start) = root_parent {
        visited.insert(start);
    }
    assemble(&groups, root_parent, &mut visited)
}

fn assemble<'a>(
    groups: &HashMap<Option<&'a MenuId>, Vec<&'a MenuNode>>,
    parent: Option<&'a MenuId>,
    visited: &mut HashSet<&'a MenuId>,
) -> Vec<MenuView> {
    let Some(group) = groups.get(&parent) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(group.len());
    for &node in group {
        // corrupt parent links could otherwise recurse forever
        if !visited.insert(&node.id) {
            continue;
        }
        out.push(MenuView {
            node: node.clone(),
            children: assemble(groups, Some(&node.id), visited),
        });
    }
    out
}

/// Nodes whose `parent_id` points at a node that is not in `nodes`.
pub fn find_orphans(nodes: &[MenuNode]) -> Vec<&MenuNode> {
    let ids: HashSet<&MenuId> = nodes.iter().map(|n| &n.id).collect();
    nodes
        .iter()
        .filter(|n| n.parent_id.as_ref().is_some_and(|p| !ids.contains(p)))
        .collect()
}
