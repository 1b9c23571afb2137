use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::forest::{build_forest, find_orphans, sibling_order};
use crate::ids::MenuId;
use crate::node::{MenuNode, MenuView, ROOT_DEPTH};
use crate::ops::{CreateMenu, UpdateMenu};
use crate::seed;
use crate::traits::{Clock, MemoryNodeStore, NodeStore, SystemClock};

/// Menu tree facade that owns the node store and keeps depth and sibling order consistent.
///
/// Every mutation validates first and writes afterwards, so a failed call leaves the store as
/// it was.
pub struct MenuTree<S = MemoryNodeStore, C = SystemClock>
where
    S: NodeStore,
    C: Clock,
{
    store: S,
    clock: C,
}

impl MenuTree<MemoryNodeStore, SystemClock> {
    pub fn in_memory() -> Self {
        Self::new(MemoryNodeStore::new(), SystemClock)
    }
}

impl<S, C> MenuTree<S, C>
where
    S: NodeStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Load the sample hierarchy into an empty store.
    pub fn seed(&mut self) -> Result<()> {
        if !self.store.is_empty() {
            return Err(Error::InvalidOperation(
                "sample data can only be loaded into an empty store".into(),
            ));
        }
        let nodes = seed::sample_hierarchy(&mut self.clock);
        let count = nodes.len();
        for node in nodes {
            self.store.put(node)?;
        }
        debug!(count, "seeded sample menu hierarchy");
        Ok(())
    }

    /// The whole collection as an ordered forest of root menus.
    pub fn list_as_tree(&self) -> Result<Vec<MenuView>> {
        let nodes = self.store.all()?;
        let orphans = find_orphans(&nodes);
        if !orphans.is_empty() {
            let ids: Vec<&str> = orphans.iter().map(|n| n.id.as_str()).collect();
            warn!(count = orphans.len(), ?ids, "menus reference missing parents; left out of tree");
        }
        Ok(build_forest(&nodes, None))
    }

    pub fn get(&self, id: &MenuId) -> Result<Option<MenuNode>> {
        self.store.get(id)
    }

    /// The node with its derived children, or `None` if `id` is unknown.
    pub fn get_with_children(&self, id: &MenuId) -> Result<Option<MenuView>> {
        let Some(node) = self.store.get(id)? else {
            return Ok(None);
        };
        let nodes = self.store.all()?;
        let children = build_forest(&nodes, Some(&node.id));
        Ok(Some(MenuView { node, children }))
    }

    /// Append a new node at the end of its sibling list.
    pub fn create(&mut self, input: CreateMenu) -> Result<MenuNode> {
        let depth = match &input.parent_id {
            Some(parent_id) => {
                let parent = self
                    .store
                    .get(parent_id)?
                    .ok_or_else(|| Error::ParentNotFound(parent_id.clone()))?;
                parent.depth + 1
            }
            None => ROOT_DEPTH,
        };
        let order = to_order(self.store.children_of(input.parent_id.as_ref())?.len())?;

        let id = MenuId::generate();
        if self.store.contains(&id)? {
            return Err(Error::InconsistentState(format!("generated id {id} already exists")));
        }

        let now = self.clock.tick();
        let node = MenuNode {
            id,
            name: input.name,
            label: input.label,
            depth,
            order,
            parent_id: input.parent_id,
            created_at: now,
            updated_at: now,
        };
        self.store.put(node.clone())?;
        debug!(id = %node.id, parent = ?node.parent_id, depth, order, "created menu");
        Ok(node)
    }

    /// Apply a partial update. Absent or empty `name`/`label` leave the stored value alone.
    ///
    /// A parent change re-derives the depth of the whole subtree, appends the node at the end
    /// of its new sibling list and renumbers the siblings it left behind.
    pub fn update(&mut self, id: &MenuId, input: UpdateMenu) -> Result<MenuNode> {
        let current = self.load(id)?;
        let mut updated = current.clone();
        if let Some(name) = input.name.filter(|n| !n.is_empty()) {
            updated.name = name;
        }
        if let Some(label) = input.label.filter(|l| !l.is_empty()) {
            updated.label = label;
        }

        let mut shifted = Vec::new();
        let mut reparented = false;
        if let Some(new_parent) = input.parent_id {
            if new_parent != current.parent_id {
                let depth = self.reparent_depth(id, new_parent.as_ref())?;
                let delta = i64::from(depth) - i64::from(current.depth);
                if delta != 0 {
                    for descendant in self.descendants(id)? {
                        let mut node = self.load(&descendant)?;
                        node.depth = shift_depth(node.depth, delta)?;
                        shifted.push(node);
                    }
                }
                updated.order = to_order(self.store.children_of(new_parent.as_ref())?.len())?;
                updated.depth = depth;
                updated.parent_id = new_parent;
                reparented = true;
            }
        }

        updated.updated_at = self.clock.tick();
        let moved = shifted.len();
        for node in shifted {
            self.store.put(node)?;
        }
        self.store.put(updated.clone())?;
        if reparented {
            let left_behind = self.sorted_siblings(current.parent_id.as_ref())?;
            self.renumber(left_behind)?;
        }
        debug!(
            id = %updated.id,
            parent = ?updated.parent_id,
            depth = updated.depth,
            order = updated.order,
            descendants_shifted = moved,
            "updated menu"
        );
        Ok(updated)
    }

    /// Reparent `id`; `None` moves it to the root level.
    pub fn move_node(&mut self, id: &MenuId, parent_id: Option<MenuId>) -> Result<MenuNode> {
        self.update(id, UpdateMenu::reparent(parent_id))
    }

    /// Delete `id` and its whole subtree. Returns `false` if `id` is unknown.
    ///
    /// The remaining siblings of `id` are renumbered so their orders stay dense.
    pub fn delete(&mut self, id: &MenuId) -> Result<bool> {
        let Some(node) = self.store.get(id)? else {
            return Ok(false);
        };
        let doomed = self.descendants(id)?;
        // pre-order reversed: every child goes before its parent
        for descendant in doomed.iter().rev() {
            self.store.remove(descendant)?;
        }
        self.store.remove(id)?;

        let siblings = self.sorted_siblings(node.parent_id.as_ref())?;
        self.renumber(siblings)?;
        debug!(id = %id, removed = doomed.len() + 1, "deleted menu subtree");
        Ok(true)
    }

    /// Move `id` to position `new_order` among its siblings, clamped to the valid range, and
    /// renumber the sibling list from 0. Only the moved node gets a new `updated_at`.
    pub fn reorder(&mut self, id: &MenuId, new_order: u32) -> Result<MenuNode> {
        let mut node = self.load(id)?;
        let mut siblings = self.sorted_siblings(node.parent_id.as_ref())?;
        siblings.retain(|s| s.id != *id);

        let position = usize::try_from(new_order)
            .unwrap_or(usize::MAX)
            .min(siblings.len());
        node.order = to_order(position)?;
        node.updated_at = self.clock.tick();
        self.store.put(node.clone())?;

        siblings.insert(position, node.clone());
        self.renumber(siblings)?;
        debug!(id = %id, order = node.order, "reordered menu");
        Ok(node)
    }

    /// Ancestor ids of `id`, nearest parent first.
    pub fn ancestors(&self, id: &MenuId) -> Result<Vec<MenuId>> {
        let node = self.load(id)?;
        let mut out = Vec::new();
        let mut seen = HashSet::from([id.clone()]);
        let mut current = node.parent_id;
        while let Some(parent_id) = current {
            if !seen.insert(parent_id.clone()) {
                return Err(Error::InconsistentState(format!(
                    "cycle detected above {id} at {parent_id}"
                )));
            }
            let Some(parent) = self.store.get(&parent_id)? else {
                break;
            };
            out.push(parent_id);
            current = parent.parent_id;
        }
        Ok(out)
    }

    /// Whether `candidate` lies strictly inside the subtree rooted at `ancestor`.
    pub fn is_descendant(&self, ancestor: &MenuId, candidate: &MenuId) -> Result<bool> {
        Ok(self.ancestors(candidate)?.contains(ancestor))
    }

    /// Ids of every node below `id`, parents before their children.
    pub fn descendants(&self, id: &MenuId) -> Result<Vec<MenuId>> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([id.clone()]);
        let mut stack = self.store.children_of(Some(id))?;
        while let Some(next) = stack.pop() {
            if !seen.insert(next.clone()) {
                return Err(Error::InconsistentState(format!("cycle detected at {next}")));
            }
            stack.extend(self.store.children_of(Some(&next))?);
            out.push(next);
        }
        Ok(out)
    }

    /// Check parent existence, depth consistency and acyclicity over the whole store.
    /// Intended for tests and debugging.
    pub fn validate_invariants(&self) -> Result<()> {
        for node in self.store.all()? {
            let expected = match &node.parent_id {
                Some(parent_id) => {
                    let parent = self.store.get(parent_id)?.ok_or_else(|| {
                        Error::InconsistentState(format!(
                            "{} references missing parent {parent_id}",
                            node.id
                        ))
                    })?;
                    parent.depth + 1
                }
                None => ROOT_DEPTH,
            };
            if node.depth != expected {
                return Err(Error::InconsistentState(format!(
                    "{} has depth {} but expected {expected}",
                    node.id, node.depth
                )));
            }
            self.ancestors(&node.id)?;
        }
        Ok(())
    }

    fn load(&self, id: &MenuId) -> Result<MenuNode> {
        self.store.get(id)?.ok_or_else(|| Error::NotFound(id.clone()))
    }

    /// Depth `id` would have under `new_parent`, rejecting missing parents and cycles.
    fn reparent_depth(&self, id: &MenuId, new_parent: Option<&MenuId>) -> Result<u32> {
        let Some(parent_id) = new_parent else {
            return Ok(ROOT_DEPTH);
        };
        let parent = self
            .store
            .get(parent_id)?
            .ok_or_else(|| Error::ParentNotFound(parent_id.clone()))?;
        if parent_id == id {
            return Err(Error::InvalidOperation(format!("cannot move menu {id} into itself")));
        }
        if self.is_descendant(id, parent_id)? {
            return Err(Error::InvalidOperation(format!(
                "cannot move menu {id} to its own descendant {parent_id}"
            )));
        }
        Ok(parent.depth + 1)
    }

    fn sorted_siblings(&self, parent: Option<&MenuId>) -> Result<Vec<MenuNode>> {
        let mut siblings = Vec::new();
        for id in self.store.children_of(parent)? {
            siblings.push(self.load(&id)?);
        }
        siblings.sort_by(sibling_order);
        Ok(siblings)
    }

    /// Assign orders 0.. in sequence order, writing only nodes whose order changed.
    fn renumber(&mut self, siblings: Vec<MenuNode>) -> Result<()> {
        for (position, mut sibling) in siblings.into_iter().enumerate() {
            let order = to_order(position)?;
            if sibling.order != order {
                sibling.order = order;
                self.store.put(sibling)?;
            }
        }
        Ok(())
    }
}

fn to_order(position: usize) -> Result<u32> {
    u32::try_from(position)
        .map_err(|_| Error::InconsistentState(format!("sibling position {position} overflows")))
}

fn shift_depth(depth: u32, delta: i64) -> Result<u32> {
    u32::try_from(i64::from(depth) + delta)
        .ok()
        .filter(|d| *d >= ROOT_DEPTH)
        .ok_or_else(|| {
            Error::InconsistentState(format!("depth {depth} shifted by {delta} is out of range"))
        })
}
