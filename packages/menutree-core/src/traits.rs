use std::collections::HashMap;

use chrono::{Duration, Utc};

use crate::error::Result;
use crate::ids::{MenuId, Timestamp};
use crate::node::MenuNode;

/// Pluggable time source so tests can observe `updated_at` changes deterministically.
pub trait Clock {
    fn tick(&mut self) -> Timestamp;
}

/// Keyed node collection with a parent → children adjacency index.
///
/// `children_of` must reflect every `put`/`remove` immediately; the tree walks it instead of
/// scanning the whole collection.
pub trait NodeStore {
    fn get(&self, id: &MenuId) -> Result<Option<MenuNode>>;
    fn contains(&self, id: &MenuId) -> Result<bool>;
    /// Insert or replace a node, re-indexing it when its parent changed.
    fn put(&mut self, node: MenuNode) -> Result<()>;
    fn remove(&mut self, id: &MenuId) -> Result<Option<MenuNode>>;
    /// Ids of the nodes whose `parent_id` equals `parent`, in insertion order.
    fn children_of(&self, parent: Option<&MenuId>) -> Result<Vec<MenuId>>;
    fn all(&self) -> Result<Vec<MenuNode>>;
    fn len(&self) -> usize;
    fn clear(&mut self) -> Result<()>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn tick(&mut self) -> Timestamp {
        Utc::now()
    }
}

/// Clock that advances by a fixed step on every tick. Useful for tests.
#[derive(Clone, Debug)]
pub struct ManualClock {
    current: Timestamp,
    step: Duration,
}

impl ManualClock {
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            current: start,
            step: Duration::seconds(1),
        }
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Time the next tick will return.
    pub fn peek(&self) -> Timestamp {
        self.current
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(Timestamp::default())
    }
}

impl Clock for ManualClock {
    fn tick(&mut self) -> Timestamp {
        let now = self.current;
        self.current = now + self.step;
        now
    }
}

/// In-memory node store for the running service and for tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryNodeStore {
    nodes: HashMap<MenuId, MenuNode>,
    children: HashMap<Option<MenuId>, Vec<MenuId>>,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn attach(&mut self, parent: Option<MenuId>, id: MenuId) {
        self.children.entry(parent).or_default().push(id);
    }

    fn detach(&mut self, parent: &Option<MenuId>, id: &MenuId) {
        if let Some(list) = self.children.get_mut(parent) {
            list.retain(|c| c != id);
            if list.is_empty() {
                self.children.remove(parent);
            }
        }
    }
}

impl NodeStore for MemoryNodeStore {
    fn get(&self, id: &MenuId) -> Result<Option<MenuNode>> {
        Ok(self.nodes.get(id).cloned())
    }

    fn contains(&self, id: &MenuId) -> Result<bool> {
        Ok(self.nodes.contains_key(id))
    }

    fn put(&mut self, node: MenuNode) -> Result<()> {
        let previous_parent = self.nodes.get(&node.id).map(|n| n.parent_id.clone());
        match previous_parent {
            Some(parent) if parent == node.parent_id => {}
            Some(parent) => {
                self.detach(&parent, &node.id);
                self.attach(node.parent_id.clone(), node.id.clone());
            }
            None => self.attach(node.parent_id.clone(), node.id.clone()),
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    fn remove(&mut self, id: &MenuId) -> Result<Option<MenuNode>> {
        let removed = self.nodes.remove(id);
        if let Some(node) = &removed {
            self.detach(&node.parent_id, id);
        }
        Ok(removed)
    }

    fn children_of(&self, parent: Option<&MenuId>) -> Result<Vec<MenuId>> {
        Ok(self
            .children
            .get(&parent.cloned())
            .cloned()
            .unwrap_or_default())
    }

    fn all(&self) -> Result<Vec<MenuNode>> {
        Ok(self.nodes.values().cloned().collect())
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn clear(&mut self) -> Result<()> {
        self.nodes.clear();
        self.children.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>) -> MenuNode {
        MenuNode {
            id: MenuId::from(id),
            name: id.to_string(),
            label: id.to_string(),
            depth: 1,
            order: 0,
            parent_id: parent.map(MenuId::from),
            created_at: Timestamp::default(),
            updated_at: Timestamp::default(),
        }
    }

    #[test]
    fn put_indexes_children_in_insertion_order() {
        let mut store = MemoryNodeStore::new();
        store.put(node("a", None)).unwrap();
        store.put(node("b", Some("a"))).unwrap();
        store.put(node("c", Some("a"))).unwrap();

        assert_eq!(
            store.children_of(Some(&MenuId::from("a"))).unwrap(),
            vec![MenuId::from("b"), MenuId::from("c")]
        );
        assert_eq!(store.children_of(None).unwrap(), vec![MenuId::from("a")]);
    }

    #[test]
    fn put_reindexes_on_parent_change() {
        let mut store = MemoryNodeStore::new();
        store.put(node("a", None)).unwrap();
        store.put(node("b", None)).unwrap();
        store.put(node("c", Some("a"))).unwrap();

        store.put(node("c", Some("b"))).unwrap();

        assert!(store.children_of(Some(&MenuId::from("a"))).unwrap().is_empty());
        assert_eq!(
            store.children_of(Some(&MenuId::from("b"))).unwrap(),
            vec![MenuId::from("c")]
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn replacing_without_parent_change_keeps_index_position() {
        let mut store = MemoryNodeStore::new();
        store.put(node("a", None)).unwrap();
        store.put(node("b", None)).unwrap();
        let mut renamed = node("a", None);
        renamed.label = "renamed".into();
        store.put(renamed).unwrap();

        assert_eq!(
            store.children_of(None).unwrap(),
            vec![MenuId::from("a"), MenuId::from("b")]
        );
    }

    #[test]
    fn remove_detaches_from_parent() {
        let mut store = MemoryNodeStore::new();
        store.put(node("a", None)).unwrap();
        store.put(node("b", Some("a"))).unwrap();

        let removed = store.remove(&MenuId::from("b")).unwrap();
        assert_eq!(removed.map(|n| n.id), Some(MenuId::from("b")));
        assert!(store.children_of(Some(&MenuId::from("a"))).unwrap().is_empty());
        assert!(store.remove(&MenuId::from("b")).unwrap().is_none());
    }

    #[test]
    fn manual_clock_advances_by_step() {
        let mut clock = ManualClock::default().with_step(Duration::milliseconds(5));
        let first = clock.tick();
        let second = clock.tick();
        assert_eq!(second - first, Duration::milliseconds(5));
        assert_eq!(clock.peek() - second, Duration::milliseconds(5));
    }
}
