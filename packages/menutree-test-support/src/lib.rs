//! Test helpers shared by the menutree crates.
//!
//! [`check_node_store`] runs the conformance checks every [`NodeStore`] backend has to pass.
//! The assertion helpers panic with a descriptive message, so they are meant for tests only.

use std::collections::{HashMap, HashSet};

use menutree_core::{
    Clock, MenuId, MenuNode, MenuTree, MenuView, NodeStore, Timestamp, ROOT_DEPTH,
};

/// Stored node with fixed timestamps, for feeding stores directly.
pub fn node(id: &str, parent: Option<&str>, depth: u32, order: u32) -> MenuNode {
    MenuNode {
        id: MenuId::from(id),
        name: id.to_string(),
        label: id.to_uppercase(),
        depth,
        order,
        parent_id: parent.map(MenuId::from),
        created_at: Timestamp::default(),
        updated_at: Timestamp::default(),
    }
}

/// Sibling `order` values grouped by parent, each group sorted.
pub fn orders_by_parent(nodes: &[MenuNode]) -> HashMap<Option<MenuId>, Vec<u32>> {
    let mut groups: HashMap<Option<MenuId>, Vec<u32>> = HashMap::new();
    for n in nodes {
        groups.entry(n.parent_id.clone()).or_default().push(n.order);
    }
    for orders in groups.values_mut() {
        orders.sort_unstable();
    }
    groups
}

/// Panics unless every sibling group's orders are exactly `0..len`.
pub fn assert_dense_orders(nodes: &[MenuNode]) {
    for (parent, orders) in orders_by_parent(nodes) {
        let expected: Vec<u32> = (0..orders.len() as u32).collect();
        assert_eq!(orders, expected, "sibling orders under {parent:?} are not dense");
    }
}

/// Structural checks on a whole tree: stored invariants hold and the nested view contains
/// every node exactly once, under its real parent.
pub fn assert_tree_consistent<S: NodeStore, C: Clock>(tree: &MenuTree<S, C>) {
    if let Err(err) = tree.validate_invariants() {
        panic!("tree invariants violated: {err}");
    }
    let forest = match tree.list_as_tree() {
        Ok(forest) => forest,
        Err(err) => panic!("list_as_tree failed: {err}"),
    };
    let mut seen = HashSet::new();
    for root in &forest {
        assert_eq!(root.node.depth, ROOT_DEPTH, "root {} has wrong depth", root.id());
        assert_view(root, &mut seen);
    }
    assert_eq!(seen.len(), tree.len(), "forest does not cover every node");
}

fn assert_view(view: &MenuView, seen: &mut HashSet<MenuId>) {
    assert!(
        seen.insert(view.id().clone()),
        "{} appears twice in the forest",
        view.id()
    );
    for pair in view.children.windows(2) {
        assert!(pair[0].node.order <= pair[1].node.order, "children of {} out of order", view.id());
    }
    for child in &view.children {
        assert_eq!(child.node.parent_id.as_ref(), Some(view.id()));
        assert_eq!(child.node.depth, view.node.depth + 1);
        assert_view(child, seen);
    }
}

/// Conformance suite for [`NodeStore`] implementations. `make` must return an empty store.
pub fn check_node_store<S, F>(mut make: F)
where
    S: NodeStore,
    F: FnMut() -> S,
{
    stores_and_replaces(make());
    indexes_children_in_insertion_order(make());
    reindexes_on_parent_change(make());
    removes_and_detaches(make());
    clears_everything(make());
}

fn ids(list: &[&str]) -> Vec<MenuId> {
    list.iter().map(|s| MenuId::from(*s)).collect()
}

fn stores_and_replaces<S: NodeStore>(mut store: S) {
    assert!(store.is_empty());
    store.put(node("a", None, 1, 0)).expect("put");
    assert!(store.contains(&MenuId::from("a")).expect("contains"));
    assert_eq!(store.len(), 1);

    let mut renamed = node("a", None, 1, 0);
    renamed.label = "Renamed".into();
    store.put(renamed.clone()).expect("replace");
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&MenuId::from("a")).expect("get"), Some(renamed));
    assert_eq!(store.get(&MenuId::from("missing")).expect("get"), None);
}

fn indexes_children_in_insertion_order<S: NodeStore>(mut store: S) {
    store.put(node("p", None, 1, 0)).expect("put");
    for id in ["c", "a", "b"] {
        store.put(node(id, Some("p"), 2, 0)).expect("put");
    }
    assert_eq!(
        store.children_of(Some(&MenuId::from("p"))).expect("children"),
        ids(&["c", "a", "b"])
    );
    assert_eq!(store.children_of(None).expect("roots"), ids(&["p"]));
    assert!(store
        .children_of(Some(&MenuId::from("a")))
        .expect("children")
        .is_empty());
}

fn reindexes_on_parent_change<S: NodeStore>(mut store: S) {
    store.put(node("x", None, 1, 0)).expect("put");
    store.put(node("y", None, 1, 1)).expect("put");
    store.put(node("z", Some("x"), 2, 0)).expect("put");

    store.put(node("z", Some("y"), 2, 0)).expect("reparent");
    assert!(store
        .children_of(Some(&MenuId::from("x")))
        .expect("children")
        .is_empty());
    assert_eq!(
        store.children_of(Some(&MenuId::from("y"))).expect("children"),
        ids(&["z"])
    );

    store.put(node("z", None, 1, 2)).expect("to root");
    assert_eq!(store.children_of(None).expect("roots"), ids(&["x", "y", "z"]));
}

fn removes_and_detaches<S: NodeStore>(mut store: S) {
    store.put(node("r", None, 1, 0)).expect("put");
    store.put(node("k", Some("r"), 2, 0)).expect("put");

    let removed = store.remove(&MenuId::from("k")).expect("remove");
    assert_eq!(removed.map(|n| n.id), Some(MenuId::from("k")));
    assert!(store
        .children_of(Some(&MenuId::from("r")))
        .expect("children")
        .is_empty());
    assert_eq!(store.remove(&MenuId::from("k")).expect("remove"), None);
    assert_eq!(store.all().expect("all").len(), 1);
}

fn clears_everything<S: NodeStore>(mut store: S) {
    store.put(node("a", None, 1, 0)).expect("put");
    store.put(node("b", Some("a"), 2, 0)).expect("put");
    store.clear().expect("clear");
    assert!(store.is_empty());
    assert!(store.children_of(None).expect("roots").is_empty());
    assert!(store.all().expect("all").is_empty());
}
