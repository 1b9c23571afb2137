use menutree_core::{CreateMenu, ManualClock, MemoryNodeStore, MenuId, MenuTree, NodeStore};
use menutree_test_support::{
    assert_dense_orders, assert_tree_consistent, check_node_store, node, orders_by_parent,
};

#[test]
fn memory_store_passes_conformance() {
    check_node_store(MemoryNodeStore::new);
}

#[test]
fn seeded_tree_is_consistent() {
    let mut tree = MenuTree::new(MemoryNodeStore::new(), ManualClock::default());
    tree.seed().unwrap();
    assert_tree_consistent(&tree);
    assert_dense_orders(&tree.store().all().unwrap());
}

#[test]
fn tree_over_prefilled_store_reads_existing_nodes() {
    let mut store = MemoryNodeStore::new();
    store.put(node("root", None, 1, 0)).unwrap();
    store.put(node("child", Some("root"), 2, 0)).unwrap();

    let mut tree = MenuTree::new(store, ManualClock::default());
    let added = tree
        .create(CreateMenu::new("second", "Second").under("root"))
        .unwrap();
    assert_eq!(added.order, 1);
    assert_tree_consistent(&tree);

    let groups = orders_by_parent(&tree.into_store().all().unwrap());
    assert_eq!(groups[&Some(MenuId::from("root"))], vec![0, 1]);
}

#[test]
#[should_panic(expected = "not dense")]
fn dense_check_catches_gaps() {
    assert_dense_orders(&[node("a", None, 1, 0), node("b", None, 1, 2)]);
}

#[test]
#[should_panic(expected = "tree invariants violated")]
fn consistency_check_catches_wrong_depth() {
    let mut store = MemoryNodeStore::new();
    store.put(node("root", None, 1, 0)).unwrap();
    store.put(node("child", Some("root"), 3, 0)).unwrap();
    assert_tree_consistent(&MenuTree::new(store, ManualClock::default()));
}
