//! Fixed sample hierarchy loaded at service startup.

use crate::ids::MenuId;
use crate::node::{MenuNode, ROOT_DEPTH};
use crate::traits::Clock;

const SAMPLE: [(&str, &str, &str); 5] = [
    ("1", "system_management", "System Management"),
    ("1-1", "system_mgmt", "System Management"),
    ("1-1-1", "systems", "Systems"),
    ("1-1-1-1", "system_code", "System Code"),
    ("1-1-1-1-1", "code_registration", "Code Registration"),
];

/// One root chain five levels deep, each node the only child of the previous one.
pub fn sample_hierarchy<C: Clock>(clock: &mut C) -> Vec<MenuNode> {
    let mut parent: Option<MenuId> = None;
    let mut depth = ROOT_DEPTH;
    let mut out = Vec::with_capacity(SAMPLE.len());
    for (id, name, label) in SAMPLE {
        let now = clock.tick();
        let node = MenuNode {
            id: MenuId::from(id),
            name: name.to_string(),
            label: label.to_string(),
            depth,
            order: 0,
            parent_id: parent.take(),
            created_at: now,
            updated_at: now,
        };
        parent = Some(node.id.clone());
        depth += 1;
        out.push(node);
    }
    out
}
