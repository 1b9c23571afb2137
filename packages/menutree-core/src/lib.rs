#![forbid(unsafe_code)]
//! Hierarchical menu store: flat nodes linked by parent id, with derived depth, dense sibling
//! order and nested views built on demand.
//! Storage sits behind [`NodeStore`] so the tree logic stays independent of the backend; the
//! crate ships an in-memory implementation.

pub mod error;
pub mod forest;
pub mod ids;
pub mod node;
pub mod ops;
pub mod seed;
pub mod traits;
pub mod tree;

pub use error::{Error, Result};
pub use forest::{build_forest, find_orphans, sibling_order};
pub use ids::{MenuId, Timestamp};
pub use node::{MenuNode, MenuView, ROOT_DEPTH};
pub use ops::{CreateMenu, MoveMenu, ReorderMenu, UpdateMenu};
pub use traits::{Clock, ManualClock, MemoryNodeStore, NodeStore, SystemClock};
pub use tree::MenuTree;
