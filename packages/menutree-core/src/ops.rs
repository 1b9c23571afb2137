//! Request shapes for the tree mutations and their shape validation.
//!
//! Validation here only covers the shape of the input (required strings present and non-empty,
//! non-negative order). Referential checks such as parent existence and cycle prevention are
//! done by [`crate::MenuTree`] against the current store state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::ids::MenuId;

/// Input for [`crate::MenuTree::create`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CreateMenu {
    pub name: String,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent_id: Option<MenuId>,
}

/// Partial update for [`crate::MenuTree::update`]. `None` leaves a field unchanged.
///
/// `parent_id` is doubly optional: `None` keeps the current parent, `Some(None)` moves the
/// node to the root level, `Some(Some(id))` reparents it under `id`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UpdateMenu {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "deserialize_present")
    )]
    pub parent_id: Option<Option<MenuId>>,
}

/// Input for [`crate::MenuTree::move_node`]. A missing or `null` parent means root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MoveMenu {
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent_id: Option<MenuId>,
}

/// Input for [`crate::MenuTree::reorder`].
///
/// Signed so that negative positions survive deserialization and are rejected by
/// [`ReorderMenu::validate`] instead of failing as a type error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct ReorderMenu {
    pub order: i64,
}

#[cfg(feature = "serde")]
fn deserialize_present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn check_parent(parent: Option<&MenuId>) -> Result<()> {
    match parent {
        Some(id) if id.as_str().is_empty() => {
            Err(Error::Validation("parentId must not be empty".into()))
        }
        _ => Ok(()),
    }
}

impl CreateMenu {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            parent_id: None,
        }
    }

    pub fn under(mut self, parent: impl Into<MenuId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_non_empty("Name", &self.name)?;
        require_non_empty("Label", &self.label)?;
        check_parent(self.parent_id.as_ref())
    }
}

impl UpdateMenu {
    pub fn rename(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            label: Some(label.into()),
            parent_id: None,
        }
    }

    pub fn reparent(parent: Option<MenuId>) -> Self {
        Self {
            parent_id: Some(parent),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_non_empty("Name", name)?;
        }
        if let Some(label) = &self.label {
            require_non_empty("Label", label)?;
        }
        check_parent(self.parent_id.as_ref().and_then(Option::as_ref))
    }
}

impl MoveMenu {
    pub fn validate(&self) -> Result<()> {
        check_parent(self.parent_id.as_ref())
    }
}

impl ReorderMenu {
    pub fn validate(&self) -> Result<()> {
        if self.order < 0 {
            return Err(Error::Validation("order must be greater than or equal to 0".into()));
        }
        Ok(())
    }

    /// Requested position, saturated into `u32`; the tree clamps it further.
    pub fn position(&self) -> u32 {
        u32::try_from(self.order.max(0)).unwrap_or(u32::MAX)
    }
}
