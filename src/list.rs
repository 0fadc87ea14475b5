//! Dynamic List Manager - Identity-Stable Ordered Records
//!
//! An arena of record values keyed by a generated transient identity, plus
//! a separate ordered sequence of identities for display order. Identities
//! let an editing surface track which rendered row corresponds to which
//! data across append/remove; they are never persisted.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::content::ScalarValue;
use crate::templates::RecordSchema;

/// Transient identity of one list item. Valid only for the lifetime of the
/// in-memory list that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Uuid);

impl ItemId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stale or foreign identity means the editing surface and the list have
/// desynchronized; that is a caller error, never silently ignored.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("No list item with identity {0}")]
    UnknownItem(ItemId),

    #[error("Record has no field named {0}")]
    UnknownField(String),
}

/// What `remove` does when it empties the list. Per call site, not a
/// universal invariant: an editing surface may want one blank row to stay
/// on screen, a bulk import may not.
#[derive(Debug, Clone, Copy)]
pub enum EmptyListPolicy<'a> {
    AllowEmpty,
    ReseedDefault(&'a RecordSchema),
}

/// One record of a dynamic list: sub-field name to scalar value.
#[derive(Debug, Clone, Default)]
pub struct RecordValue {
    fields: HashMap<String, ScalarValue>,
}

impl RecordValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record populated with each column's typed default.
    pub fn from_schema(schema: &RecordSchema) -> Self {
        let mut record = Self::new();
        for sub in &schema.fields {
            record.set(sub.name, ScalarValue::default_for(&sub.kind));
        }
        record
    }

    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: &str, value: ScalarValue) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Text content of a field, empty for absent or non-text fields.
    pub fn text(&self, name: &str) -> &str {
        match self.fields.get(name) {
            Some(ScalarValue::Text(s)) | Some(ScalarValue::Markup(s)) => s,
            _ => "",
        }
    }

    pub fn icon(&self, name: &str) -> Option<crate::templates::IconKind> {
        match self.fields.get(name) {
            Some(ScalarValue::Icon(icon)) => Some(*icon),
            _ => None,
        }
    }
}

/// Ordered collection of records with stable transient identities.
///
/// Data lives in an arena keyed by identity; display order is a separate
/// sequence of identities. Ordering is always insertion order.
#[derive(Debug, Clone, Default)]
pub struct RecordList {
    items: HashMap<ItemId, RecordValue>,
    order: Vec<ItemId>,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Adds a record at the end under a fresh identity distinct from every
    /// existing item's.
    pub fn push(&mut self, record: RecordValue) -> ItemId {
        let id = ItemId::fresh();
        self.items.insert(id, record);
        self.order.push(id);
        id
    }

    /// Appends one new record populated with per-field defaults.
    pub fn append_default(&mut self, schema: &RecordSchema) -> ItemId {
        self.push(RecordValue::from_schema(schema))
    }

    /// Removes the item with the given identity. Under
    /// [`EmptyListPolicy::ReseedDefault`], removing the last row substitutes
    /// a single default row so the editing surface keeps one row on screen.
    pub fn remove(&mut self, id: ItemId, policy: EmptyListPolicy<'_>) -> Result<(), ListError> {
        if self.items.remove(&id).is_none() {
            return Err(ListError::UnknownItem(id));
        }
        self.order.retain(|existing| *existing != id);

        if self.order.is_empty() {
            if let EmptyListPolicy::ReseedDefault(schema) = policy {
                self.append_default(schema);
            }
        }
        Ok(())
    }

    /// Replaces one field's value in the item matching `id`.
    pub fn update_field(
        &mut self,
        id: ItemId,
        field: &str,
        value: ScalarValue,
    ) -> Result<(), ListError> {
        let record = self.items.get_mut(&id).ok_or(ListError::UnknownItem(id))?;
        if !record.has_field(field) {
            return Err(ListError::UnknownField(field.to_string()));
        }
        record.set(field, value);
        Ok(())
    }

    pub fn get(&self, id: ItemId) -> Option<&RecordValue> {
        self.items.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.order.iter().copied()
    }

    /// Records in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &RecordValue)> + '_ {
        self.order.iter().map(move |id| (*id, &self.items[id]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{IconKind, SubFieldDef};

    fn two_column_schema() -> RecordSchema {
        RecordSchema {
            fields: vec![
                SubFieldDef { name: "title", kind: crate::templates::ScalarKind::Text },
                SubFieldDef {
                    name: "icon",
                    kind: crate::templates::ScalarKind::Icon { default: IconKind::Heart },
                },
            ],
        }
    }

    #[test]
    fn append_assigns_distinct_identities() {
        let schema = two_column_schema();
        let mut list = RecordList::new();
        let a = list.append_default(&schema);
        let b = list.append_default(&schema);
        assert_ne!(a, b);
        assert_eq!(list.len(), 2);
        assert_eq!(list.ids().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn remove_unknown_identity_is_an_error() {
        let schema = two_column_schema();
        let mut list = RecordList::new();
        let id = list.append_default(&schema);
        list.remove(id, EmptyListPolicy::AllowEmpty).unwrap();
        assert_eq!(
            list.remove(id, EmptyListPolicy::AllowEmpty),
            Err(ListError::UnknownItem(id))
        );
    }

    #[test]
    fn reseed_policy_keeps_one_default_row() {
        let schema = two_column_schema();
        let mut list = RecordList::new();
        let id = list.append_default(&schema);
        list.remove(id, EmptyListPolicy::ReseedDefault(&schema)).unwrap();
        assert_eq!(list.len(), 1);
        let (fresh, record) = list.iter().next().unwrap();
        assert_ne!(fresh, id);
        assert_eq!(record.text("title"), "");
        assert_eq!(record.icon("icon"), Some(IconKind::Heart));
    }

    #[test]
    fn update_field_rejects_undeclared_column() {
        let schema = two_column_schema();
        let mut list = RecordList::new();
        let id = list.append_default(&schema);
        let err = list
            .update_field(id, "bogus", ScalarValue::Text("x".into()))
            .unwrap_err();
        assert_eq!(err, ListError::UnknownField("bogus".into()));
    }
}
