//! List state and its mutation operations
//!
//! Every method here is one complete transition between valid states:
//! - ids stay unique
//! - `editing_item_id` never outlives the item it points at (except via
//!   `set_editing_item`, which trusts the caller)
//! - order is insertion history, newest first

use std::collections::HashSet;

use serde::Serialize;

use super::item::{IdGenerator, Item, ItemId};
use super::stats::Stats;
use super::validation::{ItemDraft, validate_name, validate_quantity};

/// Items plus the single item currently in edit mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListState {
    /// Newest first
    items: Vec<Item>,
    editing_item_id: Option<ItemId>,
}

/// Counts of persisted items discarded by `ListState::from_items`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DroppedItems {
    /// Repeated an earlier item's id
    pub duplicates: usize,
    /// Name or quantity out of range
    pub invalid: usize,
}

/// Re-check a stored item against the add/edit rules; names come back trimmed
fn sanitize(mut item: Item) -> Option<Item> {
    match (validate_name(&item.name), validate_quantity(i64::from(item.quantity))) {
        (Ok(name), Ok(_)) => {
            item.name = name;
            Some(item)
        }
        (name, quantity) => {
            log::warn!(
                "Dropping saved item '{}': {}",
                item.id,
                name.err().or(quantity.err()).map_or_else(String::new, |err| err.to_string())
            );
            None
        }
    }
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted items. Items breaking the name/quantity rules are
    /// dropped, then later duplicates of an id.
    pub(crate) fn from_items(items: Vec<Item>) -> (Self, DroppedItems) {
        let mut dropped = DroppedItems::default();
        let mut seen = HashSet::with_capacity(items.len());
        let items: Vec<Item> = items
            .into_iter()
            .filter_map(|item| {
                let Some(item) = sanitize(item) else {
                    dropped.invalid += 1;
                    return None;
                };
                if !seen.insert(item.id.clone()) {
                    dropped.duplicates += 1;
                    return None;
                }
                Some(item)
            })
            .collect();
        (
            Self {
                items,
                editing_item_id: None,
            },
            dropped,
        )
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn editing_item_id(&self) -> Option<&ItemId> {
        self.editing_item_id.as_ref()
    }

    /// Look up an item by id
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Resolve the edited item by id; `None` if not editing or the id is stale
    pub fn editing_item(&self) -> Option<&Item> {
        self.editing_item_id.as_ref().and_then(|id| self.item(id))
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.item(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn purchased_count(&self) -> usize {
        self.items.iter().filter(|item| item.purchased).count()
    }

    pub fn stats(&self) -> Stats {
        Stats::of(&self.items)
    }

    /// Prepend a new unpurchased item and return its id
    pub fn add_item(&mut self, draft: ItemDraft, ids: &mut IdGenerator, now_millis: i64) -> ItemId {
        let mut id = ids.next_id(now_millis);
        while self.contains(&id) {
            id = ids.next_id(now_millis);
        }
        let (name, quantity) = draft.into_parts();
        self.items.insert(
            0,
            Item {
                id: id.clone(),
                name,
                quantity,
                purchased: false,
                created_at: now_millis,
            },
        );
        id
    }

    /// Replace name and quantity in place and leave edit mode.
    /// Returns false (items untouched) if `id` is unknown.
    pub fn edit_item(&mut self, id: &ItemId, draft: ItemDraft) -> bool {
        self.editing_item_id = None;
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                let (name, quantity) = draft.into_parts();
                item.name = name;
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove an item; leaves edit mode if it was the edited one
    pub fn delete_item(&mut self, id: &ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        let removed = self.items.len() != before;
        if removed && self.editing_item_id.as_ref() == Some(id) {
            self.editing_item_id = None;
        }
        removed
    }

    pub fn toggle_purchased(&mut self, id: &ItemId) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.purchased = !item.purchased;
                true
            }
            None => false,
        }
    }

    /// Enter (or with `None`, leave) edit mode. The id is not checked.
    pub fn set_editing_item(&mut self, id: Option<ItemId>) {
        self.editing_item_id = id;
    }

    pub fn clear_all_items(&mut self) {
        self.items.clear();
        self.editing_item_id = None;
    }

    /// Remove every purchased item, keeping the order of the rest.
    /// Returns how many were removed.
    pub fn delete_purchased_items(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.purchased);
        if let Some(editing) = &self.editing_item_id {
            if !self.contains(editing) {
                self.editing_item_id = None;
            }
        }
        before - self.items.len()
    }
}
