//! Inbound operations as values
//!
//! A UI shell sends `ListAction`s (JSON with a `type` tag) and the container
//! applies them one at a time with `apply`.

use serde::{Deserialize, Serialize};

use super::item::{IdGenerator, ItemId};
use super::state::ListState;
use super::validation::{ItemDraft, ValidationErrors};

/// One inbound operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ListAction {
    AddItem { name: String, quantity: i64 },
    EditItem { id: ItemId, name: String, quantity: i64 },
    DeleteItem { id: ItemId },
    TogglePurchased { id: ItemId },
    SetEditingItem { id: Option<ItemId> },
    ClearAllItems,
    DeletePurchasedItems,
}

impl ListAction {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ListAction::AddItem { .. } => "addItem",
            ListAction::EditItem { .. } => "editItem",
            ListAction::DeleteItem { .. } => "deleteItem",
            ListAction::TogglePurchased { .. } => "togglePurchased",
            ListAction::SetEditingItem { .. } => "setEditingItem",
            ListAction::ClearAllItems => "clearAllItems",
            ListAction::DeletePurchasedItems => "deletePurchasedItems",
        }
    }
}

/// What an applied action changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A new item was prepended
    Added(ItemId),
    /// The item sequence changed
    ItemsChanged,
    /// Only edit mode changed (not persisted)
    EditModeChanged,
    /// Nothing changed (unknown id, already empty, ...)
    Unchanged,
}

impl Applied {
    /// Whether the persisted part of the state changed
    pub fn items_changed(&self) -> bool {
        matches!(self, Applied::Added(_) | Applied::ItemsChanged)
    }
}

/// Apply one action. Validation failures leave `state` untouched.
pub fn apply(
    state: &mut ListState,
    action: ListAction,
    ids: &mut IdGenerator,
    now_millis: i64,
) -> Result<Applied, ValidationErrors> {
    let was_editing = state.editing_item_id().cloned();

    let applied = match action {
        ListAction::AddItem { name, quantity } => {
            let draft = ItemDraft::new(&name, quantity)?;
            Applied::Added(state.add_item(draft, ids, now_millis))
        }
        ListAction::EditItem { id, name, quantity } => {
            let draft = ItemDraft::new(&name, quantity)?;
            if state.edit_item(&id, draft) {
                Applied::ItemsChanged
            } else {
                edit_mode_outcome(was_editing.as_ref(), state)
            }
        }
        ListAction::DeleteItem { id } => {
            if state.delete_item(&id) {
                Applied::ItemsChanged
            } else {
                Applied::Unchanged
            }
        }
        ListAction::TogglePurchased { id } => {
            if state.toggle_purchased(&id) {
                Applied::ItemsChanged
            } else {
                Applied::Unchanged
            }
        }
        ListAction::SetEditingItem { id } => {
            state.set_editing_item(id);
            edit_mode_outcome(was_editing.as_ref(), state)
        }
        ListAction::ClearAllItems => {
            let had_items = !state.is_empty();
            state.clear_all_items();
            if had_items {
                Applied::ItemsChanged
            } else {
                edit_mode_outcome(was_editing.as_ref(), state)
            }
        }
        ListAction::DeletePurchasedItems => {
            if state.delete_purchased_items() > 0 {
                Applied::ItemsChanged
            } else {
                Applied::Unchanged
            }
        }
    };
    Ok(applied)
}

fn edit_mode_outcome(before: Option<&ItemId>, state: &ListState) -> Applied {
    if before == state.editing_item_id() {
        Applied::Unchanged
    } else {
        Applied::EditModeChanged
    }
}
