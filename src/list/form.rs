//! Add/edit form model
//!
//! Holds the raw text the user typed, pre-fills from the item in edit mode and
//! turns a submit into the matching `ListAction`.

use super::action::ListAction;
use super::item::ItemId;
use super::state::ListState;
use super::validation::{ItemDraft, ValidationErrors};
use crate::consts::DEFAULT_QUANTITY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    /// Raw quantity text; parsed on submit
    pub quantity: String,
    pub errors: ValidationErrors,
    editing: Option<ItemId>,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            quantity: DEFAULT_QUANTITY.to_string(),
            errors: ValidationErrors::default(),
            editing: None,
        }
    }
}

impl ItemForm {
    /// Blank add form, or pre-filled from the item currently in edit mode
    pub fn for_state(state: &ListState) -> Self {
        match state.editing_item() {
            Some(item) => Self {
                name: item.name.clone(),
                quantity: item.quantity.to_string(),
                errors: ValidationErrors::default(),
                editing: Some(item.id.clone()),
            },
            None => Self::default(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Title shown above the form
    pub fn title(&self) -> &'static str {
        if self.is_editing() { "Edit Item" } else { "Add New Item" }
    }

    /// Validate the current input. On success returns the action to dispatch
    /// (and clears the fields when adding); on failure records field errors.
    pub fn submit(&mut self) -> Option<ListAction> {
        let draft = match ItemDraft::parse(&self.name, &self.quantity) {
            Ok(draft) => draft,
            Err(errors) => {
                self.errors = errors;
                return None;
            }
        };
        self.errors = ValidationErrors::default();

        let (name, quantity) = draft.into_parts();
        let quantity = i64::from(quantity);
        match &self.editing {
            Some(id) => Some(ListAction::EditItem {
                id: id.clone(),
                name,
                quantity,
            }),
            None => {
                self.reset();
                Some(ListAction::AddItem { name, quantity })
            }
        }
    }

    /// Discard input. Returns the action that leaves edit mode, if editing.
    pub fn cancel(&mut self) -> Option<ListAction> {
        let was_editing = self.editing.is_some();
        *self = Self::default();
        was_editing.then_some(ListAction::SetEditingItem { id: None })
    }

    fn reset(&mut self) {
        self.name.clear();
        self.quantity = DEFAULT_QUANTITY.to_string();
        self.errors = ValidationErrors::default();
    }
}
