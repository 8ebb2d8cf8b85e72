//! Shopping list model
//!
//! Pure state and transitions. No storage, clock or platform dependencies:
//! the current time and the id generator are passed in by the caller.

pub mod action;
pub mod form;
pub mod item;
pub mod state;
pub mod stats;
pub mod validation;

pub use action::{Applied, ListAction, apply};
pub use form::ItemForm;
pub use item::{IdGenerator, Item, ItemId};
pub use state::ListState;
pub use stats::{Stats, format_added};
pub use validation::{FieldError, ItemDraft, ValidationErrors, parse_quantity, validate_name, validate_quantity};
