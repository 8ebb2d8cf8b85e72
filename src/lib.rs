//! Shopping List - single-user shopping list state container
//!
//! Core modules:
//! - `list`: Item model, list state, operations, validation, statistics
//! - `store`: The `ShoppingList` container (state + id generation + persistence queue)
//! - `persistence`: Versioned envelope, key-value storage seam, ordered write queue
//! - `platform`: Clock and browser/native differences
//! - `settings`: UI preferences, persisted separately from the list

pub mod error;
pub mod list;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod store;

pub use error::PersistError;
pub use list::{
    FieldError, Item, ItemDraft, ItemForm, ItemId, ListAction, ListState, Stats, ValidationErrors,
};
pub use persistence::{KeyValueStore, RehydrateOutcome};
pub use settings::{Settings, Theme};
pub use store::ShoppingList;

/// Limits and storage keys
pub mod consts {
    /// Minimum item name length (characters, after trimming)
    pub const NAME_MIN_LEN: usize = 2;
    /// Maximum item name length (characters, after trimming)
    pub const NAME_MAX_LEN: usize = 50;

    /// Quantity bounds (inclusive)
    pub const QUANTITY_MIN: u32 = 1;
    pub const QUANTITY_MAX: u32 = 9999;
    /// Quantity pre-filled into an empty add form
    pub const DEFAULT_QUANTITY: u32 = 1;

    /// Key the list envelope is stored under
    pub const LIST_STORAGE_KEY: &str = "shopping_list";
    /// Key UI settings are stored under (never part of the list envelope)
    pub const SETTINGS_STORAGE_KEY: &str = "shopping_list_settings";

    /// Current envelope version written by `persistence::envelope`
    pub const ENVELOPE_VERSION: u32 = 1;

    /// Random base36 characters appended to the timestamp part of an id
    pub const ID_SUFFIX_LEN: usize = 9;
}

/// Percentage of `part` in `total`, rounded half-up. 0 when `total` is 0.
#[inline]
pub fn percent_of(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = part.min(total) as u64 * 200 + total as u64;
    (scaled / (total as u64 * 2)) as u32
}
