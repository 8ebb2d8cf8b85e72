//! The shopping list container
//!
//! `ShoppingList` owns the list state, the id generator and the producer side
//! of the persistence queue. It is built once by the host (`open` or
//! `in_memory`) and handed to the UI layer by reference; there is no global
//! instance.
//!
//! Mutations take `&mut self`, so they cannot interleave. Each one that changes
//! the items queues a snapshot write and returns without waiting for it.

use crate::consts::LIST_STORAGE_KEY;
use crate::error::PersistError;
use crate::list::{
    Applied, IdGenerator, Item, ItemDraft, ItemForm, ItemId, ListAction, ListState, Stats,
    ValidationErrors, apply,
};
use crate::persistence::{self, KeyValueStore, PersistQueue, PersistWorker, RehydrateOutcome};
use crate::platform::now_millis;

pub struct ShoppingList {
    state: ListState,
    ids: IdGenerator,
    persist: Option<PersistQueue>,
    rehydrated: RehydrateOutcome,
}

impl ShoppingList {
    /// An empty list that is never persisted
    pub fn in_memory() -> Self {
        Self {
            state: ListState::new(),
            ids: IdGenerator::new(),
            persist: None,
            rehydrated: RehydrateOutcome::Empty,
        }
    }

    /// Rehydrate from `store` (or start empty) and wire up persistence.
    ///
    /// The returned worker must be spawned by the caller; until it runs,
    /// snapshots simply queue up.
    pub fn open<S: KeyValueStore>(store: S) -> (Self, PersistWorker<S>) {
        Self::open_with_key(store, LIST_STORAGE_KEY)
    }

    /// `open` with a non-default storage key
    pub fn open_with_key<S: KeyValueStore>(store: S, key: &str) -> (Self, PersistWorker<S>) {
        let (state, rehydrated) = persistence::rehydrate(&store, key);
        let (queue, worker) = persistence::persist_queue(store, key);
        let list = Self {
            state,
            ids: IdGenerator::new(),
            persist: Some(queue),
            rehydrated,
        };
        (list, worker)
    }

    /// Replace the id generator (deterministic ids in tests)
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// How startup rehydration went
    pub fn rehydration(&self) -> &RehydrateOutcome {
        &self.rehydrated
    }

    // === Snapshot ===

    /// Current `{ items, editingItemId }`. Re-read after every mutation.
    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn items(&self) -> &[Item] {
        self.state.items()
    }

    pub fn editing_item_id(&self) -> Option<&ItemId> {
        self.state.editing_item_id()
    }

    pub fn editing_item(&self) -> Option<&Item> {
        self.state.editing_item()
    }

    pub fn stats(&self) -> Stats {
        self.state.stats()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn purchased_count(&self) -> usize {
        self.state.purchased_count()
    }

    /// Add/edit form pre-filled for the current edit mode
    pub fn form(&self) -> ItemForm {
        ItemForm::for_state(&self.state)
    }

    // === Operations ===

    /// Apply one action and queue a write if the items changed
    pub fn dispatch(&mut self, action: ListAction) -> Result<Applied, ValidationErrors> {
        let kind = action.kind();
        let applied = match apply(&mut self.state, action, &mut self.ids, now_millis()) {
            Ok(applied) => applied,
            Err(errors) => {
                log::debug!("{} rejected: {}", kind, errors);
                return Err(errors);
            }
        };
        log::debug!("{} -> {:?}", kind, applied);

        if applied.items_changed() {
            self.persist();
        }
        Ok(applied)
    }

    pub fn add_item(&mut self, name: &str, quantity: i64) -> Result<ItemId, ValidationErrors> {
        let draft = ItemDraft::new(name, quantity).inspect_err(|errors| {
            log::debug!("addItem rejected: {}", errors);
        })?;
        let id = self.state.add_item(draft, &mut self.ids, now_millis());
        log::debug!("addItem -> {}", id);
        self.persist();
        Ok(id)
    }

    /// Unknown ids are a silent no-op (edit mode is still left)
    pub fn edit_item(&mut self, id: &ItemId, name: &str, quantity: i64) -> Result<(), ValidationErrors> {
        self.dispatch(ListAction::EditItem {
            id: id.clone(),
            name: name.to_string(),
            quantity,
        })
        .map(|_| ())
    }

    /// Returns whether an item was removed
    pub fn delete_item(&mut self, id: &ItemId) -> bool {
        self.dispatch_infallible(ListAction::DeleteItem { id: id.clone() })
    }

    /// Returns whether an item was toggled
    pub fn toggle_purchased(&mut self, id: &ItemId) -> bool {
        self.dispatch_infallible(ListAction::TogglePurchased { id: id.clone() })
    }

    pub fn set_editing_item(&mut self, id: Option<ItemId>) {
        self.dispatch_infallible(ListAction::SetEditingItem { id });
    }

    pub fn clear_all_items(&mut self) {
        self.dispatch_infallible(ListAction::ClearAllItems);
    }

    pub fn delete_purchased_items(&mut self) {
        self.dispatch_infallible(ListAction::DeletePurchasedItems);
    }

    /// Wait for every queued snapshot to reach the store
    pub async fn flush(&self) -> Result<(), PersistError> {
        match &self.persist {
            Some(queue) => queue.flush().await,
            None => Ok(()),
        }
    }

    /// For actions without validation; true if the items changed
    fn dispatch_infallible(&mut self, action: ListAction) -> bool {
        self.dispatch(action)
            .map(|applied| applied.items_changed())
            .unwrap_or(false)
    }

    fn persist(&self) {
        let Some(queue) = &self.persist else {
            return;
        };
        if let Err(err) = queue.enqueue(self.state.items()) {
            log::warn!("Shopping list change not persisted: {}", err);
        }
    }
}

impl std::fmt::Debug for ShoppingList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShoppingList")
            .field("state", &self.state)
            .field("persisted", &self.persist.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::FieldError;
    use crate::persistence::{MemoryStore, envelope};

    fn open(store: &MemoryStore) -> ShoppingList {
        let (list, worker) = ShoppingList::open(store.clone());
        tokio::spawn(worker.run());
        list
    }

    #[test]
    fn test_insertion_order() {
        let mut list = ShoppingList::in_memory().with_id_generator(IdGenerator::seeded(42));
        let a = list.add_item("Apples", 3).unwrap();
        let b = list.add_item("Bread", 1).unwrap();
        let ids: Vec<&ItemId> = list.items().iter().map(|i| &i.id).collect();
        assert_eq!(ids, vec![&b, &a]);
    }

    #[test]
    fn test_validation_rejects() {
        let mut list = ShoppingList::in_memory();
        let err = list.add_item("a", 1).unwrap_err();
        assert_eq!(err.name, Some(FieldError::NameTooShort));
        assert!(list.add_item("milk", 0).unwrap_err().quantity.is_some());
        assert!(list.add_item("milk", 10000).unwrap_err().quantity.is_some());
        assert!(list.is_empty());
    }

    #[test]
    fn test_edit_mode_flow() {
        let mut list = ShoppingList::in_memory();
        let id = list.add_item("Butter", 1).unwrap();
        list.set_editing_item(Some(id.clone()));
        assert_eq!(list.editing_item().map(|i| i.name.as_str()), Some("Butter"));
        assert_eq!(list.form().name, "Butter");

        list.edit_item(&id, "X", 5).unwrap_err();
        assert_eq!(list.editing_item_id(), Some(&id));

        list.edit_item(&id, "Salted butter", 5).unwrap();
        assert_eq!(list.editing_item_id(), None);
        assert_eq!(list.items()[0].quantity, 5);

        list.set_editing_item(Some(id.clone()));
        assert!(list.delete_item(&id));
        assert_eq!(list.editing_item_id(), None);
    }

    #[test]
    fn test_statistics() {
        let mut list = ShoppingList::in_memory();
        let first = list.add_item("One", 1).unwrap();
        list.add_item("Two", 1).unwrap();
        list.add_item("Three", 1).unwrap();
        assert!(list.toggle_purchased(&first));
        let stats = list.stats();
        assert_eq!((stats.total, stats.purchased, stats.remaining), (3, 1, 2));
        assert_eq!(stats.percent_complete, 33);
        assert_eq!(list.purchased_count(), 1);
    }

    #[tokio::test]
    async fn test_mutations_persist_and_rehydrate() {
        let store = MemoryStore::new();
        let mut list = open(&store);
        assert!(matches!(list.rehydration(), RehydrateOutcome::Empty));

        let milk = list.add_item("Milk", 2).unwrap();
        let eggs = list.add_item("Eggs", 12).unwrap();
        list.toggle_purchased(&milk);
        list.set_editing_item(Some(eggs));
        list.flush().await.unwrap();

        let expected = list.items().to_vec();
        drop(list);

        let reopened = open(&store);
        assert_eq!(reopened.items(), &expected[..]);
        assert_eq!(reopened.editing_item_id(), None);
    }

    #[tokio::test]
    async fn test_clear_and_delete_purchased_persist() {
        let store = MemoryStore::new();
        let mut list = open(&store);
        let a = list.add_item("Flour", 1).unwrap();
        list.add_item("Sugar", 1).unwrap();
        list.toggle_purchased(&a);
        list.delete_purchased_items();
        list.flush().await.unwrap();

        let saved = envelope::decode(&store.get(LIST_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "Sugar");

        list.clear_all_items();
        list.clear_all_items();
        list.flush().await.unwrap();
        let saved = envelope::decode(&store.get(LIST_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert!(saved.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_store_starts_empty_then_overwrites() {
        let store = MemoryStore::new();
        store.set(LIST_STORAGE_KEY, "definitely not json").unwrap();

        let mut list = open(&store);
        assert!(list.is_empty());
        assert!(list.rehydration().error().is_some());

        list.add_item("Rice", 1).unwrap();
        list.flush().await.unwrap();
        let saved = envelope::decode(&store.get(LIST_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
    }

    /// Reads nothing, rejects every write
    struct FullDisk;

    impl KeyValueStore for FullDisk {
        fn get(&self, _key: &str) -> crate::error::Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> crate::error::Result<()> {
            Err(PersistError::storage(key, "disk full"))
        }
    }

    #[tokio::test]
    async fn test_failed_write_keeps_mutations() {
        let (mut list, worker) = ShoppingList::open(FullDisk);
        tokio::spawn(worker.run());

        let oats = list.add_item("Oats", 2).unwrap();
        assert!(list.toggle_purchased(&oats));
        assert!(matches!(list.flush().await, Err(PersistError::Storage { .. })));

        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].name, "Oats");
        assert!(list.items()[0].purchased);

        // Later mutations still go through
        list.add_item("Honey", 1).unwrap();
        assert_eq!(list.stats().total, 2);
    }

    #[test]
    fn test_mutation_visible_without_writer() {
        // Worker never spawned: writes queue up, reads are unaffected
        let (mut list, _worker) = ShoppingList::open(MemoryStore::new());
        let id = list.add_item("Tomatoes", 6).unwrap();
        assert_eq!(list.state().item(&id).map(|i| i.quantity), Some(6));
    }
}
