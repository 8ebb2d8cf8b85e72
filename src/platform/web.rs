//! Browser binding for a JS UI shell
//!
//! The shell constructs one `WebShoppingList`, calls its operations and
//! re-reads `snapshot()` after each one. Persistence goes to LocalStorage
//! through a writer spawned on the browser's microtask queue.

use wasm_bindgen::prelude::*;

use crate::error::{PersistError, Result};
use crate::list::{ItemId, ListAction, ValidationErrors, format_added};
use crate::persistence::KeyValueStore;
use crate::platform::now_millis;
use crate::settings::{Settings, Theme};
use crate::store::ShoppingList;

/// `window.localStorage`
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    /// `None` when storage is disabled (private mode, sandboxed iframe)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|err| PersistError::storage(key, format!("{err:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|err| PersistError::storage(key, format!("{err:?}")))
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Shopping list module loaded");
}

fn validation_error(errors: ValidationErrors) -> JsValue {
    match serde_json::to_string(&errors) {
        Ok(json) => JsValue::from_str(&json),
        Err(_) => JsValue::from_str(&errors.to_string()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> std::result::Result<String, JsValue> {
    serde_json::to_string(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// JS-facing handle to the container
#[wasm_bindgen]
pub struct WebShoppingList {
    inner: ShoppingList,
}

#[wasm_bindgen]
impl WebShoppingList {
    /// Rehydrate from LocalStorage (or start empty) and start the writer
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebShoppingList {
        let inner = match LocalStore::open() {
            Some(store) => {
                let (list, worker) = ShoppingList::open(store);
                wasm_bindgen_futures::spawn_local(worker.run());
                list
            }
            None => {
                log::warn!("LocalStorage unavailable, shopping list will not be saved");
                ShoppingList::in_memory()
            }
        };
        WebShoppingList { inner }
    }

    /// Apply a JSON action, e.g. `{"type":"togglePurchased","id":"..."}`.
    /// Throws a JSON `{name, quantity}` object string on validation failure.
    pub fn dispatch(&mut self, action_json: &str) -> std::result::Result<(), JsValue> {
        let action: ListAction =
            serde_json::from_str(action_json).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.inner.dispatch(action).map(|_| ()).map_err(validation_error)
    }

    /// Returns the new item's id
    #[wasm_bindgen(js_name = addItem)]
    pub fn add_item(&mut self, name: &str, quantity: f64) -> std::result::Result<String, JsValue> {
        self.inner
            .add_item(name, js_quantity(quantity))
            .map(|id| id.to_string())
            .map_err(validation_error)
    }

    #[wasm_bindgen(js_name = editItem)]
    pub fn edit_item(&mut self, id: &str, name: &str, quantity: f64) -> std::result::Result<(), JsValue> {
        self.inner
            .edit_item(&ItemId::from(id), name, js_quantity(quantity))
            .map_err(validation_error)
    }

    #[wasm_bindgen(js_name = deleteItem)]
    pub fn delete_item(&mut self, id: &str) -> bool {
        self.inner.delete_item(&ItemId::from(id))
    }

    #[wasm_bindgen(js_name = togglePurchased)]
    pub fn toggle_purchased(&mut self, id: &str) -> bool {
        self.inner.toggle_purchased(&ItemId::from(id))
    }

    #[wasm_bindgen(js_name = setEditingItem)]
    pub fn set_editing_item(&mut self, id: Option<String>) {
        self.inner.set_editing_item(id.map(ItemId::from));
    }

    #[wasm_bindgen(js_name = clearAllItems)]
    pub fn clear_all_items(&mut self) {
        self.inner.clear_all_items();
    }

    #[wasm_bindgen(js_name = deletePurchasedItems)]
    pub fn delete_purchased_items(&mut self) {
        self.inner.delete_purchased_items();
    }

    /// `{ items, editingItemId }` as JSON
    pub fn snapshot(&self) -> std::result::Result<String, JsValue> {
        to_json(self.inner.state())
    }

    /// `{ total, purchased, remaining, percentComplete }` as JSON
    pub fn stats(&self) -> std::result::Result<String, JsValue> {
        to_json(&self.inner.stats())
    }

    #[wasm_bindgen(js_name = purchasedCount)]
    pub fn purchased_count(&self) -> usize {
        self.inner.purchased_count()
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// "5 mins ago" style label for an item, empty if the id is unknown
    #[wasm_bindgen(js_name = addedLabel)]
    pub fn added_label(&self, id: &str) -> String {
        self.inner
            .state()
            .item(&ItemId::from(id))
            .map(|item| format_added(item.created_at, now_millis()))
            .unwrap_or_default()
    }
}

impl Default for WebShoppingList {
    fn default() -> Self {
        Self::new()
    }
}

/// Saved theme preference ("system", "light" or "dark")
#[wasm_bindgen(js_name = loadTheme)]
pub fn load_theme() -> String {
    match LocalStore::open() {
        Some(store) => Settings::load(&store).theme.as_str().to_lowercase(),
        None => Theme::default().as_str().to_lowercase(),
    }
}

#[wasm_bindgen(js_name = saveTheme)]
pub fn save_theme(theme: &str) -> std::result::Result<(), JsValue> {
    let theme = Theme::from_str(theme).ok_or_else(|| JsValue::from_str("unknown theme"))?;
    let store = LocalStore::open().ok_or_else(|| JsValue::from_str("LocalStorage unavailable"))?;
    let mut settings = Settings::load(&store);
    settings.theme = theme;
    settings
        .save(&store)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// JS numbers are f64; non-integral or non-finite values map to 0 and fail the minimum check
fn js_quantity(quantity: f64) -> i64 {
    if quantity.fract() != 0.0 || !quantity.is_finite() {
        return 0;
    }
    quantity.clamp(i64::MIN as f64, i64::MAX as f64) as i64
}
