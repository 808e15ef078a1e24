//! Persisted wishlist of [`DisplayItem`] snapshots.
//!
//! The registry writes through to a [`KeyValueStore`] on every mutation, so
//! once a call returns the store holds exactly what is in memory.

use log::{debug, warn};
use thiserror::Error;

use crate::normalize::DisplayItem;

pub const FAVORITES_KEY: &str = "itemshop-tui.wishlist";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to serialize wishlist: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Minimal string store the registry persists through.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store used by tests and as a fallback when no durable
/// storage is reachable.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: foldhash::HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct FavoritesRegistry {
    store: Box<dyn KeyValueStore>,
    /// Sorted by id, no duplicates.
    items: Vec<DisplayItem>,
}

impl FavoritesRegistry {
    /// Reads the persisted wishlist. Missing, unreadable or corrupt values
    /// start an empty registry instead of failing.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let items = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<DisplayItem>>(&raw) {
                Ok(items) => items,
                Err(err) => {
                    warn!("Ignoring corrupt wishlist: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Could not read wishlist: {err}");
                Vec::new()
            }
        };

        let mut registry = Self { store, items };
        registry.canonicalize();
        debug!("Loaded {} wishlist entries", registry.items.len());
        registry
    }

    fn canonicalize(&mut self) {
        self.items.retain(|item| !item.id.is_empty());
        self.items.sort_by(|a, b| a.id.cmp(&b.id));
        self.items.dedup_by(|a, b| a.id == b.id);
    }

    fn position(&self, id: &str) -> Result<usize, usize> {
        self.items.binary_search_by(|item| item.id.as_str().cmp(id))
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.position(id).is_ok()
    }

    /// Adds or removes `item`, returning the new membership. The change is
    /// persisted before returning; on a storage failure it is rolled back.
    pub fn toggle(&mut self, item: &DisplayItem) -> Result<bool, StorageError> {
        match self.position(&item.id) {
            Ok(pos) => {
                let removed = self.items.remove(pos);
                if let Err(err) = self.persist() {
                    self.items.insert(pos, removed);
                    return Err(err);
                }
                Ok(false)
            }
            Err(pos) => {
                self.items.insert(pos, item.clone());
                if let Err(err) = self.persist() {
                    self.items.remove(pos);
                    return Err(err);
                }
                Ok(true)
            }
        }
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        let previous = std::mem::take(&mut self.items);
        if let Err(err) = self.persist() {
            self.items = previous;
            return Err(err);
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.items)?;
        self.store.set(FAVORITES_KEY, &raw)
    }

    pub fn list(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&DisplayItem> {
        self.position(id).ok().map(|pos| &self.items[pos])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Wishlist as shown to the user. Snapshots still on sale in `live`
    /// take today's price and banner; the rest show no price.
    pub fn list_with_live_prices(&self, live: &[DisplayItem]) -> Vec<DisplayItem> {
        let live_by_id: foldhash::HashMap<&str, &DisplayItem> =
            live.iter().map(|item| (item.id.as_str(), item)).collect();

        self.items
            .iter()
            .map(|snapshot| {
                let mut item = snapshot.clone();
                match live_by_id.get(item.id.as_str()) {
                    Some(current) => {
                        item.price_final = current.price_final;
                        item.price_regular = current.price_regular;
                        item.banner_text = current.banner_text.clone();
                    }
                    None => {
                        item.price_final = None;
                        item.price_regular = None;
                        if !item.is_newly_added {
                            item.banner_text = None;
                        }
                    }
                }
                item
            })
            .collect()
    }
}

impl std::fmt::Debug for FavoritesRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesRegistry")
            .field("items", &self.items.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store sharing its contents with the test, optionally refusing writes.
    #[derive(Clone, Default)]
    struct SharedStore {
        values: Rc<RefCell<foldhash::HashMap<String, String>>>,
        fail_writes: Rc<RefCell<bool>>,
    }

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if *self.fail_writes.borrow() {
                return Err(StorageError::Unavailable("quota exceeded".to_string()));
            }
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    impl SharedStore {
        fn raw(&self) -> Option<String> {
            self.values.borrow().get(FAVORITES_KEY).cloned()
        }
    }

    fn item(id: &str) -> DisplayItem {
        DisplayItem {
            id: id.to_string(),
            display_name: format!("Name {id}"),
            ..Default::default()
        }
    }

    #[test]
    fn test_toggle_persists_immediately() {
        let store = SharedStore::default();
        let mut registry = FavoritesRegistry::load(Box::new(store.clone()));

        assert!(registry.toggle(&item("b")).unwrap());
        assert!(registry.toggle(&item("a")).unwrap());
        assert!(registry.is_favorite("a"));

        let reloaded = FavoritesRegistry::load(Box::new(store.clone()));
        let ids: Vec<&str> = reloaded.list().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_double_toggle_restores_serialization() {
        let store = SharedStore::default();
        let mut registry = FavoritesRegistry::load(Box::new(store.clone()));
        registry.toggle(&item("a")).unwrap();
        let before = store.raw();

        assert!(registry.toggle(&item("z")).unwrap());
        assert!(!registry.toggle(&item("z")).unwrap());
        assert_eq!(store.raw(), before);
    }

    #[test]
    fn test_corrupt_value_loads_empty() {
        let store = SharedStore::default();
        store
            .values
            .borrow_mut()
            .insert(FAVORITES_KEY.to_string(), "{not json".to_string());

        let registry = FavoritesRegistry::load(Box::new(store));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_dedupes_and_sorts() {
        let store = SharedStore::default();
        store.values.borrow_mut().insert(
            FAVORITES_KEY.to_string(),
            r#"[{"id":"c"},{"id":"a"},{"id":"c"},{"id":""}]"#.to_string(),
        );

        let registry = FavoritesRegistry::load(Box::new(store));
        let ids: Vec<&str> = registry.list().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let store = SharedStore::default();
        let mut registry = FavoritesRegistry::load(Box::new(store.clone()));
        registry.toggle(&item("keep")).unwrap();

        *store.fail_writes.borrow_mut() = true;
        assert!(registry.toggle(&item("new")).is_err());
        assert!(!registry.is_favorite("new"));
        assert!(registry.toggle(&item("keep")).is_err());
        assert!(registry.is_favorite("keep"));
        assert!(registry.clear().is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clear() {
        let store = SharedStore::default();
        let mut registry = FavoritesRegistry::load(Box::new(store.clone()));
        registry.toggle(&item("a")).unwrap();
        registry.clear().unwrap();
        assert!(registry.is_empty());
        assert_eq!(store.raw().as_deref(), Some("[]"));
    }

    #[test]
    fn test_live_prices_overlay() {
        let mut registry = FavoritesRegistry::load(Box::new(MemoryStore::new()));
        let mut stale = item("on-sale");
        stale.price_final = Some(2000);
        stale.banner_text = Some("Old banner".to_string());
        registry.toggle(&stale).unwrap();

        let mut gone = item("gone");
        gone.price_final = Some(800);
        registry.toggle(&gone).unwrap();

        let mut live = item("on-sale");
        live.price_final = Some(1500);
        live.price_regular = Some(2000);

        let view = registry.list_with_live_prices(&[live]);
        let gone_view = view.iter().find(|i| i.id == "gone").unwrap();
        let sale_view = view.iter().find(|i| i.id == "on-sale").unwrap();

        assert_eq!(gone_view.price_final, None);
        assert_eq!(sale_view.price_final, Some(1500));
        assert_eq!(sale_view.price_regular, Some(2000));
        assert_eq!(sale_view.banner_text, None);
        // Snapshots themselves are untouched.
        assert_eq!(registry.get("gone").unwrap().price_final, Some(800));
    }
}
