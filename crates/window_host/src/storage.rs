//! Key-value storage contract for persisted window dimensions.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`DimensionStore`] async methods.
pub type DimensionStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service storing one JSON document per key.
///
/// The window runtime keys entries by window kind and never interprets failures beyond logging
/// them, so implementations report errors as plain strings.
pub trait DimensionStore {
    /// Loads the raw JSON stored under `key`.
    fn load<'a>(&'a self, key: &'a str) -> DimensionStoreFuture<'a, Result<Option<String>, String>>;

    /// Stores `raw_json` under `key`, replacing any previous value.
    fn save<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> DimensionStoreFuture<'a, Result<(), String>>;

    /// Removes `key`.
    fn remove<'a>(&'a self, key: &'a str) -> DimensionStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that remembers nothing.
pub struct NoopDimensionStore;

impl DimensionStore for NoopDimensionStore {
    fn load<'a>(
        &'a self,
        _key: &'a str,
    ) -> DimensionStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> DimensionStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn remove<'a>(&'a self, _key: &'a str) -> DimensionStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store shared between clones.
pub struct MemoryDimensionStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryDimensionStore {
    /// Returns the raw value under `key` without going through the async API.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl DimensionStore for MemoryDimensionStore {
    fn load<'a>(&'a self, key: &'a str) -> DimensionStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }

    fn save<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> DimensionStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> DimensionStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed value through a [`DimensionStore`].
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_json_with<S: DimensionStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed value through a [`DimensionStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_json_with<S: DimensionStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Size {
        width: i32,
        height: i32,
    }

    #[test]
    fn memory_store_saves_and_removes() {
        let store = MemoryDimensionStore::default();
        let store_obj: &dyn DimensionStore = &store;

        block_on(store_obj.save("dims.chat", "{\"width\":1}")).expect("save");
        assert_eq!(
            block_on(store_obj.load("dims.chat")).expect("load"),
            Some("{\"width\":1}".to_string())
        );
        assert_eq!(store.len(), 1);

        block_on(store_obj.remove("dims.chat")).expect("remove");
        assert!(store.is_empty());
        assert_eq!(block_on(store_obj.load("dims.chat")).expect("load"), None);
    }

    #[test]
    fn typed_helpers_round_trip_through_clones() {
        let store = MemoryDimensionStore::default();
        let clone = store.clone();
        block_on(save_json_with(
            &store,
            "dims.files",
            &Size {
                width: 640,
                height: 480,
            },
        ))
        .expect("save typed");

        let loaded: Option<Size> = block_on(load_json_with(&clone, "dims.files")).expect("load");
        assert_eq!(
            loaded,
            Some(Size {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn typed_load_reports_corrupt_json() {
        let store = MemoryDimensionStore::default();
        block_on(store.save("dims.bad", "{not json")).expect("save raw");
        let loaded: Result<Option<Size>, String> = block_on(load_json_with(&store, "dims.bad"));
        assert!(loaded.is_err());
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopDimensionStore;
        assert_eq!(block_on(store.load("k")).expect("load"), None);
        block_on(store.save("k", "{}")).expect("save");
        block_on(store.remove("k")).expect("remove");
    }
}
