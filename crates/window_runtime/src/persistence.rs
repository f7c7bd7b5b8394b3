//! Dimension and session persistence through a [`DimensionStore`].
//!
//! Values are JSON documents keyed by window kind. Load failures are logged and treated as
//! "nothing stored": a window always opens, falling back to its default geometry.

use leptos::logging;
use window_host::{load_json_with, save_json_with, DimensionStore};

use crate::{
    geometry::sanitize_dimensions,
    model::{
        GeometryConfig, RegistrySnapshot, WindowDimensions, WindowKind,
        WINDOW_LAYOUT_SCHEMA_VERSION,
    },
};

const DIMENSIONS_KEY_PREFIX: &str = "windowing.dimensions.v1";
const SESSION_KEY: &str = "windowing.session.v1";

/// Storage key holding the last committed dimensions of windows of `kind`.
pub fn dimensions_key(kind: &WindowKind) -> String {
    format!("{DIMENSIONS_KEY_PREFIX}.{kind}")
}

/// Reads the stored dimensions for `kind`, repaired against `config`.
///
/// Missing keys, store errors, and unparsable JSON all yield `None`.
pub async fn load_window_dimensions(
    store: &dyn DimensionStore,
    kind: &WindowKind,
    config: &GeometryConfig,
) -> Option<WindowDimensions> {
    match load_json_with::<_, WindowDimensions>(store, &dimensions_key(kind)).await {
        Ok(dimensions) => dimensions.map(|dimensions| sanitize_dimensions(dimensions, config)),
        Err(err) => {
            logging::warn!("discarding stored dimensions for `{kind}`: {err}");
            None
        }
    }
}

/// Writes `dimensions` as the last committed geometry for `kind`.
///
/// # Errors
///
/// Returns the store or serialization error.
pub async fn persist_window_dimensions(
    store: &dyn DimensionStore,
    kind: &WindowKind,
    dimensions: &WindowDimensions,
) -> Result<(), String> {
    save_json_with(store, &dimensions_key(kind), dimensions).await
}

/// Loads the saved window session, ignoring snapshots from other schema versions.
pub async fn load_session_snapshot(store: &dyn DimensionStore) -> Option<RegistrySnapshot> {
    match load_json_with::<_, RegistrySnapshot>(store, SESSION_KEY).await {
        Ok(Some(snapshot)) if snapshot.schema_version == WINDOW_LAYOUT_SCHEMA_VERSION => {
            Some(snapshot)
        }
        Ok(Some(snapshot)) => {
            logging::log!(
                "ignoring window session with schema version {}",
                snapshot.schema_version
            );
            None
        }
        Ok(None) => None,
        Err(err) => {
            logging::warn!("window session load failed: {err}");
            None
        }
    }
}

/// Saves the window session for the next boot.
///
/// # Errors
///
/// Returns the store or serialization error.
pub async fn persist_session_snapshot(
    store: &dyn DimensionStore,
    snapshot: &RegistrySnapshot,
) -> Result<(), String> {
    save_json_with(store, SESSION_KEY, snapshot).await
}
