//! Window profile catalog compiled from `window_profiles.toml`.

use std::sync::OnceLock;

use leptos::logging;
use serde::{Deserialize, Serialize};

use crate::model::{GeometryConfig, WindowKind};

include!(concat!(env!("OUT_DIR"), "/window_profiles_generated.rs"));

/// Label and icon used for kinds missing from the catalog.
const FALLBACK_ICON: &str = "window";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowProfile {
    pub kind: WindowKind,
    pub label: String,
    pub icon: String,
    #[serde(default)]
    pub geometry: GeometryConfig,
}

pub fn profile_catalog() -> &'static [WindowProfile] {
    static CATALOG: OnceLock<Vec<WindowProfile>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        serde_json::from_str(WINDOW_PROFILE_CATALOG_JSON).unwrap_or_else(|err| {
            logging::warn!("window profile catalog failed to parse: {err}");
            Vec::new()
        })
    })
}

/// Resolves the profile for `kind`, synthesizing a default one for unknown kinds.
pub fn profile_for(kind: &WindowKind) -> WindowProfile {
    profile_catalog()
        .iter()
        .find(|profile| profile.kind == *kind)
        .cloned()
        .unwrap_or_else(|| WindowProfile {
            kind: kind.clone(),
            label: kind.to_string(),
            icon: FALLBACK_ICON.to_string(),
            geometry: GeometryConfig::default(),
        })
}

pub fn window_icon(kind: &WindowKind) -> String {
    profile_for(kind).icon
}
