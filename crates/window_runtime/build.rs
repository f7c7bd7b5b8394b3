use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProfileGeometry {
    #[serde(skip_serializing_if = "Option::is_none")]
    min_width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_width_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_height_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_y: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fit_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_chrome_height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reserved_footer_height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mobile_breakpoint: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WindowProfile {
    kind: String,
    label: String,
    icon: String,
    #[serde(default)]
    geometry: ProfileGeometry,
}

#[derive(Debug, Deserialize)]
struct ProfileCatalog {
    schema_version: u32,
    profile: Vec<WindowProfile>,
}

fn validate(profile: &WindowProfile) -> Result<(), String> {
    let geometry = &profile.geometry;
    for (name, value) in [
        ("min_width", geometry.min_width),
        ("min_height", geometry.min_height),
        ("default_width", geometry.default_width),
        ("default_height", geometry.default_height),
    ] {
        if matches!(value, Some(v) if v <= 0) {
            return Err(format!("{name} must be positive"));
        }
    }
    if let (Some(min), Some(default)) = (geometry.min_width, geometry.default_width) {
        if default < min {
            return Err(format!("default_width {default} below min_width {min}"));
        }
    }
    if let (Some(min), Some(default)) = (geometry.min_height, geometry.default_height) {
        if default < min {
            return Err(format!("default_height {default} below min_height {min}"));
        }
    }
    for (name, value) in [
        ("max_width_percent", geometry.max_width_percent),
        ("max_height_percent", geometry.max_height_percent),
    ] {
        if matches!(value, Some(v) if !(v > 0.0 && v <= 1.0)) {
            return Err(format!("{name} must be in (0, 1]"));
        }
    }
    Ok(())
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("window_profiles.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let catalog: ProfileCatalog = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    if catalog.schema_version != 1 {
        panic!(
            "profile schema mismatch in {}: expected 1 found {}",
            path.display(),
            catalog.schema_version
        );
    }

    let mut seen = BTreeSet::new();
    for profile in &catalog.profile {
        if !seen.insert(profile.kind.clone()) {
            panic!("duplicate window profile `{}`", profile.kind);
        }
        if let Err(err) = validate(profile) {
            panic!("invalid window profile `{}`: {err}", profile.kind);
        }
    }

    let mut profiles = catalog.profile;
    profiles.sort_by(|a, b| a.kind.cmp(&b.kind));
    let json = serde_json::to_string_pretty(&profiles).expect("serialize window profile catalog");
    let generated = format!(
        "/// Build-time generated window profile catalog JSON.\n\
pub const WINDOW_PROFILE_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("window_profiles_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
