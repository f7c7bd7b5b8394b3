use serde::{Deserialize, Serialize};

pub use window_host::Viewport;

pub const WINDOW_LAYOUT_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_WINDOW_WIDTH: i32 = 480;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 360;
pub const DEFAULT_MIN_WINDOW_WIDTH: i32 = 200;
pub const DEFAULT_MIN_WINDOW_HEIGHT: i32 = 150;
pub const DEFAULT_MAX_SIZE_PERCENT: f64 = 0.9;
/// Title bar height added to the content height when auto-fitting.
pub const DEFAULT_CHROME_HEIGHT: i32 = 32;
/// Height kept free for the taskbar when a window is maximized.
pub const DEFAULT_FOOTER_HEIGHT: i32 = 48;
/// Viewports narrower than this render windows as bottom sheets.
pub const DEFAULT_MOBILE_BREAKPOINT: i32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

/// Display discriminator for a window ("chat", "files", ...). Also the persistence key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowKind(pub String);

impl WindowKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowKind {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for WindowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowBounds {
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
}

impl WindowBounds {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            width: self.width.max(min_w),
            height: self.height.max(min_h),
            ..self
        }
    }
}

/// Geometry stored on a window record and carried by every dimensions-changed event.
///
/// Serialized in camelCase so persisted values read as
/// `{"width":..,"height":..,"x":..,"y":..,"isMaximized":..,"preMaximizeDimensions":{..}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDimensions {
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_maximized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_maximize_dimensions: Option<WindowBounds>,
}

impl WindowDimensions {
    pub fn from_bounds(bounds: WindowBounds) -> Self {
        Self {
            width: bounds.width,
            height: bounds.height,
            x: bounds.x,
            y: bounds.y,
            is_maximized: false,
            pre_maximize_dimensions: None,
        }
    }

    pub fn bounds(&self) -> WindowBounds {
        WindowBounds {
            width: self.width,
            height: self.height,
            x: self.x,
            y: self.y,
        }
    }
}

/// Per-window sizing rules. Unset fields in serialized form take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width_percent: f64,
    pub max_height_percent: f64,
    pub default_width: i32,
    pub default_height: i32,
    pub default_x: Option<i32>,
    pub default_y: Option<i32>,
    pub fit_content: bool,
    pub fixed_chrome_height: i32,
    pub reserved_footer_height: i32,
    pub mobile_breakpoint: i32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WINDOW_WIDTH,
            min_height: DEFAULT_MIN_WINDOW_HEIGHT,
            max_width_percent: DEFAULT_MAX_SIZE_PERCENT,
            max_height_percent: DEFAULT_MAX_SIZE_PERCENT,
            default_width: DEFAULT_WINDOW_WIDTH,
            default_height: DEFAULT_WINDOW_HEIGHT,
            default_x: None,
            default_y: None,
            fit_content: false,
            fixed_chrome_height: DEFAULT_CHROME_HEIGHT,
            reserved_footer_height: DEFAULT_FOOTER_HEIGHT,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub kind: WindowKind,
    pub title: String,
    pub z_index: u32,
    pub is_minimized: bool,
    pub dimensions: WindowDimensions,
    pub config: GeometryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryState {
    pub next_window_id: u64,
    pub windows: Vec<WindowRecord>,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            windows: Vec::new(),
        }
    }
}

impl RegistryState {
    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    /// Highest stacking value across every record, minimized or not.
    pub fn max_z_index(&self) -> u32 {
        self.windows.iter().map(|w| w.z_index).max().unwrap_or(0)
    }

    /// The non-minimized window with the highest stacking value.
    pub fn topmost_window_id(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .filter(|w| !w.is_minimized)
            .max_by_key(|w| (w.z_index, w.id))
            .map(|w| w.id)
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            schema_version: WINDOW_LAYOUT_SCHEMA_VERSION,
            windows: self.windows.clone(),
        }
    }

    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        let windows = snapshot.windows;
        let next_window_id = windows
            .iter()
            .map(|w| w.id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        Self {
            next_window_id,
            windows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub schema_version: u32,
    pub windows: Vec<WindowRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub kind: WindowKind,
    pub title: Option<String>,
    pub initial_dimensions: Option<WindowDimensions>,
    pub config: Option<GeometryConfig>,
}

impl OpenWindowRequest {
    pub fn new(kind: impl Into<WindowKind>) -> Self {
        Self {
            kind: kind.into(),
            title: None,
            initial_dimensions: None,
            config: None,
        }
    }

    pub fn with_dimensions(mut self, dimensions: WindowDimensions) -> Self {
        self.initial_dimensions = Some(dimensions);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeCorner {
    pub const ALL: [ResizeCorner; 4] = [
        ResizeCorner::TopLeft,
        ResizeCorner::TopRight,
        ResizeCorner::BottomLeft,
        ResizeCorner::BottomRight,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutMode {
    Desktop,
    Mobile,
}
