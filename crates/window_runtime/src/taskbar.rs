//! Taskbar ordering, click dispatch, and the per-button context-menu state machine.
//!
//! Everything here is a pure function of [`RegistryState`]; the Leptos components in
//! [`crate::components`] only render these results and dispatch the returned actions.

use crate::{
    geometry::maximized_dimensions,
    model::{RegistryState, Viewport, WindowId, WindowKind, WindowRecord},
    profiles::window_icon,
    registry::RegistryAction,
};

/// Gap kept between a popup and the viewport edges.
pub const POPUP_EDGE_MARGIN: i32 = 6;
/// Approximate rendered size of the window context menu, used for clamping.
pub const CONTEXT_MENU_WIDTH: i32 = 200;
pub const CONTEXT_MENU_HEIGHT: i32 = 140;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Render model for one taskbar button.
pub struct TaskbarEntry {
    pub window_id: WindowId,
    pub kind: WindowKind,
    pub title: String,
    pub icon: String,
    pub is_minimized: bool,
    pub is_topmost: bool,
}

/// Registered windows ordered ascending by stacking value, ties broken by id.
pub fn ordered_taskbar_windows(state: &RegistryState) -> Vec<&WindowRecord> {
    let mut windows: Vec<&WindowRecord> = state.windows.iter().collect();
    windows.sort_by_key(|win| (win.z_index, win.id));
    windows
}

/// One entry per registered window. Empty when no windows are open, in which case the taskbar
/// renders nothing.
pub fn taskbar_entries(state: &RegistryState) -> Vec<TaskbarEntry> {
    let topmost = state.topmost_window_id();
    ordered_taskbar_windows(state)
        .into_iter()
        .map(|win| TaskbarEntry {
            window_id: win.id,
            kind: win.kind.clone(),
            title: win.title.clone(),
            icon: window_icon(&win.kind),
            is_minimized: win.is_minimized,
            is_topmost: Some(win.id) == topmost,
        })
        .collect()
}

/// Maps a primary click on a taskbar button to exactly one registry operation.
///
/// Minimized windows restore, the topmost window minimizes, anything else is focused. Returns
/// `None` for ids that are no longer registered.
pub fn taskbar_click_action(state: &RegistryState, window_id: WindowId) -> Option<RegistryAction> {
    let window = state.window(window_id)?;
    let action = if window.is_minimized {
        RegistryAction::RestoreWindow { window_id }
    } else if state.topmost_window_id() == Some(window_id) {
        RegistryAction::MinimizeWindow {
            window_id,
            dimensions: None,
        }
    } else {
        RegistryAction::FocusWindow { window_id }
    };
    Some(action)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Entries in a taskbar button's context menu.
pub enum TaskbarMenuItem {
    Restore,
    Maximize,
    Minimize,
    Close,
}

impl TaskbarMenuItem {
    pub fn label(self) -> &'static str {
        match self {
            Self::Restore => "Restore",
            Self::Maximize => "Maximize",
            Self::Minimize => "Minimize",
            Self::Close => "Close",
        }
    }

    /// Suffix used in the menu item's DOM id.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Restore => "restore",
            Self::Maximize => "maximize",
            Self::Minimize => "minimize",
            Self::Close => "close",
        }
    }
}

/// Menu items offered for `window`. Close is always present.
pub fn context_menu_items(window: &WindowRecord) -> Vec<TaskbarMenuItem> {
    if window.is_minimized {
        vec![
            TaskbarMenuItem::Restore,
            TaskbarMenuItem::Maximize,
            TaskbarMenuItem::Close,
        ]
    } else {
        vec![TaskbarMenuItem::Minimize, TaskbarMenuItem::Close]
    }
}

/// Registry operations for a selected menu item, in dispatch order.
///
/// Maximize on a minimized window keeps an existing pre-maximize snapshot, otherwise it uses the
/// stored geometry as the snapshot, then restores the window.
pub fn context_menu_actions(
    state: &RegistryState,
    window_id: WindowId,
    item: TaskbarMenuItem,
    viewport: Viewport,
) -> Vec<RegistryAction> {
    let Some(window) = state.window(window_id) else {
        return Vec::new();
    };
    match item {
        TaskbarMenuItem::Restore => vec![RegistryAction::RestoreWindow { window_id }],
        TaskbarMenuItem::Maximize => {
            let snapshot = match window.dimensions.pre_maximize_dimensions {
                Some(snapshot) if window.dimensions.is_maximized => snapshot,
                _ => window.dimensions.bounds(),
            };
            vec![
                RegistryAction::UpdateWindowDimensions {
                    window_id,
                    dimensions: maximized_dimensions(snapshot, viewport, &window.config),
                    persist: true,
                },
                RegistryAction::RestoreWindow { window_id },
            ]
        }
        TaskbarMenuItem::Minimize => vec![RegistryAction::MinimizeWindow {
            window_id,
            dimensions: None,
        }],
        TaskbarMenuItem::Close => vec![RegistryAction::CloseWindow { window_id }],
    }
}

/// Clamps a popup's top-left corner so the whole popup stays inside `viewport`.
pub fn clamp_menu_position(
    viewport: Viewport,
    x: i32,
    y: i32,
    popup_w: i32,
    popup_h: i32,
) -> (i32, i32) {
    let max_x = (viewport.width - popup_w - POPUP_EDGE_MARGIN).max(POPUP_EDGE_MARGIN);
    let max_y = (viewport.height - popup_h - POPUP_EDGE_MARGIN).max(POPUP_EDGE_MARGIN);
    (
        x.clamp(POPUP_EDGE_MARGIN, max_x),
        y.clamp(POPUP_EDGE_MARGIN, max_y),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Taskbar-wide context menu state. Only one button's menu can be open at a time.
pub enum ContextMenuState {
    #[default]
    Closed,
    Open {
        window_id: WindowId,
        x: i32,
        y: i32,
    },
}

impl ContextMenuState {
    /// Opens the menu for `window_id` at a viewport-clamped position, replacing any other menu.
    pub fn open(window_id: WindowId, x: i32, y: i32, viewport: Viewport) -> Self {
        let (x, y) = clamp_menu_position(viewport, x, y, CONTEXT_MENU_WIDTH, CONTEXT_MENU_HEIGHT);
        Self::Open { window_id, x, y }
    }

    pub fn window_id(self) -> Option<WindowId> {
        match self {
            Self::Closed => None,
            Self::Open { window_id, .. } => Some(window_id),
        }
    }

    pub fn is_open_for(self, window_id: WindowId) -> bool {
        self.window_id() == Some(window_id)
    }

    /// Closes the menu when its window is no longer registered.
    pub fn retain_existing(self, state: &RegistryState) -> Self {
        match self.window_id() {
            Some(window_id) if state.window(window_id).is_none() => Self::Closed,
            _ => self,
        }
    }
}
