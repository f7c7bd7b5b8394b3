//! Per-window live geometry: drag, corner resize, maximize/restore, responsive mode, and auto-fit.
//!
//! A [`GeometryController`] is created when a window mounts (or re-mounts after a restore) and is
//! dropped when the window closes or minimizes. Input arrives as plain method calls; every change
//! is reported as a [`GeometryEvent`] carrying the full [`WindowDimensions`] payload.

use thiserror::Error;
use window_host::LayoutHost;

use crate::{
    geometry::{
        default_dimensions, fit_content_bounds, layout_mode, maximized_bounds, mobile_bounds,
        resize_bounds, sanitize_dimensions,
    },
    model::{
        GeometryConfig, LayoutMode, PointerPosition, ResizeCorner, Viewport, WindowBounds,
        WindowDimensions, WindowId,
    },
    registry::RegistryAction,
};

/// DOM id of a window's outer frame, queried at resize start.
pub fn window_dom_id(window_id: WindowId) -> String {
    format!("window-{}", window_id.0)
}

/// DOM id of a window's content body, the target of keyboard focus.
pub fn window_content_dom_id(window_id: WindowId) -> String {
    format!("window-content-{}", window_id.0)
}

/// DOM id of the `max-content` wrapper inside a window's content, measured for auto-fit.
pub fn window_content_measure_dom_id(window_id: WindowId) -> String {
    format!("window-content-measure-{}", window_id.0)
}

/// Natural size of a window's content: the wrapper's box, or its overflow when larger.
///
/// The wrapper sizes to its content, so the width shrinks with the content instead of sticking
/// to the width of the surrounding body.
pub fn measured_content_size(layout: &dyn LayoutHost, window_id: WindowId) -> Option<(i32, i32)> {
    let content = layout.element_bounds(&window_content_measure_dom_id(window_id))?;
    Some((
        content.width.max(content.scroll_width),
        content.height.max(content.scroll_height),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether a dimensions change is an intermediate frame or a settled value.
pub enum GesturePhase {
    /// Intermediate drag/resize frame, for live visual sync only.
    Live,
    /// Final value after release, maximize, restore, or auto-fit. Persisted.
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Events reported by a [`GeometryController`].
pub enum GeometryEvent {
    /// The window's geometry changed.
    DimensionsChanged {
        /// Source window.
        window_id: WindowId,
        /// Full geometry after the change.
        dimensions: WindowDimensions,
        /// Live frame or committed value.
        phase: GesturePhase,
    },
    /// The user asked to minimize; `dimensions` is the geometry to restore later.
    Minimize {
        /// Source window.
        window_id: WindowId,
        /// Geometry including maximize state and snapshot.
        dimensions: WindowDimensions,
    },
}

impl GeometryEvent {
    /// Converts the event into the registry action that records it.
    pub fn into_registry_action(self) -> RegistryAction {
        match self {
            Self::DimensionsChanged {
                window_id,
                dimensions,
                phase,
            } => RegistryAction::UpdateWindowDimensions {
                window_id,
                dimensions,
                persist: phase == GesturePhase::Committed,
            },
            Self::Minimize {
                window_id,
                dimensions,
            } => RegistryAction::MinimizeWindow {
                window_id,
                dimensions: Some(dimensions),
            },
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Reasons a drag, resize, or maximize request is refused.
pub enum GestureError {
    /// The viewport is below the mobile breakpoint.
    #[error("window geometry is fixed in mobile layout")]
    NotInDesktopMode,
    /// Maximized windows cannot be moved or resized.
    #[error("window is maximized")]
    Maximized,
    /// Another drag or resize is already running on this window.
    #[error("another gesture is already in progress")]
    GestureInProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Drag {
        last: PointerPosition,
    },
    Resize {
        corner: ResizeCorner,
        start_pointer: PointerPosition,
        start_bounds: WindowBounds,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Live geometry state for one mounted window.
pub struct GeometryController {
    window_id: WindowId,
    config: GeometryConfig,
    viewport: Viewport,
    mode: LayoutMode,
    bounds: WindowBounds,
    is_maximized: bool,
    pre_maximize: Option<WindowBounds>,
    gesture: Option<Gesture>,
    last_content_size: Option<(i32, i32)>,
}

impl GeometryController {
    /// Seeds a controller from registry-supplied dimensions, or a centered default when absent.
    pub fn mount(
        window_id: WindowId,
        config: GeometryConfig,
        initial: Option<WindowDimensions>,
        viewport: Viewport,
    ) -> Self {
        let dimensions = match initial {
            Some(dimensions) => sanitize_dimensions(dimensions, &config),
            None => default_dimensions(&config, viewport),
        };
        Self {
            window_id,
            config,
            viewport,
            mode: layout_mode(viewport, &config),
            bounds: dimensions.bounds(),
            is_maximized: dimensions.is_maximized,
            pre_maximize: dimensions.pre_maximize_dimensions,
            gesture: None,
            last_content_size: None,
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn is_maximized(&self) -> bool {
        self.is_maximized
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Some(Gesture::Drag { .. }))
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.gesture, Some(Gesture::Resize { .. }))
    }

    /// Whether the maximize control is shown.
    pub fn can_maximize(&self) -> bool {
        self.mode == LayoutMode::Desktop
    }

    /// Whether the corner handles are shown and the title bar starts drags.
    pub fn shows_resize_handles(&self) -> bool {
        self.mode == LayoutMode::Desktop && !self.is_maximized
    }

    /// Geometry reported to the registry. In mobile mode this is still the desktop geometry, so
    /// widening the viewport later brings the window back where it was.
    pub fn dimensions(&self) -> WindowDimensions {
        WindowDimensions {
            width: self.bounds.width,
            height: self.bounds.height,
            x: self.bounds.x,
            y: self.bounds.y,
            is_maximized: self.is_maximized,
            pre_maximize_dimensions: if self.is_maximized {
                self.pre_maximize
            } else {
                None
            },
        }
    }

    /// Geometry to render: the desktop geometry, or the bottom sheet in mobile mode.
    pub fn presented_bounds(&self) -> WindowBounds {
        match self.mode {
            LayoutMode::Desktop => self.bounds,
            LayoutMode::Mobile => mobile_bounds(self.bounds.height, self.viewport, &self.config),
        }
    }

    fn check_gesture_start(&self) -> Result<(), GestureError> {
        if self.mode != LayoutMode::Desktop {
            return Err(GestureError::NotInDesktopMode);
        }
        if self.is_maximized {
            return Err(GestureError::Maximized);
        }
        if self.gesture.is_some() {
            return Err(GestureError::GestureInProgress);
        }
        Ok(())
    }

    /// Starts a title-bar drag.
    ///
    /// # Errors
    ///
    /// Refused in mobile mode, while maximized, or while another gesture runs.
    pub fn begin_drag(&mut self, pointer: PointerPosition) -> Result<(), GestureError> {
        self.check_gesture_start()?;
        self.gesture = Some(Gesture::Drag { last: pointer });
        Ok(())
    }

    /// Starts a corner resize. The starting geometry is read once from `host`, falling back to
    /// the controller's own bounds when the frame is not mounted.
    ///
    /// # Errors
    ///
    /// Refused in mobile mode, while maximized, or while another gesture runs.
    pub fn begin_resize(
        &mut self,
        corner: ResizeCorner,
        pointer: PointerPosition,
        host: &dyn LayoutHost,
    ) -> Result<(), GestureError> {
        self.check_gesture_start()?;
        let start_bounds = host
            .element_bounds(&window_dom_id(self.window_id))
            .map(|rect| WindowBounds {
                width: rect.width,
                height: rect.height,
                x: rect.x,
                y: rect.y,
            })
            .unwrap_or(self.bounds);
        self.gesture = Some(Gesture::Resize {
            corner,
            start_pointer: pointer,
            start_bounds,
        });
        Ok(())
    }

    /// Applies a pointer sample to the running gesture.
    pub fn pointer_move(&mut self, pointer: PointerPosition) -> Option<GeometryEvent> {
        let next = match self.gesture.as_mut()? {
            Gesture::Drag { last } => {
                let moved = self.bounds.offset(pointer.x - last.x, pointer.y - last.y);
                *last = pointer;
                moved
            }
            Gesture::Resize {
                corner,
                start_pointer,
                start_bounds,
            } => resize_bounds(
                *start_bounds,
                *corner,
                pointer.x - start_pointer.x,
                pointer.y - start_pointer.y,
                self.config.min_width,
                self.config.min_height,
            ),
        };
        if next == self.bounds {
            return None;
        }
        self.bounds = next;
        Some(self.changed(GesturePhase::Live))
    }

    /// Ends any gesture and reports the settled geometry.
    pub fn pointer_up(&mut self) -> Option<GeometryEvent> {
        self.gesture.take()?;
        Some(self.changed(GesturePhase::Committed))
    }

    /// Maximizes into the viewport minus the footer, remembering the current bounds.
    ///
    /// Returns `Ok(None)` if already maximized.
    ///
    /// # Errors
    ///
    /// Refused in mobile mode.
    pub fn maximize(&mut self) -> Result<Option<GeometryEvent>, GestureError> {
        if self.mode != LayoutMode::Desktop {
            return Err(GestureError::NotInDesktopMode);
        }
        if self.is_maximized {
            return Ok(None);
        }
        self.gesture = None;
        self.pre_maximize = Some(self.bounds);
        self.bounds = maximized_bounds(self.viewport, &self.config);
        self.is_maximized = true;
        Ok(Some(self.changed(GesturePhase::Committed)))
    }

    /// Leaves maximized state, writing back the snapshot if one exists.
    pub fn restore(&mut self) -> Option<GeometryEvent> {
        if !self.is_maximized {
            return None;
        }
        if let Some(snapshot) = self.pre_maximize.take() {
            self.bounds = snapshot;
        }
        self.is_maximized = false;
        Some(self.changed(GesturePhase::Committed))
    }

    /// Title-bar double click and the maximize button.
    ///
    /// # Errors
    ///
    /// Maximizing is refused in mobile mode.
    pub fn toggle_maximize(&mut self) -> Result<Option<GeometryEvent>, GestureError> {
        if self.is_maximized {
            Ok(self.restore())
        } else {
            self.maximize()
        }
    }

    /// Packages the current geometry for the registry before the window is hidden.
    pub fn minimize(&mut self) -> GeometryEvent {
        self.gesture = None;
        GeometryEvent::Minimize {
            window_id: self.window_id,
            dimensions: self.dimensions(),
        }
    }

    /// Re-evaluates the layout mode and, for auto-fit windows, refits to the new viewport.
    ///
    /// Maximized bounds are not re-derived.
    pub fn viewport_resized(&mut self, viewport: Viewport) -> Option<GeometryEvent> {
        self.viewport = viewport;
        self.mode = layout_mode(viewport, &self.config);
        if self.mode == LayoutMode::Mobile {
            self.gesture = None;
        }
        self.refit()
    }

    /// Content natural size changed. Only auto-fit windows react; an unchanged size is ignored.
    pub fn content_resized(
        &mut self,
        scroll_width: i32,
        scroll_height: i32,
    ) -> Option<GeometryEvent> {
        if !self.config.fit_content {
            return None;
        }
        let size = (scroll_width, scroll_height);
        if self.last_content_size == Some(size) {
            return None;
        }
        self.last_content_size = Some(size);
        self.refit()
    }

    fn refit(&mut self) -> Option<GeometryEvent> {
        if !self.config.fit_content || self.is_maximized || self.gesture.is_some() {
            return None;
        }
        let (scroll_width, scroll_height) = self.last_content_size?;
        let fitted = fit_content_bounds(scroll_width, scroll_height, self.viewport, &self.config);
        if fitted == self.bounds {
            return None;
        }
        self.bounds = fitted;
        Some(self.changed(GesturePhase::Committed))
    }

    fn changed(&self, phase: GesturePhase) -> GeometryEvent {
        GeometryEvent::DimensionsChanged {
            window_id: self.window_id,
            dimensions: self.dimensions(),
            phase,
        }
    }
}
