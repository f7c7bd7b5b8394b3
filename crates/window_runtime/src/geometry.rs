//! Shared clamping, centering, and resize math used by the registry, controller, and taskbar.

use crate::model::{
    GeometryConfig, LayoutMode, ResizeCorner, Viewport, WindowBounds, WindowDimensions,
};

/// Minimum gap kept between a freshly placed window and the viewport's top/left edge.
pub const EDGE_MARGIN: i32 = 8;

/// Centers a window of `size` along an axis of length `extent`, staying at least
/// [`EDGE_MARGIN`] from the leading edge and never pushed past the trailing edge.
pub fn centered_axis(extent: i32, size: i32) -> i32 {
    let upper = (extent - size).max(EDGE_MARGIN);
    ((extent - size) / 2).clamp(EDGE_MARGIN, upper)
}

pub fn centered_bounds(viewport: Viewport, width: i32, height: i32) -> WindowBounds {
    WindowBounds {
        width,
        height,
        x: centered_axis(viewport.width, width),
        y: centered_axis(viewport.height, height),
    }
}

/// Geometry for a window opened without persisted dimensions.
pub fn default_dimensions(config: &GeometryConfig, viewport: Viewport) -> WindowDimensions {
    let width = config.default_width.max(config.min_width);
    let height = config.default_height.max(config.min_height);
    let centered = centered_bounds(viewport, width, height);
    WindowDimensions::from_bounds(WindowBounds {
        x: config.default_x.unwrap_or(centered.x),
        y: config.default_y.unwrap_or(centered.y),
        ..centered
    })
}

/// Repairs dimensions read from storage or handed to the registry.
///
/// Sizes below the configured minimums are raised, a snapshot on a non-maximized window is
/// dropped, and a maximized window is pinned to the origin. A maximized value with no snapshot is
/// kept as-is; restoring it later only clears the flag.
pub fn sanitize_dimensions(
    dimensions: WindowDimensions,
    config: &GeometryConfig,
) -> WindowDimensions {
    let bounds = dimensions
        .bounds()
        .clamped_min(config.min_width, config.min_height);
    if dimensions.is_maximized {
        WindowDimensions {
            width: bounds.width,
            height: bounds.height,
            x: 0,
            y: 0,
            is_maximized: true,
            pre_maximize_dimensions: dimensions
                .pre_maximize_dimensions
                .map(|snapshot| snapshot.clamped_min(config.min_width, config.min_height)),
        }
    } else {
        WindowDimensions::from_bounds(bounds)
    }
}

/// Bounds a window takes when maximized into `viewport`.
pub fn maximized_bounds(viewport: Viewport, config: &GeometryConfig) -> WindowBounds {
    WindowBounds {
        width: viewport.width,
        height: viewport.height - config.reserved_footer_height,
        x: 0,
        y: 0,
    }
    .clamped_min(config.min_width, config.min_height)
}

/// Maximized dimensions remembering `snapshot` as the geometry to restore to.
pub fn maximized_dimensions(
    snapshot: WindowBounds,
    viewport: Viewport,
    config: &GeometryConfig,
) -> WindowDimensions {
    let bounds = maximized_bounds(viewport, config);
    WindowDimensions {
        is_maximized: true,
        pre_maximize_dimensions: Some(snapshot),
        ..WindowDimensions::from_bounds(bounds)
    }
}

/// Applies a corner drag of `(dx, dy)` (relative to gesture start) to `start`.
///
/// Width/height never drop below the minimums. Left and top corners move the origin so the
/// opposite corner stays put even once the minimum engages.
pub fn resize_bounds(
    start: WindowBounds,
    corner: ResizeCorner,
    dx: i32,
    dy: i32,
    min_width: i32,
    min_height: i32,
) -> WindowBounds {
    let right = start.x + start.width;
    let bottom = start.y + start.height;
    match corner {
        ResizeCorner::BottomRight => WindowBounds {
            width: (start.width + dx).max(min_width),
            height: (start.height + dy).max(min_height),
            ..start
        },
        ResizeCorner::BottomLeft => {
            let width = (start.width - dx).max(min_width);
            WindowBounds {
                width,
                height: (start.height + dy).max(min_height),
                x: right - width,
                y: start.y,
            }
        }
        ResizeCorner::TopRight => {
            let height = (start.height - dy).max(min_height);
            WindowBounds {
                width: (start.width + dx).max(min_width),
                height,
                x: start.x,
                y: bottom - height,
            }
        }
        ResizeCorner::TopLeft => {
            let width = (start.width - dx).max(min_width);
            let height = (start.height - dy).max(min_height);
            WindowBounds {
                width,
                height,
                x: right - width,
                y: bottom - height,
            }
        }
    }
}

/// Largest size allowed along an axis of length `extent` at `percent` of it.
pub fn percent_of(extent: i32, percent: f64) -> i32 {
    (f64::from(extent) * percent).floor() as i32
}

/// Clamps a natural content size between `min` and `percent` of `extent`. The minimum wins when
/// the viewport is too small to honor both.
pub fn fit_axis(content: i32, min: i32, percent: f64, extent: i32) -> i32 {
    content.min(percent_of(extent, percent)).max(min)
}

/// Size and centered position for a window auto-fitted to its content.
pub fn fit_content_bounds(
    scroll_width: i32,
    scroll_height: i32,
    viewport: Viewport,
    config: &GeometryConfig,
) -> WindowBounds {
    let width = fit_axis(
        scroll_width,
        config.min_width,
        config.max_width_percent,
        viewport.width,
    );
    let height = fit_axis(
        scroll_height + config.fixed_chrome_height,
        config.min_height,
        config.max_height_percent,
        viewport.height,
    );
    centered_bounds(viewport, width, height)
}

pub fn layout_mode(viewport: Viewport, config: &GeometryConfig) -> LayoutMode {
    if viewport.width < config.mobile_breakpoint {
        LayoutMode::Mobile
    } else {
        LayoutMode::Desktop
    }
}

/// Bottom-sheet placement used in mobile mode: full width, pinned to the bottom edge, height
/// capped at the configured share of the viewport.
pub fn mobile_bounds(height: i32, viewport: Viewport, config: &GeometryConfig) -> WindowBounds {
    let height = height.min(percent_of(viewport.height, config.max_height_percent));
    WindowBounds {
        width: viewport.width,
        height,
        x: 0,
        y: viewport.height - height,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn viewport(width: i32, height: i32) -> Viewport {
        Viewport { width, height }
    }

    fn bounds(width: i32, height: i32, x: i32, y: i32) -> WindowBounds {
        WindowBounds {
            width,
            height,
            x,
            y,
        }
    }

    #[test]
    fn default_placement_is_centered_with_edge_margin() {
        let config = GeometryConfig {
            default_width: 400,
            default_height: 300,
            ..GeometryConfig::default()
        };
        let dims = default_dimensions(&config, viewport(1200, 800));
        assert_eq!(dims.bounds(), bounds(400, 300, 400, 250));

        let cramped = default_dimensions(&config, viewport(300, 200));
        assert_eq!((cramped.x, cramped.y), (EDGE_MARGIN, EDGE_MARGIN));
    }

    #[test]
    fn explicit_default_position_overrides_centering() {
        let config = GeometryConfig {
            default_x: Some(24),
            default_y: Some(64),
            ..GeometryConfig::default()
        };
        let dims = default_dimensions(&config, viewport(1200, 800));
        assert_eq!((dims.x, dims.y), (24, 64));
    }

    #[test]
    fn bottom_right_resize_clamps_to_minimum() {
        let resized = resize_bounds(
            bounds(400, 300, 50, 60),
            ResizeCorner::BottomRight,
            -1000,
            -1000,
            200,
            150,
        );
        assert_eq!(resized, bounds(200, 150, 50, 60));
    }

    #[test]
    fn top_left_resize_keeps_opposite_corner_fixed() {
        let start = bounds(400, 300, 100, 100);
        let grown = resize_bounds(start, ResizeCorner::TopLeft, -50, -20, 200, 150);
        assert_eq!(grown, bounds(450, 320, 50, 80));

        let clamped = resize_bounds(start, ResizeCorner::TopLeft, 900, 900, 200, 150);
        assert_eq!(clamped, bounds(200, 150, 300, 250));
        assert_eq!(clamped.x + clamped.width, start.x + start.width);
        assert_eq!(clamped.y + clamped.height, start.y + start.height);
    }

    #[test]
    fn mixed_corners_move_only_their_own_edges() {
        let start = bounds(400, 300, 100, 100);
        assert_eq!(
            resize_bounds(start, ResizeCorner::TopRight, 30, 40, 200, 150),
            bounds(430, 260, 100, 140)
        );
        assert_eq!(
            resize_bounds(start, ResizeCorner::BottomLeft, 30, 40, 200, 150),
            bounds(370, 340, 130, 100)
        );
    }

    #[test]
    fn interactive_resize_has_no_upper_bound() {
        let resized = resize_bounds(
            bounds(400, 300, 0, 0),
            ResizeCorner::BottomRight,
            5000,
            5000,
            200,
            150,
        );
        assert_eq!(resized, bounds(5400, 5300, 0, 0));
    }

    #[test]
    fn maximize_reserves_footer_and_keeps_snapshot() {
        let config = GeometryConfig::default();
        let snapshot = bounds(400, 300, 10, 10);
        let dims = maximized_dimensions(snapshot, viewport(1280, 800), &config);
        assert_eq!(dims.bounds(), bounds(1280, 800 - config.reserved_footer_height, 0, 0));
        assert!(dims.is_maximized);
        assert_eq!(dims.pre_maximize_dimensions, Some(snapshot));
    }

    #[test]
    fn fit_content_clamps_between_minimum_and_viewport_share() {
        let config = GeometryConfig {
            min_width: 200,
            min_height: 150,
            max_width_percent: 0.5,
            max_height_percent: 0.5,
            fixed_chrome_height: 30,
            ..GeometryConfig::default()
        };
        let vp = viewport(1000, 800);

        let small = fit_content_bounds(50, 20, vp, &config);
        assert_eq!((small.width, small.height), (200, 150));

        let large = fit_content_bounds(4000, 4000, vp, &config);
        assert_eq!((large.width, large.height), (500, 400));
        assert_eq!((large.x, large.y), (250, 200));

        let natural = fit_content_bounds(320, 200, vp, &config);
        assert_eq!((natural.width, natural.height), (320, 230));
    }

    #[test]
    fn sanitize_repairs_corrupt_persisted_geometry() {
        let config = GeometryConfig::default();
        let corrupt = WindowDimensions {
            width: -40,
            height: 0,
            x: 30,
            y: 30,
            is_maximized: false,
            pre_maximize_dimensions: Some(bounds(1, 1, 1, 1)),
        };
        let repaired = sanitize_dimensions(corrupt, &config);
        assert_eq!(
            repaired,
            WindowDimensions::from_bounds(bounds(config.min_width, config.min_height, 30, 30))
        );

        let maximized = WindowDimensions {
            width: 1280,
            height: 752,
            x: 5,
            y: 5,
            is_maximized: true,
            pre_maximize_dimensions: None,
        };
        let pinned = sanitize_dimensions(maximized, &config);
        assert_eq!((pinned.x, pinned.y), (0, 0));
        assert!(pinned.is_maximized);
        assert_eq!(pinned.pre_maximize_dimensions, None);
    }

    #[test]
    fn layout_mode_switches_at_breakpoint() {
        let config = GeometryConfig::default();
        assert_eq!(
            layout_mode(viewport(config.mobile_breakpoint, 800), &config),
            LayoutMode::Desktop
        );
        assert_eq!(
            layout_mode(viewport(config.mobile_breakpoint - 1, 800), &config),
            LayoutMode::Mobile
        );
    }

    #[test]
    fn mobile_sheet_spans_width_and_caps_height() {
        let config = GeometryConfig {
            max_height_percent: 0.75,
            ..GeometryConfig::default()
        };
        let sheet = mobile_bounds(900, viewport(390, 800), &config);
        assert_eq!(sheet, bounds(390, 600, 0, 200));

        let short = mobile_bounds(300, viewport(390, 800), &config);
        assert_eq!(short, bounds(390, 300, 0, 500));
    }
}
