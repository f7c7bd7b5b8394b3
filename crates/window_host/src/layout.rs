//! Layout queries answered by the rendering host.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{Deserialize, Serialize};

/// Fallback viewport used when the host cannot report one.
pub const FALLBACK_VIEWPORT: Viewport = Viewport {
    width: 1024,
    height: 768,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Visible viewport size in CSS pixels.
pub struct Viewport {
    /// Viewport width.
    pub width: i32,
    /// Viewport height.
    pub height: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        FALLBACK_VIEWPORT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// On-screen bounding box of an element plus its natural (scroll) content size.
pub struct ElementBounds {
    /// Left edge relative to the viewport.
    pub x: i32,
    /// Top edge relative to the viewport.
    pub y: i32,
    /// Rendered width.
    pub width: i32,
    /// Rendered height.
    pub height: i32,
    /// Natural content width (`scrollWidth`).
    pub scroll_width: i32,
    /// Natural content height (`scrollHeight`).
    pub scroll_height: i32,
}

/// Host capability for viewport and element measurements.
pub trait LayoutHost {
    /// Returns the current viewport size.
    fn viewport(&self) -> Viewport;

    /// Returns the bounding box of the element with the given DOM id, if it is mounted.
    fn element_bounds(&self, element_id: &str) -> Option<ElementBounds>;
}

#[derive(Debug, Clone, Default)]
/// Layout host with a settable viewport and element table, for native builds and tests.
pub struct FixedLayoutHost {
    viewport: Rc<RefCell<Viewport>>,
    elements: Rc<RefCell<HashMap<String, ElementBounds>>>,
}

impl FixedLayoutHost {
    /// Creates a host reporting `viewport` and no elements.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Rc::new(RefCell::new(viewport)),
            elements: Rc::default(),
        }
    }

    /// Replaces the reported viewport.
    pub fn set_viewport(&self, viewport: Viewport) {
        *self.viewport.borrow_mut() = viewport;
    }

    /// Registers or replaces the bounds reported for `element_id`.
    pub fn set_element_bounds(&self, element_id: &str, bounds: ElementBounds) {
        self.elements
            .borrow_mut()
            .insert(element_id.to_string(), bounds);
    }

    /// Forgets the bounds for `element_id`, as if it were unmounted.
    pub fn remove_element(&self, element_id: &str) {
        self.elements.borrow_mut().remove(element_id);
    }
}

impl LayoutHost for FixedLayoutHost {
    fn viewport(&self) -> Viewport {
        *self.viewport.borrow()
    }

    fn element_bounds(&self, element_id: &str) -> Option<ElementBounds> {
        self.elements.borrow().get(element_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_host_reports_updated_viewport_and_elements() {
        let host = FixedLayoutHost::new(Viewport {
            width: 800,
            height: 600,
        });
        let host_obj: &dyn LayoutHost = &host;
        assert_eq!(host_obj.viewport().width, 800);
        assert_eq!(host_obj.element_bounds("window-1"), None);

        let bounds = ElementBounds {
            x: 10,
            y: 20,
            width: 300,
            height: 200,
            scroll_width: 300,
            scroll_height: 480,
        };
        host.set_element_bounds("window-1", bounds);
        host.set_viewport(Viewport {
            width: 390,
            height: 844,
        });

        assert_eq!(host_obj.element_bounds("window-1"), Some(bounds));
        assert_eq!(host_obj.viewport().height, 844);

        host.remove_element("window-1");
        assert_eq!(host_obj.element_bounds("window-1"), None);
    }

    #[test]
    fn default_viewport_matches_fallback() {
        assert_eq!(Viewport::default(), FALLBACK_VIEWPORT);
    }
}
