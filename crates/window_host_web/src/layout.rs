//! DOM-backed viewport and element measurement.

use window_host::{ElementBounds, LayoutHost, Viewport};

/// Smallest viewport the runtime will report, so geometry math never sees a zero-sized desktop.
const MIN_VIEWPORT_WIDTH: i32 = 320;
const MIN_VIEWPORT_HEIGHT: i32 = 240;

#[derive(Debug, Clone, Copy, Default)]
/// Layout host reading `window.innerWidth/innerHeight` and `getBoundingClientRect`.
pub struct WebLayoutHost;

impl LayoutHost for WebLayoutHost {
    fn viewport(&self) -> Viewport {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let width = window
                    .inner_width()
                    .ok()
                    .and_then(|value| value.as_f64())
                    .map(|value| value as i32)
                    .unwrap_or(Viewport::default().width);
                let height = window
                    .inner_height()
                    .ok()
                    .and_then(|value| value.as_f64())
                    .map(|value| value as i32)
                    .unwrap_or(Viewport::default().height);
                return Viewport {
                    width: width.max(MIN_VIEWPORT_WIDTH),
                    height: height.max(MIN_VIEWPORT_HEIGHT),
                };
            }
        }

        let fallback = Viewport::default();
        Viewport {
            width: fallback.width.max(MIN_VIEWPORT_WIDTH),
            height: fallback.height.max(MIN_VIEWPORT_HEIGHT),
        }
    }

    fn element_bounds(&self, element_id: &str) -> Option<ElementBounds> {
        #[cfg(target_arch = "wasm32")]
        {
            let element = web_sys::window()?
                .document()?
                .get_element_by_id(element_id)?;
            let rect = element.get_bounding_client_rect();
            Some(ElementBounds {
                x: rect.left().round() as i32,
                y: rect.top().round() as i32,
                width: rect.width().round() as i32,
                height: rect.height().round() as i32,
                scroll_width: element.scroll_width(),
                scroll_height: element.scroll_height(),
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = element_id;
            None
        }
    }
}
