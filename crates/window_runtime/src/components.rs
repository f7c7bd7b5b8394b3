//! Leptos components for floating windows and the taskbar.
//!
//! Components render [`crate::controller`] and [`crate::taskbar`] results and forward browser
//! input to them; they hold no geometry rules of their own.

mod taskbar;
mod window;

use leptos::*;

use crate::{
    model::{PointerPosition, WindowId, WindowRecord},
    runtime_context::use_window_runtime,
};

pub use taskbar::{Taskbar, TaskbarButton, TaskbarWindowContextMenu};
pub use window::{FloatingWindow, WindowLayer};

/// DOM id of a window's taskbar button.
pub fn taskbar_button_dom_id(window_id: WindowId) -> String {
    format!("taskbar-window-{}", window_id.0)
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Input that started a window's current gesture. Move and release events from any other pointer
/// or finger are ignored, so simultaneous gestures on different windows stay independent.
enum GestureSource {
    /// Mouse or pen, by `pointerId`.
    Pointer(i32),
    /// Finger, by `Touch.identifier`.
    Touch(i32),
}

impl GestureSource {
    fn is_pointer(self, pointer_id: i32) -> bool {
        self == Self::Pointer(pointer_id)
    }

    /// Position of this gesture's finger among `touches`, if it is one of them.
    fn find_touch(
        self,
        touches: impl IntoIterator<Item = (i32, PointerPosition)>,
    ) -> Option<PointerPosition> {
        let Self::Touch(identifier) = self else {
            return None;
        };
        touches
            .into_iter()
            .find(|(id, _)| *id == identifier)
            .map(|(_, position)| position)
    }
}

fn touch_entries(list: &web_sys::TouchList) -> impl Iterator<Item = (i32, PointerPosition)> + '_ {
    (0..list.length())
        .filter_map(move |idx| list.get(idx))
        .map(|touch| {
            (
                touch.identifier(),
                PointerPosition {
                    x: touch.client_x(),
                    y: touch.client_y(),
                },
            )
        })
}

/// The finger that just landed, as a gesture source and its position.
fn started_touch(ev: &web_sys::TouchEvent) -> Option<(GestureSource, PointerPosition)> {
    let (identifier, position) = touch_entries(&ev.changed_touches()).next()?;
    Some((GestureSource::Touch(identifier), position))
}

/// Position of `source`'s finger if this touch event moved or lifted it.
fn changed_touch(ev: &web_sys::TouchEvent, source: GestureSource) -> Option<PointerPosition> {
    source.find_touch(touch_entries(&ev.changed_touches()))
}

/// Mouse and pen input uses pointer events; touch input is handled through touch events so a
/// single finger never drives a gesture twice.
fn is_primary_mouse_or_pen(ev: &web_sys::PointerEvent) -> bool {
    match ev.pointer_type().as_str() {
        "touch" => false,
        "mouse" => ev.button() == 0,
        _ => ev.is_primary(),
    }
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(x: i32, y: i32) -> PointerPosition {
        PointerPosition { x, y }
    }

    #[test]
    fn touch_gesture_follows_only_its_own_finger() {
        let first = GestureSource::Touch(0);
        let second = GestureSource::Touch(1);
        let frame = [(0, at(100, 100)), (1, at(620, 420))];

        assert_eq!(second.find_touch(frame), Some(at(620, 420)));
        assert_eq!(first.find_touch(frame), Some(at(100, 100)));
        assert_eq!(second.find_touch([(0, at(140, 90))]), None);
    }

    #[test]
    fn pointer_gesture_ignores_other_pointers_and_touches() {
        let mouse = GestureSource::Pointer(1);
        assert!(mouse.is_pointer(1));
        assert!(!mouse.is_pointer(7));
        assert!(!GestureSource::Touch(1).is_pointer(1));
        assert_eq!(mouse.find_touch([(1, at(5, 5))]), None);
    }
}
