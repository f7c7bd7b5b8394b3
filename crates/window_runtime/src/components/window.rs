use super::*;
use crate::{
    controller::{
        measured_content_size, window_content_dom_id, window_content_measure_dom_id,
        window_dom_id, GeometryController, GeometryEvent,
    },
    model::{LayoutMode, ResizeCorner},
    registry::RegistryAction,
    runtime_context::WindowRuntimeContext,
};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn resize_corner_class(corner: ResizeCorner) -> &'static str {
    match corner {
        ResizeCorner::TopLeft => "nw",
        ResizeCorner::TopRight => "ne",
        ResizeCorner::BottomLeft => "sw",
        ResizeCorner::BottomRight => "se",
    }
}

fn emit(runtime: WindowRuntimeContext, event: Option<GeometryEvent>) {
    if let Some(event) = event {
        runtime.dispatch_action(event.into_registry_action());
    }
}

/// Feeds the content's natural size to the controller. Measured through the layout host so the
/// same path serves the initial measurement and every later resize notification.
fn measure_content(
    runtime: WindowRuntimeContext,
    controller: RwSignal<GeometryController>,
    window_id: WindowId,
) {
    let size = runtime
        .host
        .with_value(|host| measured_content_size(host.layout().as_ref(), window_id));
    if let Some((width, height)) = size {
        emit(
            runtime,
            controller
                .try_update(|c| c.content_resized(width, height))
                .flatten(),
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn observe_content_size(
    runtime: WindowRuntimeContext,
    controller: RwSignal<GeometryController>,
    window_id: WindowId,
    element: &web_sys::Element,
) {
    use wasm_bindgen::closure::Closure;

    let callback = Closure::<dyn FnMut(wasm_bindgen::JsValue)>::new(move |_entries| {
        measure_content(runtime, controller, window_id);
    });
    match web_sys::ResizeObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => {
            observer.observe(element);
            on_cleanup(move || {
                observer.disconnect();
                drop(callback);
            });
        }
        Err(err) => logging::warn!("content resize observer unavailable: {err:?}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn observe_content_size(
    runtime: WindowRuntimeContext,
    controller: RwSignal<GeometryController>,
    window_id: WindowId,
    _element: &web_sys::Element,
) {
    measure_content(runtime, controller, window_id);
}

#[component]
/// Renders every non-minimized window. Restoring a window re-mounts it, re-seeding its
/// controller from the registry.
pub fn WindowLayer(
    /// Renders a window's content. Called once per mount.
    render_content: Callback<WindowRecord, View>,
) -> impl IntoView {
    let runtime = use_window_runtime();
    let visible = move || {
        runtime.state.with(|state| {
            state
                .windows
                .iter()
                .filter(|win| !win.is_minimized)
                .map(|win| win.id)
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="window-layer">
            <For
                each=visible
                key=|window_id| *window_id
                children=move |window_id| {
                    view! { <FloatingWindow window_id=window_id render_content=render_content /> }
                }
            />
        </div>
    }
}

#[component]
/// One draggable, resizable window frame driven by its own [`GeometryController`].
pub fn FloatingWindow(
    window_id: WindowId,
    /// Renders the window's content.
    render_content: Callback<WindowRecord, View>,
) -> impl IntoView {
    let runtime = use_window_runtime();
    let Some(record) = runtime
        .state
        .with_untracked(|state| state.window(window_id).cloned())
    else {
        return ().into_view();
    };

    let controller = create_rw_signal(GeometryController::mount(
        window_id,
        record.config,
        Some(record.dimensions),
        runtime.viewport.get_untracked(),
    ));
    let title = Signal::derive(move || {
        runtime.state.with(|state| {
            state
                .window(window_id)
                .map(|win| win.title.clone())
                .unwrap_or_default()
        })
    });
    let z_index = Signal::derive(move || {
        runtime
            .state
            .with(|state| state.window(window_id).map(|win| win.z_index).unwrap_or(0))
    });
    let content_ref = create_node_ref::<html::Div>();

    create_effect(move |_| {
        let viewport = runtime.viewport.get();
        emit(
            runtime,
            controller
                .try_update(|c| c.viewport_resized(viewport))
                .flatten(),
        );
    });

    if record.config.fit_content {
        create_effect(move |_| {
            if let Some(element) = content_ref.get() {
                observe_content_size(runtime, controller, window_id, &element);
            }
        });
    }

    let source = store_value(None::<GestureSource>);
    let active_source = move || {
        let gesturing = controller.with_untracked(|c| c.is_dragging() || c.is_resizing());
        source.get_value().filter(|_| gesturing)
    };
    let pointer_move = move |pointer: PointerPosition| {
        emit(
            runtime,
            controller.try_update(|c| c.pointer_move(pointer)).flatten(),
        );
    };
    let pointer_up = move || {
        source.set_value(None);
        emit(runtime, controller.try_update(|c| c.pointer_up()).flatten());
    };

    let move_listener = window_event_listener(ev::pointermove, move |ev| {
        if active_source().is_some_and(|s| s.is_pointer(ev.pointer_id())) {
            pointer_move(pointer_from_pointer_event(&ev));
        }
    });
    let release = move |ev: web_sys::PointerEvent| {
        if active_source().is_some_and(|s| s.is_pointer(ev.pointer_id())) {
            pointer_up();
        }
    };
    let up_listener = window_event_listener(ev::pointerup, release);
    let cancel_listener = window_event_listener(ev::pointercancel, release);
    let touch_move_listener = window_event_listener(ev::touchmove, move |ev| {
        if let Some(pointer) = active_source().and_then(|s| changed_touch(&ev, s)) {
            pointer_move(pointer);
        }
    });
    let touch_release = move |ev: web_sys::TouchEvent| {
        if active_source().is_some_and(|s| changed_touch(&ev, s).is_some()) {
            pointer_up();
        }
    };
    let touch_end_listener = window_event_listener(ev::touchend, touch_release);
    let touch_cancel_listener = window_event_listener(ev::touchcancel, touch_release);
    on_cleanup(move || {
        move_listener.remove();
        up_listener.remove();
        cancel_listener.remove();
        touch_move_listener.remove();
        touch_end_listener.remove();
        touch_cancel_listener.remove();
    });

    let raise = move || {
        if runtime.state.with_untracked(|state| state.topmost_window_id()) != Some(window_id) {
            runtime.dispatch_action(RegistryAction::RaiseWindow { window_id });
        }
    };
    let begin_drag = move |started_by: GestureSource, pointer: PointerPosition| {
        if let Err(err) = controller.try_update(|c| c.begin_drag(pointer)).unwrap_or(Ok(())) {
            logging::log!("window {} drag refused: {err}", window_id.0);
            return false;
        }
        source.set_value(Some(started_by));
        true
    };
    let toggle_maximize = move || match controller
        .try_update(|c| c.toggle_maximize())
        .unwrap_or(Ok(None))
    {
        Ok(event) => emit(runtime, event),
        Err(err) => logging::log!("window {} maximize refused: {err}", window_id.0),
    };
    let minimize = move || {
        if let Some(event) = controller.try_update(|c| c.minimize()) {
            emit(runtime, Some(event));
        }
    };
    let close = move || {
        runtime.dispatch_action(RegistryAction::CloseWindow { window_id });
    };

    let frame_style = move || {
        let bounds = controller.with(|c| c.presented_bounds());
        format!(
            "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            z_index.get()
        )
    };
    let frame_class = move || {
        controller.with(|c| {
            let mut class = String::from("floating-window");
            if c.is_maximized() {
                class.push_str(" maximized");
            }
            if c.mode() == LayoutMode::Mobile {
                class.push_str(" mobile");
            }
            if c.is_dragging() || c.is_resizing() {
                class.push_str(" gesturing");
            }
            class
        })
    };
    let content = render_content.call(record);

    view! {
        <section
            id=window_dom_id(window_id)
            class=frame_class
            style=frame_style
            role="dialog"
            aria-label=move || title.get()
            on:pointerdown=move |_| raise()
            on:touchstart=move |_| raise()
        >
            <header
                class="window-titlebar"
                on:pointerdown=move |ev: web_sys::PointerEvent| {
                    if !is_primary_mouse_or_pen(&ev) {
                        return;
                    }
                    let started_by = GestureSource::Pointer(ev.pointer_id());
                    if begin_drag(started_by, pointer_from_pointer_event(&ev)) {
                        try_set_pointer_capture(&ev);
                        ev.prevent_default();
                    }
                }
                on:touchstart=move |ev: web_sys::TouchEvent| {
                    if let Some((started_by, pointer)) = started_touch(&ev) {
                        if begin_drag(started_by, pointer) {
                            ev.prevent_default();
                        }
                    }
                }
                on:dblclick=move |ev: web_sys::MouseEvent| {
                    stop_mouse_event(&ev);
                    toggle_maximize();
                }
            >
                <span class="window-title">{move || title.get()}</span>
                <div class="window-controls">
                    <button
                        aria-label="Minimize window"
                        on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            minimize();
                        }
                    >
                        "_"
                    </button>
                    <Show when=move || controller.with(|c| c.can_maximize()) fallback=|| ()>
                        <button
                            aria-label=move || {
                                if controller.with(|c| c.is_maximized()) {
                                    "Restore window"
                                } else {
                                    "Maximize window"
                                }
                            }
                            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                            on:click=move |ev| {
                                stop_mouse_event(&ev);
                                toggle_maximize();
                            }
                        >
                            "□"
                        </button>
                    </Show>
                    <button
                        aria-label="Close window"
                        on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            close();
                        }
                    >
                        "×"
                    </button>
                </div>
            </header>
            <div class="window-body">
                <div id=window_content_dom_id(window_id) class="window-content" tabindex="-1">
                    <div
                        id=window_content_measure_dom_id(window_id)
                        class="window-content-measure"
                        style="width:max-content;max-width:100vw;"
                        node_ref=content_ref
                    >
                        {content}
                    </div>
                </div>
            </div>
            <Show when=move || controller.with(|c| c.shows_resize_handles()) fallback=|| ()>
                {ResizeCorner::ALL
                    .into_iter()
                    .map(|corner| {
                        view! {
                            <ResizeHandle
                                window_id=window_id
                                corner=corner
                                controller=controller
                                source=source
                            />
                        }
                    })
                    .collect_view()}
            </Show>
        </section>
    }
    .into_view()
}

#[component]
fn ResizeHandle(
    window_id: WindowId,
    corner: ResizeCorner,
    controller: RwSignal<GeometryController>,
    source: StoredValue<Option<GestureSource>>,
) -> impl IntoView {
    let runtime = use_window_runtime();
    let class_name = format!("window-resize-handle {}", resize_corner_class(corner));

    let begin = move |started_by: GestureSource, pointer: PointerPosition| {
        let layout = runtime.host.with_value(|host| host.layout());
        match controller
            .try_update(|c| c.begin_resize(corner, pointer, layout.as_ref()))
            .unwrap_or(Ok(()))
        {
            Ok(()) => {
                source.set_value(Some(started_by));
                true
            }
            Err(err) => {
                logging::log!("window {} resize refused: {err}", window_id.0);
                false
            }
        }
    };

    view! {
        <div
            class=class_name
            aria-hidden="true"
            on:pointerdown=move |ev: web_sys::PointerEvent| {
                if !is_primary_mouse_or_pen(&ev) {
                    return;
                }
                let started_by = GestureSource::Pointer(ev.pointer_id());
                if begin(started_by, pointer_from_pointer_event(&ev)) {
                    try_set_pointer_capture(&ev);
                    ev.prevent_default();
                }
            }
            on:touchstart=move |ev: web_sys::TouchEvent| {
                if let Some((started_by, pointer)) = started_touch(&ev) {
                    if begin(started_by, pointer) {
                        ev.prevent_default();
                    }
                }
            }
        />
    }
}
