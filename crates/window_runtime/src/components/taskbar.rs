use super::*;
use crate::taskbar::{
    context_menu_actions, context_menu_items, taskbar_click_action, taskbar_entries,
    ContextMenuState, TaskbarEntry,
};

const WINDOW_MENU_ID: &str = "taskbar-window-context-menu";

fn is_context_menu_shortcut(ev: &web_sys::KeyboardEvent) -> bool {
    ev.key() == "ContextMenu" || (ev.shift_key() && ev.key() == "F10")
}

#[component]
/// One button per registered window, in stacking order. Renders nothing when no window is open.
pub fn Taskbar() -> impl IntoView {
    let runtime = use_window_runtime();
    let state = runtime.state;
    let entries = create_memo(move |_| state.with(taskbar_entries));
    let menu = create_rw_signal(ContextMenuState::Closed);

    let outside_click_listener = window_event_listener(ev::mousedown, move |_| {
        if menu.get_untracked() != ContextMenuState::Closed {
            menu.set(ContextMenuState::Closed);
        }
    });
    on_cleanup(move || outside_click_listener.remove());

    let escape_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() || ev.key() != "Escape" {
            return;
        }
        if let Some(window_id) = menu.get_untracked().window_id() {
            ev.prevent_default();
            menu.set(ContextMenuState::Closed);
            focus_taskbar_button(window_id);
        }
    });
    on_cleanup(move || escape_listener.remove());

    create_effect(move |_| {
        let next = state.with(|state| menu.get_untracked().retain_existing(state));
        if next != menu.get_untracked() {
            menu.set(next);
        }
    });

    view! {
        <Show when=move || !entries.with(Vec::is_empty) fallback=|| ()>
            <nav class="taskbar" aria-label="Open windows">
                <For
                    each=move || entries.get()
                    key=|entry| entry.window_id
                    children=move |entry: TaskbarEntry| {
                        view! {
                            <TaskbarButton window_id=entry.window_id entries=entries menu=menu />
                        }
                    }
                />
                <TaskbarWindowContextMenu menu=menu />
            </nav>
        </Show>
    }
}

#[cfg(target_arch = "wasm32")]
fn focus_taskbar_button(window_id: WindowId) {
    use wasm_bindgen::JsCast;

    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(&taskbar_button_dom_id(window_id)))
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());
    if let Some(element) = element {
        let _ = element.focus();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn focus_taskbar_button(_: WindowId) {}

#[component]
/// Taskbar control for a single window: click to restore, minimize, or focus; right click or
/// the context-menu key opens the window menu.
pub fn TaskbarButton(
    window_id: WindowId,
    entries: Memo<Vec<TaskbarEntry>>,
    menu: RwSignal<ContextMenuState>,
) -> impl IntoView {
    let runtime = use_window_runtime();
    let entry = Signal::derive(move || {
        entries.with(|entries| {
            entries
                .iter()
                .find(|entry| entry.window_id == window_id)
                .cloned()
        })
    });

    let activate = move || {
        menu.set(ContextMenuState::Closed);
        let action = runtime
            .state
            .with_untracked(|state| taskbar_click_action(state, window_id));
        if let Some(action) = action {
            runtime.dispatch_action(action);
        }
    };
    let open_menu = move |x: i32, y: i32| {
        menu.set(ContextMenuState::open(
            window_id,
            x,
            y,
            runtime.viewport.get_untracked(),
        ));
    };

    let button_class = move || {
        entry.with(|entry| {
            let mut class = String::from("taskbar-button");
            if let Some(entry) = entry {
                if entry.is_topmost {
                    class.push_str(" active");
                }
                if entry.is_minimized {
                    class.push_str(" minimized");
                }
            }
            class
        })
    };

    view! {
        <button
            id=taskbar_button_dom_id(window_id)
            class=button_class
            aria-haspopup="menu"
            aria-pressed=move || {
                entry.with(|entry| entry.as_ref().is_some_and(|e| e.is_topmost).to_string())
            }
            data-icon=move || entry.with(|entry| entry.as_ref().map(|e| e.icon.clone()))
            on:mousedown=move |ev| ev.stop_propagation()
            on:click=move |ev| {
                stop_mouse_event(&ev);
                activate();
            }
            on:contextmenu=move |ev: web_sys::MouseEvent| {
                stop_mouse_event(&ev);
                open_menu(ev.client_x(), ev.client_y());
            }
            on:keydown=move |ev: web_sys::KeyboardEvent| {
                if !is_context_menu_shortcut(&ev) {
                    return;
                }
                ev.prevent_default();
                let anchor = runtime.host.with_value(|host| {
                    host.layout().element_bounds(&taskbar_button_dom_id(window_id))
                });
                let (x, y) = anchor.map(|rect| (rect.x, rect.y)).unwrap_or_default();
                open_menu(x, y);
            }
        >
            <span class="taskbar-button-title">
                {move || entry.with(|entry| entry.as_ref().map(|e| e.title.clone()))}
            </span>
        </button>
    }
}

#[component]
/// Popup menu for the window whose taskbar button was right-clicked.
pub fn TaskbarWindowContextMenu(menu: RwSignal<ContextMenuState>) -> impl IntoView {
    let runtime = use_window_runtime();
    let target = move || {
        let ContextMenuState::Open { window_id, x, y } = menu.get() else {
            return None;
        };
        runtime
            .state
            .with(|state| state.window(window_id).cloned())
            .map(|record| (record, x, y))
    };

    view! {
        {move || {
            let Some((record, x, y)) = target() else {
                return ().into_view();
            };
            let window_id = record.id;
            let items = context_menu_items(&record)
                .into_iter()
                .map(|item| {
                    view! {
                        <button
                            id=format!("{WINDOW_MENU_ID}-{}-{}", item.slug(), window_id.0)
                            role="menuitem"
                            class="taskbar-menu-item"
                            on:click=move |ev| {
                                stop_mouse_event(&ev);
                                menu.set(ContextMenuState::Closed);
                                let actions = runtime.state.with_untracked(|state| {
                                    context_menu_actions(
                                        state,
                                        window_id,
                                        item,
                                        runtime.viewport.get_untracked(),
                                    )
                                });
                                for action in actions {
                                    runtime.dispatch_action(action);
                                }
                            }
                        >
                            {item.label()}
                        </button>
                    }
                })
                .collect_view();

            view! {
                <div
                    id=WINDOW_MENU_ID
                    class="taskbar-menu"
                    role="menu"
                    aria-label=format!("Window menu for {}", record.title)
                    style=format!("left:{x}px;top:{y}px;")
                    on:mousedown=move |ev| ev.stop_propagation()
                >
                    {items}
                </div>
            }
            .into_view()
        }}
    }
}
