//! Host services for the reactive window runtime: layout queries, dimension storage, and the
//! execution of reducer-emitted [`RegistryEffect`]s.

use std::rc::Rc;

use leptos::{logging, spawn_local};
use window_host::{DimensionStore, LayoutHost, Viewport};
use window_host_web::{WebDimensionStore, WebLayoutHost};

use crate::{
    controller::window_content_dom_id,
    model::{RegistrySnapshot, RegistryState, WindowDimensions, WindowId, WindowKind},
    persistence,
    registry::RegistryEffect,
};

#[derive(Clone)]
/// Host service bundle injected into [`crate::runtime_context::WindowRuntimeProvider`].
pub struct WindowHostContext {
    layout: Rc<dyn LayoutHost>,
    store: Rc<dyn DimensionStore>,
}

impl Default for WindowHostContext {
    fn default() -> Self {
        Self::new(Rc::new(WebLayoutHost), Rc::new(WebDimensionStore))
    }
}

impl WindowHostContext {
    pub fn new(layout: Rc<dyn LayoutHost>, store: Rc<dyn DimensionStore>) -> Self {
        Self { layout, store }
    }

    /// Returns the configured layout host.
    pub fn layout(&self) -> Rc<dyn LayoutHost> {
        self.layout.clone()
    }

    /// Returns the configured dimension store.
    pub fn dimension_store(&self) -> Rc<dyn DimensionStore> {
        self.store.clone()
    }

    pub fn viewport(&self) -> Viewport {
        self.layout.viewport()
    }

    /// Executes a single [`RegistryEffect`]. `state` is the registry after the action that emitted
    /// it; session writes save its snapshot.
    pub fn run_effect(&self, state: &RegistryState, effect: RegistryEffect) {
        if let RegistryEffect::FocusWindowContent(window_id) = effect {
            focus_window_content(window_id);
            return;
        }
        let Some(write) = StorageWrite::from_effect(state, effect) else {
            return;
        };
        let store = self.store.clone();
        spawn_local(async move { write.run(store.as_ref()).await });
    }
}

/// Storage side of a [`RegistryEffect`], detached from the reactive state.
#[derive(Debug, Clone, PartialEq)]
enum StorageWrite {
    Dimensions {
        window_id: WindowId,
        kind: WindowKind,
        dimensions: WindowDimensions,
    },
    Session(RegistrySnapshot),
}

impl StorageWrite {
    fn from_effect(state: &RegistryState, effect: RegistryEffect) -> Option<Self> {
        match effect {
            RegistryEffect::PersistDimensions {
                window_id,
                kind,
                dimensions,
            } => Some(Self::Dimensions {
                window_id,
                kind,
                dimensions,
            }),
            RegistryEffect::PersistSession => Some(Self::Session(state.snapshot())),
            RegistryEffect::FocusWindowContent(_) => None,
        }
    }

    /// Writes to `store`; failures are logged.
    async fn run(self, store: &dyn DimensionStore) {
        match self {
            Self::Dimensions {
                window_id,
                kind,
                dimensions,
            } => {
                if let Err(err) =
                    persistence::persist_window_dimensions(store, &kind, &dimensions).await
                {
                    logging::warn!("persist dimensions for window {} failed: {err}", window_id.0);
                }
            }
            Self::Session(snapshot) => {
                if let Err(err) = persistence::persist_session_snapshot(store, &snapshot).await {
                    logging::warn!("persist window session failed: {err}");
                }
            }
        }
    }
}

fn focus_window_content(window_id: WindowId) {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::{closure::Closure, JsCast};

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(element) = window
            .document()
            .and_then(|document| document.get_element_by_id(&window_content_dom_id(window_id)))
        else {
            return;
        };
        let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() else {
            return;
        };
        // Focus after the current render pass has attached the element.
        let callback = Closure::once_into_js(move || {
            let _ = element.focus();
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = window_content_dom_id(window_id);
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use window_host::{FixedLayoutHost, MemoryDimensionStore};

    use super::*;
    use crate::{
        model::OpenWindowRequest,
        registry::{reduce_registry, RegistryAction},
    };

    const VIEWPORT: Viewport = Viewport {
        width: 1280,
        height: 800,
    };

    fn dispatch_and_store(
        state: &mut RegistryState,
        store: &MemoryDimensionStore,
        action: RegistryAction,
    ) {
        let effects = reduce_registry(state, action).expect("action applies");
        for effect in effects {
            if let Some(write) = StorageWrite::from_effect(state, effect) {
                block_on(write.run(store));
            }
        }
    }

    fn open(state: &mut RegistryState, store: &MemoryDimensionStore, kind: &str) -> WindowId {
        dispatch_and_store(
            state,
            store,
            RegistryAction::OpenWindow {
                request: OpenWindowRequest::new(kind),
                viewport: VIEWPORT,
            },
        );
        state.windows.last().expect("opened").id
    }

    #[test]
    fn injected_services_are_used() {
        let viewport = Viewport {
            width: 900,
            height: 700,
        };
        let store = MemoryDimensionStore::default();
        let host = WindowHostContext::new(
            Rc::new(FixedLayoutHost::new(viewport)),
            Rc::new(store.clone()),
        );
        assert_eq!(host.viewport(), viewport);

        block_on(host.dimension_store().save("k", "{}")).expect("save");
        assert_eq!(store.raw("k"), Some("{}".to_string()));
    }

    #[test]
    fn saved_session_tracks_open_close_and_stacking() {
        let store = MemoryDimensionStore::default();
        let mut state = RegistryState::default();
        let chat = open(&mut state, &store, "chat");
        let files = open(&mut state, &store, "files");

        let moved = state.window(files).expect("files").dimensions;
        dispatch_and_store(
            &mut state,
            &store,
            RegistryAction::UpdateWindowDimensions {
                window_id: files,
                dimensions: WindowDimensions {
                    x: moved.x + 40,
                    ..moved
                },
                persist: true,
            },
        );
        dispatch_and_store(
            &mut state,
            &store,
            RegistryAction::CloseWindow { window_id: files },
        );
        let admin = open(&mut state, &store, "admin");
        dispatch_and_store(
            &mut state,
            &store,
            RegistryAction::FocusWindow { window_id: chat },
        );

        let session =
            block_on(persistence::load_session_snapshot(&store)).expect("session saved");
        assert_eq!(session, state.snapshot());
        let ids: Vec<_> = session.windows.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![chat, admin]);
        assert!(store
            .raw(&persistence::dimensions_key(&WindowKind::from("files")))
            .is_some());
    }

    #[test]
    fn live_frames_leave_the_saved_session_alone() {
        let store = MemoryDimensionStore::default();
        let mut state = RegistryState::default();
        let chat = open(&mut state, &store, "chat");
        let saved = block_on(persistence::load_session_snapshot(&store)).expect("session saved");

        let live = state.window(chat).expect("chat").dimensions;
        dispatch_and_store(
            &mut state,
            &store,
            RegistryAction::UpdateWindowDimensions {
                window_id: chat,
                dimensions: WindowDimensions {
                    y: live.y + 25,
                    ..live
                },
                persist: false,
            },
        );
        assert_eq!(
            block_on(persistence::load_session_snapshot(&store)),
            Some(saved)
        );
    }
}
