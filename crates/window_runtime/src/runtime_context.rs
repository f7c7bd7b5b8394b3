//! Reactive provider wiring the registry reducer into Leptos.
//!
//! [`WindowRuntimeProvider`] owns a [`WindowRegistry`] and mirrors its state into a signal next to
//! the effect queue and the viewport signal. Components read state from [`WindowRuntimeContext`]
//! and mutate it only by dispatching [`RegistryAction`]s.

use leptos::*;

use crate::{
    host::WindowHostContext,
    model::{OpenWindowRequest, RegistryState, Viewport},
    persistence,
    profiles::profile_for,
    registry::{RegistryAction, RegistryEffect, WindowRegistry},
};

#[derive(Clone, Copy)]
/// Leptos context for reading window registry state and dispatching [`RegistryAction`] values.
pub struct WindowRuntimeContext {
    /// Host services for layout queries and persistence.
    pub host: StoredValue<WindowHostContext>,
    /// Reactive mirror of the registry state. Written only by `dispatch`.
    pub state: RwSignal<RegistryState>,
    /// Queue of effects emitted by the reducer and drained by the effect executor.
    pub effects: RwSignal<Vec<RegistryEffect>>,
    /// Current viewport, refreshed on every browser resize.
    pub viewport: RwSignal<Viewport>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<RegistryAction>,
}

impl WindowRuntimeContext {
    pub fn dispatch_action(&self, action: RegistryAction) {
        self.dispatch.call(action);
    }

    /// Opens a window centered in the current viewport, ignoring stored dimensions.
    pub fn open_window(&self, request: OpenWindowRequest) {
        self.dispatch_action(RegistryAction::OpenWindow {
            request,
            viewport: self.viewport.get_untracked(),
        });
    }

    /// Opens a window seeded from the dimensions last persisted for its kind.
    ///
    /// Explicit `initial_dimensions` on the request win over stored ones.
    pub fn open_window_with_persisted(&self, mut request: OpenWindowRequest) {
        let runtime = *self;
        spawn_local(async move {
            if request.initial_dimensions.is_none() {
                let config = request
                    .config
                    .unwrap_or_else(|| profile_for(&request.kind).geometry);
                let store = runtime.host.with_value(|host| host.dimension_store());
                request.initial_dimensions =
                    persistence::load_window_dimensions(store.as_ref(), &request.kind, &config)
                        .await;
            }
            runtime.open_window(request);
        });
    }
}

/// Applies `action` to the stored registry, then mirrors its state into `state` and queues the
/// emitted effects. Signals are written after the registry borrow ends so reactive effects may
/// dispatch again.
fn dispatch_through_registry(
    registry: StoredValue<WindowRegistry>,
    state: RwSignal<RegistryState>,
    effects: RwSignal<Vec<RegistryEffect>>,
    action: RegistryAction,
) {
    let Some((next, new_effects)) = registry.try_update_value(|registry| {
        let new_effects = registry.dispatch(action);
        (registry.state().clone(), new_effects)
    }) else {
        return;
    };

    if state.with_untracked(|current| *current != next) {
        state.set(next);
    }
    if !new_effects.is_empty() {
        let mut queue = effects.get_untracked();
        queue.extend(new_effects);
        effects.set(queue);
    }
}

/// Drains queued reducer effects in order. The queue is cleared before processing so nested
/// dispatches enqueue a fresh batch.
fn install_effect_executor(runtime: WindowRuntimeContext) {
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        let state = runtime.state.get_untracked();
        for effect in queued {
            runtime
                .host
                .with_value(|host| host.run_effect(&state, effect));
        }
    });
}

fn install_session_hydration(runtime: WindowRuntimeContext) {
    let store = runtime.host.with_value(|host| host.dimension_store());
    spawn_local(async move {
        if let Some(snapshot) = persistence::load_session_snapshot(store.as_ref()).await {
            logging::log!("restoring {} window(s) from session", snapshot.windows.len());
            runtime.dispatch_action(RegistryAction::HydrateSnapshot { snapshot });
        }
    });
}

#[component]
/// Provides [`WindowRuntimeContext`] to descendant components.
pub fn WindowRuntimeProvider(
    /// Host services; defaults to the browser layout host and `localStorage`.
    #[prop(optional)]
    host: Option<WindowHostContext>,
    /// Reopens the windows saved by the previous session.
    #[prop(optional)]
    restore_session: bool,
    children: Children,
) -> impl IntoView {
    let host = store_value(host.unwrap_or_default());
    let registry = store_value(WindowRegistry::new());
    let state = create_rw_signal(RegistryState::default());
    let effects = create_rw_signal(Vec::<RegistryEffect>::new());
    let viewport = create_rw_signal(host.with_value(|host| host.viewport()));

    let dispatch = Callback::new(move |action: RegistryAction| {
        dispatch_through_registry(registry, state, effects, action);
    });

    let runtime = WindowRuntimeContext {
        host,
        state,
        effects,
        viewport,
        dispatch,
    };
    provide_context(runtime);

    let resize_listener = window_event_listener(ev::resize, move |_| {
        viewport.set(host.with_value(|host| host.viewport()));
    });
    on_cleanup(move || resize_listener.remove());

    install_effect_executor(runtime);
    if restore_session {
        install_session_hydration(runtime);
    }

    children().into_view()
}

/// Returns the current [`WindowRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`WindowRuntimeProvider`].
pub fn use_window_runtime() -> WindowRuntimeContext {
    use_context::<WindowRuntimeContext>().expect("WindowRuntimeContext not provided")
}
