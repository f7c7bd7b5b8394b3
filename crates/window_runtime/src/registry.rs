//! Registry actions, side-effect intents, and the authoritative window-record reducer.
//!
//! [`reduce_registry`] is the only code that mutates [`WindowRecord`]s. [`WindowRegistry`] wraps
//! it with an observer list; the Leptos layer in [`crate::runtime_context`] dispatches through a
//! stored [`WindowRegistry`] and mirrors its state into a signal.

use leptos::logging;
use thiserror::Error;

use crate::{
    geometry::{default_dimensions, sanitize_dimensions},
    model::{
        OpenWindowRequest, RegistrySnapshot, RegistryState, Viewport, WindowDimensions, WindowId,
        WindowKind, WindowRecord, WINDOW_LAYOUT_SCHEMA_VERSION,
    },
    profiles::profile_for,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_registry`].
pub enum RegistryAction {
    /// Open a window; it becomes topmost.
    OpenWindow {
        /// Kind, title, and optional initial geometry.
        request: OpenWindowRequest,
        /// Viewport used to center windows opened without initial geometry.
        viewport: Viewport,
    },
    /// Remove a window.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Raise a window above every other, un-minimize it, and move keyboard focus into it.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Raise a window like [`RegistryAction::FocusWindow`] but leave keyboard focus alone.
    /// Used for clicks inside a window, where the clicked control keeps focus.
    RaiseWindow {
        /// Window to raise.
        window_id: WindowId,
    },
    /// Hide a window, optionally storing the live geometry first.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
        /// Live geometry captured by the window's controller, if any.
        dimensions: Option<WindowDimensions>,
    },
    /// Show a minimized window with its stored geometry.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Replace a window's stored geometry.
    UpdateWindowDimensions {
        /// Window to update.
        window_id: WindowId,
        /// New geometry.
        dimensions: WindowDimensions,
        /// Whether the value ends a gesture and should be written to storage.
        persist: bool,
    },
    /// Replace the whole registry from a saved session.
    HydrateSnapshot {
        /// Snapshot payload to restore.
        snapshot: RegistrySnapshot,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_registry`] for the host to execute.
pub enum RegistryEffect {
    /// Write a window's dimensions to the dimension store under its kind.
    PersistDimensions {
        /// Window whose geometry changed.
        window_id: WindowId,
        /// Persistence key source.
        kind: WindowKind,
        /// Geometry to store.
        dimensions: WindowDimensions,
    },
    /// Move keyboard focus into the window's content.
    FocusWindowContent(WindowId),
    /// Save the registry snapshot as the session to restore on the next start.
    PersistSession,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors. Every one of them is expected under async flows and safe to ignore.
pub enum RegistryError {
    /// The target window is not (or no longer) registered.
    #[error("window {0:?} not found")]
    WindowNotFound(WindowId),
    /// A snapshot was written by an incompatible layout schema.
    #[error("unsupported layout schema version {0}")]
    UnsupportedSchema(u32),
}

impl RegistryError {
    /// Returns `true` for stale window ids, which async flows produce routinely.
    pub fn is_stale_window(&self) -> bool {
        matches!(self, Self::WindowNotFound(_))
    }
}

/// Applies a [`RegistryAction`] to `state` and returns the resulting side effects.
///
/// Every action that changes what a restored session would show ends with
/// [`RegistryEffect::PersistSession`]. Live geometry frames, no-op focus and hydration do not.
///
/// # Errors
///
/// Returns [`RegistryError::WindowNotFound`] when the action targets a window that is not open,
/// and [`RegistryError::UnsupportedSchema`] for snapshots from another schema version. `state` is
/// left untouched in both cases.
pub fn reduce_registry(
    state: &mut RegistryState,
    action: RegistryAction,
) -> Result<Vec<RegistryEffect>, RegistryError> {
    let mut effects = Vec::new();
    let mut session_changed = true;
    match action {
        RegistryAction::OpenWindow { request, viewport } => {
            let window_id = next_window_id(state);
            let profile = profile_for(&request.kind);
            let config = request.config.unwrap_or(profile.geometry);
            let dimensions = match request.initial_dimensions {
                Some(dimensions) => sanitize_dimensions(dimensions, &config),
                None => default_dimensions(&config, viewport),
            };
            let z_index = state.max_z_index() + 1;
            state.windows.push(WindowRecord {
                id: window_id,
                kind: request.kind,
                title: request.title.unwrap_or(profile.label),
                z_index,
                is_minimized: false,
                dimensions,
                config,
            });
            effects.push(RegistryEffect::FocusWindowContent(window_id));
        }
        RegistryAction::CloseWindow { window_id } => {
            let before_len = state.windows.len();
            state.windows.retain(|w| w.id != window_id);
            if state.windows.len() == before_len {
                return Err(RegistryError::WindowNotFound(window_id));
            }
        }
        RegistryAction::FocusWindow { window_id } => {
            session_changed = raise_window(state, window_id)?;
            effects.push(RegistryEffect::FocusWindowContent(window_id));
        }
        RegistryAction::RaiseWindow { window_id } => {
            session_changed = raise_window(state, window_id)?;
        }
        RegistryAction::MinimizeWindow {
            window_id,
            dimensions,
        } => {
            let window = find_window_mut(state, window_id)?;
            if let Some(dimensions) = dimensions {
                window.dimensions = sanitize_dimensions(dimensions, &window.config);
            }
            window.is_minimized = true;
            effects.push(persist_effect(window));
        }
        RegistryAction::RestoreWindow { window_id } => {
            let window = find_window_mut(state, window_id)?;
            window.is_minimized = false;
        }
        RegistryAction::UpdateWindowDimensions {
            window_id,
            dimensions,
            persist,
        } => {
            let window = find_window_mut(state, window_id)?;
            window.dimensions = sanitize_dimensions(dimensions, &window.config);
            if persist {
                effects.push(persist_effect(window));
            }
            session_changed = persist;
        }
        RegistryAction::HydrateSnapshot { snapshot } => {
            if snapshot.schema_version != WINDOW_LAYOUT_SCHEMA_VERSION {
                return Err(RegistryError::UnsupportedSchema(snapshot.schema_version));
            }
            *state = RegistryState::from_snapshot(snapshot);
            normalize_window_stack(state);
            session_changed = false;
        }
    }

    if session_changed {
        effects.push(RegistryEffect::PersistSession);
    }
    Ok(effects)
}

/// Raises `window_id` to the top and un-minimizes it. Returns `false` when it already was the
/// topmost visible window.
fn raise_window(state: &mut RegistryState, window_id: WindowId) -> Result<bool, RegistryError> {
    find_window_mut(state, window_id)?;
    if state.topmost_window_id() == Some(window_id) {
        return Ok(false);
    }
    let z_index = state.max_z_index() + 1;
    let window = find_window_mut(state, window_id)?;
    window.is_minimized = false;
    window.z_index = z_index;
    Ok(true)
}

fn next_window_id(state: &mut RegistryState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn find_window_mut(
    state: &mut RegistryState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, RegistryError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(RegistryError::WindowNotFound(window_id))
}

fn persist_effect(window: &WindowRecord) -> RegistryEffect {
    RegistryEffect::PersistDimensions {
        window_id: window.id,
        kind: window.kind.clone(),
        dimensions: window.dimensions,
    }
}

/// Reassigns stacking values `1..=n` in current stacking order and repairs stored geometry.
///
/// Only used on hydration: saved sessions may carry duplicate or sparse z-indices.
fn normalize_window_stack(state: &mut RegistryState) {
    state.windows.sort_by_key(|w| (w.z_index, w.id));
    for (idx, window) in state.windows.iter_mut().enumerate() {
        window.z_index = (idx + 1) as u32;
        window.dimensions = sanitize_dimensions(window.dimensions, &window.config);
    }
}

/// Handle returned by [`WindowRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Summary of a successfully applied [`RegistryAction`].
pub enum RegistryEvent {
    /// A window was opened.
    Opened(WindowId),
    /// A window was closed.
    Closed(WindowId),
    /// A window was focused (and un-minimized if needed).
    Focused(WindowId),
    /// A window was minimized.
    Minimized(WindowId),
    /// A minimized window was shown again.
    Restored(WindowId),
    /// A window's geometry was replaced.
    DimensionsUpdated {
        /// Updated window.
        window_id: WindowId,
        /// Whether the update was a committed (persisted) value.
        committed: bool,
    },
    /// The registry was replaced from a snapshot.
    Hydrated,
}

impl RegistryEvent {
    fn for_action(action: &RegistryAction, opened_id: WindowId) -> Self {
        match action {
            RegistryAction::OpenWindow { .. } => Self::Opened(opened_id),
            RegistryAction::CloseWindow { window_id } => Self::Closed(*window_id),
            RegistryAction::FocusWindow { window_id }
            | RegistryAction::RaiseWindow { window_id } => Self::Focused(*window_id),
            RegistryAction::MinimizeWindow { window_id, .. } => Self::Minimized(*window_id),
            RegistryAction::RestoreWindow { window_id } => Self::Restored(*window_id),
            RegistryAction::UpdateWindowDimensions {
                window_id, persist, ..
            } => Self::DimensionsUpdated {
                window_id: *window_id,
                committed: *persist,
            },
            RegistryAction::HydrateSnapshot { .. } => Self::Hydrated,
        }
    }
}

/// What observers receive after every dispatch that changed something.
#[derive(Debug)]
pub struct RegistryNotification<'a> {
    /// What happened.
    pub event: RegistryEvent,
    /// Registry state after the action.
    pub state: &'a RegistryState,
    /// Effects the host should execute.
    pub effects: &'a [RegistryEffect],
}

type Observer = Box<dyn FnMut(&RegistryNotification<'_>)>;

/// Framework-free container owning the registry state and its observers.
#[derive(Default)]
pub struct WindowRegistry {
    state: RegistryState,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for WindowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowRegistry")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.state.window(window_id)
    }

    pub fn topmost_window_id(&self) -> Option<WindowId> {
        self.state.topmost_window_id()
    }

    /// Registers `observer`; it is called after every state-changing dispatch.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&RegistryNotification<'_>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != subscription);
        self.observers.len() != before
    }

    /// Applies `action`, notifies observers, and returns the emitted effects.
    ///
    /// Reducer errors are logged and swallowed: a stale window id leaves the registry unchanged.
    pub fn dispatch(&mut self, action: RegistryAction) -> Vec<RegistryEffect> {
        let previous = self.state.clone();
        let event = RegistryEvent::for_action(&action, WindowId(previous.next_window_id));
        match reduce_registry(&mut self.state, action) {
            Ok(effects) => {
                if self.state != previous || !effects.is_empty() {
                    let notification = RegistryNotification {
                        event,
                        state: &self.state,
                        effects: &effects,
                    };
                    for (_, observer) in &mut self.observers {
                        observer(&notification);
                    }
                }
                effects
            }
            Err(err) if err.is_stale_window() => {
                logging::log!("window registry ignored action: {err}");
                Vec::new()
            }
            Err(err) => {
                logging::warn!("window registry rejected action: {err}");
                Vec::new()
            }
        }
    }

    pub fn open_window(&mut self, request: OpenWindowRequest, viewport: Viewport) -> WindowId {
        let window_id = WindowId(self.state.next_window_id);
        self.dispatch(RegistryAction::OpenWindow { request, viewport });
        window_id
    }

    pub fn close_window(&mut self, window_id: WindowId) {
        self.dispatch(RegistryAction::CloseWindow { window_id });
    }

    pub fn focus_window(&mut self, window_id: WindowId) {
        self.dispatch(RegistryAction::FocusWindow { window_id });
    }

    pub fn raise_window(&mut self, window_id: WindowId) {
        self.dispatch(RegistryAction::RaiseWindow { window_id });
    }

    pub fn minimize_window(&mut self, window_id: WindowId, dimensions: Option<WindowDimensions>) {
        self.dispatch(RegistryAction::MinimizeWindow {
            window_id,
            dimensions,
        });
    }

    pub fn restore_window(&mut self, window_id: WindowId) {
        self.dispatch(RegistryAction::RestoreWindow { window_id });
    }

    pub fn update_window_dimensions(&mut self, window_id: WindowId, dimensions: WindowDimensions) {
        self.dispatch(RegistryAction::UpdateWindowDimensions {
            window_id,
            dimensions,
            persist: true,
        });
    }

    pub fn hydrate(&mut self, snapshot: RegistrySnapshot) {
        self.dispatch(RegistryAction::HydrateSnapshot { snapshot });
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{GeometryConfig, WindowBounds};

    const VIEWPORT: Viewport = Viewport {
        width: 1280,
        height: 800,
    };

    fn open(state: &mut RegistryState, kind: &str) -> WindowId {
        reduce_registry(
            state,
            RegistryAction::OpenWindow {
                request: OpenWindowRequest::new(kind),
                viewport: VIEWPORT,
            },
        )
        .expect("open window");
        state.windows.last().expect("window").id
    }

    fn z_of(state: &RegistryState, window_id: WindowId) -> u32 {
        state.window(window_id).expect("window").z_index
    }

    #[test]
    fn open_window_stacks_above_existing_windows() {
        let mut state = RegistryState::default();
        let first = open(&mut state, "chat");
        let second = open(&mut state, "files");

        assert_eq!(z_of(&state, first), 1);
        assert_eq!(z_of(&state, second), 2);
        assert_eq!(state.topmost_window_id(), Some(second));
        let record = state.window(second).unwrap();
        assert_eq!(record.title, "Files");
        assert!(!record.is_minimized);
    }

    #[test]
    fn open_window_centers_default_geometry() {
        let mut state = RegistryState::default();
        let config = GeometryConfig {
            default_width: 400,
            default_height: 300,
            ..GeometryConfig::default()
        };
        let mut request = OpenWindowRequest::new("notes");
        request.config = Some(config);
        reduce_registry(
            &mut state,
            RegistryAction::OpenWindow {
                request,
                viewport: VIEWPORT,
            },
        )
        .unwrap();
        let dims = state.windows[0].dimensions;
        assert_eq!((dims.x, dims.y, dims.width, dims.height), (440, 250, 400, 300));
    }

    #[test]
    fn open_window_clamps_corrupt_initial_geometry() {
        let mut state = RegistryState::default();
        let request = OpenWindowRequest::new("chat").with_dimensions(WindowDimensions {
            width: -5,
            height: 10,
            x: 12,
            y: 14,
            is_maximized: false,
            pre_maximize_dimensions: None,
        });
        reduce_registry(
            &mut state,
            RegistryAction::OpenWindow {
                request,
                viewport: VIEWPORT,
            },
        )
        .unwrap();
        let record = &state.windows[0];
        assert_eq!(record.dimensions.width, record.config.min_width);
        assert_eq!(record.dimensions.height, record.config.min_height);
        assert_eq!((record.dimensions.x, record.dimensions.y), (12, 14));
    }

    #[test]
    fn focus_raises_only_the_target_window() {
        let mut state = RegistryState::default();
        let a = open(&mut state, "chat");
        let b = open(&mut state, "files");
        let c = open(&mut state, "admin");
        let before_a = z_of(&state, a);
        let before_c = z_of(&state, c);

        reduce_registry(&mut state, RegistryAction::FocusWindow { window_id: b }).unwrap();
        assert!(z_of(&state, b) > z_of(&state, c));
        assert_eq!(z_of(&state, a), before_a);
        assert_eq!(z_of(&state, c), before_c);
        assert_eq!(state.topmost_window_id(), Some(b));
    }

    #[test]
    fn focusing_topmost_window_keeps_stack() {
        let mut state = RegistryState::default();
        open(&mut state, "chat");
        let top = open(&mut state, "files");
        let before = state.clone();

        let effects =
            reduce_registry(&mut state, RegistryAction::FocusWindow { window_id: top }).unwrap();
        assert_eq!(state, before);
        assert_eq!(effects, vec![RegistryEffect::FocusWindowContent(top)]);
    }

    #[test]
    fn focusing_minimized_topmost_window_unminimizes_it() {
        let mut state = RegistryState::default();
        let only = open(&mut state, "chat");
        reduce_registry(
            &mut state,
            RegistryAction::MinimizeWindow {
                window_id: only,
                dimensions: None,
            },
        )
        .unwrap();
        assert_eq!(state.topmost_window_id(), None);

        reduce_registry(&mut state, RegistryAction::FocusWindow { window_id: only }).unwrap();
        let record = state.window(only).unwrap();
        assert!(!record.is_minimized);
        assert_eq!(record.z_index, 2);
    }

    #[test]
    fn minimize_stores_snapshot_and_keeps_z_index() {
        let mut state = RegistryState::default();
        let win = open(&mut state, "chat");
        let z_before = z_of(&state, win);
        let live = WindowDimensions {
            width: 1280,
            height: 752,
            x: 0,
            y: 0,
            is_maximized: true,
            pre_maximize_dimensions: Some(WindowBounds {
                width: 420,
                height: 560,
                x: 30,
                y: 40,
            }),
        };

        let effects = reduce_registry(
            &mut state,
            RegistryAction::MinimizeWindow {
                window_id: win,
                dimensions: Some(live),
            },
        )
        .unwrap();

        let record = state.window(win).unwrap();
        assert!(record.is_minimized);
        assert_eq!(record.z_index, z_before);
        assert_eq!(record.dimensions, live);
        assert_eq!(
            effects,
            vec![
                RegistryEffect::PersistDimensions {
                    window_id: win,
                    kind: WindowKind::from("chat"),
                    dimensions: live,
                },
                RegistryEffect::PersistSession,
            ]
        );
    }

    #[test]
    fn restore_leaves_geometry_untouched() {
        let mut state = RegistryState::default();
        let win = open(&mut state, "chat");
        let maximized = WindowDimensions {
            width: 1280,
            height: 752,
            x: 0,
            y: 0,
            is_maximized: true,
            pre_maximize_dimensions: None,
        };
        reduce_registry(
            &mut state,
            RegistryAction::MinimizeWindow {
                window_id: win,
                dimensions: Some(maximized),
            },
        )
        .unwrap();
        reduce_registry(&mut state, RegistryAction::RestoreWindow { window_id: win }).unwrap();

        let record = state.window(win).unwrap();
        assert!(!record.is_minimized);
        assert_eq!(record.dimensions, maximized);
    }

    #[test]
    fn update_dimensions_persists_only_committed_values() {
        let mut state = RegistryState::default();
        let win = open(&mut state, "files");
        let dims = WindowDimensions::from_bounds(WindowBounds {
            width: 800,
            height: 500,
            x: 5,
            y: 6,
        });

        let live = reduce_registry(
            &mut state,
            RegistryAction::UpdateWindowDimensions {
                window_id: win,
                dimensions: dims,
                persist: false,
            },
        )
        .unwrap();
        assert!(live.is_empty());
        assert_eq!(state.window(win).unwrap().dimensions, dims);

        let committed = reduce_registry(
            &mut state,
            RegistryAction::UpdateWindowDimensions {
                window_id: win,
                dimensions: dims,
                persist: true,
            },
        )
        .unwrap();
        assert_eq!(
            committed,
            vec![
                RegistryEffect::PersistDimensions {
                    window_id: win,
                    kind: WindowKind::from("files"),
                    dimensions: dims,
                },
                RegistryEffect::PersistSession,
            ]
        );
    }

    #[test]
    fn session_is_saved_after_every_visible_change() {
        let mut state = RegistryState::default();
        let chat = open(&mut state, "chat");
        let files = open(&mut state, "files");

        for action in [
            RegistryAction::FocusWindow { window_id: chat },
            RegistryAction::MinimizeWindow {
                window_id: chat,
                dimensions: None,
            },
            RegistryAction::RestoreWindow { window_id: chat },
            RegistryAction::CloseWindow { window_id: files },
        ] {
            let effects = reduce_registry(&mut state, action.clone()).unwrap();
            assert_eq!(
                effects.last(),
                Some(&RegistryEffect::PersistSession),
                "{action:?}"
            );
        }

        let opened = reduce_registry(
            &mut state,
            RegistryAction::OpenWindow {
                request: OpenWindowRequest::new("admin"),
                viewport: VIEWPORT,
            },
        )
        .unwrap();
        assert!(opened.contains(&RegistryEffect::PersistSession));

        let snapshot = state.snapshot();
        let hydrated =
            reduce_registry(&mut state, RegistryAction::HydrateSnapshot { snapshot }).unwrap();
        assert!(hydrated.is_empty());
    }

    #[test]
    fn raise_reorders_without_moving_keyboard_focus() {
        let mut state = RegistryState::default();
        let chat = open(&mut state, "chat");
        let files = open(&mut state, "files");

        let effects =
            reduce_registry(&mut state, RegistryAction::RaiseWindow { window_id: chat }).unwrap();
        assert_eq!(effects, vec![RegistryEffect::PersistSession]);
        assert_eq!(state.topmost_window_id(), Some(chat));
        assert!(z_of(&state, chat) > z_of(&state, files));

        let again =
            reduce_registry(&mut state, RegistryAction::RaiseWindow { window_id: chat }).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn only_stale_ids_count_as_routine_errors() {
        assert!(RegistryError::WindowNotFound(WindowId(3)).is_stale_window());
        assert!(!RegistryError::UnsupportedSchema(7).is_stale_window());
    }

    #[test]
    fn stale_ids_are_reported_without_touching_state() {
        let mut state = RegistryState::default();
        let win = open(&mut state, "chat");
        reduce_registry(&mut state, RegistryAction::CloseWindow { window_id: win }).unwrap();
        let before = state.clone();

        for action in [
            RegistryAction::CloseWindow { window_id: win },
            RegistryAction::FocusWindow { window_id: win },
            RegistryAction::RestoreWindow { window_id: win },
            RegistryAction::MinimizeWindow {
                window_id: win,
                dimensions: None,
            },
        ] {
            assert_eq!(
                reduce_registry(&mut state, action),
                Err(RegistryError::WindowNotFound(win))
            );
        }
        assert_eq!(state, before);
    }

    #[test]
    fn hydrate_normalizes_stack_and_rejects_foreign_schema() {
        let mut state = RegistryState::default();
        let a = open(&mut state, "chat");
        let b = open(&mut state, "files");
        state.windows[0].z_index = 40;
        state.windows[1].z_index = 9;
        let snapshot = state.snapshot();

        let mut hydrated = RegistryState::default();
        reduce_registry(
            &mut hydrated,
            RegistryAction::HydrateSnapshot {
                snapshot: snapshot.clone(),
            },
        )
        .unwrap();
        assert_eq!(z_of(&hydrated, b), 1);
        assert_eq!(z_of(&hydrated, a), 2);
        assert_eq!(hydrated.next_window_id, 3);

        let foreign = RegistrySnapshot {
            schema_version: 99,
            ..snapshot
        };
        assert_eq!(
            reduce_registry(
                &mut hydrated,
                RegistryAction::HydrateSnapshot { snapshot: foreign }
            ),
            Err(RegistryError::UnsupportedSchema(99))
        );
    }

    #[test]
    fn container_notifies_observers_and_ignores_stale_ids() {
        let mut registry = WindowRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let subscription = registry.subscribe(move |notification| {
            sink.borrow_mut()
                .push((notification.event, notification.state.windows.len()));
        });

        let win = registry.open_window(OpenWindowRequest::new("chat"), VIEWPORT);
        assert_eq!(registry.topmost_window_id(), Some(win));
        registry.close_window(win);
        registry.close_window(win);
        registry.focus_window(win);
        assert_eq!(
            *seen.borrow(),
            vec![(RegistryEvent::Opened(win), 1), (RegistryEvent::Closed(win), 0)]
        );

        assert!(registry.unsubscribe(subscription));
        assert!(!registry.unsubscribe(subscription));
        registry.open_window(OpenWindowRequest::new("chat"), VIEWPORT);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut registry = WindowRegistry::new();
        let first = registry.open_window(OpenWindowRequest::new("chat"), VIEWPORT);
        registry.close_window(first);
        let second = registry.open_window(OpenWindowRequest::new("chat"), VIEWPORT);
        assert_ne!(first, second);
        assert_eq!(registry.window(second).unwrap().z_index, 1);
    }
}
