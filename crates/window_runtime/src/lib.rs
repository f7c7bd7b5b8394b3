//! Window lifecycle and geometry engine for the browser desktop shell.
//!
//! The headless core ([`registry`], [`controller`], [`taskbar`], [`geometry`]) is plain Rust and
//! is tested natively. [`runtime_context`] and [`components`] wire it into Leptos.

pub mod components;
pub mod controller;
pub mod geometry;
pub mod host;
pub mod model;
pub mod persistence;
pub mod profiles;
pub mod registry;
pub mod runtime_context;
pub mod taskbar;

pub use components::{
    FloatingWindow, Taskbar, TaskbarButton, TaskbarWindowContextMenu, WindowLayer,
};
pub use controller::{GeometryController, GeometryEvent, GestureError, GesturePhase};
pub use host::WindowHostContext;
pub use model::*;
pub use persistence::{load_window_dimensions, persist_window_dimensions};
pub use registry::{
    reduce_registry, RegistryAction, RegistryEffect, RegistryError, RegistryEvent,
    RegistryNotification, SubscriptionId, WindowRegistry,
};
pub use runtime_context::{use_window_runtime, WindowRuntimeContext, WindowRuntimeProvider};
pub use taskbar::{ContextMenuState, TaskbarEntry, TaskbarMenuItem};
